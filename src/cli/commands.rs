//! CLI command definitions for label-qc.
//!
//! `check` runs the label-variety check for one project; `projects` only
//! lists what the credential can see.

use std::io::{self, Write};
use std::time::Duration;

use clap::Parser;
use tracing::info;

use crate::config::{
    QcConfig, DEFAULT_API_BASE, DEFAULT_OUTPUT_DIR, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS,
};
use crate::export::ReportWriter;
use crate::pipeline::{QcReport, QcRunner, RunOutcome};
use crate::provider::{ScaleClient, TaskProvider};
use crate::selector::{select_project, ProjectDirectory, Selection};

/// Flag labeling tasks whose label variety is below their project average.
#[derive(Parser)]
#[command(name = "label-qc")]
#[command(about = "Flag labeling tasks with fewer unique labels than the project average")]
#[command(version)]
#[command(
    long_about = "label-qc fetches every completed task of a labeling project, counts the unique labels in each, and flags tasks below the project average for manual review.\n\nThe report is written to <output>/variety_flags_<project>.json.\n\nExample usage:\n  SCALE_API_KEY=live_xxx label-qc check\n  label-qc check --project \"Traffic Sign Detection\" --json"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Select a project and write its label-variety report.
    Check(CheckArgs),

    /// List the projects available to the API key.
    #[command(alias = "ls")]
    Projects(ProviderArgs),
}

/// Connection settings for the task provider.
#[derive(clap::Args, Debug, Clone)]
pub struct ProviderArgs {
    /// Scale API key (can also be set via SCALE_API_KEY env var).
    #[arg(long, env = "SCALE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Scale API base URL.
    #[arg(long, env = "SCALE_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "LABEL_QC_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

/// Arguments for `label-qc check`.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub provider: ProviderArgs,

    /// Project to check. Skips the interactive prompt when given.
    #[arg(short = 'p', long)]
    pub project: Option<String>,

    /// Directory the report is written to.
    #[arg(short = 'o', long, env = "LABEL_QC_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output: String,

    /// Tasks requested per listing page (1-100).
    #[arg(long, env = "LABEL_QC_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Also print the report JSON to stdout.
    #[arg(short = 'j', long)]
    pub json: bool,
}

impl ProviderArgs {
    fn to_config(&self) -> anyhow::Result<QcConfig> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            anyhow::anyhow!("Missing API key: pass --api-key or set SCALE_API_KEY")
        })?;
        Ok(QcConfig::new(api_key)
            .with_api_base(self.api_base.clone())
            .with_request_timeout(Duration::from_secs(self.timeout)))
    }
}

impl CheckArgs {
    fn to_config(&self) -> anyhow::Result<QcConfig> {
        let config = self
            .provider
            .to_config()?
            .with_output_dir(&self.output)
            .with_page_size(self.page_size);
        config.validate()?;
        Ok(config)
    }
}

/// Parse command-line arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Parse arguments and run.
pub async fn run() -> anyhow::Result<()> {
    let cli = parse_cli();
    run_with_cli(cli).await
}

/// Run with already-parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Check(args) => {
            run_check_command(args).await?;
        }
        Commands::Projects(args) => {
            run_projects_command(args).await?;
        }
    }
    Ok(())
}

async fn run_projects_command(args: ProviderArgs) -> anyhow::Result<()> {
    let config = args.to_config()?;
    config.validate()?;
    let client = ScaleClient::new(&config)?;

    let directory = ProjectDirectory::from_projects(client.list_projects().await?);
    if directory.is_empty() {
        println!("No projects found.");
        return Ok(());
    }

    let stdout = io::stdout();
    directory.render(&mut stdout.lock())?;
    Ok(())
}

async fn run_check_command(args: CheckArgs) -> anyhow::Result<()> {
    let config = args.to_config()?;
    info!(
        api_base = %config.api_base,
        output_dir = %config.output_dir.display(),
        "Starting label QC"
    );

    let client = ScaleClient::new(&config)?;

    let project_name = match args.project.clone() {
        Some(name) => name,
        None => match prompt_for_project(&client).await? {
            Selection::Project(name) => name,
            Selection::Invalid => return Ok(()),
        },
    };

    let runner = QcRunner::new(client, ReportWriter::new(&config.output_dir));
    match runner.run(&project_name).await? {
        RunOutcome::Completed(report) => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if args.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&report.records)?)?;
            }
            print_summary(&report, &mut out)?;
        }
        RunOutcome::Aborted { task_id, status } => {
            println!("Task {} is {}, not completed.", task_id, status);
            println!("Please wait for all tasks to complete before running QC.");
        }
    }

    Ok(())
}

/// List projects and ask the operator to pick one.
async fn prompt_for_project<P: TaskProvider>(provider: &P) -> anyhow::Result<Selection> {
    let directory = ProjectDirectory::from_projects(provider.list_projects().await?);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    directory.render(&mut out)?;
    let selection = select_project(&directory, &mut stdin.lock(), &mut out)?;
    Ok(selection)
}

/// Per-task flags in listing order, followed by the closing summary line.
fn print_summary<W: Write>(report: &QcReport, out: &mut W) -> io::Result<()> {
    writeln!(out, "Average unique labels: {}", report.average_unique_labels)?;
    writeln!(out, "A 'true' status indicates that a task needs to be reviewed.")?;
    for record in report.ordered_records() {
        writeln!(out, "{} : {}", record.task_id, record.flag)?;
    }
    writeln!(
        out,
        "Flagged {} of {} tasks (average unique labels: {}). Report written to {}",
        report.flagged_count(),
        report.task_count(),
        report.average_unique_labels,
        report.report_path.display()
    )
}
