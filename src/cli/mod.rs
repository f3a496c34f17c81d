//! Command-line interface for label-qc.
//!
//! Provides the `check` command that runs a label-variety check and the
//! `projects` command that lists available projects.

mod commands;

pub use commands::{parse_cli, run, run_with_cli, CheckArgs, Cli, Commands, ProviderArgs};
