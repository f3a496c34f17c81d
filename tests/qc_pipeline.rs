//! End-to-end tests for a QC run against an in-memory task provider.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use label_qc::error::{ProviderError, ProviderResult};
use label_qc::export::{read_report, ReportWriter};
use label_qc::pipeline::{QcRunner, RunOutcome};
use label_qc::provider::{Project, Task, TaskListing, TaskProvider, TaskStatus};
use label_qc::QcError;

/// Mock provider serving a fixed set of tasks for one project.
struct MockProvider {
    project: String,
    task_ids: Vec<String>,
    tasks: HashMap<String, Task>,
    fetched: Mutex<Vec<String>>,
}

impl MockProvider {
    fn new(project: &str, tasks: Vec<Task>) -> Self {
        Self {
            project: project.to_string(),
            task_ids: tasks.iter().map(|t| t.task_id.clone()).collect(),
            tasks: tasks.into_iter().map(|t| (t.task_id.clone(), t)).collect(),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// List an id the provider cannot serve.
    fn with_dangling_id(mut self, task_id: &str) -> Self {
        self.task_ids.push(task_id.to_string());
        self
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl TaskProvider for MockProvider {
    async fn list_projects(&self) -> ProviderResult<Vec<Project>> {
        Ok(vec![Project::new(self.project.clone(), "annotation")])
    }

    async fn list_task_ids(&self, project_name: &str) -> ProviderResult<TaskListing> {
        if project_name != self.project {
            return Ok(TaskListing::default());
        }
        Ok(TaskListing::new(self.task_ids.clone()))
    }

    async fn fetch_task(&self, task_id: &str) -> ProviderResult<Task> {
        self.fetched
            .lock()
            .expect("lock poisoned")
            .push(task_id.to_string());
        self.tasks.get(task_id).cloned().ok_or_else(|| ProviderError::Api {
            code: 404,
            message: format!("task {} not found", task_id),
        })
    }
}

fn labels(n: usize) -> Vec<String> {
    // Each label appears twice so duplicates are exercised.
    (0..n)
        .flat_map(|i| [format!("label_{}", i), format!("label_{}", i)])
        .collect()
}

fn runner(provider: MockProvider, dir: &TempDir) -> QcRunner<MockProvider> {
    QcRunner::new(provider, ReportWriter::new(dir.path().join("output")))
}

fn expect_completed(outcome: RunOutcome) -> label_qc::pipeline::QcReport {
    match outcome {
        RunOutcome::Completed(report) => report,
        RunOutcome::Aborted { task_id, status } => {
            panic!("run aborted on {} ({})", task_id, status)
        }
    }
}

#[tokio::test]
async fn test_flags_tasks_below_ceiling_average() {
    let dir = TempDir::new().expect("tempdir");
    let provider = MockProvider::new(
        "signs",
        vec![
            Task::completed("t1", labels(2)),
            Task::completed("t2", labels(4)),
            Task::completed("t3", labels(4)),
            Task::completed("t4", labels(6)),
        ],
    );

    let report = expect_completed(runner(provider, &dir).run("signs").await.expect("run"));

    assert_eq!(report.average_unique_labels, 4);
    let flags: Vec<(String, bool)> = report
        .ordered_records()
        .map(|r| (r.task_id.clone(), r.flag))
        .collect();
    assert_eq!(
        flags,
        vec![
            ("t1".to_string(), true),
            ("t2".to_string(), false),
            ("t3".to_string(), false),
            ("t4".to_string(), false),
        ]
    );

    let expected_path = dir.path().join("output").join("variety_flags_signs.json");
    assert_eq!(report.report_path, expected_path);
    let on_disk = read_report(&expected_path).expect("read report");
    assert_eq!(on_disk, report.records);
    assert!(on_disk.values().all(|r| r.average_unique_labels == 4));
}

#[tokio::test]
async fn test_fractional_average_rounds_up() {
    let dir = TempDir::new().expect("tempdir");
    let provider = MockProvider::new(
        "p",
        vec![Task::completed("a", labels(1)), Task::completed("b", labels(2))],
    );

    let report = expect_completed(runner(provider, &dir).run("p").await.expect("run"));

    assert_eq!(report.average_unique_labels, 2);
    assert!(report.records["a"].flag);
    assert!(!report.records["b"].flag);
}

#[tokio::test]
async fn test_average_independent_of_task_order() {
    let counts = [5, 1, 3, 8, 2];
    let forward: Vec<Task> = counts
        .iter()
        .enumerate()
        .map(|(i, &n)| Task::completed(format!("t{}", i), labels(n)))
        .collect();
    let mut reversed = forward.clone();
    reversed.reverse();

    let dir_a = TempDir::new().expect("tempdir");
    let dir_b = TempDir::new().expect("tempdir");
    let a = expect_completed(
        runner(MockProvider::new("p", forward), &dir_a)
            .run("p")
            .await
            .expect("run"),
    );
    let b = expect_completed(
        runner(MockProvider::new("p", reversed), &dir_b)
            .run("p")
            .await
            .expect("run"),
    );

    assert_eq!(a.average_unique_labels, 4);
    assert_eq!(a.average_unique_labels, b.average_unique_labels);
    assert_eq!(a.records, b.records);
}

#[tokio::test]
async fn test_empty_project_writes_empty_object() {
    let dir = TempDir::new().expect("tempdir");
    let provider = MockProvider::new("empty", Vec::new());

    let report = expect_completed(runner(provider, &dir).run("empty").await.expect("run"));

    assert_eq!(report.average_unique_labels, 0);
    assert!(report.records.is_empty());
    let content = std::fs::read_to_string(&report.report_path).expect("read");
    assert_eq!(content.trim(), "{}");
}

#[tokio::test]
async fn test_single_task_without_annotations() {
    let dir = TempDir::new().expect("tempdir");
    let provider = MockProvider::new("p", vec![Task::completed("only", Vec::<String>::new())]);

    let report = expect_completed(runner(provider, &dir).run("p").await.expect("run"));

    let record = &report.records["only"];
    assert_eq!(record.num_unique_labels, 0);
    assert_eq!(record.average_unique_labels, 0);
    assert!(!record.flag);
}

#[tokio::test]
async fn test_incomplete_task_aborts_without_report() {
    let dir = TempDir::new().expect("tempdir");
    let provider = MockProvider::new(
        "p",
        vec![
            Task::completed("t1", labels(3)),
            Task::with_status("t2", TaskStatus::Pending),
            Task::completed("t3", labels(1)),
        ],
    );
    let runner = runner(provider, &dir);

    let outcome = runner.run("p").await.expect("run");

    match outcome {
        RunOutcome::Aborted { task_id, status } => {
            assert_eq!(task_id, "t2");
            assert_eq!(status, TaskStatus::Pending);
        }
        RunOutcome::Completed(_) => panic!("expected abort"),
    }
    assert!(!runner.writer().report_path("p").exists());
    assert_eq!(runner.provider().fetched(), vec!["t1", "t2"]);
}

#[tokio::test]
async fn test_every_non_completed_status_aborts() {
    for status in [TaskStatus::Pending, TaskStatus::Error, TaskStatus::Canceled] {
        let dir = TempDir::new().expect("tempdir");
        let provider = MockProvider::new("p", vec![Task::with_status("t", status)]);
        let runner = runner(provider, &dir);

        let outcome = runner.run("p").await.expect("run");

        assert!(
            matches!(outcome, RunOutcome::Aborted { status: s, .. } if s == status),
            "status {}",
            status
        );
        assert!(!runner.writer().report_path("p").exists());
    }
}

#[tokio::test]
async fn test_provider_failure_propagates_without_report() {
    let dir = TempDir::new().expect("tempdir");
    let provider =
        MockProvider::new("p", vec![Task::completed("t1", labels(2))]).with_dangling_id("ghost");
    let runner = runner(provider, &dir);

    let err = runner.run("p").await.expect_err("missing task should fail the run");

    assert!(matches!(
        err,
        QcError::Provider(ProviderError::Api { code: 404, .. })
    ));
    assert!(!runner.writer().report_path("p").exists());
}

#[tokio::test]
async fn test_completed_task_without_response_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let provider = MockProvider::new("p", vec![Task::with_status("hollow", TaskStatus::Completed)]);
    let runner = runner(provider, &dir);

    let err = runner.run("p").await.expect_err("missing response should fail");

    assert!(matches!(err, QcError::MissingResponse(id) if id == "hollow"));
    assert!(!runner.writer().report_path("p").exists());
}

#[tokio::test]
async fn test_rerun_overwrites_report() {
    let dir = TempDir::new().expect("tempdir");

    let first = MockProvider::new("p", vec![Task::completed("old", labels(1))]);
    runner(first, &dir).run("p").await.expect("first run");

    let second = MockProvider::new("p", vec![Task::completed("new", labels(2))]);
    let report = expect_completed(runner(second, &dir).run("p").await.expect("second run"));

    let on_disk = read_report(&report.report_path).expect("read");
    assert!(on_disk.contains_key("new"));
    assert!(!on_disk.contains_key("old"));
}
