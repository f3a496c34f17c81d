//! Integration tests for the Scale client.
//!
//! These tests make real API calls to Scale.
//! Run with: SCALE_API_KEY=your_key cargo test --test scale_integration -- --ignored

use label_qc::config::QcConfig;
use label_qc::provider::{ScaleClient, TaskProvider};
use label_qc::quality::count_unique_labels;
use label_qc::ProviderError;

fn create_test_client() -> ScaleClient {
    let config = QcConfig::from_env()
        .expect("SCALE_API_KEY environment variable must be set for integration tests");
    ScaleClient::new(&config).expect("client should build")
}

#[tokio::test]
#[ignore] // Run with: cargo test --test scale_integration -- --ignored
async fn test_list_projects() {
    let client = create_test_client();

    let projects = client.list_projects().await;
    assert!(projects.is_ok(), "Listing failed: {:?}", projects.err());

    for project in projects.expect("projects") {
        assert!(!project.name.is_empty(), "Project name should not be empty");
    }
}

#[tokio::test]
#[ignore]
async fn test_list_and_fetch_first_task() {
    let client = create_test_client();

    let projects = client.list_projects().await.expect("projects");
    let Some(project) = projects.first() else {
        return;
    };

    let listing = client
        .list_task_ids(&project.name)
        .await
        .expect("task listing should succeed");
    assert_eq!(listing.total, listing.task_ids.len());

    if let Some(task_id) = listing.task_ids.first() {
        let task = client.fetch_task(task_id).await.expect("fetch should succeed");
        assert_eq!(&task.task_id, task_id);
        if task.is_completed() {
            let annotations = task.completed_annotations().expect("annotations");
            assert!(count_unique_labels(annotations) <= annotations.len());
        }
    }
}

#[tokio::test]
#[ignore]
async fn test_invalid_key_is_unauthorized() {
    let config = QcConfig::new("live_invalid_key_for_tests");
    let client = ScaleClient::new(&config).expect("client should build");

    let err = client
        .list_projects()
        .await
        .expect_err("invalid key should be rejected");
    assert!(
        matches!(err, ProviderError::Unauthorized(_)),
        "unexpected error: {}",
        err
    );
}
