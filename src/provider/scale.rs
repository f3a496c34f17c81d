//! Scale AI REST client.
//!
//! Talks to the v1 API with HTTP basic auth (API key as username, empty
//! password). Task listing follows the `next_token` cursor until a page
//! reports `has_more: false`, the cursor runs out, or the cursor repeats.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::types::{Project, Task, TaskListing, TaskPage};
use super::TaskProvider;
use crate::config::QcConfig;
use crate::error::{ProviderError, ProviderResult};

/// Client for the Scale AI task API.
///
/// # Example
///
/// ```ignore
/// use label_qc::config::QcConfig;
/// use label_qc::provider::{ScaleClient, TaskProvider};
///
/// let client = ScaleClient::new(&QcConfig::from_env()?)?;
/// for project in client.list_projects().await? {
///     println!("{} ({})", project.name, project.project_type);
/// }
/// ```
pub struct ScaleClient {
    http_client: Client,
    api_base: String,
    api_key: String,
    page_size: usize,
}

impl ScaleClient {
    /// Build a client from the run configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Http` if the underlying HTTP client cannot be
    /// constructed (e.g. TLS backend initialisation failure).
    pub fn new(config: &QcConfig) -> ProviderResult<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ProviderError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            page_size: config.page_size,
        })
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn tasks_url(&self, project_name: &str, next_token: Option<&str>) -> String {
        let mut url = format!(
            "{}/tasks?project={}&limit={}",
            self.api_base,
            urlencoding::encode(project_name),
            self.page_size
        );
        if let Some(token) = next_token {
            url.push_str(&format!("&next_token={}", urlencoding::encode(token)));
        }
        url
    }

    fn task_url(&self, task_id: &str) -> String {
        format!("{}/task/{}", self.api_base, urlencoding::encode(task_id))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ProviderResult<T> {
        debug!(url = %url, "GET");
        let response = self
            .http_client
            .get(url)
            .basic_auth(&self.api_key, Some(""))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let response = check_status(response).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Parse(format!("Failed to parse response: {}", e)))
    }
}

/// Map non-success statuses onto provider errors.
async fn check_status(response: Response) -> ProviderResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());
        return Err(ProviderError::RateLimited { retry_after });
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ProviderError::Unauthorized(error_text));
    }

    Err(ProviderError::Api {
        code: status.as_u16(),
        message: error_text,
    })
}

#[async_trait]
impl TaskProvider for ScaleClient {
    async fn list_projects(&self) -> ProviderResult<Vec<Project>> {
        let url = format!("{}/projects", self.api_base);
        self.get_json(&url).await
    }

    async fn list_task_ids(&self, project_name: &str) -> ProviderResult<TaskListing> {
        let mut task_ids = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let url = self.tasks_url(project_name, next_token.as_deref());
            let page: TaskPage = self.get_json(&url).await?;
            debug!(
                project = project_name,
                page_len = page.docs.len(),
                total = ?page.total,
                has_more = page.has_more,
                "Fetched task page"
            );

            task_ids.extend(page.docs.into_iter().map(|doc| doc.task_id));

            if !page.has_more {
                break;
            }
            let token = match page.next_token {
                Some(token) if !token.is_empty() => token,
                _ => break,
            };
            if next_token.as_deref() == Some(token.as_str()) {
                warn!(project = project_name, token = %token, "Repeated page cursor, stopping");
                break;
            }
            next_token = Some(token);
        }

        Ok(TaskListing::new(task_ids))
    }

    async fn fetch_task(&self, task_id: &str) -> ProviderResult<Task> {
        let url = self.task_url(task_id);
        self.get_json(&url).await
    }
}
