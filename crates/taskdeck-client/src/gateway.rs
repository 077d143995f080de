use std::time::Duration;

use anyhow::Context;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use taskdeck_core::filter::ActiveFilter;
use taskdeck_core::task::{
    CountsSummary, FullCounts, Group, GroupDraft, Tag, TagDraft, TagPatch, Task, TaskDraft,
    TaskPatch,
};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::ApiError;

/// The remote data source. Every call is asynchronous and independent;
/// callers serialize where ordering matters (tags before tasks after a tag
/// delete). Implementations must not retry.
#[allow(async_fn_in_trait)]
pub trait Gateway {
    async fn fetch_groups(&self) -> Result<Vec<Group>, ApiError>;
    async fn fetch_tags(&self) -> Result<Vec<Tag>, ApiError>;
    async fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError>;
    async fn fetch_tasks_by_filter(&self, kind: ActiveFilter) -> Result<Vec<Task>, ApiError>;
    async fn fetch_tasks_by_tag(&self, tag_id: Uuid) -> Result<Vec<Task>, ApiError>;
    async fn fetch_tasks_by_group(&self, group_id: Uuid) -> Result<Vec<Task>, ApiError>;
    async fn fetch_counts_summary(&self) -> Result<CountsSummary, ApiError>;
    async fn fetch_full_counts(&self) -> Result<FullCounts, ApiError>;
    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError>;
    async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<Task, ApiError>;
    async fn delete_task(&self, id: Uuid) -> Result<(), ApiError>;
    async fn create_group(&self, draft: &GroupDraft) -> Result<Group, ApiError>;
    async fn create_tag(&self, draft: &TagDraft) -> Result<Tag, ApiError>;
    async fn update_tag(&self, id: Uuid, patch: &TagPatch) -> Result<Tag, ApiError>;
    async fn delete_tag(&self, id: Uuid) -> Result<(), ApiError>;
}

#[derive(Debug, Deserialize)]
struct TasksEnvelope {
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
struct GroupsEnvelope {
    #[serde(default)]
    groups: Vec<Group>,
}

#[derive(Debug, Deserialize)]
struct TagsEnvelope {
    #[serde(default)]
    tags: Vec<Tag>,
}

/// JSON-over-HTTP gateway against the task server.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed building HTTP client for task gateway")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|error| ApiError::Network(error.to_string()))?;

        decode_response(response).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .request(method, self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|error| ApiError::Network(error.to_string()))?;

        decode_response(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .map_err(|error| ApiError::Network(error.to_string()))?;

        check_status(response.status())
    }
}

/// 2xx passes; 409 is a name conflict, 404 a vanished target, anything
/// else a generic status failure.
fn check_status(status: StatusCode) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }
    Err(match status {
        StatusCode::CONFLICT => ApiError::Conflict,
        StatusCode::NOT_FOUND => ApiError::NotFound,
        other => ApiError::Status(other.as_u16()),
    })
}

async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    check_status(status)?;

    // Read the body first so a transport failure mid-body stays a network
    // error and only a malformed payload becomes a decode error.
    let body = response
        .text()
        .await
        .map_err(|error| ApiError::Network(error.to_string()))?;

    serde_json::from_str(&body).map_err(|error| {
        warn!(%status, %error, "response body failed to decode");
        ApiError::Decode(error.to_string())
    })
}

fn filter_path(kind: ActiveFilter) -> String {
    match kind {
        ActiveFilter::All => "/tasks".to_string(),
        other => format!("/tasks/{}", other.as_key()),
    }
}

impl Gateway for HttpGateway {
    #[instrument(skip(self))]
    async fn fetch_groups(&self) -> Result<Vec<Group>, ApiError> {
        let envelope: GroupsEnvelope = self.get_json("/groups").await?;
        debug!(count = envelope.groups.len(), "fetched groups");
        Ok(envelope.groups)
    }

    #[instrument(skip(self))]
    async fn fetch_tags(&self) -> Result<Vec<Tag>, ApiError> {
        let envelope: TagsEnvelope = self.get_json("/tags").await?;
        debug!(count = envelope.tags.len(), "fetched tags");
        Ok(envelope.tags)
    }

    #[instrument(skip(self))]
    async fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let envelope: TasksEnvelope = self.get_json("/tasks").await?;
        debug!(count = envelope.tasks.len(), "fetched tasks");
        Ok(envelope.tasks)
    }

    #[instrument(skip(self), fields(kind = kind.as_key()))]
    async fn fetch_tasks_by_filter(&self, kind: ActiveFilter) -> Result<Vec<Task>, ApiError> {
        let envelope: TasksEnvelope = self.get_json(&filter_path(kind)).await?;
        Ok(envelope.tasks)
    }

    #[instrument(skip(self), fields(tag_id = %tag_id))]
    async fn fetch_tasks_by_tag(&self, tag_id: Uuid) -> Result<Vec<Task>, ApiError> {
        let envelope: TasksEnvelope = self.get_json(&format!("/tasks/tag/{tag_id}")).await?;
        Ok(envelope.tasks)
    }

    #[instrument(skip(self), fields(group_id = %group_id))]
    async fn fetch_tasks_by_group(&self, group_id: Uuid) -> Result<Vec<Task>, ApiError> {
        let envelope: TasksEnvelope = self.get_json(&format!("/groups/{group_id}/tasks")).await?;
        Ok(envelope.tasks)
    }

    #[instrument(skip(self))]
    async fn fetch_counts_summary(&self) -> Result<CountsSummary, ApiError> {
        self.get_json("/tasks/counts/summary").await
    }

    #[instrument(skip(self))]
    async fn fetch_full_counts(&self) -> Result<FullCounts, ApiError> {
        self.get_json("/tasks/counts").await
    }

    #[instrument(skip(self, draft), fields(content_len = draft.content.len()))]
    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        self.send_json(reqwest::Method::POST, "/tasks", draft).await
    }

    #[instrument(skip(self, patch), fields(id = %id))]
    async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<Task, ApiError> {
        self.send_json(reqwest::Method::PUT, &format!("/tasks/{id}"), patch)
            .await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_task(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("/tasks/{id}")).await
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn create_group(&self, draft: &GroupDraft) -> Result<Group, ApiError> {
        self.send_json(reqwest::Method::POST, "/groups", draft)
            .await
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn create_tag(&self, draft: &TagDraft) -> Result<Tag, ApiError> {
        self.send_json(reqwest::Method::POST, "/tags", draft).await
    }

    #[instrument(skip(self, patch), fields(id = %id))]
    async fn update_tag(&self, id: Uuid, patch: &TagPatch) -> Result<Tag, ApiError> {
        self.send_json(reqwest::Method::PUT, &format!("/tags/{id}"), patch)
            .await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_tag(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("/tags/{id}")).await
    }
}
