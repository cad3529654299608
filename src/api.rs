//! HTTP client for the task backend

use reqwest::{Client, RequestBuilder};
use std::future::Future;
use thiserror::Error;

use crate::config::BackendConfig;
use crate::models::{
    CreateTaskRequest, ErrorBody, Stats, Task, TaskId, UpdateTaskRequest, Weather,
};

/// Failure of a single backend call
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status
    #[error("backend rejected request with status {status}")]
    Rejected {
        status: u16,
        /// `error` field of the response body, when there was one
        message: Option<String>,
    },

    /// The request never completed
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered 2xx with a body we could not read
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Message the backend attached to a rejection, if any
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

/// The backend endpoints the controller talks to.
///
/// `HttpBackend` is the real implementation; tests provide in-memory ones.
pub trait Backend {
    /// `POST /add`
    fn create_task(
        &self,
        request: &CreateTaskRequest,
    ) -> impl Future<Output = Result<Task, ApiError>>;

    /// `PUT /update/{id}`; yields the updated task when the backend echoes it
    fn update_task(
        &self,
        id: &TaskId,
        request: &UpdateTaskRequest,
    ) -> impl Future<Output = Result<Option<Task>, ApiError>>;

    /// `DELETE /remove/{id}`
    fn delete_task(&self, id: &TaskId) -> impl Future<Output = Result<(), ApiError>>;

    /// `GET /stats`
    fn stats(&self) -> impl Future<Output = Result<Stats, ApiError>>;

    /// `GET /weather?city=...`
    fn weather(&self, city: &str) -> impl Future<Output = Result<Weather, ApiError>>;
}

/// reqwest-backed implementation of [`Backend`]
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("todolist/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the raw body of a 2xx response
    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);
            tracing::debug!(status = status.as_u16(), message = ?message, "Backend rejected request");
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}

impl Backend for HttpBackend {
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, ApiError> {
        let body = self
            .send(self.client.post(self.url("/add")).json(request))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn update_task(
        &self,
        id: &TaskId,
        request: &UpdateTaskRequest,
    ) -> Result<Option<Task>, ApiError> {
        let path = format!("/update/{}", id);
        let body = self
            .send(self.client.put(self.url(&path)).json(request))
            .await?;
        // Any 2xx counts as accepted; the echoed task is only used to reconcile
        Ok(serde_json::from_str(&body).ok())
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), ApiError> {
        let path = format!("/remove/{}", id);
        self.send(self.client.delete(self.url(&path))).await?;
        Ok(())
    }

    async fn stats(&self) -> Result<Stats, ApiError> {
        let body = self.send(self.client.get(self.url("/stats"))).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn weather(&self, city: &str) -> Result<Weather, ApiError> {
        let request = self
            .client
            .get(self.url("/weather"))
            .query(&[("city", city)]);
        let body = self.send(request).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
