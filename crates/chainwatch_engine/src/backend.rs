use std::time::Duration;

use chainwatch_core::{JobId, JobRequest, Mode, ProcessingOption};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::Url;

use crate::types::{ErrorBody, OptionsResponse, SubmitBody};
use crate::{BackendError, FailureKind, HealthResponse, JobStatusResponse, SubmitResponse};

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// The analysis backend as seen from the controller.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn health(&self) -> Result<HealthResponse, BackendError>;

    async fn options(&self, mode: Mode) -> Result<Vec<ProcessingOption>, BackendError>;

    async fn stats(&self) -> Result<Value, BackendError>;

    async fn submit_job(&self, request: &JobRequest) -> Result<SubmitResponse, BackendError>;

    async fn job_status(&self, job_id: &JobId) -> Result<JobStatusResponse, BackendError>;

    async fn toggle_model(&self, enabled: bool) -> Result<Value, BackendError>;

    async fn record_detail(&self, hash: &str) -> Result<Value, BackendError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let mut base_url = Url::parse(&settings.base_url)
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }
        // Endpoints are joined relative to the base, which needs a trailing slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(BackendError::new(
                FailureKind::HttpStatus(status.as_u16()),
                error_message(status, &body),
            ));
        }

        serde_json::from_slice(&body)
            .map_err(|err| BackendError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn health(&self) -> Result<HealthResponse, BackendError> {
        let url = self.endpoint("api/health")?;
        self.send_json(self.client.get(url)).await
    }

    async fn options(&self, mode: Mode) -> Result<Vec<ProcessingOption>, BackendError> {
        let mut url = self.endpoint("api/options")?;
        url.query_pairs_mut().append_pair("mode", mode.as_str());
        let response: OptionsResponse = self.send_json(self.client.get(url)).await?;
        Ok(response.options.unwrap_or_default())
    }

    async fn stats(&self) -> Result<Value, BackendError> {
        let url = self.endpoint("api/stats")?;
        self.send_json(self.client.get(url)).await
    }

    async fn submit_job(&self, request: &JobRequest) -> Result<SubmitResponse, BackendError> {
        let url = self.endpoint("api/transactions/async")?;
        let body = SubmitBody::from(request);
        self.send_json(self.client.post(url).json(&body)).await
    }

    async fn job_status(&self, job_id: &JobId) -> Result<JobStatusResponse, BackendError> {
        let mut url = self.endpoint("api/transactions/job/")?;
        url.path_segments_mut()
            .map_err(|()| BackendError::new(FailureKind::InvalidUrl, "base url has no path"))?
            .pop_if_empty()
            .push(job_id.as_str());
        self.send_json(self.client.get(url)).await
    }

    async fn toggle_model(&self, enabled: bool) -> Result<Value, BackendError> {
        let url = self.endpoint("api/model-toggle")?;
        self.send_json(self.client.post(url).json(&json!({ "enabled": enabled })))
            .await
    }

    async fn record_detail(&self, hash: &str) -> Result<Value, BackendError> {
        let mut url = self.endpoint("api/transaction/")?;
        url.path_segments_mut()
            .map_err(|()| BackendError::new(FailureKind::InvalidUrl, "base url has no path"))?
            .pop_if_empty()
            .push(hash);
        self.send_json(self.client.get(url)).await
    }
}

/// Prefers the `error`/`message` and `details` fields of a JSON error body.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let headline = parsed
        .error
        .or(parsed.message)
        .unwrap_or_else(|| status.to_string());
    match parsed.details {
        Some(details) if !details.is_empty() => format!("{headline} - {details}"),
        _ => headline,
    }
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return BackendError::new(FailureKind::Decode, err.to_string());
    }
    BackendError::new(FailureKind::Network, err.to_string())
}
