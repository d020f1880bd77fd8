//! HTTP implementation of [`TaskService`] over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::Task,
    error::ApiError,
    protocol::{CommandRequest, CommandResponse},
};
use tracing::debug;
use url::Url;

use crate::{ServiceError, TaskService};

pub struct HttpTaskService {
    http: Client,
    base_url: Url,
}

impl HttpTaskService {
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let http = Client::builder().timeout(timeout).build()?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ServiceError> {
        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.as_str().trim_end_matches('/'))
    }
}

/// Validates the configured service address. Only absolute http(s) URLs are
/// accepted; a path prefix such as `/api` is kept.
pub fn parse_base_url(raw: &str) -> Result<Url, ServiceError> {
    let invalid = |reason: String| ServiceError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{other}'"))),
    }
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }
    Ok(url)
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        let fallback = match response.error_for_status_ref() {
            Err(err) => err.to_string(),
            Ok(_) => format!("HTTP status {status}"),
        };
        // A body that cannot be read or decoded simply has no detail.
        let detail = match response.bytes().await {
            Ok(body) => serde_json::from_slice::<ApiError>(&body)
                .ok()
                .and_then(|body| body.detail_text()),
            Err(_) => None,
        };
        return Err(ServiceError::Rejected {
            status: status.as_u16(),
            detail,
            fallback,
        });
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| ServiceError::Decode(e.to_string()))
}

#[async_trait]
impl TaskService for HttpTaskService {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        let url = self.endpoint("tasks");
        debug!(%url, "tasks: fetching all");
        let response = self.http.get(url).send().await?;
        decode_json(response).await
    }

    async fn submit_command(&self, command: &str) -> Result<CommandResponse, ServiceError> {
        let url = self.endpoint("command");
        debug!(%url, "command: posting");
        let response = self
            .http
            .post(url)
            .json(&CommandRequest {
                command: command.to_string(),
            })
            .send()
            .await?;
        decode_json(response).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
