use thiserror::Error;

/// Failure of one of the two remote task-service operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("invalid task service url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    /// The request never reached the service or no response came back.
    #[error("{0}")]
    Transport(String),
    /// Non-2xx response. `fallback` is the transport's own description of
    /// the status, used when the body carries no `detail`.
    #[error("task service responded {status}: {}", detail.as_deref().unwrap_or(fallback))]
    Rejected {
        status: u16,
        detail: Option<String>,
        fallback: String,
    },
    #[error("malformed task service response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Most specific text available for showing to the user.
    pub fn diagnostic(&self) -> String {
        match self {
            ServiceError::Rejected {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ServiceError::Rejected { fallback, .. } => fallback.clone(),
            ServiceError::Transport(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::Decode(err.to_string())
        } else {
            ServiceError::Transport(err.to_string())
        }
    }
}
