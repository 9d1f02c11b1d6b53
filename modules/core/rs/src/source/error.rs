use derive_more::Display;
use thiserror::Error;

/// Failures reported by a read source. None of them are retried by the pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The upstream call exceeded its deadline.
    #[error("API fetch timed out: {0}")]
    Timeout(String),
    /// The upstream body could not be decoded as JSON (or as the expected JSON document).
    #[error("API response is malformed: {0}")]
    MalformedResponse(String),
    #[error("API not found: {0}")]
    NotFound(String),
    /// Request parameters were rejected upstream.
    #[error("API request malformed: {0}")]
    BadRequest(String),
    /// Any other non-success outcome, with the upstream status and message when available.
    #[error(
        "Something went wrong with the API call (status: {}): {}",
        .status.map_or_else(|| "none".to_string(), |x| x.to_string()),
        .message.as_deref().unwrap_or("no details provided")
    )]
    Upstream {
        status: Option<u16>,
        message: Option<String>,
    },
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    Timeout,
    MalformedResponse,
    NotFound,
    BadRequest,
    UpstreamError,
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Timeout(_) => ApiErrorKind::Timeout,
            ApiError::MalformedResponse(_) => ApiErrorKind::MalformedResponse,
            ApiError::NotFound(_) => ApiErrorKind::NotFound,
            ApiError::BadRequest(_) => ApiErrorKind::BadRequest,
            ApiError::Upstream { .. } => ApiErrorKind::UpstreamError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            ApiError::Timeout("60s elapsed".into()).to_string(),
            "API fetch timed out: 60s elapsed"
        );
        assert_eq!(
            ApiError::Upstream {
                status: Some(503),
                message: Some("Backend unavailable".into())
            }
            .to_string(),
            "Something went wrong with the API call (status: 503): Backend unavailable"
        );
        assert_eq!(
            ApiError::Upstream {
                status: None,
                message: None
            }
            .to_string(),
            "Something went wrong with the API call (status: none): no details provided"
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(ApiError::NotFound("x".into()).kind(), ApiErrorKind::NotFound);
        assert_eq!(
            ApiError::Upstream {
                status: Some(500),
                message: None
            }
            .kind(),
            ApiErrorKind::UpstreamError
        );
        assert_eq!(ApiErrorKind::MalformedResponse.to_string(), "MalformedResponse");
    }
}
