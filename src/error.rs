//! Error types shared across the crate and the classification used when a
//! failed item is reported.

use thiserror::Error;

/// A non-2xx answer from the repository API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("status: {status}; message: {message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    /// Build from a response body. Dataverse wraps errors in a JSON envelope
    /// with a `message` field; anything else is kept verbatim.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());
        Self { status, message }
    }
}

/// Misconfiguration of a batch run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("no action configured for batch processing")]
    MissingAction,
    #[error("no report configured for batch processing")]
    MissingReport,
}

/// Short name of the kind of error, as shown in failure report lines.
///
/// Walks the chain from the outermost error inward and returns the first
/// kind it recognizes.
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if cause.is::<ApiError>() {
            return "ApiError";
        }
        if let Some(e) = cause.downcast_ref::<reqwest::Error>() {
            return if e.is_connect() {
                "ConnectError"
            } else if e.is_timeout() {
                "TimeoutError"
            } else {
                "HttpError"
            };
        }
        if cause.is::<sqlx::Error>() {
            return "DatabaseError";
        }
        if cause.is::<std::io::Error>() {
            return "IoError";
        }
        if cause.is::<serde_json::Error>() {
            return "JsonError";
        }
        if cause.is::<csv::Error>() {
            return "CsvError";
        }
        if cause.is::<serde_yaml::Error>() {
            return "YamlError";
        }
        if cause.is::<BatchError>() {
            return "BatchError";
        }
    }
    "Error"
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};

    #[test]
    fn api_error_takes_message_from_envelope() {
        let err = ApiError::from_body(404, r#"{"status":"ERROR","message":"Dataset not found"}"#);
        assert_eq!(err.status, 404);
        assert_eq!(err.message, "Dataset not found");
        assert_eq!(err.to_string(), "status: 404; message: Dataset not found");
    }

    #[test]
    fn api_error_keeps_non_json_body() {
        let err = ApiError::from_body(502, "Bad Gateway\n");
        assert_eq!(err.message, "Bad Gateway");
    }

    #[test]
    fn plain_error_kind() {
        assert_eq!(error_kind(&anyhow!("test")), "Error");
    }

    #[test]
    fn api_error_kind_survives_context() {
        let err = anyhow::Error::new(ApiError {
            status: 403,
            message: "forbidden".to_string(),
        })
        .context("assigning role");
        assert_eq!(error_kind(&err), "ApiError");
    }

    #[test]
    fn io_error_kind() {
        let err: anyhow::Result<String> =
            std::fs::read_to_string("/does/not/exist/at/all").context("reading targets");
        assert_eq!(error_kind(&err.unwrap_err()), "IoError");
    }

    #[test]
    fn json_error_kind() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(error_kind(&err.into()), "JsonError");
    }

    #[test]
    fn batch_error_kind() {
        assert_eq!(error_kind(&BatchError::MissingReport.into()), "BatchError");
    }
}
