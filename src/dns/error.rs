use reqwest::StatusCode;
use thiserror::Error;

pub type DnsResult<T> = Result<T, ArvanCloudError>;

/// Errors returned by the ArvanCloud DNS API client
#[derive(Debug, Error)]
pub enum ArvanCloudError {
    /// The API rejected the token (HTTP 401)
    #[error("Malformed authorization or invalid API token")]
    Unauthorized,

    /// The response could not be interpreted
    #[error("Received an unexpected response from ArvanCloud API: {0}")]
    MalformedResponse(#[source] ResponseProblem),

    /// A search by name returned no records
    #[error("Record with name {record_name} not found")]
    RecordNotFound { record_name: String },

    /// DNS resolution, connect, timeout or body transfer failure
    #[error("Failed to reach ArvanCloud API: {0}")]
    ConnectionFailure(#[source] reqwest::Error),
}

impl ArvanCloudError {
    /// Only transport failures are worth retrying; the rest are terminal
    pub fn is_retryable(&self) -> bool {
        matches!(self, ArvanCloudError::ConnectionFailure(_))
    }
}

impl From<ResponseProblem> for ArvanCloudError {
    fn from(problem: ResponseProblem) -> Self {
        ArvanCloudError::MalformedResponse(problem)
    }
}

impl From<reqwest::Error> for ArvanCloudError {
    fn from(err: reqwest::Error) -> Self {
        ArvanCloudError::ConnectionFailure(err)
    }
}

/// Why a response was treated as malformed
#[derive(Debug, Error)]
pub enum ResponseProblem {
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("missing or invalid field `{0}`")]
    MissingField(&'static str),

    #[error("unexpected status code {0}")]
    UnexpectedStatus(StatusCode),
}

/// The token cannot be sent as an HTTP header value
#[derive(Debug, Error)]
#[error("API token contains characters that are not allowed in an HTTP header")]
pub struct InvalidToken;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_malformed_response_exposes_cause() {
        let err = ArvanCloudError::from(ResponseProblem::UnexpectedStatus(StatusCode::NOT_FOUND));

        assert!(err.to_string().contains("unexpected status code 404"));
        let source = err.source().expect("cause should be attached");
        assert_eq!(source.to_string(), "unexpected status code 404 Not Found");
    }

    #[test]
    fn test_record_not_found_message() {
        let err = ArvanCloudError::RecordNotFound {
            record_name: "foo".to_string(),
        };
        assert_eq!(err.to_string(), "Record with name foo not found");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_unauthorized_is_not_retryable() {
        assert!(!ArvanCloudError::Unauthorized.is_retryable());
    }
}
