use arbscan_batch::BatchError;
use thiserror::Error;

/// Errors returned by the Amazon product client.
///
/// Endpoints are reported by path only so credentials carried in the query
/// string never reach logs.
#[derive(Debug, Error)]
pub enum AmazonError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("throttled on {endpoint} (retry after {retry_after_secs}s)")]
    RateLimited {
        endpoint: String,
        retry_after_secs: u64,
    },

    #[error("unexpected HTTP status {status} from {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    #[error("unusable payload from {endpoint}: {reason}")]
    UnusablePayload { endpoint: String, reason: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error(transparent)]
    Batch(#[from] BatchError),
}
