use arbscan_batch::BatchError;
use thiserror::Error;

/// Errors returned by the Walmart catalog client.
///
/// Endpoints are reported by path only; the API key never appears in an
/// error message.
#[derive(Debug, Error)]
pub enum WalmartError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited on {endpoint} (retry after {retry_after_secs}s)")]
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

    #[error("unknown special feed \"{0}\"")]
    UnknownFeed(String),

    #[error(transparent)]
    Batch(#[from] BatchError),
}
