//! Retry classification for bucket requests.

use reqwest::StatusCode;

/// Maximum number of attempts for a network operation.
pub const MAX_RETRIES: usize = 3;

/// Delay between attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// Failures that will not go away by asking again.
#[derive(Debug)]
pub enum NonRetryableError {
    /// HTTP 404: nothing is published at this version/platform.
    NotFound(String),
    /// HTTP 403: the bucket refuses the object (it also answers this way for
    /// some missing objects).
    Forbidden(String),
    /// HTTP 429.
    RateLimited(String),
    /// Any other 4xx.
    ClientError(String),
}

impl std::fmt::Display for NonRetryableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NonRetryableError::NotFound(msg) => {
                write!(
                    f,
                    "Not found: {}. This version/platform may not be published to Chrome for Testing.",
                    msg
                )
            }
            NonRetryableError::Forbidden(msg) => {
                write!(
                    f,
                    "Access denied: {}. The build may not exist for this version/platform.",
                    msg
                )
            }
            NonRetryableError::RateLimited(msg) => {
                write!(f, "Rate limited: {}. Try again later.", msg)
            }
            NonRetryableError::ClientError(msg) => {
                write!(f, "Request error: {}", msg)
            }
        }
    }
}

impl std::error::Error for NonRetryableError {}

/// Classifies an HTTP status error.
/// Returns Ok(()) if a retry may help, Err with a user-facing reason if not.
pub fn classify_error(error: &reqwest::Error) -> Result<(), NonRetryableError> {
    let Some(status) = error.status() else {
        // Connection errors, timeouts, etc.
        return Ok(());
    };

    let url = error
        .url()
        .map(|u| u.to_string())
        .unwrap_or_else(|| "request".to_string());

    match status {
        StatusCode::NOT_FOUND => Err(NonRetryableError::NotFound(url)),
        StatusCode::FORBIDDEN => Err(NonRetryableError::Forbidden(url)),
        StatusCode::TOO_MANY_REQUESTS => Err(NonRetryableError::RateLimited(url)),
        s if s.is_client_error() => Err(NonRetryableError::ClientError(format!(
            "HTTP {} from {}",
            s.as_u16(),
            url
        ))),
        // 5xx
        _ => Ok(()),
    }
}

/// Wraps an error from `error_for_status()`, turning non-retryable statuses
/// into [`NonRetryableError`].
pub fn check_retryable(error: reqwest::Error) -> anyhow::Error {
    match classify_error(&error) {
        Ok(()) => anyhow::Error::from(error),
        Err(non_retryable) => anyhow::Error::from(non_retryable),
    }
}
