//! HTTP error classification shared by every provider.
//!
//! The error type itself lives in `faqcoach-core` so the engine can downcast
//! it; this module maps transport failures and status codes onto it.

use faqcoach_core::engine::MAX_RETRY_DELAY;
pub use faqcoach_core::error::ProviderError;

/// Seconds to wait after a 429 without a usable `retry-after` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// Map a transport failure onto a provider error.
pub(crate) fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(timeout_secs)
    } else {
        ProviderError::NetworkError(err.to_string())
    }
}

/// Pass successful responses through; turn error statuses into errors.
///
/// `not_found_as_model` treats a 404 as an unknown model, which is how the
/// model-addressed APIs report it.
pub(crate) async fn check_status(
    response: reqwest::Response,
    model: &str,
    not_found_as_model: bool,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status().as_u16();
    if status < 400 {
        return Ok(response);
    }

    if status == 429 {
        let retry_after_secs = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
            .min(MAX_RETRY_DELAY.as_secs());
        return Err(ProviderError::RateLimited {
            retry_after_ms: retry_after_secs.saturating_mul(1000),
        });
    }

    let body = response.text().await.unwrap_or_default();
    match status {
        401 | 403 => Err(ProviderError::AuthenticationFailed(body)),
        404 if not_found_as_model => Err(ProviderError::ModelNotFound(model.to_string())),
        _ => Err(ProviderError::ApiError {
            status,
            message: body,
        }),
    }
}

/// Build an HTTP client with a fixed request timeout.
pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ProviderError::NetworkError(format!("failed to build HTTP client: {e}")))
}
