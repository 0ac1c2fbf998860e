//! The response boundary.
//!
//! The fetch loop consumes an opaque "perform one HTTP call, return a
//! response-like object" capability. [`PageResponse`] is the contract that
//! object must satisfy: an optional status code for the retry engine plus a
//! way to obtain the parsed body.

use pagewise_retries::{HasStatus, RetryError, RetryResult};
use serde_json::Value;

/// A response-like value produced by the caller-supplied call.
pub trait PageResponse: HasStatus + Send {
    /// Consume the response and parse its body as JSON.
    fn into_json(self) -> Result<Value, serde_json::Error>;
}

/// Minimal [`PageResponse`] implementation: an optional status plus raw body
/// text.
///
/// Thin client wrappers that already hold the body in memory can hand it to
/// the fetch loop through this type without a custom trait impl.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: Option<u16>,
    body: String,
}

impl RawResponse {
    /// Create a response from a status and body text.
    pub fn new(status: Option<u16>, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Drain a `reqwest` response into a [`RawResponse`].
    ///
    /// Body-read failures are classified the same way call failures are, so
    /// the retry policy sees them as transport errors.
    pub async fn from_reqwest(response: reqwest::Response) -> RetryResult<Self> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(RetryError::from)?;
        Ok(Self::new(Some(status), body))
    }
}

impl HasStatus for RawResponse {
    fn status(&self) -> Option<u16> {
        self.status
    }
}

impl PageResponse for RawResponse {
    fn into_json(self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}
