//! Provider client interface used by the request augmenter.
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Transport-level failures talking to the provider.
///
/// Note:
/// - A non-2xx status is NOT an error here. The caller decides what a status means
///   (`/auth` distinguishes 200 from everything else).
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid provider url: {0}")]
    InvalidUrl(String),
}

/// A single provider round trip.
///
/// `body` is the parsed JSON body. Bodies that are not JSON are kept as
/// `Value::String`, and an empty body is `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: Value,
}

impl ProviderResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub(crate) fn from_bytes(status: u16, bytes: &[u8]) -> Self {
        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
        };
        Self { status, body }
    }
}

/// Outbound HTTP capability (`get` / `post_form`).
///
/// Paths are appended to the provider base URL as-is, e.g. `/api`.
#[async_trait]
pub trait ProviderClient: Send + Sync + 'static {
    async fn get(&self, path: &str) -> ProviderResult<ProviderResponse>;

    async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> ProviderResult<ProviderResponse>;
}
