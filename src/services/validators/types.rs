/*
 * Responsibility
 * - Validator の契約 (trait) と判定結果 (Verdict) の型
 * - 判定ロジックそのものは実装側 (schema.rs など) の責務
 */
use serde::Serialize;
use serde_json::Value;

/// Result of checking a provider payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl Verdict {
    pub fn valid() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }

    pub fn from_errors(errors: Vec<String>) -> Self {
        if errors.is_empty() {
            Self::valid()
        } else {
            Self::invalid(errors)
        }
    }
}

/// Checks provider payloads before they are attached to a request.
///
/// `list` is applied to the `/api` body, `item` to the `/api/<title>` body.
pub trait Validators: Send + Sync + 'static {
    fn list(&self, body: &Value) -> Verdict;
    fn item(&self, body: &Value) -> Verdict;
}
