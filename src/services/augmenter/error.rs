use thiserror::Error;

use crate::services::{provider::ProviderError, validators::Verdict};

pub type AugmentResult<T> = Result<T, AugmentError>;

/// Failures of a fetch + validate operation.
///
/// Authentication failures and missing preconditions are not errors;
/// they come back as `Outcome::Terminated`.
#[derive(Debug, Error)]
pub enum AugmentError {
    #[error(transparent)]
    Transport(#[from] ProviderError),

    #[error("{}", verdict_json(.verdict))]
    Validation { verdict: Verdict },
}

fn verdict_json(verdict: &Verdict) -> String {
    serde_json::to_string(verdict).unwrap_or_else(|_| format!("{verdict:?}"))
}
