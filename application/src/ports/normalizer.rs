//! Answer normalizer port
//!
//! The caller decides what counts as "the same answer". A normalizer
//! reduces a raw success payload to a canonical comparable value; the
//! resolver only ever compares those for equality. A normalization
//! failure makes the reply count as `Malformed` non-support.

use agentq_domain::NormalizedAnswer;
use serde_json::Value;
use thiserror::Error;

/// The payload could not be reduced to a comparable value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("normalization failed: {0}")]
pub struct NormalizeError(String);

impl NormalizeError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}

/// Reduce a raw payload to its canonical comparable projection.
///
/// Implemented for plain functions, so callers can pass a closure:
///
/// ```
/// use agentq_application::ports::normalizer::{AnswerNormalizer, NormalizeError};
/// use agentq_domain::NormalizedAnswer;
/// use serde_json::Value;
///
/// let by_text = |payload: &Value| -> Result<NormalizedAnswer, NormalizeError> {
///     Ok(NormalizedAnswer::new(payload.to_string()))
/// };
/// assert!(by_text.normalize(&Value::Null).is_ok());
/// ```
pub trait AnswerNormalizer: Send + Sync {
    fn normalize(&self, payload: &Value) -> Result<NormalizedAnswer, NormalizeError>;
}

impl<F> AnswerNormalizer for F
where
    F: Fn(&Value) -> Result<NormalizedAnswer, NormalizeError> + Send + Sync,
{
    fn normalize(&self, payload: &Value) -> Result<NormalizedAnswer, NormalizeError> {
        self(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_closure_normalizer() {
        let normalizer = |payload: &Value| {
            payload
                .get("payload")
                .and_then(Value::as_str)
                .map(NormalizedAnswer::new)
                .ok_or_else(|| NormalizeError::new("missing payload field"))
        };

        let answer = normalizer.normalize(&json!({"payload": "abc"})).unwrap();
        assert_eq!(answer.as_str(), "abc");
        assert!(normalizer.normalize(&json!({})).is_err());
    }

    #[test]
    fn test_error_display() {
        let error = NormalizeError::new("missing field");
        assert_eq!(error.to_string(), "normalization failed: missing field");
    }
}
