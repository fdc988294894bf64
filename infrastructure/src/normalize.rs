//! Default answer normalizers
//!
//! Two stock implementations of the [`AnswerNormalizer`] port:
//!
//! - [`PayloadFieldNormalizer`] handles the common agent service-state
//!   envelope `{ "payload": <string>, "signatures": { ... } }`: only
//!   the payload string is digested, so per-agent fields like
//!   signatures never split a group.
//! - [`CanonicalJsonNormalizer`] digests the whole body after a
//!   canonical (recursively key-sorted) serialization, for services
//!   without the envelope.
//!
//! Both produce a SHA-256 hex digest as the comparable value.

use agentq_application::ports::normalizer::{AnswerNormalizer, NormalizeError};
use agentq_domain::NormalizedAnswer;
use serde_json::Value;
use sha2::{Digest, Sha256};

fn digest(data: &[u8]) -> NormalizedAnswer {
    NormalizedAnswer::from_digest(&Sha256::digest(data))
}

/// Normalizes by digesting one string field of the body.
pub struct PayloadFieldNormalizer {
    field: String,
}

impl PayloadFieldNormalizer {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl Default for PayloadFieldNormalizer {
    fn default() -> Self {
        Self::new("payload")
    }
}

impl AnswerNormalizer for PayloadFieldNormalizer {
    fn normalize(&self, payload: &Value) -> Result<NormalizedAnswer, NormalizeError> {
        let field = payload.get(&self.field).ok_or_else(|| {
            NormalizeError::new(format!("missing `{}` field in body", self.field))
        })?;
        let text = field.as_str().ok_or_else(|| {
            NormalizeError::new(format!("`{}` field is not a string", self.field))
        })?;
        Ok(digest(text.as_bytes()))
    }
}

/// Normalizes by digesting the canonical serialization of the whole
/// body. Object key order never affects the result.
pub struct CanonicalJsonNormalizer;

impl AnswerNormalizer for CanonicalJsonNormalizer {
    fn normalize(&self, payload: &Value) -> Result<NormalizedAnswer, NormalizeError> {
        let mut canonical = String::new();
        write_canonical(payload, &mut canonical)?;
        Ok(digest(canonical.as_bytes()))
    }
}

/// Serialize with recursively sorted object keys.
fn write_canonical(value: &Value, out: &mut String) -> Result<(), NormalizeError> {
    match value {
        Value::Object(map) => {
            out.push('{');
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_scalar(&Value::String((*key).clone()), out)?;
                out.push(':');
                write_canonical(&map[*key], out)?;
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out)?;
            }
            out.push(']');
        }
        scalar => write_scalar(scalar, out)?,
    }
    Ok(())
}

fn write_scalar(value: &Value, out: &mut String) -> Result<(), NormalizeError> {
    let text = serde_json::to_string(value)
        .map_err(|e| NormalizeError::new(format!("unserializable value: {e}")))?;
    out.push_str(&text);
    Ok(())
}
