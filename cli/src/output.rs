//! Verdict formatting for console output

use agentq_domain::QuorumVerdict;
use serde_json::Value;

/// The service-state envelope carries its state as a JSON string in
/// the `payload` field; surface the decoded state rather than the
/// quoted string. Bodies without the envelope are shown as-is.
fn displayed_payload(payload: &Value) -> Value {
    payload
        .get("payload")
        .and_then(Value::as_str)
        .and_then(|text| serde_json::from_str(text).ok())
        .unwrap_or_else(|| payload.clone())
}

/// One-line verdict plus the accepted payload, if any.
pub fn format_verdict(verdict: &QuorumVerdict) -> String {
    match verdict {
        QuorumVerdict::Accepted {
            payload,
            supporters,
            ..
        } => {
            let shown = displayed_payload(payload);
            let pretty =
                serde_json::to_string_pretty(&shown).unwrap_or_else(|_| shown.to_string());
            format!(
                "verdict: accepted ({} supporters)\n{pretty}",
                supporters.len()
            )
        }
        QuorumVerdict::Rejected { groups } => {
            format!("verdict: rejected ({} conflicting groups)", groups.len())
        }
        QuorumVerdict::Insufficient {
            successful,
            required,
            reason,
        } => {
            format!("verdict: insufficient ({successful}/{required} successful): {reason}")
        }
    }
}

/// Verdict with per-group detail.
pub fn format_full(verdict: &QuorumVerdict) -> String {
    let mut out = format_verdict(verdict);
    match verdict {
        QuorumVerdict::Accepted {
            answer, supporters, ..
        } => {
            out.push_str(&format!("\nanswer: {answer}\nsupporters: "));
            out.push_str(
                &supporters
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }
        QuorumVerdict::Rejected { groups } => {
            for group in groups {
                out.push_str(&format!(
                    "\n  group {} support={} supporters={}",
                    group.answer,
                    group.support(),
                    group
                        .supporters
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
        }
        QuorumVerdict::Insufficient { .. } => {}
    }
    out
}

/// JSON rendering of the verdict.
pub fn format_json(verdict: &QuorumVerdict) -> String {
    serde_json::to_string_pretty(verdict).unwrap_or_else(|_| "{}".to_string())
}
