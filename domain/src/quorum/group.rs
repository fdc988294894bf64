//! Equivalence grouping of successful replies

use super::reply::{AgentReply, NormalizedAnswer};
use crate::endpoint::AgentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// A set of replies whose normalized answers are equal.
///
/// Support is the number of distinct agent ids in the group; a
/// representative raw payload is kept so an accepted verdict can hand
/// the caller the actual data, not just the digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseGroup {
    pub answer: NormalizedAnswer,
    /// Distinct supporting agent ids, sorted
    pub supporters: Vec<AgentId>,
    /// Payload of the first supporter recorded for this answer
    pub payload: Value,
}

impl ResponseGroup {
    /// Number of distinct agents supporting this answer.
    pub fn support(&self) -> usize {
        self.supporters.len()
    }
}

/// Partition successful replies into groups by normalized-answer
/// equality.
///
/// Failures belong to no group. An agent id contributes at most one
/// unit of support no matter how often it appears in `replies` (only
/// the first occurrence counts, matching first-settled-reply-wins
/// dispatch semantics).
///
/// The returned groups are sorted by (support descending, answer
/// ascending) so their order is a function of the replies alone, never
/// of arrival or enumeration order.
pub fn group_replies(replies: &[AgentReply]) -> Vec<ResponseGroup> {
    let mut seen: HashSet<&AgentId> = HashSet::new();
    let mut by_answer: HashMap<&NormalizedAnswer, ResponseGroup> = HashMap::new();

    for reply in replies {
        let (answer, payload) = match (reply.answer(), reply.payload()) {
            (Some(answer), Some(payload)) => (answer, payload),
            _ => continue,
        };
        if !seen.insert(&reply.agent) {
            continue;
        }
        by_answer
            .entry(answer)
            .or_insert_with(|| ResponseGroup {
                answer: answer.clone(),
                supporters: Vec::new(),
                payload: payload.clone(),
            })
            .supporters
            .push(reply.agent.clone());
    }

    let mut groups: Vec<ResponseGroup> = by_answer.into_values().collect();
    for group in &mut groups {
        group.supporters.sort();
    }
    groups.sort_by(|a, b| {
        b.support()
            .cmp(&a.support())
            .then_with(|| a.answer.cmp(&b.answer))
    });
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum::reply::FailureKind;
    use serde_json::json;
    use std::time::Duration;

    fn ok(agent: &str, answer: &str) -> AgentReply {
        AgentReply::success(
            agent,
            json!({ "payload": answer }),
            NormalizedAnswer::new(answer),
            Duration::from_millis(1),
        )
    }

    fn failed(agent: &str) -> AgentReply {
        AgentReply::failure(agent, FailureKind::Timeout, "t", Duration::from_millis(1))
    }

    #[test]
    fn test_groups_by_answer_equality() {
        let replies = vec![ok("a", "x"), ok("b", "x"), ok("c", "y"), failed("d")];
        let groups = group_replies(&replies);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].support(), 2);
        assert_eq!(groups[0].answer.as_str(), "x");
        assert_eq!(groups[1].support(), 1);
    }

    #[test]
    fn test_duplicate_agent_counts_once() {
        let replies = vec![ok("a", "x"), ok("a", "x"), ok("a", "y")];
        let groups = group_replies(&replies);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].support(), 1);
        assert_eq!(groups[0].answer.as_str(), "x");
    }

    #[test]
    fn test_failures_belong_to_no_group() {
        let groups = group_replies(&[failed("a"), failed("b")]);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_group_order_is_input_order_independent() {
        let forward = vec![ok("a", "x"), ok("b", "y"), ok("c", "y"), ok("d", "z")];
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(group_replies(&forward), group_replies(&reversed));
    }

    #[test]
    fn test_equal_support_sorted_by_answer() {
        let replies = vec![ok("a", "zz"), ok("b", "aa")];
        let groups = group_replies(&replies);

        assert_eq!(groups[0].answer.as_str(), "aa");
        assert_eq!(groups[1].answer.as_str(), "zz");
    }
}
