//! The quorum decision algorithm
//!
//! Pure function over settled replies. Correctness never depends on
//! reply order; the only inputs are which distinct agents said what.

use super::group::group_replies;
use super::reply::AgentReply;
use super::verdict::QuorumVerdict;
use std::collections::HashSet;

/// Decide a verdict for one complete set of replies against threshold T.
///
/// 1. Fewer than T distinct successful replies short-circuits to
///    `Insufficient` without grouping.
/// 2. Successful replies are partitioned by normalized-answer equality;
///    support counts distinct agent ids only.
/// 3. A strict-maximum group with support >= T is `Accepted` with
///    exactly its supporters.
/// 4. A tie at the maximum with tied support >= T is `Rejected`; order
///    never breaks a tie.
/// 5. Otherwise `Insufficient`.
pub fn resolve_replies(replies: &[AgentReply], threshold: usize) -> QuorumVerdict {
    let successful = distinct_successful(replies);
    if successful < threshold {
        return QuorumVerdict::Insufficient {
            successful,
            required: threshold,
            reason: "too few successful replies".to_string(),
        };
    }

    let groups = group_replies(replies);
    // groups is non-empty here: successful >= threshold >= 1
    let Some(top) = groups.first() else {
        return QuorumVerdict::Insufficient {
            successful,
            required: threshold,
            reason: "too few successful replies".to_string(),
        };
    };

    if top.support() < threshold {
        return QuorumVerdict::Insufficient {
            successful,
            required: threshold,
            reason: "largest agreeing group below threshold".to_string(),
        };
    }

    let tied_at_top = groups
        .iter()
        .skip(1)
        .any(|group| group.support() == top.support());
    if tied_at_top {
        return QuorumVerdict::Rejected { groups };
    }

    QuorumVerdict::Accepted {
        answer: top.answer.clone(),
        payload: top.payload.clone(),
        supporters: top.supporters.clone(),
    }
}

/// Count distinct agents that replied successfully.
fn distinct_successful(replies: &[AgentReply]) -> usize {
    replies
        .iter()
        .filter(|reply| reply.is_success())
        .map(|reply| &reply.agent)
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum::reply::{FailureKind, NormalizedAnswer};
    use serde_json::json;
    use std::time::Duration;

    fn ok(agent: &str, answer: &str) -> AgentReply {
        AgentReply::success(
            agent,
            json!({ "payload": answer }),
            NormalizedAnswer::new(answer),
            Duration::from_millis(5),
        )
    }

    fn timed_out(agent: &str) -> AgentReply {
        AgentReply::failure(
            agent,
            FailureKind::Timeout,
            "deadline elapsed",
            Duration::from_secs(10),
        )
    }

    // N=4, F=1, T=3: [A,A,A,timeout] -> accepted with the three
    // agreeing agents as support.
    #[test]
    fn test_supermajority_with_one_timeout_accepts() {
        let replies = vec![ok("a", "A"), ok("b", "A"), ok("c", "A"), timed_out("d")];
        let verdict = resolve_replies(&replies, 3);

        match verdict {
            QuorumVerdict::Accepted {
                answer, supporters, ..
            } => {
                assert_eq!(answer.as_str(), "A");
                let ids: Vec<_> = supporters.iter().map(|id| id.as_str()).collect();
                assert_eq!(ids, vec!["a", "b", "c"]);
            }
            other => panic!("expected accepted, got {other}"),
        }
    }

    // N=4, T=3: [A,A,B,B] -> max support 2 < 3, insufficient.
    #[test]
    fn test_split_below_threshold_is_insufficient() {
        let replies = vec![ok("a", "A"), ok("b", "A"), ok("c", "B"), ok("d", "B")];
        let verdict = resolve_replies(&replies, 3);

        assert_eq!(
            verdict,
            QuorumVerdict::Insufficient {
                successful: 4,
                required: 3,
                reason: "largest agreeing group below threshold".to_string(),
            }
        );
    }

    // N=4, T=3: [A,B,C,D] all distinct -> insufficient.
    #[test]
    fn test_all_distinct_is_insufficient() {
        let replies = vec![ok("a", "A"), ok("b", "B"), ok("c", "C"), ok("d", "D")];
        assert!(resolve_replies(&replies, 3).is_insufficient());
    }

    #[test]
    fn test_tie_at_or_above_threshold_is_rejected() {
        // N=6, T=2: two groups of 3 tie at the top, both >= T
        let replies = vec![
            ok("a", "A"),
            ok("b", "A"),
            ok("c", "A"),
            ok("d", "B"),
            ok("e", "B"),
            ok("f", "B"),
        ];
        let verdict = resolve_replies(&replies, 2);

        match verdict {
            QuorumVerdict::Rejected { groups } => {
                assert_eq!(groups.len(), 2);
                assert_eq!(groups[0].support(), 3);
                assert_eq!(groups[1].support(), 3);
            }
            other => panic!("expected rejected, got {other}"),
        }
    }

    #[test]
    fn test_strict_maximum_wins_over_smaller_group_above_threshold() {
        // Both groups reach T=2, but 3 > 2: strict maximum accepts.
        let replies = vec![
            ok("a", "A"),
            ok("b", "A"),
            ok("c", "A"),
            ok("d", "B"),
            ok("e", "B"),
        ];
        let verdict = resolve_replies(&replies, 2);

        assert_eq!(
            verdict.supporters().map(<[_]>::len),
            Some(3),
            "larger group must win: {verdict}"
        );
    }

    #[test]
    fn test_short_circuit_below_threshold_successes() {
        let replies = vec![ok("a", "A"), timed_out("b"), timed_out("c"), timed_out("d")];
        let verdict = resolve_replies(&replies, 3);

        assert_eq!(
            verdict,
            QuorumVerdict::Insufficient {
                successful: 1,
                required: 3,
                reason: "too few successful replies".to_string(),
            }
        );
    }

    #[test]
    fn test_no_replies_is_insufficient() {
        assert!(resolve_replies(&[], 3).is_insufficient());
    }

    #[test]
    fn test_duplicate_reply_contributes_one_unit_of_support() {
        // "a" retransmits: still only 2 distinct supporters, T=3 fails.
        let replies = vec![ok("a", "A"), ok("a", "A"), ok("a", "A"), ok("b", "A")];
        let verdict = resolve_replies(&replies, 3);
        assert!(verdict.is_insufficient(), "got {verdict}");

        // With T=2 the duplicates still only yield two supporters.
        let verdict = resolve_replies(&replies, 2);
        assert_eq!(verdict.supporters().map(<[_]>::len), Some(2));
    }

    // Permuting the reply list never changes the verdict.
    #[test]
    fn test_verdict_is_permutation_invariant() {
        let base = vec![
            ok("a", "A"),
            ok("b", "A"),
            ok("c", "B"),
            ok("d", "B"),
            timed_out("e"),
        ];
        let expected = resolve_replies(&base, 2);
        assert!(expected.is_rejected());

        // Rotate through every cyclic permutation plus the reversal.
        for shift in 0..base.len() {
            let mut permuted = base.clone();
            permuted.rotate_left(shift);
            assert_eq!(resolve_replies(&permuted, 2), expected);
        }
        let mut reversed = base.clone();
        reversed.reverse();
        assert_eq!(resolve_replies(&reversed, 2), expected);
    }

    #[test]
    fn test_tie_below_threshold_is_insufficient_not_rejected() {
        let replies = vec![ok("a", "A"), ok("b", "B")];
        let verdict = resolve_replies(&replies, 3);
        assert!(verdict.is_insufficient(), "got {verdict}");
    }
}
