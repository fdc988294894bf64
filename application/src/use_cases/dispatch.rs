//! Dispatcher - concurrent fan-out of one request to every endpoint
//!
//! One tokio task per endpoint, each bounded by the request's per-call
//! timeout. Calls are fully independent: a slow or dead agent never
//! delays the others, and the pass as a whole waits only for the
//! slowest unexpired call. The dispatcher performs no retries; that is
//! the session's job.

use crate::config::DispatchOptions;
use crate::ports::normalizer::AnswerNormalizer;
use crate::ports::transport::{AgentTransport, TransportError};
use agentq_domain::{AgentEndpoint, AgentId, AgentReply, FailureKind, NormalizedAnswer, QueryRequest};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Detail string recorded for calls abandoned by cancellation.
const CANCELLED_DETAIL: &str = "cancelled: quorum decided early";

/// Fans one request out to a set of endpoints and collects one settled
/// reply per endpoint.
pub struct Dispatcher<T: AgentTransport + 'static> {
    transport: Arc<T>,
    normalizer: Arc<dyn AnswerNormalizer>,
    options: DispatchOptions,
}

impl<T: AgentTransport + 'static> Dispatcher<T> {
    pub fn new(transport: Arc<T>, normalizer: Arc<dyn AnswerNormalizer>) -> Self {
        Self {
            transport,
            normalizer,
            options: DispatchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Run one pass: one concurrent call per endpoint, returning once
    /// every call has settled (succeeded, failed, timed out, or been
    /// cancelled). Replies come back in endpoint order, exactly one per
    /// endpoint.
    ///
    /// `threshold` is only consulted for the early-exit optimization:
    /// once the leading answer's support has reached it and no
    /// assignment of the outstanding endpoints could produce a
    /// different winner or a tie at the top, outstanding calls are
    /// cancelled and recorded as non-support. `prior` holds replies
    /// already settled outside this pass (a retrying session keeps
    /// successes from earlier passes); their support seeds the guard,
    /// since the final verdict is resolved over the merged reply set.
    /// Cancelling the parent `cancel` token abandons the whole pass
    /// the same way.
    pub async fn dispatch(
        &self,
        endpoints: &[AgentEndpoint],
        request: &QueryRequest,
        threshold: usize,
        prior: &[AgentReply],
        cancel: &CancellationToken,
    ) -> Vec<AgentReply> {
        // Child token so early exit stops this pass without touching
        // the caller's session-level token.
        let pass_token = cancel.child_token();
        let mut join_set = JoinSet::new();

        for endpoint in endpoints {
            let transport = Arc::clone(&self.transport);
            let normalizer = Arc::clone(&self.normalizer);
            let endpoint = endpoint.clone();
            let request = request.clone();
            let token = pass_token.clone();

            join_set.spawn(async move {
                let started = Instant::now();
                tokio::select! {
                    () = token.cancelled() => AgentReply::failure(
                        endpoint.id.clone(),
                        FailureKind::Connection,
                        CANCELLED_DETAIL,
                        started.elapsed(),
                    ),
                    result = tokio::time::timeout(
                        request.timeout,
                        transport.send(&endpoint, &request),
                    ) => settle(&endpoint, normalizer.as_ref(), result, started.elapsed()),
                }
            });
        }

        let total = endpoints.len();
        let mut settled: HashMap<AgentId, AgentReply> = HashMap::with_capacity(total);
        let mut support: HashMap<NormalizedAnswer, usize> = HashMap::new();
        for reply in prior {
            if let Some(answer) = reply.answer() {
                *support.entry(answer.clone()).or_insert(0) += 1;
            }
        }

        while let Some(joined) = join_set.join_next().await {
            let reply = match joined {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("task join error: {e}");
                    continue;
                }
            };
            debug!(
                agent = %reply.agent,
                success = reply.is_success(),
                latency_ms = reply.latency.as_millis() as u64,
                "agent call settled"
            );
            // First settled reply per endpoint wins; later arrivals are
            // discarded.
            if settled.contains_key(&reply.agent) {
                continue;
            }
            if let Some(answer) = reply.answer() {
                *support.entry(answer.clone()).or_insert(0) += 1;
            }
            settled.insert(reply.agent.clone(), reply);

            let outstanding = total - settled.len();
            if self.options.early_exit
                && outstanding > 0
                && !pass_token.is_cancelled()
                && quorum_decided(&support, threshold, outstanding)
            {
                info!(outstanding, "quorum decided early, cancelling outstanding calls");
                pass_token.cancel();
            }
        }

        // One reply per endpoint, in endpoint order.
        endpoints
            .iter()
            .filter_map(|endpoint| settled.remove(&endpoint.id))
            .collect()
    }
}

/// Settle one call's raw outcome into an [`AgentReply`].
fn settle(
    endpoint: &AgentEndpoint,
    normalizer: &dyn AnswerNormalizer,
    result: Result<Result<serde_json::Value, TransportError>, tokio::time::error::Elapsed>,
    latency: std::time::Duration,
) -> AgentReply {
    match result {
        Err(_elapsed) => AgentReply::failure(
            endpoint.id.clone(),
            FailureKind::Timeout,
            "per-call timeout elapsed",
            latency,
        ),
        Ok(Err(error)) => AgentReply::failure(
            endpoint.id.clone(),
            error.failure_kind(),
            error.to_string(),
            latency,
        ),
        Ok(Ok(payload)) => match normalizer.normalize(&payload) {
            Ok(answer) => AgentReply::success(endpoint.id.clone(), payload, answer, latency),
            Err(error) => AgentReply::failure(
                endpoint.id.clone(),
                FailureKind::Malformed,
                error.to_string(),
                latency,
            ),
        },
    }
}

/// True when the leading answer has reached the threshold and no
/// assignment of the outstanding endpoints could change the winner or
/// force a tie at the top. Under that guard an early exit can never
/// change the verdict versus waiting.
fn quorum_decided(
    support: &HashMap<NormalizedAnswer, usize>,
    threshold: usize,
    outstanding: usize,
) -> bool {
    let mut leader = 0usize;
    let mut runner_up = 0usize;
    for &count in support.values() {
        if count >= leader {
            runner_up = leader;
            leader = count;
        } else if count > runner_up {
            runner_up = count;
        }
    }
    leader >= threshold && leader > runner_up + outstanding
}
