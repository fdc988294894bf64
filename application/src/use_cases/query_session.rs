//! Query session - orchestrates one logical request end to end
//!
//! Owns the retry policy: a pass that ends `Insufficient` may be
//! followed by further passes (up to the request's retry budget) that
//! re-query only the endpoints whose calls failed, reusing successful
//! replies already obtained. The session terminates on the first
//! `Accepted` or `Rejected` verdict.

use crate::config::DispatchOptions;
use crate::ports::normalizer::AnswerNormalizer;
use crate::ports::transport::AgentTransport;
use crate::use_cases::dispatch::Dispatcher;
use agentq_domain::{
    AgentEndpoint, AgentId, AgentReply, ConfigError, EndpointSet, QueryRequest, QuorumVerdict,
    resolve_replies,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Errors that abort a session before it can produce a verdict.
///
/// Quorum outcomes (`Rejected`, `Insufficient`) are not errors; they
/// come back as ordinary [`QuorumVerdict`] values. Per-endpoint
/// failures never escape as errors either.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("session cancelled")]
    Cancelled,
}

/// Input for one query session.
#[derive(Debug, Clone)]
pub struct QuerySessionInput {
    /// Fixed agent membership and fault model for this session
    pub endpoints: EndpointSet,
    /// The logical request; reused verbatim by every retry pass
    pub request: QueryRequest,
}

impl QuerySessionInput {
    pub fn new(endpoints: EndpointSet, request: QueryRequest) -> Self {
        Self { endpoints, request }
    }
}

/// Use case for resolving one request against a multi-agent service.
pub struct QuerySessionUseCase<T: AgentTransport + 'static> {
    dispatcher: Dispatcher<T>,
}

impl<T: AgentTransport + 'static> QuerySessionUseCase<T> {
    pub fn new(transport: Arc<T>, normalizer: Arc<dyn AnswerNormalizer>) -> Self {
        Self {
            dispatcher: Dispatcher::new(transport, normalizer),
        }
    }

    pub fn with_options(mut self, options: DispatchOptions) -> Self {
        self.dispatcher = self.dispatcher.with_options(options);
        self
    }

    /// Resolve the request to exactly one verdict.
    pub async fn resolve(&self, input: QuerySessionInput) -> Result<QuorumVerdict, SessionError> {
        self.resolve_with_cancellation(input, &CancellationToken::new())
            .await
    }

    /// Resolve with a caller-held cancellation token; cancelling it
    /// cleanly abandons outstanding per-endpoint calls.
    pub async fn resolve_with_cancellation(
        &self,
        input: QuerySessionInput,
        cancel: &CancellationToken,
    ) -> Result<QuorumVerdict, SessionError> {
        // Fatal config problems surface before any network activity.
        input.endpoints.tolerance().validate()?;
        let threshold = input.endpoints.threshold();
        let passes = input.request.retry_budget + 1;

        info!(
            agents = input.endpoints.len(),
            threshold, passes, "starting query session"
        );

        let mut retained: HashMap<AgentId, AgentReply> = HashMap::new();
        let mut pending: Vec<AgentEndpoint> = input.endpoints.endpoints().to_vec();

        for pass in 1..=passes {
            debug!(pass, endpoints = pending.len(), "dispatching pass");
            // Retained successes already count toward the verdict, so
            // the dispatcher's early-exit guard must see their support.
            let prior: Vec<AgentReply> = retained
                .values()
                .filter(|reply| reply.is_success())
                .cloned()
                .collect();
            let replies = self
                .dispatcher
                .dispatch(&pending, &input.request, threshold, &prior, cancel)
                .await;
            if cancel.is_cancelled() {
                return Err(SessionError::Cancelled);
            }
            for reply in replies {
                retained.insert(reply.agent.clone(), reply);
            }

            // Everything settled so far, in endpoint order.
            let combined: Vec<AgentReply> = input
                .endpoints
                .iter()
                .filter_map(|endpoint| retained.get(&endpoint.id).cloned())
                .collect();
            let verdict = resolve_replies(&combined, threshold);

            if !verdict.is_insufficient() {
                info!(%verdict, pass, "session settled");
                return Ok(verdict);
            }

            // Successful replies are kept; only failed endpoints are
            // re-queried with the same request.
            pending = input
                .endpoints
                .iter()
                .filter(|endpoint| {
                    retained
                        .get(&endpoint.id)
                        .is_none_or(|reply| !reply.is_success())
                })
                .cloned()
                .collect();

            if pass == passes || pending.is_empty() {
                info!(%verdict, pass, "retry budget exhausted");
                return Ok(verdict);
            }
            debug!(retrying = pending.len(), "insufficient, re-querying failed endpoints");
        }

        // retry_budget + 1 >= 1, so the loop always returns.
        unreachable!("session loop returns a verdict")
    }
}

/// One-shot convenience wrapper around [`QuerySessionUseCase`].
pub async fn resolve<T: AgentTransport + 'static>(
    transport: Arc<T>,
    normalizer: Arc<dyn AnswerNormalizer>,
    endpoints: EndpointSet,
    request: QueryRequest,
) -> Result<QuorumVerdict, SessionError> {
    QuerySessionUseCase::new(transport, normalizer)
        .resolve(QuerySessionInput::new(endpoints, request))
        .await
}
