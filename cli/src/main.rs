//! CLI entrypoint for agent-quorum
//!
//! Wires the HTTP transport and a stock normalizer into the query
//! session use case, driven by configuration files and flags.

mod commands;
mod output;

use agentq_application::{AnswerNormalizer, QuerySessionInput, QuerySessionUseCase};
use agentq_infrastructure::{
    CanonicalJsonNormalizer, ConfigLoader, FileEndpoint, HttpAgentTransport,
    PayloadFieldNormalizer,
};
use anyhow::{Context, Result, bail};
use clap::Parser;
use commands::{Cli, OutputFormat};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("failed to load configuration")?
    };

    // Flags override the file configuration.
    if !cli.endpoint.is_empty() {
        config.service.endpoints = cli
            .endpoint
            .iter()
            .map(|spec| FileEndpoint {
                id: spec.id.clone(),
                url: spec.url.clone(),
            })
            .collect();
    }
    if let Some(max_faulty) = cli.max_faulty {
        config.quorum.max_faulty = max_faulty;
    }
    if let Some(threshold) = cli.threshold {
        config.quorum.threshold = Some(threshold);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.quorum.timeout_ms = timeout_ms;
    }
    if let Some(retries) = cli.retries {
        config.quorum.retry_budget = retries;
    }

    if config.service.endpoints.is_empty() {
        bail!("no agent endpoints configured; pass --endpoint ID=URL or a config file");
    }

    let payload = match &cli.payload {
        Some(text) => serde_json::from_str(text).context("--payload is not valid JSON")?,
        None => Value::Null,
    };

    // Fatal configuration problems surface here, before any dispatch.
    let endpoints = config.endpoint_set()?;
    let request = config.request(payload);

    info!(
        agents = endpoints.len(),
        threshold = endpoints.threshold(),
        "querying multi-agent service"
    );

    // === Dependency injection ===
    let transport = Arc::new(HttpAgentTransport::new());
    let normalizer: Arc<dyn AnswerNormalizer> = if cli.digest_body {
        Arc::new(CanonicalJsonNormalizer)
    } else {
        Arc::new(PayloadFieldNormalizer::default())
    };
    let session =
        QuerySessionUseCase::new(transport, normalizer).with_options(config.dispatch_options());

    let verdict = session
        .resolve(QuerySessionInput::new(endpoints, request))
        .await?;

    let rendered = match cli.output {
        OutputFormat::Verdict => output::format_verdict(&verdict),
        OutputFormat::Full => output::format_full(&verdict),
        OutputFormat::Json => output::format_json(&verdict),
    };
    println!("{rendered}");

    if !verdict.is_accepted() {
        std::process::exit(1);
    }
    Ok(())
}
