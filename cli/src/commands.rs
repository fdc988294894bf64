//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for quorum verdicts
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// One-line verdict plus the accepted payload
    Verdict,
    /// Verdict with per-group detail
    Full,
    /// JSON output
    Json,
}

/// An `ID=URL` endpoint specification from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSpec {
    pub id: String,
    pub url: String,
}

impl std::str::FromStr for EndpointSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, url) = s
            .split_once('=')
            .ok_or("expected ID=URL (e.g. agent-0=http://agent-0:8000/state)")?;
        if id.trim().is_empty() || url.trim().is_empty() {
            return Err("both ID and URL must be non-empty".to_string());
        }
        Ok(Self {
            id: id.trim().to_string(),
            url: url.trim().to_string(),
        })
    }
}

/// CLI arguments for agent-quorum
#[derive(Parser, Debug)]
#[command(name = "agent-quorum")]
#[command(author, version, about = "Query a multi-agent service and resolve a quorum verdict")]
#[command(long_about = r#"
agent-quorum fans one request out to every agent of a multi-agent
service, groups the replies by equivalence, and accepts an answer only
when a supermajority of agents agree.

Endpoints and the fault model come from configuration files or from
--endpoint/--max-faulty flags. Configuration files are loaded from
(in priority order):
1. --config <path>          Explicit config file
2. ./agent-quorum.toml      Project-level config
3. ~/.config/agent-quorum/config.toml   Global config

Exit status is 0 when an answer was accepted, 1 otherwise.

Example:
  agent-quorum -e agent-0=http://a0:8000/state \
               -e agent-1=http://a1:8000/state \
               -e agent-2=http://a2:8000/state \
               -e agent-3=http://a3:8000/state \
               --max-faulty 1
"#)]
pub struct Cli {
    /// Agent endpoints as ID=URL (can be specified multiple times;
    /// overrides the configured endpoint list)
    #[arg(short, long = "endpoint", value_name = "ID=URL")]
    pub endpoint: Vec<EndpointSpec>,

    /// Assumed maximum number of faulty agents (F)
    #[arg(long, value_name = "N")]
    pub max_faulty: Option<usize>,

    /// Explicit quorum threshold (defaults to N - F)
    #[arg(long, value_name = "T")]
    pub threshold: Option<usize>,

    /// Per-call timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Additional passes re-querying failed endpoints
    #[arg(long, value_name = "N")]
    pub retries: Option<usize>,

    /// JSON request payload forwarded to every agent
    #[arg(long, value_name = "JSON")]
    pub payload: Option<String>,

    /// Group replies by a digest of the whole body instead of the
    /// service-state `payload` field
    #[arg(long)]
    pub digest_body: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "verdict")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_spec_parses() {
        let spec: EndpointSpec = "agent-0=http://agent-0:8000/state".parse().unwrap();
        assert_eq!(spec.id, "agent-0");
        assert_eq!(spec.url, "http://agent-0:8000/state");
    }

    #[test]
    fn test_endpoint_spec_allows_equals_in_url() {
        let spec: EndpointSpec = "a=http://a/state?k=v".parse().unwrap();
        assert_eq!(spec.url, "http://a/state?k=v");
    }

    #[test]
    fn test_endpoint_spec_rejects_malformed() {
        assert!("just-an-id".parse::<EndpointSpec>().is_err());
        assert!("=http://a".parse::<EndpointSpec>().is_err());
        assert!("a=".parse::<EndpointSpec>().is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "agent-quorum",
            "-e",
            "a=http://a/state",
            "-e",
            "b=http://b/state",
            "--max-faulty",
            "1",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.endpoint.len(), 2);
        assert_eq!(cli.max_faulty, Some(1));
        assert_eq!(cli.verbose, 2);
    }
}
