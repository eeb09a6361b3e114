//! Transaction alert bot.
//!
//! Scans league transactions (a pinned week, or the whole regular season)
//! and posts each trade, waiver claim, and free-agent move exactly once.

use clap::Parser;
use tracing::{error, info, warn};

use alerts::transactions::TransactionJob;
use alerts::{fetch, run_job};
use chat_client::ChatClient;
use common::config::{load_config, CliOverrides};
use common::StateStore;
use sleeper_client::SleeperClient;

/// Sleeper transaction alert bot
#[derive(Parser)]
#[command(name = "transactions", about = "Post new league transactions")]
struct Cli {
    /// Sleeper league ID (falls back to SLEEPER_LEAGUE_ID).
    league_id: Option<String>,

    /// API key for the hosted chat endpoint.
    #[arg(long)]
    api_key: Option<String>,

    /// Webhook URL; takes precedence over the hosted endpoint.
    #[arg(long)]
    webhook_url: Option<String>,

    /// Only scan a single week instead of the whole season.
    #[arg(long)]
    week: Option<u32>,

    /// Path of the seen-state file (TRANSACTIONS_FILE also works).
    #[arg(long, env = "TRANSACTIONS_FILE", default_value = "seen_transactions.json")]
    state_file: String,
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "transactions=info,alerts=info,sleeper_client=info,chat_client=info".into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    info!("📋 Transaction Alert Bot starting up...");

    // Load configuration.
    let cfg = match load_config(CliOverrides {
        league_id: cli.league_id,
        week: cli.week,
        api_key: cli.api_key,
        webhook_url: cli.webhook_url,
    }) {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let client =
        SleeperClient::with_base_url(&cfg.league_id, cfg.http_timeout_secs, &cfg.sleeper_base_url);
    let publisher = ChatClient::from_config(&cfg.chat, cfg.http_timeout_secs);
    if publisher.is_none() {
        warn!("No chat credentials configured; alerts will be logged but not posted");
    }

    let snapshot = fetch::fetch_transactions(&client, cfg.week).await;

    let store = StateStore::new(&cli.state_file);

    match run_job(&TransactionJob, &snapshot, &store, publisher.as_ref()).await {
        Ok(outcome) if outcome.first_run => {
            info!(
                "Recorded {} existing transactions without alerting",
                outcome.detected
            );
        }
        Ok(outcome) => {
            info!(
                "Detected {} new transactions ({} posted, {} failed)",
                outcome.detected, outcome.posted, outcome.failed
            );
        }
        Err(e) => {
            error!("Failed to save state: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test so the env-var toggling cannot race a parallel test.
    #[test]
    fn state_file_default_and_env_override() {
        std::env::remove_var("TRANSACTIONS_FILE");
        let cli = Cli::try_parse_from(["transactions", "12345"]).unwrap();
        assert_eq!(cli.state_file, "seen_transactions.json");

        std::env::set_var("TRANSACTIONS_FILE", "/var/lib/alerts/seen_transactions.json");
        let cli = Cli::try_parse_from(["transactions", "12345"]).unwrap();
        assert_eq!(cli.state_file, "/var/lib/alerts/seen_transactions.json");

        // An explicit flag still beats the environment.
        let cli = Cli::try_parse_from(["transactions", "12345", "--state-file", "custom.json"])
            .unwrap();
        assert_eq!(cli.state_file, "custom.json");
        std::env::remove_var("TRANSACTIONS_FILE");
    }
}
