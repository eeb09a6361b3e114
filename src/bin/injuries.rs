//! Injury alert bot.
//!
//! Compares the current injury report for rostered players against the
//! last-seen report and posts new injuries, status changes, and clearances.

use clap::Parser;
use tracing::{error, info, warn};

use alerts::injuries::InjuryJob;
use alerts::{fetch, run_job};
use chat_client::ChatClient;
use common::config::{load_config, CliOverrides};
use common::StateStore;
use sleeper_client::SleeperClient;

/// Sleeper injury alert bot
#[derive(Parser)]
#[command(name = "injuries", about = "Post injury report changes for rostered players")]
struct Cli {
    /// Sleeper league ID (falls back to SLEEPER_LEAGUE_ID).
    league_id: Option<String>,

    /// API key for the hosted chat endpoint.
    #[arg(long)]
    api_key: Option<String>,

    /// Webhook URL; takes precedence over the hosted endpoint.
    #[arg(long)]
    webhook_url: Option<String>,

    /// Path of the seen-state file.
    #[arg(long, default_value = "seen_injuries.json")]
    state_file: String,
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "injuries=info,alerts=info,sleeper_client=info,chat_client=info".into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    info!("🚑 Injury Alert Bot starting up...");

    // Load configuration.
    let cfg = match load_config(CliOverrides {
        league_id: cli.league_id,
        week: None,
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

    let snapshot = fetch::fetch_injuries(&client).await;

    let job = InjuryJob::new(cfg.tables.clone());
    let store = StateStore::new(&cli.state_file);

    match run_job(&job, &snapshot, &store, publisher.as_ref()).await {
        Ok(outcome) if outcome.first_run => {
            info!(
                "Recorded {} current injuries without alerting",
                outcome.detected
            );
        }
        Ok(outcome) => {
            info!(
                "Detected {} injury changes ({} posted, {} failed)",
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

    #[test]
    fn state_file_defaults_to_seen_injuries() {
        let cli = Cli::try_parse_from(["injuries", "12345"]).unwrap();
        assert_eq!(cli.state_file, "seen_injuries.json");
    }
}
