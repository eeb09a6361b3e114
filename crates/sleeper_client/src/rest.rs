//! REST client for the Sleeper API.
//!
//! Covers: league metadata, NFL state, rosters, users, matchups,
//! transactions, and the full player catalog. One attempt per call with a
//! fixed timeout; callers decide how to degrade on failure.

use std::time::Duration;

use common::{
    Error, LeagueInfo, LeagueUser, Matchup, NflState, PlayerCatalog, Roster, Transaction,
};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Async REST client for the Sleeper public API.
#[derive(Debug, Clone)]
pub struct SleeperClient {
    client: reqwest::Client,
    base_url: String,
    league_id: String,
}

impl SleeperClient {
    /// Create a client against the production API.
    pub fn new(league_id: &str, timeout_secs: u64) -> Self {
        Self::with_base_url(league_id, timeout_secs, common::config::DEFAULT_SLEEPER_BASE_URL)
    }

    /// Create a client against an arbitrary base URL (tests, mirrors).
    pub fn with_base_url(league_id: &str, timeout_secs: u64, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build reqwest client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            league_id: league_id.to_string(),
        }
    }

    /// URL helper.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::SleeperApi {
                status,
                message: body,
            });
        }

        resp.json().await.map_err(|e| Error::Http(e.to_string()))
    }

    /// Current NFL state, including the live week number.
    pub async fn get_nfl_state(&self) -> Result<NflState, Error> {
        self.get_json("/state/nfl").await
    }

    /// League metadata (name, season).
    pub async fn get_league(&self) -> Result<LeagueInfo, Error> {
        self.get_json(&format!("/league/{}", self.league_id)).await
    }

    /// All rosters in the league. A null body is treated as empty.
    pub async fn get_rosters(&self) -> Result<Vec<Roster>, Error> {
        let rosters: Option<Vec<Roster>> = self
            .get_json(&format!("/league/{}/rosters", self.league_id))
            .await?;
        Ok(rosters.unwrap_or_default())
    }

    /// All league members.
    pub async fn get_users(&self) -> Result<Vec<LeagueUser>, Error> {
        let users: Option<Vec<LeagueUser>> = self
            .get_json(&format!("/league/{}/users", self.league_id))
            .await?;
        Ok(users.unwrap_or_default())
    }

    /// Matchup rows (with per-player points) for a week.
    pub async fn get_matchups(&self, week: u32) -> Result<Vec<Matchup>, Error> {
        let matchups: Option<Vec<Matchup>> = self
            .get_json(&format!("/league/{}/matchups/{}", self.league_id, week))
            .await?;
        Ok(matchups.unwrap_or_default())
    }

    /// Transactions for a week.
    pub async fn get_transactions(&self, week: u32) -> Result<Vec<Transaction>, Error> {
        let txs: Option<Vec<Transaction>> = self
            .get_json(&format!("/league/{}/transactions/{}", self.league_id, week))
            .await?;
        Ok(txs.unwrap_or_default())
    }

    /// The full NFL player catalog keyed by player id. Large (~5 MB);
    /// fetched once per run.
    pub async fn get_all_players(&self) -> Result<PlayerCatalog, Error> {
        self.get_json("/players/nfl").await
    }
}
