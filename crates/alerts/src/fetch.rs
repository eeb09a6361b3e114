//! Per-job snapshot fetchers.
//!
//! Every remote failure degrades to an empty result with a warning; the
//! jobs carry on with whatever data arrived. Nothing here returns an
//! error to the caller.

use std::collections::{HashMap, HashSet};

use common::{LeagueUser, PlayerCatalog};
use sleeper_client::SleeperClient;
use tracing::{info, warn};

use crate::big_plays::{player_scores, BigPlaySnapshot};
use crate::injuries::InjurySnapshot;
use crate::transactions::TransactionSnapshot;
use crate::zero_points::ZeroPointSnapshot;

/// Regular-season week range scanned when no week is pinned.
const REGULAR_SEASON_WEEKS: std::ops::RangeInclusive<u32> = 1..=18;

/// The pinned week, or the live current week (default 1 on failure).
pub async fn resolve_week(client: &SleeperClient, pinned: Option<u32>) -> u32 {
    if let Some(week) = pinned {
        return week;
    }
    match client.get_nfl_state().await {
        Ok(state) => {
            info!("Current NFL week: {}", state.week);
            state.week
        }
        Err(e) => {
            warn!("Error fetching NFL state: {}", e);
            1
        }
    }
}

async fn log_league_name(client: &SleeperClient) {
    match client.get_league().await {
        Ok(league) => info!("League: {}", league.name),
        Err(e) => warn!("Error fetching league info: {}", e),
    }
}

async fn fetch_rosters(client: &SleeperClient) -> Vec<common::Roster> {
    match client.get_rosters().await {
        Ok(rosters) => rosters,
        Err(e) => {
            warn!("Error fetching rosters: {}", e);
            Vec::new()
        }
    }
}

async fn fetch_catalog(client: &SleeperClient) -> PlayerCatalog {
    info!("Fetching all NFL player data (this may take a moment)...");
    match client.get_all_players().await {
        Ok(players) => {
            info!("Loaded data for {} players", players.len());
            players
        }
        Err(e) => {
            warn!("Error fetching player catalog: {}", e);
            PlayerCatalog::new()
        }
    }
}

fn league_player_ids(rosters: &[common::Roster]) -> HashSet<String> {
    rosters
        .iter()
        .flat_map(|r| r.all_player_ids())
        .map(str::to_string)
        .collect()
}

/// Big-plays inputs. Returns `None` when the week has no matchup data yet
/// (normal before games start); the job then exits without touching state.
pub async fn fetch_big_plays(
    client: &SleeperClient,
    pinned_week: Option<u32>,
) -> Option<BigPlaySnapshot> {
    let week = resolve_week(client, pinned_week).await;
    log_league_name(client).await;
    info!("Week: {}", week);

    let rosters = fetch_rosters(client).await;
    let league_player_ids = league_player_ids(&rosters);
    info!(
        "Tracking {} players on league rosters",
        league_player_ids.len()
    );

    let matchups = match client.get_matchups(week).await {
        Ok(m) => m,
        Err(e) => {
            warn!("Error fetching matchups for week {}: {}", week, e);
            Vec::new()
        }
    };
    if matchups.is_empty() {
        return None;
    }
    info!("Found {} matchups", matchups.len());

    let scores = player_scores(&matchups);
    info!("Found scores for {} players", scores.len());

    let players = fetch_catalog(client).await;

    Some(BigPlaySnapshot {
        week,
        player_scores: scores,
        league_player_ids,
        players,
    })
}

/// Injury inputs: the rostered-player universe plus the catalog.
pub async fn fetch_injuries(client: &SleeperClient) -> InjurySnapshot {
    info!("Fetching league rosters...");
    let rosters = fetch_rosters(client).await;
    let league_player_ids = league_player_ids(&rosters);
    info!("Found {} players on league rosters", league_player_ids.len());

    let players = fetch_catalog(client).await;

    InjurySnapshot {
        league_player_ids,
        players,
    }
}

/// Transaction inputs: one pinned week, or the whole regular season. A
/// failed week is skipped, not fatal.
pub async fn fetch_transactions(
    client: &SleeperClient,
    pinned_week: Option<u32>,
) -> TransactionSnapshot {
    let mut transactions = Vec::new();

    let weeks: Vec<u32> = match pinned_week {
        Some(week) => vec![week],
        None => REGULAR_SEASON_WEEKS.collect(),
    };

    for week in weeks {
        match client.get_transactions(week).await {
            Ok(mut txs) => transactions.append(&mut txs),
            Err(e) => warn!("Error fetching week {}: {}", week, e),
        }
    }

    info!("Found {} total transactions", transactions.len());
    TransactionSnapshot { transactions }
}

/// Zero-points inputs: rosters, owner display names, and the catalog.
pub async fn fetch_zero_points(
    client: &SleeperClient,
    pinned_week: Option<u32>,
) -> ZeroPointSnapshot {
    let week = resolve_week(client, pinned_week).await;
    log_league_name(client).await;

    info!("Fetching rosters...");
    let rosters = fetch_rosters(client).await;
    info!("Found {} teams", rosters.len());

    info!("Fetching users...");
    let users: HashMap<String, LeagueUser> = match client.get_users().await {
        Ok(users) => users.into_iter().map(|u| (u.user_id.clone(), u)).collect(),
        Err(e) => {
            warn!("Error fetching users: {}", e);
            HashMap::new()
        }
    };

    let players = fetch_catalog(client).await;

    ZeroPointSnapshot {
        week,
        rosters,
        users,
        players,
    }
}
