//! Sleeper wire types shared across the bots.
//!
//! Fields the API sends as `null` for empty collections are modeled as
//! `Option` with accessor methods, so detectors never see the distinction.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// League-wide NFL state from GET /v1/state/nfl.
#[derive(Debug, Clone, Deserialize)]
pub struct NflState {
    #[serde(default = "default_week")]
    pub week: u32,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub season_type: String,
}

fn default_week() -> u32 {
    1
}

/// League metadata from GET /v1/league/{id}.
#[derive(Debug, Clone, Deserialize)]
pub struct LeagueInfo {
    #[serde(default = "default_league_name")]
    pub name: String,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub total_rosters: u32,
}

fn default_league_name() -> String {
    "Unknown League".into()
}

/// A league member from GET /v1/league/{id}/users.
#[derive(Debug, Clone, Deserialize)]
pub struct LeagueUser {
    pub user_id: String,
    #[serde(default)]
    pub display_name: String,
}

/// A roster from GET /v1/league/{id}/rosters.
#[derive(Debug, Clone, Deserialize)]
pub struct Roster {
    pub roster_id: i64,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub players: Option<Vec<String>>,
    #[serde(default)]
    pub reserve: Option<Vec<String>>,
    #[serde(default)]
    pub starters: Option<Vec<String>>,
}

impl Roster {
    /// All rostered player ids, active plus reserve/IR.
    pub fn all_player_ids(&self) -> impl Iterator<Item = &str> {
        self.players
            .iter()
            .flatten()
            .chain(self.reserve.iter().flatten())
            .map(String::as_str)
    }

    /// Starting-lineup slots with empty/placeholder slots filtered out.
    pub fn active_starters(&self) -> impl Iterator<Item = &str> {
        self.starters
            .iter()
            .flatten()
            .map(String::as_str)
            .filter(|id| !id.is_empty() && *id != "0")
    }
}

/// One matchup row from GET /v1/league/{id}/matchups/{week}.
#[derive(Debug, Clone, Deserialize)]
pub struct Matchup {
    #[serde(default)]
    pub roster_id: i64,
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub players_points: Option<HashMap<String, f64>>,
}

/// A transaction from GET /v1/league/{id}/transactions/{week}.
///
/// `kind` stays a raw string: the formatter needs to echo unknown types
/// verbatim, and new types appear without notice.
#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub transaction_id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub status: String,
    /// Week number ("leg" in Sleeper terms).
    #[serde(default)]
    pub leg: u32,
    #[serde(default)]
    pub roster_ids: Option<Vec<i64>>,
    /// player id -> destination roster id.
    #[serde(default)]
    pub adds: Option<HashMap<String, i64>>,
    /// player id -> source roster id.
    #[serde(default)]
    pub drops: Option<HashMap<String, i64>>,
}

/// A catalog entry from GET /v1/players/nfl, keyed by player id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub injury_status: Option<String>,
    #[serde(default)]
    pub injury_body_part: Option<String>,
    #[serde(default)]
    pub injury_start_date: Option<String>,
    #[serde(default)]
    pub practice_participation: Option<String>,
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Team abbreviation with the free-agent sentinel as fallback.
    pub fn team_label(&self) -> &str {
        match self.team.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => "FA",
        }
    }

    pub fn position_label(&self) -> &str {
        match self.position.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => "N/A",
        }
    }

    /// Injury status with surrounding whitespace stripped; `None` when the
    /// player is not on the injury report.
    pub fn trimmed_injury_status(&self) -> Option<&str> {
        self.injury_status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// The full player catalog keyed by player id.
pub type PlayerCatalog = HashMap<String, Player>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_accessors_skip_null_and_placeholder_slots() {
        let roster: Roster = serde_json::from_str(
            r#"{
                "roster_id": 3,
                "owner_id": "u1",
                "players": ["100", "200"],
                "reserve": null,
                "starters": ["100", "0", "", "200"]
            }"#,
        )
        .unwrap();

        let all: Vec<&str> = roster.all_player_ids().collect();
        assert_eq!(all, ["100", "200"]);

        let starters: Vec<&str> = roster.active_starters().collect();
        assert_eq!(starters, ["100", "200"]);
    }

    #[test]
    fn player_labels_fall_back() {
        let p = Player {
            first_name: "Bijan".into(),
            last_name: "Robinson".into(),
            team: None,
            injury_status: Some("  ".into()),
            ..Player::default()
        };
        assert_eq!(p.full_name(), "Bijan Robinson");
        assert_eq!(p.team_label(), "FA");
        assert_eq!(p.position_label(), "N/A");
        assert_eq!(p.trimmed_injury_status(), None);
    }

    #[test]
    fn transaction_null_maps_deserialize() {
        let tx: Transaction = serde_json::from_str(
            r#"{
                "transaction_id": "t1",
                "type": "free_agent",
                "status": "complete",
                "leg": 4,
                "adds": {"123": 7},
                "drops": null
            }"#,
        )
        .unwrap();
        assert_eq!(tx.kind, "free_agent");
        assert_eq!(tx.adds.as_ref().unwrap()["123"], 7);
        assert!(tx.drops.is_none());
    }
}
