//! Zero-points job: warn owners about starters who cannot score this week.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use common::config::AlertTables;
use common::{LeagueUser, Player, PlayerCatalog, Roster};
use serde::{Deserialize, Serialize};

use crate::pipeline::AlertJob;

#[derive(Debug, Clone, Default)]
pub struct ZeroPointSnapshot {
    pub week: u32,
    pub rosters: Vec<Roster>,
    /// user id -> user, for owner display names.
    pub users: HashMap<String, LeagueUser>,
    pub players: PlayerCatalog,
}

/// Durable record: `"{week}_{rosterId}"` -> player ids already alerted.
/// Additive within a week; a later status change for an already-alerted
/// player does not re-trigger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZeroPointState {
    #[serde(default)]
    pub alerts: BTreeMap<String, BTreeSet<String>>,
}

/// One starter who will produce nothing.
#[derive(Debug, Clone)]
pub struct LineupIssue {
    pub player_id: String,
    pub player_name: String,
    pub team: String,
    pub position: String,
    pub reason: String,
}

/// All of one roster's new issues for this run, merged into one message.
#[derive(Debug, Clone)]
pub struct ZeroPointEvent {
    pub week: u32,
    pub roster_id: i64,
    pub team_name: String,
    pub issues: Vec<LineupIssue>,
}

pub struct ZeroPointJob {
    tables: AlertTables,
}

impl ZeroPointJob {
    pub fn new(tables: AlertTables) -> Self {
        Self { tables }
    }

    /// Classify one catalog player for the given week. Returns the reason
    /// the player scores zero, or `None` if they are playable. Free agency
    /// outranks injury status, which outranks the bye table.
    pub fn will_score_zero_points(&self, player: &Player, week: u32) -> Option<String> {
        let team = player.team.as_deref().unwrap_or("");
        if team.is_empty() || team == "FA" {
            return Some("Free Agent - No Team".into());
        }

        if let Some(status) = player.trimmed_injury_status() {
            if self.tables.is_zero_point_status(status) {
                return Some(format!("Injury Status: {}", status));
            }
        }

        if self.tables.is_on_bye(team, week) {
            return Some(format!("Team on Bye (Week {})", week));
        }

        None
    }

    fn roster_issues(&self, roster: &Roster, snapshot: &ZeroPointSnapshot) -> Vec<LineupIssue> {
        let mut issues = Vec::new();

        for player_id in roster.active_starters() {
            let Some(player) = snapshot.players.get(player_id) else {
                issues.push(LineupIssue {
                    player_id: player_id.to_string(),
                    player_name: "Unknown Player".into(),
                    team: "N/A".into(),
                    position: "N/A".into(),
                    reason: "Player not found in database".into(),
                });
                continue;
            };

            if let Some(reason) = self.will_score_zero_points(player, snapshot.week) {
                issues.push(LineupIssue {
                    player_id: player_id.to_string(),
                    player_name: player.full_name(),
                    team: player.team_label().to_string(),
                    position: player.position_label().to_string(),
                    reason,
                });
            }
        }

        issues
    }
}

fn team_name(roster: &Roster, users: &HashMap<String, LeagueUser>) -> String {
    roster
        .owner_id
        .as_deref()
        .and_then(|id| users.get(id))
        .map(|user| user.display_name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("Team {}", roster.roster_id))
}

impl AlertJob for ZeroPointJob {
    type Snapshot = ZeroPointSnapshot;
    type State = ZeroPointState;
    type Event = ZeroPointEvent;

    fn name(&self) -> &'static str {
        "lineup"
    }

    /// One event per roster with at least one not-yet-alerted issue; the
    /// alerted ids are added to the week+roster set as they are emitted.
    fn detect(&self, snapshot: &Self::Snapshot, state: &mut Self::State) -> Vec<Self::Event> {
        let mut events = Vec::new();

        for roster in &snapshot.rosters {
            let issues = self.roster_issues(roster, snapshot);
            if issues.is_empty() {
                continue;
            }

            let key = format!("{}_{}", snapshot.week, roster.roster_id);
            let alerted = state.alerts.entry(key).or_default();

            let new_issues: Vec<LineupIssue> = issues
                .into_iter()
                .filter(|issue| alerted.insert(issue.player_id.clone()))
                .collect();

            if new_issues.is_empty() {
                continue;
            }

            events.push(ZeroPointEvent {
                week: snapshot.week,
                roster_id: roster.roster_id,
                team_name: team_name(roster, &snapshot.users),
                issues: new_issues,
            });
        }

        events
    }

    fn format(&self, event: &Self::Event) -> String {
        let mut msg = format!("⚠️ **LINEUP ALERT - Week {}**\n", event.week);
        msg.push_str(&format!("Team: **{}**\n\n", event.team_name));
        msg.push_str("The following starters are projected to score **ZERO POINTS**:\n\n");

        for issue in &event.issues {
            msg.push_str(&format!(
                "❌ **{}** ({} - {})\n",
                issue.player_name, issue.team, issue.position
            ));
            msg.push_str(&format!("   Reason: {}\n\n", issue.reason));
        }

        msg.push_str("⏰ Please update your lineup before game time!");
        msg
    }
}
