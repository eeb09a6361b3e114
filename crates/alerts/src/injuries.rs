//! Injury job: alert on new injuries, status changes, and recoveries.

use std::collections::{BTreeMap, HashSet};

use common::config::AlertTables;
use common::PlayerCatalog;
use serde::{Deserialize, Serialize};

use crate::pipeline::AlertJob;

#[derive(Debug, Clone, Default)]
pub struct InjurySnapshot {
    /// Players on any league roster (active + reserve).
    pub league_player_ids: HashSet<String>,
    pub players: PlayerCatalog,
}

/// Durable record: player id -> last-seen injury status string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InjuryState {
    #[serde(default)]
    pub injuries: BTreeMap<String, String>,
}

/// A currently-injured player with display fields resolved.
#[derive(Debug, Clone)]
pub struct InjuredPlayer {
    pub player_id: String,
    pub name: String,
    pub team: String,
    pub position: String,
    pub status: String,
    pub body_part: Option<String>,
    pub practice_participation: Option<String>,
    pub start_date: Option<String>,
}

#[derive(Debug, Clone)]
pub enum InjuryEvent {
    New(InjuredPlayer),
    StatusChange {
        current: InjuredPlayer,
        old_status: String,
    },
    Recovered {
        name: String,
        team: String,
        position: String,
        previous_status: String,
    },
}

pub struct InjuryJob {
    tables: AlertTables,
}

impl InjuryJob {
    pub fn new(tables: AlertTables) -> Self {
        Self { tables }
    }
}

impl AlertJob for InjuryJob {
    type Snapshot = InjurySnapshot;
    type State = InjuryState;
    type Event = InjuryEvent;

    fn name(&self) -> &'static str {
        "injury"
    }

    /// New/changed alerts first, then recoveries. The current injury map
    /// replaces prior state wholesale, so recovered players drop out of
    /// the file along with the live injury set.
    fn detect(&self, snapshot: &Self::Snapshot, state: &mut Self::State) -> Vec<Self::Event> {
        // Sorted so event order is stable run to run.
        let mut current: BTreeMap<String, InjuredPlayer> = BTreeMap::new();
        for player_id in &snapshot.league_player_ids {
            let Some(player) = snapshot.players.get(player_id) else {
                continue;
            };
            let Some(status) = player.trimmed_injury_status() else {
                continue;
            };
            current.insert(
                player_id.clone(),
                InjuredPlayer {
                    player_id: player_id.clone(),
                    name: player.full_name(),
                    team: player.team_label().to_string(),
                    position: player.position_label().to_string(),
                    status: status.to_string(),
                    body_part: player.injury_body_part.clone(),
                    practice_participation: player.practice_participation.clone(),
                    start_date: player.injury_start_date.clone(),
                },
            );
        }

        let mut events = Vec::new();

        for (player_id, injured) in &current {
            match state.injuries.get(player_id) {
                None => events.push(InjuryEvent::New(injured.clone())),
                Some(old) if old != &injured.status => events.push(InjuryEvent::StatusChange {
                    current: injured.clone(),
                    old_status: old.clone(),
                }),
                Some(_) => {}
            }
        }

        // Previously injured, no longer on the report, still in the catalog.
        for (player_id, previous_status) in &state.injuries {
            if current.contains_key(player_id) {
                continue;
            }
            let Some(player) = snapshot.players.get(player_id) else {
                continue;
            };
            events.push(InjuryEvent::Recovered {
                name: player.full_name(),
                team: player.team_label().to_string(),
                position: player.position_label().to_string(),
                previous_status: previous_status.clone(),
            });
        }

        state.injuries = current
            .into_iter()
            .map(|(id, injured)| (id, injured.status))
            .collect();

        events
    }

    fn format(&self, event: &Self::Event) -> String {
        match event {
            InjuryEvent::New(p) => format_injury(&self.tables, p, None),
            InjuryEvent::StatusChange {
                current,
                old_status,
            } => format_injury(&self.tables, current, Some(old_status)),
            InjuryEvent::Recovered {
                name,
                team,
                position,
                previous_status,
            } => {
                let mut msg = "✅ **PLAYER CLEARED**\n".to_string();
                msg.push_str(&format!("{} ({} - {})\n", name, team, position));
                msg.push_str(&format!("Previous status: {}\n", previous_status));
                msg.push_str("Player no longer listed on injury report");
                msg
            }
        }
    }
}

fn format_injury(tables: &AlertTables, p: &InjuredPlayer, old_status: Option<&str>) -> String {
    let icon = tables.injury_icon(&p.status);

    let mut msg = match old_status {
        None => format!("{} **NEW INJURY REPORT**\n", icon),
        Some(_) => format!("{} **INJURY STATUS UPDATE**\n", icon),
    };
    msg.push_str(&format!("{} ({} - {})\n", p.name, p.team, p.position));
    match old_status {
        None => msg.push_str(&format!("Status: **{}**\n", p.status)),
        Some(old) => msg.push_str(&format!("Status: {} → **{}**\n", old, p.status)),
    }

    if let Some(body_part) = p.body_part.as_deref().filter(|s| !s.is_empty()) {
        msg.push_str(&format!("Injury: {}\n", body_part));
    }
    if let Some(practice) = p.practice_participation.as_deref().filter(|s| !s.is_empty()) {
        msg.push_str(&format!("Practice: {}\n", practice));
    }
    if let Some(since) = p.start_date.as_deref().filter(|s| !s.is_empty()) {
        msg.push_str(&format!("Since: {}\n", since));
    }

    msg
}
