//! Big-plays job: alert when a rostered player crosses a scoring tier.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Utc;
use common::config::{AlertTables, ThresholdTier};
use common::{Matchup, PlayerCatalog};
use serde::{Deserialize, Serialize};

use crate::pipeline::AlertJob;

/// Current-truth inputs for one run.
#[derive(Debug, Clone, Default)]
pub struct BigPlaySnapshot {
    pub week: u32,
    /// player id -> points scored this week.
    pub player_scores: HashMap<String, f64>,
    /// Players on any league roster (active + reserve).
    pub league_player_ids: HashSet<String>,
    pub players: PlayerCatalog,
}

/// Durable record: `"{week}_{playerId}"` -> tier key -> alert timestamp.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BigPlayState {
    #[serde(default)]
    pub big_plays: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Clone)]
pub struct BigPlayEvent {
    pub player_id: String,
    pub player_name: String,
    pub team: String,
    pub position: String,
    pub points: f64,
    pub week: u32,
    pub tier: ThresholdTier,
}

pub struct BigPlayJob {
    tables: AlertTables,
}

impl BigPlayJob {
    pub fn new(tables: AlertTables) -> Self {
        Self { tables }
    }
}

/// State-file key for a tier ("20", not "20.0", for whole-point tiers).
fn tier_key(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{}", points as i64)
    } else {
        points.to_string()
    }
}

/// Collapse matchup rows into per-player scores; a player appearing in
/// several rows keeps the maximum.
pub fn player_scores(matchups: &[Matchup]) -> HashMap<String, f64> {
    let mut scores: HashMap<String, f64> = HashMap::new();
    for matchup in matchups {
        for (player_id, &points) in matchup.players_points.iter().flatten() {
            scores
                .entry(player_id.clone())
                .and_modify(|p| *p = p.max(points))
                .or_insert(points);
        }
    }
    scores
}

impl AlertJob for BigPlayJob {
    type Snapshot = BigPlaySnapshot;
    type State = BigPlayState;
    type Event = BigPlayEvent;

    fn name(&self) -> &'static str {
        "big plays"
    }

    /// Emit at most one event per player: the highest crossed tier not yet
    /// recorded for that player + week. Emitting a tier also marks every
    /// lower tier seen, so a 0 -> 45 jump fires the 40 tier once and never
    /// back-fills 30/20 alerts on later runs.
    fn detect(&self, snapshot: &Self::Snapshot, state: &mut Self::State) -> Vec<Self::Event> {
        let mut events = Vec::new();
        let tiers = self.tables.tiers_descending();

        for (player_id, &points) in &snapshot.player_scores {
            if !snapshot.league_player_ids.contains(player_id) {
                continue;
            }
            if points <= 0.0 {
                continue;
            }
            let Some(player) = snapshot.players.get(player_id) else {
                continue;
            };

            let key = format!("{}_{}", snapshot.week, player_id);

            for (idx, tier) in tiers.iter().enumerate() {
                if points < tier.points {
                    continue;
                }
                let already = state
                    .big_plays
                    .get(&key)
                    .is_some_and(|seen| seen.contains_key(&tier_key(tier.points)));
                if already {
                    break;
                }

                events.push(BigPlayEvent {
                    player_id: player_id.clone(),
                    player_name: player.full_name(),
                    team: player.team_label().to_string(),
                    position: player.position_label().to_string(),
                    points,
                    week: snapshot.week,
                    tier: (*tier).clone(),
                });

                let now = Utc::now().to_rfc3339();
                let seen = state.big_plays.entry(key).or_default();
                for lower in &tiers[idx..] {
                    seen.entry(tier_key(lower.points)).or_insert_with(|| now.clone());
                }
                break;
            }
        }

        // Highest scores first.
        events.sort_by(|a, b| b.points.total_cmp(&a.points));
        events
    }

    fn format(&self, event: &Self::Event) -> String {
        let mut msg = format!(
            "{} **{}** {}\n",
            event.tier.emoji, event.tier.label, event.tier.emoji
        );
        msg.push_str(&format!(
            "**{}** ({} - {})\n",
            event.player_name, event.team, event.position
        ));
        msg.push_str(&format!(
            "Week {}: **{:.1} points**\n",
            event.week, event.points
        ));
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Player;

    fn catalog_player(first: &str, last: &str, team: &str, pos: &str) -> Player {
        Player {
            first_name: first.into(),
            last_name: last.into(),
            team: Some(team.into()),
            position: Some(pos.into()),
            ..Player::default()
        }
    }

    fn snapshot_with(scores: &[(&str, f64)]) -> BigPlaySnapshot {
        let mut snapshot = BigPlaySnapshot {
            week: 5,
            ..BigPlaySnapshot::default()
        };
        for (id, points) in scores {
            snapshot.player_scores.insert((*id).into(), *points);
            snapshot.league_player_ids.insert((*id).into());
            snapshot
                .players
                .insert((*id).into(), catalog_player("Test", id, "KC", "RB"));
        }
        snapshot
    }

    fn job() -> BigPlayJob {
        BigPlayJob::new(AlertTables::default())
    }

    #[test]
    fn emits_only_highest_unseen_tier_and_marks_lower_tiers() {
        let snapshot = snapshot_with(&[("P1", 45.0)]);
        let mut state = BigPlayState::default();

        let events = job().detect(&snapshot, &mut state);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tier.points, 40.0);

        let seen = &state.big_plays["5_P1"];
        assert!(seen.contains_key("40"));
        assert!(seen.contains_key("30"));
        assert!(seen.contains_key("20"));
        assert!(!seen.contains_key("50"));

        // Re-running with the same snapshot is quiet.
        let events = job().detect(&snapshot, &mut state);
        assert!(events.is_empty());
    }

    #[test]
    fn threshold_monotonicity_across_runs() {
        let mut state = BigPlayState::default();

        let events = job().detect(&snapshot_with(&[("P1", 25.0)]), &mut state);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tier.points, 20.0);

        // Same week, later run, score grew: exactly one new alert (30).
        let events = job().detect(&snapshot_with(&[("P1", 35.0)]), &mut state);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tier.points, 30.0);
    }

    #[test]
    fn seen_twenty_and_score_below_thirty_is_quiet() {
        let mut state = BigPlayState::default();
        state.big_plays.insert(
            "5_P1".into(),
            BTreeMap::from([("20".to_string(), "2025-10-05T17:00:00Z".to_string())]),
        );

        let events = job().detect(&snapshot_with(&[("P1", 28.0)]), &mut state);
        assert!(events.is_empty());
    }

    #[test]
    fn skips_unrostered_zero_point_and_unknown_players() {
        let mut snapshot = snapshot_with(&[("ROSTERED", 22.0)]);
        // High scorer not on any league roster.
        snapshot.player_scores.insert("OUTSIDER".into(), 48.0);
        snapshot
            .players
            .insert("OUTSIDER".into(), catalog_player("Out", "Sider", "NE", "WR"));
        // Rostered but scoreless.
        snapshot.player_scores.insert("BENCHED".into(), 0.0);
        snapshot.league_player_ids.insert("BENCHED".into());
        // Rostered, scored, but missing from the catalog.
        snapshot.player_scores.insert("GHOST".into(), 33.0);
        snapshot.league_player_ids.insert("GHOST".into());

        let mut state = BigPlayState::default();
        let events = job().detect(&snapshot, &mut state);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].player_id, "ROSTERED");
    }

    #[test]
    fn events_sorted_by_points_descending() {
        let snapshot = snapshot_with(&[("LOW", 21.0), ("HIGH", 52.0), ("MID", 31.0)]);
        let mut state = BigPlayState::default();

        let events = job().detect(&snapshot, &mut state);
        let points: Vec<f64> = events.iter().map(|e| e.points).collect();
        assert_eq!(points, [52.0, 31.0, 21.0]);
    }

    #[test]
    fn matchup_scores_take_the_max_per_player() {
        let matchups = vec![
            Matchup {
                roster_id: 1,
                points: 0.0,
                players_points: Some(HashMap::from([("P1".to_string(), 12.0)])),
            },
            Matchup {
                roster_id: 2,
                points: 0.0,
                players_points: Some(HashMap::from([("P1".to_string(), 17.5)])),
            },
            Matchup {
                roster_id: 3,
                points: 0.0,
                players_points: None,
            },
        ];
        let scores = player_scores(&matchups);
        assert_eq!(scores["P1"], 17.5);
    }

    #[test]
    fn format_matches_template() {
        let event = BigPlayEvent {
            player_id: "P1".into(),
            player_name: "Test Player".into(),
            team: "KC".into(),
            position: "RB".into(),
            points: 31.4,
            week: 5,
            tier: ThresholdTier {
                points: 30.0,
                emoji: "💥".into(),
                label: "EXPLOSIVE GAME".into(),
            },
        };
        let msg = job().format(&event);
        assert_eq!(
            msg,
            "💥 **EXPLOSIVE GAME** 💥\n**Test Player** (KC - RB)\nWeek 5: **31.4 points**\n"
        );
    }
}
