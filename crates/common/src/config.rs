//! Bot configuration: struct definitions, defaults, and the merge loader.
//!
//! Every lookup table the detectors use (scoring tiers, injury icons, bye
//! weeks, zero-point statuses) lives here as data, defaulted in code and
//! overridable from `alerts.toml`, so season-over-season updates need no
//! code change.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Default hosted chat endpoint.
pub const DEFAULT_CHAT_API_URL: &str = "https://api.tokenbowl.ai/messages";

/// Default Sleeper API base.
pub const DEFAULT_SLEEPER_BASE_URL: &str = "https://api.sleeper.app/v1";

/// Top-level configuration shared by all four jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Sleeper league ID.
    #[serde(default)]
    pub league_id: String,

    /// Pinned week; `None` resolves the current week live.
    #[serde(default)]
    pub week: Option<u32>,

    /// Sleeper API base URL (overridable for tests).
    #[serde(default = "default_sleeper_base_url")]
    pub sleeper_base_url: String,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Chat publishing settings.
    #[serde(default)]
    pub chat: ChatConfig,

    /// Immutable alert lookup tables.
    #[serde(default)]
    pub tables: AlertTables,
}

/// Chat endpoint settings. A webhook URL takes precedence over the hosted
/// endpoint; with neither a key nor a webhook the jobs run without posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_chat_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// One scoring tier for the big-plays job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdTier {
    pub points: f64,
    pub emoji: String,
    pub label: String,
}

/// Data tables driving event classification and formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertTables {
    /// Big-play tiers; the detector evaluates them highest first.
    #[serde(default = "default_scoring_thresholds")]
    pub scoring_thresholds: Vec<ThresholdTier>,

    /// Injury status -> icon.
    #[serde(default = "default_injury_icons")]
    pub injury_icons: BTreeMap<String, String>,

    /// Icon for statuses missing from `injury_icons`.
    #[serde(default = "default_injury_icon")]
    pub default_injury_icon: String,

    /// Injury statuses that guarantee zero points.
    #[serde(default = "default_zero_point_statuses")]
    pub zero_point_statuses: Vec<String>,

    /// Week number (as a string, TOML table keys) -> teams on bye.
    #[serde(default = "default_bye_weeks")]
    pub bye_weeks: BTreeMap<String, Vec<String>>,
}

impl AlertTables {
    /// Scoring tiers sorted highest points first.
    pub fn tiers_descending(&self) -> Vec<&ThresholdTier> {
        let mut tiers: Vec<&ThresholdTier> = self.scoring_thresholds.iter().collect();
        tiers.sort_by(|a, b| b.points.total_cmp(&a.points));
        tiers
    }

    pub fn injury_icon(&self, status: &str) -> &str {
        self.injury_icons
            .get(status)
            .unwrap_or(&self.default_injury_icon)
    }

    pub fn is_zero_point_status(&self, status: &str) -> bool {
        self.zero_point_statuses.iter().any(|s| s == status)
    }

    pub fn is_on_bye(&self, team: &str, week: u32) -> bool {
        self.bye_weeks
            .get(&week.to_string())
            .map(|teams| teams.iter().any(|t| t == team))
            .unwrap_or(false)
    }
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_sleeper_base_url() -> String {
    DEFAULT_SLEEPER_BASE_URL.into()
}

fn default_chat_api_url() -> String {
    DEFAULT_CHAT_API_URL.into()
}

fn default_http_timeout() -> u64 {
    10
}

fn default_scoring_thresholds() -> Vec<ThresholdTier> {
    vec![
        ThresholdTier {
            points: 20.0,
            emoji: "🔥".into(),
            label: "HOT PERFORMANCE".into(),
        },
        ThresholdTier {
            points: 30.0,
            emoji: "💥".into(),
            label: "EXPLOSIVE GAME".into(),
        },
        ThresholdTier {
            points: 40.0,
            emoji: "🚀".into(),
            label: "MONSTER PERFORMANCE".into(),
        },
        ThresholdTier {
            points: 50.0,
            emoji: "👑".into(),
            label: "LEGENDARY GAME".into(),
        },
    ]
}

fn default_injury_icons() -> BTreeMap<String, String> {
    [
        ("Out", "🚑"),
        ("Doubtful", "⚠️"),
        ("Questionable", "❓"),
        ("IR", "🏥"),
        ("PUP", "📋"),
        ("Suspended", "🚫"),
        ("COVID", "😷"),
        ("NA", "❌"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_injury_icon() -> String {
    "⚕️".into()
}

fn default_zero_point_statuses() -> Vec<String> {
    ["Out", "IR", "Suspended", "PUP", "COV"]
        .into_iter()
        .map(String::from)
        .collect()
}

// 2025 NFL bye week schedule. No byes in weeks 13 and 15-18.
fn default_bye_weeks() -> BTreeMap<String, Vec<String>> {
    let table: [(&str, &[&str]); 9] = [
        ("5", &["ATL", "CHI", "GB", "PIT"]),
        ("6", &["CIN", "CLE", "HOU", "NYG"]),
        ("7", &["DAL", "DEN", "KC", "LAC"]),
        ("8", &["ARI", "DET", "JAX", "LV", "LAR", "SEA"]),
        ("9", &["BAL", "MIA", "MIN", "PHI"]),
        ("10", &["BUF", "CAR", "IND", "NE"]),
        ("11", &["NO", "NYJ", "SF", "TB"]),
        ("12", &["TEN", "WAS"]),
        ("14", &[]),
    ];
    table
        .into_iter()
        .map(|(week, teams)| {
            (
                week.to_string(),
                teams.iter().map(|t| t.to_string()).collect(),
            )
        })
        .collect()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_url: default_chat_api_url(),
            api_key: None,
            webhook_url: None,
        }
    }
}

impl Default for AlertTables {
    fn default() -> Self {
        Self {
            scoring_thresholds: default_scoring_thresholds(),
            injury_icons: default_injury_icons(),
            default_injury_icon: default_injury_icon(),
            zero_point_statuses: default_zero_point_statuses(),
            bye_weeks: default_bye_weeks(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            league_id: String::new(),
            week: None,
            sleeper_base_url: default_sleeper_base_url(),
            http_timeout_secs: default_http_timeout(),
            chat: ChatConfig::default(),
            tables: AlertTables::default(),
        }
    }
}

// ── Loader ────────────────────────────────────────────────────────────

/// Values parsed from a binary's command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub league_id: Option<String>,
    pub week: Option<u32>,
    pub api_key: Option<String>,
    pub webhook_url: Option<String>,
}

/// Load configuration: defaults <- `alerts.toml` <- environment <- CLI.
///
/// A missing league id is the only fatal condition.
pub fn load_config(cli: CliOverrides) -> Result<BotConfig, Error> {
    // .env file, if present.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    let mut config = BotConfig::default();

    // Optional config file for table/endpoint overrides.
    let config_path =
        std::env::var("ALERTS_CONFIG").unwrap_or_else(|_| "alerts.toml".to_string());
    let config_path = Path::new(&config_path);
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", config_path.display(), e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", config_path.display(), e)))?;
    }

    // Environment overrides.
    if let Ok(id) = std::env::var("SLEEPER_LEAGUE_ID") {
        config.league_id = id;
    }
    if let Ok(url) = std::env::var("CHAT_API_URL") {
        config.chat.api_url = url;
    }
    if let Ok(key) = std::env::var("CHAT_API_KEY") {
        if !key.trim().is_empty() {
            config.chat.api_key = Some(key);
        }
    }
    if let Ok(url) = std::env::var("CHAT_WEBHOOK_URL") {
        if !url.trim().is_empty() {
            config.chat.webhook_url = Some(url);
        }
    }
    if let Ok(raw) = std::env::var("CURRENT_WEEK") {
        match raw.trim().parse::<u32>() {
            Ok(week) => config.week = Some(week),
            Err(_) => {
                tracing::warn!("Invalid CURRENT_WEEK value '{}', ignoring", raw);
            }
        }
    }

    // CLI overrides (highest priority).
    if let Some(id) = cli.league_id {
        config.league_id = id;
    }
    if let Some(week) = cli.week {
        config.week = Some(week);
    }
    if let Some(key) = cli.api_key {
        config.chat.api_key = Some(key);
    }
    if let Some(url) = cli.webhook_url {
        config.chat.webhook_url = Some(url);
    }

    if config.league_id.trim().is_empty() {
        return Err(Error::Config(
            "league id is required (positional argument or SLEEPER_LEAGUE_ID)".into(),
        ));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_match_season_constants() {
        let tables = AlertTables::default();

        let tiers = tables.tiers_descending();
        let points: Vec<f64> = tiers.iter().map(|t| t.points).collect();
        assert_eq!(points, [50.0, 40.0, 30.0, 20.0]);

        assert_eq!(tables.injury_icon("Out"), "🚑");
        assert_eq!(tables.injury_icon("Probable"), "⚕️");

        assert!(tables.is_zero_point_status("PUP"));
        assert!(!tables.is_zero_point_status("Questionable"));

        assert!(tables.is_on_bye("ATL", 5));
        assert!(!tables.is_on_bye("ATL", 6));
        assert!(!tables.is_on_bye("ATL", 14));
    }

    #[test]
    fn tables_deserialize_from_toml() {
        let cfg: BotConfig = toml::from_str(
            r#"
            league_id = "12345"

            [tables]
            zero_point_statuses = ["Out"]

            [tables.bye_weeks]
            "3" = ["KC"]
            "#,
        )
        .unwrap();

        assert_eq!(cfg.league_id, "12345");
        assert!(cfg.tables.is_on_bye("KC", 3));
        assert!(!cfg.tables.is_zero_point_status("IR"));
        // Unset tables keep their defaults.
        assert_eq!(cfg.tables.tiers_descending().len(), 4);
    }
}
