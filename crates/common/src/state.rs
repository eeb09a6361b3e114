//! Durable seen-state persistence.
//!
//! One small JSON document per job: the job's tracking map plus a
//! `last_updated` stamp. Absence of the file is the first-run signal, so
//! `load` returns an `Option`; a present-but-broken file is NOT a first
//! run and decays to an empty (default) state instead.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::Error;

#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

#[derive(Serialize)]
struct StateDoc<'a, T: Serialize> {
    #[serde(flatten)]
    state: &'a T,
    last_updated: String,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load prior state.
    ///
    /// `None` means the file does not exist (first run: seed silently).
    /// A file that cannot be read or parsed yields `Some(T::default())`
    /// with a warning, which re-alerts everything currently true.
    pub fn load<T>(&self) -> Option<T>
    where
        T: DeserializeOwned + Default,
    {
        if !self.path.exists() {
            return None;
        }

        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Could not read {}, starting fresh: {}", self.path.display(), e);
                return Some(T::default());
            }
        };

        match serde_json::from_str(&contents) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(
                    "Could not parse {}, starting fresh: {}",
                    self.path.display(),
                    e
                );
                Some(T::default())
            }
        }
    }

    /// Overwrite the state file with `state` plus a fresh timestamp.
    pub fn save<T>(&self, state: &T) -> Result<(), Error>
    where
        T: Serialize,
    {
        let doc = StateDoc {
            state,
            last_updated: Utc::now().to_rfc3339(),
        };
        let contents = serde_json::to_string_pretty(&doc)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeSet;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct TxState {
        transaction_ids: BTreeSet<String>,
    }

    fn temp_store(name: &str) -> StateStore {
        let path = std::env::temp_dir().join(format!(
            "sleeper-alerts-state-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        StateStore::new(path)
    }

    #[test]
    fn missing_file_is_first_run() {
        let store = temp_store("missing");
        assert!(store.load::<TxState>().is_none());
    }

    #[test]
    fn save_then_load_round_trips_with_timestamp() {
        let store = temp_store("roundtrip");
        let mut state = TxState::default();
        state.transaction_ids.insert("tx-1".into());
        store.save(&state).unwrap();

        let loaded: TxState = store.load().unwrap();
        assert_eq!(loaded, state);

        // The on-disk document carries the stamp alongside the state.
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert!(raw.get("last_updated").is_some());
        assert!(raw.get("transaction_ids").is_some());

        let _ = std::fs::remove_file(store.path());
    }

    #[test]
    fn corrupt_file_is_not_first_run() {
        let store = temp_store("corrupt");
        std::fs::write(store.path(), "{not json").unwrap();

        let loaded = store.load::<TxState>();
        assert_eq!(loaded, Some(TxState::default()));

        let _ = std::fs::remove_file(store.path());
    }
}
