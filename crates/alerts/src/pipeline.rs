//! The shared snapshot-diff-notify engine.
//!
//! Each job supplies a snapshot type, a durable seen-state type, and the
//! detect/format pair; the runner owns the common lifecycle: load prior
//! state, diff, suppress alerts on the very first run, publish, persist.

use chat_client::ChatClient;
use common::{Error, StateStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, info, warn};

/// One alert job over the generic pipeline.
pub trait AlertJob {
    /// Freshly fetched remote truth, assembled by `fetch`.
    type Snapshot;
    /// Durable seen-state; serialized as the state file's tracking field.
    type State: Default + Serialize + DeserializeOwned;
    /// One new-worthy occurrence.
    type Event;

    /// Job name for logging.
    fn name(&self) -> &'static str;

    /// Diff the snapshot against prior state, returning new-worthy events
    /// in posting order. Must mark everything it returns as seen in
    /// `state` so a re-run with the same snapshot returns nothing.
    fn detect(&self, snapshot: &Self::Snapshot, state: &mut Self::State) -> Vec<Self::Event>;

    /// Render one event as a chat message. Pure.
    fn format(&self, event: &Self::Event) -> String;
}

/// What a single run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobOutcome {
    /// State file was absent; events were seeded, not posted.
    pub first_run: bool,
    pub detected: usize,
    pub posted: usize,
    pub failed: usize,
}

/// Run one job end to end against an already-fetched snapshot.
///
/// Publish failures are logged per message and never abort the run; the
/// updated state is persisted regardless, so a failed post is not retried
/// on the next run.
pub async fn run_job<J: AlertJob>(
    job: &J,
    snapshot: &J::Snapshot,
    store: &StateStore,
    publisher: Option<&ChatClient>,
) -> Result<JobOutcome, Error> {
    let prior = store.load::<J::State>();
    let first_run = prior.is_none();
    if first_run {
        info!(
            "State file {} does not exist - this is the first run",
            store.path().display()
        );
    }
    let mut state = prior.unwrap_or_default();

    let events = job.detect(snapshot, &mut state);
    let detected = events.len();
    info!("Found {} new {} events", detected, job.name());

    let mut posted = 0usize;
    let mut failed = 0usize;

    if first_run {
        info!(
            "First run detected - initializing {} tracking without sending alerts",
            job.name()
        );
    } else {
        for event in &events {
            let message = job.format(event);
            info!("Posting {} alert:\n{}", job.name(), message);

            match publisher {
                Some(chat) => match chat.post(&message).await {
                    Ok(()) => {
                        info!("Posted successfully");
                        posted += 1;
                    }
                    Err(e) => {
                        error!("Failed to post: {}", e);
                        failed += 1;
                    }
                },
                None => {
                    warn!("Chat API not configured, skipping post");
                }
            }
        }
    }

    store.save(&state)?;
    info!("Saved {} tracking to {}", job.name(), store.path().display());

    Ok(JobOutcome {
        first_run,
        detected,
        posted,
        failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeSet;

    /// Minimal job: snapshot is a list of ids, state is the seen set.
    struct IdJob;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct SeenIds {
        seen: BTreeSet<String>,
    }

    impl AlertJob for IdJob {
        type Snapshot = Vec<String>;
        type State = SeenIds;
        type Event = String;

        fn name(&self) -> &'static str {
            "id"
        }

        fn detect(&self, snapshot: &Vec<String>, state: &mut SeenIds) -> Vec<String> {
            snapshot
                .iter()
                .filter(|id| state.seen.insert((*id).clone()))
                .cloned()
                .collect()
        }

        fn format(&self, event: &String) -> String {
            format!("new: {}", event)
        }
    }

    fn temp_store(name: &str) -> StateStore {
        let path = std::env::temp_dir().join(format!(
            "sleeper-alerts-pipeline-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        StateStore::new(path)
    }

    #[tokio::test]
    async fn first_run_seeds_silently_then_second_run_is_quiet() {
        let store = temp_store("first-run");
        let snapshot = vec!["a".to_string(), "b".to_string()];

        let outcome = run_job(&IdJob, &snapshot, &store, None).await.unwrap();
        assert!(outcome.first_run);
        assert_eq!(outcome.detected, 2);
        assert_eq!(outcome.posted, 0);
        assert!(store.path().exists(), "state file created after first run");

        // Identical snapshot: everything already seen.
        let outcome = run_job(&IdJob, &snapshot, &store, None).await.unwrap();
        assert!(!outcome.first_run);
        assert_eq!(outcome.detected, 0);

        // A new id shows up on a later run and is detected exactly once.
        let snapshot = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let outcome = run_job(&IdJob, &snapshot, &store, None).await.unwrap();
        assert_eq!(outcome.detected, 1);
        let outcome = run_job(&IdJob, &snapshot, &store, None).await.unwrap();
        assert_eq!(outcome.detected, 0);

        let _ = std::fs::remove_file(store.path());
    }

    #[tokio::test]
    async fn corrupt_state_file_alerts_instead_of_seeding() {
        let store = temp_store("corrupt");
        std::fs::write(store.path(), "{broken").unwrap();

        let snapshot = vec!["a".to_string()];
        let outcome = run_job(&IdJob, &snapshot, &store, None).await.unwrap();
        // Present-but-unparsable is not a first run.
        assert!(!outcome.first_run);
        assert_eq!(outcome.detected, 1);

        let _ = std::fs::remove_file(store.path());
    }
}
