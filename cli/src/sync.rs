//! Remote score sync through an append-only outbox file, one JSON record per line.

use chromatch_core::{LeaderboardEntry, RemoteSync, SyncError};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

#[derive(Serialize)]
struct OutboxRecord<'a> {
    user_id: &'a str,
    entry: &'a LeaderboardEntry,
}

#[derive(Clone, Debug)]
pub(crate) struct OutboxSync {
    path: PathBuf,
}

impl OutboxSync {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RemoteSync for OutboxSync {
    fn push(&mut self, user_id: &str, entry: &LeaderboardEntry) -> Result<(), SyncError> {
        let record = OutboxRecord { user_id, entry };
        let mut line =
            serde_json::to_string(&record).map_err(|err| SyncError::Transport(err.to_string()))?;
        line.push('\n');

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()))
            .map_err(|err| SyncError::Transport(err.to_string()))?;

        log::debug!("Queued score {} of {} for sync", entry.score, user_id);
        Ok(())
    }
}
