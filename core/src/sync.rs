//! Remote high-score collaborator. The engines only ever fire and forget into it.

use crate::{LeaderboardEntry, SyncError};

pub trait RemoteSync {
    /// Persists `entry` remotely under `user_id`.
    fn push(&mut self, user_id: &str, entry: &LeaderboardEntry) -> Result<(), SyncError>;
}

impl<R: RemoteSync + ?Sized> RemoteSync for &mut R {
    fn push(&mut self, user_id: &str, entry: &LeaderboardEntry) -> Result<(), SyncError> {
        (**self).push(user_id, entry)
    }
}

/// Remote that accepts everything and keeps nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct OfflineSync;

impl RemoteSync for OfflineSync {
    fn push(&mut self, _user_id: &str, entry: &LeaderboardEntry) -> Result<(), SyncError> {
        log::debug!("Offline, not syncing score {} for {}", entry.score, entry.mode);
        Ok(())
    }
}

/// Hands `entry` to `remote`, logging failures instead of returning them. No retries.
///
/// Returns whether the remote accepted the entry.
pub fn publish<R: RemoteSync + ?Sized>(
    remote: &mut R,
    user_id: Option<&str>,
    entry: &LeaderboardEntry,
) -> bool {
    let result: Result<(), SyncError> = match user_id {
        Some(user_id) => remote.push(user_id, entry),
        None => Err(SyncError::Unauthenticated),
    };

    match result {
        Ok(()) => {
            log::debug!("Synced score {} for {}", entry.score, entry.mode);
            true
        }
        Err(err) => {
            log::warn!("Could not sync score {} for {}: {}", entry.score, entry.mode, err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    #[derive(Default)]
    struct Recorder {
        pushed: Vec<(String, u32)>,
        fail: bool,
    }

    impl RemoteSync for Recorder {
        fn push(&mut self, user_id: &str, entry: &LeaderboardEntry) -> Result<(), SyncError> {
            if self.fail {
                return Err(SyncError::Transport("offline".to_string()));
            }
            self.pushed.push((user_id.to_string(), entry.score));
            Ok(())
        }
    }

    fn entry() -> LeaderboardEntry {
        LeaderboardEntry {
            player_name: "ana".to_string(),
            score: 120,
            elapsed_secs: None,
            mode: "memory-easy".to_string(),
            timestamp: 1,
        }
    }

    #[test]
    fn publishes_under_user_id() {
        let mut remote = Recorder::default();
        assert!(publish(&mut remote, Some("u1"), &entry()));
        assert_eq!(remote.pushed, [("u1".to_string(), 120)]);
    }

    #[test]
    fn failures_are_swallowed() {
        let mut remote = Recorder {
            fail: true,
            ..Default::default()
        };
        assert!(!publish(&mut remote, Some("u1"), &entry()));
        assert!(!publish(&mut Recorder::default(), None, &entry()));
    }
}
