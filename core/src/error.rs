use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("No tile with that id in the current round")]
    UnknownTile,
    #[error("Game has not been started")]
    NotStarted,
    #[error("Input is not accepted in the current phase")]
    NotAccepting,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Move budget exhausted")]
    OutOfMoves,
    #[error("No finished game with a qualifying score to submit")]
    NothingToSubmit,
}

pub type Result<T> = core::result::Result<T, GameError>;

/// Failure of the key-value store backing records and settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage backend failed: {0}")]
    Backend(String),
    #[error("Could not encode value for key {key}: {reason}")]
    Encode { key: String, reason: String },
}

/// Failure reported by the remote high-score collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("No user identity available for remote sync")]
    Unauthenticated,
    #[error("Remote sync failed: {0}")]
    Transport(String),
}
