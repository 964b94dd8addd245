use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board must have at least one row and one column")]
    InvalidSize,
    #[error("Too many bombs for the board size")]
    TooManyBombs,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Current level has not been completed")]
    LevelNotCompleted,
    #[error("Already at the final level")]
    NoNextLevel,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = core::result::Result<T, GameError>;
