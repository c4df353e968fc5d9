use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RaceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid track: {0}")]
    InvalidTrack(String),

    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Unknown driver: {0}")]
    UnknownDriver(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),
}
