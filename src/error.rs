//! Error types for the pong-dqn crate.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The replay buffer holds fewer transitions than the requested batch.
    /// Expected during early training; `train_step` treats it as a no-op.
    #[error("insufficient replay data: requested {requested}, stored {stored}")]
    InsufficientData { requested: usize, stored: usize },

    /// A model checkpoint path did not exist. Fatal to the run.
    #[error("model not found: {}", path.display())]
    ModelNotFound { path: PathBuf },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Candle(#[from] candle_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
