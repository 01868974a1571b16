use crate::shared::prelude::{CaptureError, ConfigError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error("IoError {0:?}")]
    IoError(#[from] std::io::Error),
}
