use cufi_core::usecases::{Error as UsecaseError, ErrorKind};
use thiserror::Error;

use cufi_core::repositories;

impl From<repositories::Error> for AppError {
    fn from(err: repositories::Error) -> AppError {
        AppError::Usecase(err.into())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Usecase(#[from] UsecaseError),
    #[error("Failed to fetch events: {0}")]
    Feed(#[source] anyhow::Error),
    #[error("Malformed feed: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Usecase(err) => err.kind(),
            Self::Decode(_) => ErrorKind::Invalid,
            Self::Feed(_) | Self::Other(_) => ErrorKind::Internal,
        }
    }
}
