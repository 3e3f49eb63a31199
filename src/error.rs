use thiserror::Error;

use crate::quiz::{SessionError, ValidationError};
use crate::storage::{DocumentError, StorageError};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("No quiz file with id {0}")]
    UnknownFile(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
