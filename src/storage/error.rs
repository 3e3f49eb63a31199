use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error("Store file {0} is corrupted: {1}")]
    Corrupted(PathBuf, serde_json::Error),

    #[error("Stored value {0:?} is corrupted: {1}")]
    Decode(String, serde_json::Error),

    #[error("Could not encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error("Invalid Path: {0}")]
    InvalidPath(PathBuf),
}
