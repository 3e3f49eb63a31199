use std::path::{Path, PathBuf};

use super::DocumentError;

/// A document chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedDocument {
    pub uri: String,
    pub name: Option<String>,
}

#[allow(async_fn_in_trait)]
pub trait DocumentSource {
    /// `None` when the user cancelled the pick.
    async fn pick_document(&self) -> Result<Option<PickedDocument>, DocumentError>;

    async fn read_text(&self, uri: &str) -> Result<String, DocumentError>;
}

/// Picks a fixed path from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct PathSource {
    path: Option<PathBuf>,
}

impl PathSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A source that behaves like a cancelled picker.
    pub fn cancelled() -> Self {
        Self { path: None }
    }
}

impl DocumentSource for PathSource {
    async fn pick_document(&self) -> Result<Option<PickedDocument>, DocumentError> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        let uri = path
            .to_str()
            .ok_or_else(|| DocumentError::InvalidPath(path.clone()))?
            .to_owned();
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_owned);

        Ok(Some(PickedDocument { uri, name }))
    }

    async fn read_text(&self, uri: &str) -> Result<String, DocumentError> {
        Ok(tokio::fs::read_to_string(Path::new(uri)).await?)
    }
}
