//! Stored quiz files and the hand-off into the quiz engine.

use chrono::{DateTime, Utc};
use log::info;

use crate::error::{Error, Result};
use crate::quiz::handoff::HANDOFF_KEY;
use crate::quiz::validate::parse_document;
use crate::quiz::Question;
use crate::storage::{DocumentSource, KeyValueStore, StorageError};

pub const FILES_KEY: &str = "quiz_files";

const UNTITLED: &str = "Untitled Quiz";

/// A quiz document kept in the store.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizFile {
    pub id: String,
    pub name: String,
    pub data: Vec<Question>,
    pub created_at: DateTime<Utc>,
    /// Folder the file was filed under, if any. Only read by [`files_in_folder`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

/// A document read straight from the source, not stored.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedQuiz {
    pub name: String,
    pub questions: Vec<Question>,
}

/// Picks and reads a document, accepting it only if every question is valid.
///
/// Returns `None` when the pick was cancelled.
pub async fn open_document<D: DocumentSource>(source: &D) -> Result<Option<LoadedQuiz>> {
    let Some(picked) = source.pick_document().await? else {
        return Ok(None);
    };
    let text = source.read_text(&picked.uri).await?;
    let questions = parse_document(&text)?;

    Ok(Some(LoadedQuiz {
        name: picked.name.unwrap_or_else(|| UNTITLED.to_owned()),
        questions,
    }))
}

/// Reads a document and adds it to the stored files.
pub async fn import_document<D, K>(source: &D, store: &K) -> Result<Option<QuizFile>>
where
    D: DocumentSource,
    K: KeyValueStore,
{
    let Some(loaded) = open_document(source).await? else {
        return Ok(None);
    };

    let mut files = list_files(store).await?;
    let created_at = Utc::now();
    let file = QuizFile {
        id: unique_id(&files, &created_at),
        name: loaded.name,
        data: loaded.questions,
        created_at,
        folder_id: None,
    };
    files.push(file.clone());
    save_files(store, &files).await?;

    info!(
        "Imported {:?} with {} questions",
        file.name,
        file.data.len()
    );
    Ok(Some(file))
}

pub async fn list_files<K: KeyValueStore>(store: &K) -> Result<Vec<QuizFile>> {
    let Some(raw) = store.get(FILES_KEY).await? else {
        return Ok(Vec::new());
    };
    let files: Vec<QuizFile> = serde_json::from_str(&raw)
        .map_err(|e| StorageError::Decode(FILES_KEY.to_owned(), e))?;
    Ok(files)
}

/// Stored files filed under `folder_id`, or the unfiled ones for `None`.
pub async fn files_in_folder<K: KeyValueStore>(
    store: &K,
    folder_id: Option<&str>,
) -> Result<Vec<QuizFile>> {
    let mut files = list_files(store).await?;
    files.retain(|file| file.folder_id.as_deref() == folder_id);
    Ok(files)
}

/// Leaves the file with `id` for the quiz engine to pick up.
pub async fn select_for_quiz<K: KeyValueStore>(store: &K, id: &str) -> Result<QuizFile> {
    let file = list_files(store)
        .await?
        .into_iter()
        .find(|file| file.id == id)
        .ok_or_else(|| Error::UnknownFile(id.to_owned()))?;

    let raw = serde_json::to_string(&file).map_err(StorageError::from)?;
    store.set(HANDOFF_KEY, raw).await?;

    info!("Selected {:?} for the next quiz", file.name);
    Ok(file)
}

/// Removes the file with `id` from the store and returns it.
pub async fn delete_file<K: KeyValueStore>(store: &K, id: &str) -> Result<QuizFile> {
    let mut files = list_files(store).await?;
    let position = files
        .iter()
        .position(|file| file.id == id)
        .ok_or_else(|| Error::UnknownFile(id.to_owned()))?;
    let file = files.remove(position);
    save_files(store, &files).await?;

    info!("Deleted {:?}", file.name);
    Ok(file)
}

/// Millisecond timestamp id, with a counter suffix if an import in the
/// same millisecond already took it.
fn unique_id(files: &[QuizFile], created_at: &DateTime<Utc>) -> String {
    let base = created_at.timestamp_millis().to_string();
    let taken = |id: &str| files.iter().any(|file| file.id == id);
    if !taken(&base) {
        return base;
    }
    let mut n = 1;
    loop {
        let id = format!("{}-{}", base, n);
        if !taken(&id) {
            return id;
        }
        n += 1;
    }
}

async fn save_files<K: KeyValueStore>(store: &K, files: &[QuizFile]) -> Result<()> {
    let raw = serde_json::to_string(files).map_err(StorageError::from)?;
    store.set(FILES_KEY, raw).await?;
    Ok(())
}
