//! Picking up a quiz that the file library left in the store.
//!
//! A handoff is consumed at most once: the stored key is removed after it
//! is used, and also after it turns out to be unusable.

use log::{info, warn};
use serde_json::Value;

use super::session::Session;
use super::timer::Scheduler;
use super::validate::validate_lenient;
use super::{Question, ValidationError};
use crate::error::Result;
use crate::storage::KeyValueStore;

pub const HANDOFF_KEY: &str = "selected_quiz_file";

/// Stored form of a handed-off quiz file.
///
/// Only `data` is required; the questions inside are checked separately.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A handoff that was accepted and started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    pub id: String,
    pub name: String,
    /// The questions the session was started with, in document order.
    pub questions: Vec<Question>,
    pub dropped: usize,
}

/// Starts `session` with the quiz waiting under [`HANDOFF_KEY`], if any.
///
/// Storage trouble is logged and treated as "no handoff". A payload that
/// cannot be used is deleted and reported, leaving the session as it was.
pub async fn consume_handoff<K, S>(store: &K, session: &mut Session<S>) -> Result<Option<Handoff>>
where
    K: KeyValueStore,
    S: Scheduler,
{
    let raw = match store.get(HANDOFF_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Ok(None),
        Err(e) => {
            warn!("Could not read quiz handoff: {}", e);
            return Ok(None);
        }
    };

    let (record, data) = match decode(&raw) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!("Discarding unusable quiz handoff: {}", e);
            discard(store).await;
            return Err(e.into());
        }
    };

    let screened = match validate_lenient(&data) {
        Ok(screened) => screened,
        Err(e) => {
            warn!("Discarding quiz handoff {:?}: {}", record.name, e);
            discard(store).await;
            return Err(e.into());
        }
    };

    session.start(&screened.questions)?;
    discard(store).await;

    if screened.dropped > 0 {
        warn!(
            "Quiz {:?} started without {} malformed questions",
            record.name, screened.dropped
        );
    }
    info!(
        "Picked up quiz {:?} with {} questions",
        record.name,
        screened.questions.len()
    );

    Ok(Some(Handoff {
        id: record.id,
        name: record.name,
        questions: screened.questions,
        dropped: screened.dropped,
    }))
}

fn decode(raw: &str) -> Result<(HandoffRecord, Value), ValidationError> {
    let mut record: HandoffRecord = serde_json::from_str(raw)?;
    let data = record.data.take().ok_or(ValidationError::MissingData)?;
    Ok((record, data))
}

async fn discard<K: KeyValueStore>(store: &K) {
    if let Err(e) = store.delete(HANDOFF_KEY).await {
        warn!("Could not remove quiz handoff: {}", e);
    }
}
