use std::cmp::Reverse;
use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use chrono::DateTime;
use chrono::Local;
use chrono::SecondsFormat;
use dashmap::DashMap;

use super::SessionPersistence;
use crate::domain::models::truncate_chars;
use crate::domain::models::Message;
use crate::domain::models::SessionMeta;
use crate::domain::models::PREVIEW_MAX_CHARS;

#[derive(Clone)]
struct MemoryRecord {
    meta: SessionMeta,
    messages: Vec<Message>,
}

/// In-memory session tier. Used for projects that have no directory yet and
/// as the persistence double in tests. Clones share the same records.
#[derive(Clone, Default)]
pub struct MemorySessionPersistence {
    records: Arc<DashMap<String, MemoryRecord>>,
}

impl MemorySessionPersistence {
    pub fn new() -> MemorySessionPersistence {
        return MemorySessionPersistence::default();
    }

    pub fn len(&self) -> usize {
        return self.records.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.records.is_empty();
    }
}

#[async_trait]
impl SessionPersistence for MemorySessionPersistence {
    async fn init(&self) -> Result<()> {
        return Ok(());
    }

    async fn list_sessions(&self) -> Result<Vec<SessionMeta>> {
        let mut sessions = self
            .records
            .iter()
            .map(|entry| return entry.value().meta.clone())
            .collect::<Vec<SessionMeta>>();

        sessions.sort_by_cached_key(|meta| {
            let touched = DateTime::parse_from_rfc3339(&meta.updated_at)
                .map(|ts| return ts.timestamp_millis())
                .unwrap_or(0);
            return Reverse(touched);
        });

        return Ok(sessions);
    }

    async fn load_session(&self, id: &str) -> Result<Vec<Message>> {
        if let Some(record) = self.records.get(id) {
            return Ok(record.messages.clone());
        }

        bail!(format!("No session found for id {id}"));
    }

    async fn save_session(
        &self,
        id: &str,
        messages: &[Message],
        model_id: &str,
        title: &str,
        created_at: &str,
    ) -> Result<()> {
        let preview = messages
            .last()
            .map(|msg| return truncate_chars(&msg.content, PREVIEW_MAX_CHARS))
            .unwrap_or_default();

        self.records.insert(
            id.to_string(),
            MemoryRecord {
                meta: SessionMeta {
                    id: id.to_string(),
                    title: title.to_string(),
                    preview,
                    created_at: created_at.to_string(),
                    updated_at: Local::now().to_rfc3339_opts(SecondsFormat::Millis, false),
                    message_count: messages.len(),
                    model_id: model_id.to_string(),
                },
                messages: messages.to_vec(),
            },
        );

        return Ok(());
    }

    async fn delete_session(&self, id: &str) -> Result<()> {
        self.records.remove(id);
        return Ok(());
    }
}
