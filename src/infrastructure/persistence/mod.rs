pub mod file;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::Message;
use crate::domain::models::SessionMeta;

/// Per-project store for chat sessions. The chat store treats this as the
/// authoritative tier and degrades to its in-memory cache when no handle is
/// attached.
#[async_trait]
pub trait SessionPersistence {
    async fn init(&self) -> Result<()>;

    /// Session metadata only, most recently touched first.
    async fn list_sessions(&self) -> Result<Vec<SessionMeta>>;

    async fn load_session(&self, id: &str) -> Result<Vec<Message>>;

    async fn save_session(
        &self,
        id: &str,
        messages: &[Message],
        model_id: &str,
        title: &str,
        created_at: &str,
    ) -> Result<()>;

    async fn delete_session(&self, id: &str) -> Result<()>;
}

pub type PersistenceBox = Box<dyn SessionPersistence + Send + Sync>;
