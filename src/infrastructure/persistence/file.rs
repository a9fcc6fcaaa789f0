#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::cmp::Reverse;
use std::path;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use chrono::DateTime;
use chrono::Local;
use chrono::SecondsFormat;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::SessionPersistence;
use crate::domain::models::truncate_chars;
use crate::domain::models::Message;
use crate::domain::models::SessionMeta;
use crate::domain::models::PREVIEW_MAX_CHARS;

#[derive(Serialize, Deserialize)]
struct SessionRecord {
    meta: SessionMeta,
    messages: Vec<Message>,
}

/// One YAML file per session under the project directory.
pub struct FileSessionPersistence {
    pub sessions_dir: path::PathBuf,
}

impl FileSessionPersistence {
    pub fn new(project_path: &path::Path) -> FileSessionPersistence {
        return FileSessionPersistence {
            sessions_dir: project_path.join(".penstock").join("sessions"),
        };
    }

    fn get_file_path(&self, id: &str) -> path::PathBuf {
        return self.sessions_dir.join(format!("{id}.yaml"));
    }
}

#[async_trait]
impl SessionPersistence for FileSessionPersistence {
    async fn init(&self) -> Result<()> {
        if !self.sessions_dir.exists() {
            fs::create_dir_all(&self.sessions_dir).await?;
        }

        return Ok(());
    }

    async fn list_sessions(&self) -> Result<Vec<SessionMeta>> {
        let mut sessions: Vec<SessionMeta> = vec![];
        if !self.sessions_dir.exists() {
            return Ok(sessions);
        }

        let mut dir = fs::read_dir(&self.sessions_dir).await?;
        while let Some(file) = dir.next_entry().await? {
            let payload = fs::read_to_string(file.path()).await?;
            let record: SessionRecord = serde_yaml::from_str(&payload)?;
            sessions.push(record.meta);
        }

        sessions.sort_by_cached_key(|meta| {
            let touched = DateTime::parse_from_rfc3339(&meta.updated_at)
                .map(|ts| return ts.timestamp_millis())
                .unwrap_or(0);
            return Reverse(touched);
        });

        return Ok(sessions);
    }

    async fn load_session(&self, id: &str) -> Result<Vec<Message>> {
        let file_path = self.get_file_path(id);
        if !file_path.exists() {
            bail!(format!("No session found for id {id}"));
        }

        let payload = fs::read_to_string(file_path).await?;
        let record: SessionRecord = serde_yaml::from_str(&payload)?;

        return Ok(record.messages);
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

        let record = SessionRecord {
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
        };

        let payload = serde_yaml::to_string(&record)?;

        if !self.sessions_dir.exists() {
            fs::create_dir_all(&self.sessions_dir).await?;
        }

        let mut file = fs::File::create(self.get_file_path(id)).await?;
        file.write_all(payload.as_bytes()).await?;

        return Ok(());
    }

    async fn delete_session(&self, id: &str) -> Result<()> {
        let file_path = self.get_file_path(id);
        if !file_path.exists() {
            return Ok(());
        }

        fs::remove_file(file_path).await?;
        return Ok(());
    }
}
