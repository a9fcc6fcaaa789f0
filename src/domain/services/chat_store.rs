#[cfg(test)]
#[path = "chat_store_test.rs"]
mod tests;

use std::collections::HashMap;
use std::path;

use anyhow::Result;

use crate::domain::models::Message;
use crate::domain::models::ProjectInfo;
use crate::domain::models::SessionMeta;
use crate::domain::models::SessionUsage;
use crate::infrastructure::persistence::PersistenceBox;

/// AI chat sessions and messages, scoped to whatever project is currently
/// open. Messages live in two tiers: the attached persistence handle is
/// authoritative while a project is open, and the in-memory cache carries
/// everything else, doubling as the store of record when no project (and
/// hence no persistence) exists.
pub struct ChatStore {
    pub sessions: Vec<SessionMeta>,
    pub current_session_id: Option<String>,
    pub current_messages: Vec<Message>,
    pub usage: SessionUsage,
    pub model_id: String,
    pub is_loading_sessions: bool,
    is_saving: bool,
    cache: HashMap<String, Vec<Message>>,
    persistence: Option<PersistenceBox>,
    last_known_project: Option<(String, path::PathBuf)>,
}

impl Default for ChatStore {
    fn default() -> ChatStore {
        return ChatStore::new();
    }
}

impl ChatStore {
    pub fn new() -> ChatStore {
        return ChatStore {
            sessions: vec![],
            current_session_id: None,
            current_messages: vec![],
            usage: SessionUsage::default(),
            model_id: "".to_string(),
            is_loading_sessions: false,
            is_saving: false,
            cache: HashMap::new(),
            persistence: None,
            last_known_project: None,
        };
    }

    pub fn has_persistence(&self) -> bool {
        return self.persistence.is_some();
    }

    /// Applies to new sessions and to the current one, so a mid-session
    /// model change reaches the persisted record on the next save.
    pub fn set_model_id(&mut self, model_id: &str) {
        self.model_id = model_id.to_string();

        if let Some(id) = self.current_session_id.clone() {
            if let Some(meta) = self.sessions.iter_mut().find(|session| return session.id == id) {
                meta.model_id = self.model_id.clone();
            }
        }
    }

    pub fn cached_messages(&self, id: &str) -> Option<&Vec<Message>> {
        return self.cache.get(id);
    }

    /// Explicit project-identity transition hook, called by the project
    /// store on every open/create/close. Repeat notifications for the same
    /// `(id, path)` pair are dropped. The outgoing session is flushed and
    /// saved before any state is torn down.
    pub async fn on_project_changed(
        &mut self,
        project: Option<&ProjectInfo>,
        persistence: Option<PersistenceBox>,
    ) {
        let next = project.map(|info| return (info.id.clone(), info.path.clone()));
        if next == self.last_known_project {
            return;
        }

        if self.last_known_project.is_some() && self.current_session_id.is_some() {
            self.flush_current_to_cache();
            self.save_current_session().await;
        }

        self.clear_sessions();
        self.persistence = None;
        self.last_known_project = next;

        if project.is_some() {
            self.persistence = persistence;
            self.load_sessions().await;
        }
    }

    /// Loads the session list from persistence, switching to the most
    /// recently touched session or creating one when the list is empty.
    /// Without persistence this only makes sure an in-memory session exists.
    /// Failures degrade to a fresh in-memory session.
    pub async fn load_sessions(&mut self) {
        if self.persistence.is_none() {
            if self.sessions.is_empty() {
                self.create_session().await;
            }
            return;
        }

        self.is_loading_sessions = true;
        if let Err(err) = self.load_sessions_from_persistence().await {
            tracing::warn!(err = ?err, "failed to load chat sessions, falling back to an in-memory session");
            self.create_session().await;
        }
        self.is_loading_sessions = false;
    }

    async fn load_sessions_from_persistence(&mut self) -> Result<()> {
        let listed = match self.persistence.as_ref() {
            Some(persistence) => {
                persistence.init().await?;
                persistence.list_sessions().await?
            }
            None => return Ok(()),
        };

        self.sessions = listed;
        if self.sessions.is_empty() {
            self.create_session().await;
            return Ok(());
        }

        let most_recent = self.sessions[0].id.clone();
        self.activate_session(&most_recent).await;
        return Ok(());
    }

    /// Inserts a fresh session at the head of the list and makes it
    /// current. The empty record is persisted best-effort when a project is
    /// open.
    pub async fn create_session(&mut self) -> String {
        let meta = SessionMeta::new(&self.model_id);
        let id = meta.id.clone();

        self.sessions.insert(0, meta);
        self.current_messages = vec![];
        self.cache.insert(id.clone(), vec![]);
        self.current_session_id = Some(id.clone());
        self.usage.reset();

        if let Some(persistence) = self.persistence.as_ref() {
            let meta = &self.sessions[0];
            if let Err(err) = persistence
                .save_session(&meta.id, &[], &meta.model_id, &meta.title, &meta.created_at)
                .await
            {
                tracing::warn!(err = ?err, session_id = id.as_str(), "failed to persist empty session");
            }
        }

        return id;
    }

    /// Flushes and saves the outgoing session before the incoming one is
    /// loaded. This ordering keeps in-flight edits from being lost.
    pub async fn switch_session(&mut self, id: &str) {
        if self.current_session_id.as_deref() == Some(id) {
            return;
        }
        if !self.sessions.iter().any(|session| return session.id == id) {
            tracing::warn!(session_id = id, "refusing to switch to unknown session");
            return;
        }

        self.flush_current_to_cache();
        self.save_current_session().await;
        self.usage.reset();
        self.activate_session(id).await;

        // Most recently switched-to sessions lead the list.
        if let Some(pos) = self.sessions.iter().position(|session| return session.id == id) {
            let meta = self.sessions.remove(pos);
            self.sessions.insert(0, meta);
        }
    }

    /// Deletes from persistence best-effort and from the cache
    /// unconditionally. Deleting the current session activates the next one
    /// or creates a fresh one.
    pub async fn delete_session(&mut self, id: &str) {
        if let Some(persistence) = self.persistence.as_ref() {
            if let Err(err) = persistence.delete_session(id).await {
                tracing::warn!(err = ?err, session_id = id, "failed to delete persisted session");
            }
        }

        self.cache.remove(id);
        self.sessions.retain(|session| return session.id != id);

        if self.current_session_id.as_deref() == Some(id) {
            self.current_session_id = None;
            self.current_messages = vec![];
            self.usage.reset();

            let next = self.sessions.first().map(|session| return session.id.clone());
            match next {
                Some(next_id) => self.activate_session(&next_id).await,
                None => {
                    self.create_session().await;
                }
            }
        }
    }

    /// Replaces the live message array, writes it through to the cache, and
    /// re-derives the current session's metadata.
    pub fn set_current_messages(&mut self, messages: Vec<Message>) {
        self.current_messages = messages;

        if let Some(id) = self.current_session_id.clone() {
            self.cache.insert(id.clone(), self.current_messages.clone());

            if let Some(meta) = self.sessions.iter_mut().find(|session| return session.id == id) {
                meta.apply_messages(&self.current_messages);
            }
        }
    }

    /// Functional-update form of `set_current_messages`.
    pub fn update_current_messages(&mut self, update: impl FnOnce(&[Message]) -> Vec<Message>) {
        let next = update(&self.current_messages);
        self.set_current_messages(next);
    }

    /// Persists the current session in full. Guarded by `is_saving`: a call
    /// arriving while a save is in flight is skipped, not queued. Failures
    /// are logged, never thrown; the in-memory copy stays authoritative
    /// until the next successful save.
    pub async fn save_current_session(&mut self) {
        if self.is_saving || self.persistence.is_none() {
            return;
        }

        let id = match self.current_session_id.clone() {
            Some(id) => id,
            None => return,
        };
        let meta = match self.sessions.iter().find(|session| return session.id == id) {
            Some(meta) => meta.clone(),
            None => return,
        };

        self.is_saving = true;
        if let Some(persistence) = self.persistence.as_ref() {
            if let Err(err) = persistence
                .save_session(
                    &id,
                    &self.current_messages,
                    &meta.model_id,
                    &meta.title,
                    &meta.created_at,
                )
                .await
            {
                tracing::warn!(err = ?err, session_id = id.as_str(), "failed to save chat session");
            }
        }
        self.is_saving = false;
    }

    pub fn add_usage(&mut self, delta: SessionUsage) {
        self.usage.accumulate(delta);
    }

    pub fn reset_session_usage(&mut self) {
        self.usage.reset();
    }

    /// Empties the cache and resets all session state. The persistence
    /// handle and project de-duplication marker are managed by
    /// `on_project_changed`, not here.
    pub fn clear_sessions(&mut self) {
        self.cache.clear();
        self.sessions = vec![];
        self.current_session_id = None;
        self.current_messages = vec![];
        self.usage.reset();
        self.is_loading_sessions = false;
        self.is_saving = false;
    }

    fn flush_current_to_cache(&mut self) {
        if let Some(id) = self.current_session_id.as_ref() {
            self.cache.insert(id.clone(), self.current_messages.clone());
        }
    }

    /// Loads a session's messages from persistence, falling back to the
    /// cached copy on failure or when no persistence exists.
    async fn activate_session(&mut self, id: &str) {
        let loaded = match self.persistence.as_ref() {
            Some(persistence) => match persistence.load_session(id).await {
                Ok(messages) => messages,
                Err(err) => {
                    tracing::warn!(err = ?err, session_id = id, "failed to load session messages, using cached copy");
                    self.cache.get(id).cloned().unwrap_or_default()
                }
            },
            None => self.cache.get(id).cloned().unwrap_or_default(),
        };

        self.cache.insert(id.to_string(), loaded.clone());
        self.current_messages = loaded;
        self.current_session_id = Some(id.to_string());
    }
}
