#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use chrono::Local;
use chrono::SecondsFormat;
use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use uuid::Uuid;

use super::Message;
use super::Role;

pub const TITLE_MAX_CHARS: usize = 50;
pub const PREVIEW_MAX_CHARS: usize = 100;

/// Client-side id: millisecond timestamp plus a shortened random suffix.
/// Not a strict UUID, collisions are possible but negligible.
pub fn create_id() -> String {
    let suffix = Uuid::new_v4()
        .to_string()
        .split('-')
        .enumerate()
        .filter_map(|(idx, part)| {
            if idx > 0 {
                return None;
            }
            return Some(part.to_string());
        })
        .collect::<Vec<String>>()
        .join("");

    return format!("{}-{suffix}", Utc::now().timestamp_millis());
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    return text.chars().take(max_chars).collect::<String>();
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionMeta {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub created_at: String,
    pub updated_at: String,
    pub message_count: usize,
    pub model_id: String,
}

impl SessionMeta {
    pub fn new(model_id: &str) -> SessionMeta {
        let now = Local::now().to_rfc3339_opts(SecondsFormat::Millis, false);

        return SessionMeta {
            id: create_id(),
            title: "New chat".to_string(),
            preview: "".to_string(),
            created_at: now.clone(),
            updated_at: now,
            message_count: 0,
            model_id: model_id.to_string(),
        };
    }

    /// Re-derives metadata from the latest message array. The title is
    /// assigned once, from the first user message while the session was
    /// still empty, and sticks afterwards.
    pub fn apply_messages(&mut self, messages: &[Message]) {
        if self.message_count == 0 {
            if let Some(first_user) = messages.iter().find(|msg| return msg.role == Role::User) {
                self.title = truncate_chars(&first_user.content, TITLE_MAX_CHARS);
            }
        }

        if let Some(last) = messages.last() {
            self.preview = truncate_chars(&last.content, PREVIEW_MAX_CHARS);
        } else {
            self.preview = "".to_string();
        }

        self.message_count = messages.len();
        self.updated_at = Local::now().to_rfc3339_opts(SecondsFormat::Millis, false);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub reasoning_tokens: u64,
    pub cached_input_tokens: u64,
}

impl SessionUsage {
    pub fn accumulate(&mut self, delta: SessionUsage) {
        self.input_tokens += delta.input_tokens;
        self.output_tokens += delta.output_tokens;
        self.total_tokens += delta.total_tokens;
        self.reasoning_tokens += delta.reasoning_tokens;
        self.cached_input_tokens += delta.cached_input_tokens;
    }

    pub fn reset(&mut self) {
        *self = SessionUsage::default();
    }
}
