#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::Local;
use chrono::SecondsFormat;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::session::create_id;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub created_at: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Message {
        return Message {
            id: create_id(),
            role,
            content: content.to_string(),
            created_at: Local::now().to_rfc3339_opts(SecondsFormat::Millis, false),
        };
    }
}
