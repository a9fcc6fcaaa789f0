use std::path;

use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Lightweight usage record of a project ever opened, retained after close.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentProject {
    pub id: String,
    pub name: String,
    pub path: path::PathBuf,
    pub folder_id: Option<String>,
    pub thumbnail: Option<String>,
    pub last_opened: String,
    pub open_count: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FolderColor {
    #[default]
    Blue,
    Green,
    Orange,
    Purple,
    Red,
    Teal,
}

/// User-defined grouping label for recent projects. Not a filesystem
/// directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFolder {
    pub id: String,
    pub name: String,
    pub color: FolderColor,
    pub created_at: String,
    pub modified_at: String,
    pub sort_order: usize,
}
