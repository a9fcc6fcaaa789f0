#[cfg(test)]
#[path = "recent_projects_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use chrono::Local;
use chrono::SecondsFormat;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::FolderColor;
use crate::domain::models::ProjectFolder;
use crate::domain::models::RecentProject;

const SNAPSHOT_FILE: &str = "recent-projects.json";

#[derive(Serialize, Deserialize, Default)]
struct Snapshot {
    projects: Vec<RecentProject>,
    folders: Vec<ProjectFolder>,
}

/// Durable record of projects ever opened and the folders grouping them,
/// independent of what is currently open.
pub struct RecentProjectsStore {
    pub projects: Vec<RecentProject>,
    pub folders: Vec<ProjectFolder>,
    max_projects: usize,
    max_projects_per_folder: usize,
    snapshot_path: Option<path::PathBuf>,
}

impl Default for RecentProjectsStore {
    fn default() -> RecentProjectsStore {
        let mut data_dir = Config::get(ConfigKey::DataDir);
        if data_dir.is_empty() {
            data_dir = Config::default(ConfigKey::DataDir);
        }

        return RecentProjectsStore::new(
            Config::get_usize(ConfigKey::MaxRecentProjects),
            Config::get_usize(ConfigKey::MaxProjectsPerFolder),
        )
        .with_snapshot_path(path::PathBuf::from(data_dir).join(SNAPSHOT_FILE));
    }
}

impl RecentProjectsStore {
    pub fn new(max_projects: usize, max_projects_per_folder: usize) -> RecentProjectsStore {
        return RecentProjectsStore {
            projects: vec![],
            folders: vec![],
            max_projects,
            max_projects_per_folder,
            snapshot_path: None,
        };
    }

    pub fn with_snapshot_path(mut self, snapshot_path: path::PathBuf) -> RecentProjectsStore {
        self.snapshot_path = Some(snapshot_path);
        return self;
    }

    pub async fn load_snapshot(&mut self) -> Result<()> {
        let snapshot_path = match self.snapshot_path.as_ref() {
            Some(snapshot_path) => snapshot_path,
            None => return Ok(()),
        };
        if !snapshot_path.exists() {
            return Ok(());
        }

        let payload = fs::read_to_string(snapshot_path).await?;
        let snapshot: Snapshot = serde_json::from_str(&payload)?;
        self.projects = snapshot.projects;
        self.folders = snapshot.folders;

        return Ok(());
    }

    /// Best-effort write of the snapshot. The in-memory state stays
    /// authoritative when this fails.
    pub async fn persist_snapshot(&self) {
        if let Err(err) = self.try_persist_snapshot().await {
            tracing::warn!(err = ?err, "failed to persist recent projects snapshot");
        }
    }

    async fn try_persist_snapshot(&self) -> Result<()> {
        let snapshot_path = match self.snapshot_path.as_ref() {
            Some(snapshot_path) => snapshot_path,
            None => return Ok(()),
        };

        if let Some(parent) = snapshot_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        let payload = serde_json::to_string_pretty(&Snapshot {
            projects: self.projects.clone(),
            folders: self.folders.clone(),
        })?;

        let mut file = fs::File::create(snapshot_path).await?;
        file.write_all(payload.as_bytes()).await?;

        return Ok(());
    }

    /// Upsert by id: re-adding bumps the open count, refreshes the
    /// last-opened stamp, keeps the folder and thumbnail, and moves the
    /// entry to the head. The list is truncated to `max_projects`.
    pub fn add_project(&mut self, id: &str, name: &str, project_path: &path::Path) {
        let mut folder_id = None;
        let mut thumbnail = None;
        let mut open_count = 0;

        if let Some(pos) = self.projects.iter().position(|project| return project.id == id) {
            let existing = self.projects.remove(pos);
            folder_id = existing.folder_id;
            thumbnail = existing.thumbnail;
            open_count = existing.open_count;
        }

        self.projects.insert(
            0,
            RecentProject {
                id: id.to_string(),
                name: name.to_string(),
                path: project_path.to_path_buf(),
                folder_id,
                thumbnail,
                last_opened: Local::now().to_rfc3339_opts(SecondsFormat::Millis, false),
                open_count: open_count + 1,
            },
        );

        self.projects.truncate(self.max_projects);
    }

    pub fn update_project(&mut self, id: &str, update: impl FnOnce(&mut RecentProject)) -> bool {
        if let Some(project) = self.projects.iter_mut().find(|project| return project.id == id) {
            update(project);
            return true;
        }

        return false;
    }

    pub fn remove_project(&mut self, id: &str) -> bool {
        let before = self.projects.len();
        self.projects.retain(|project| return project.id != id);
        return self.projects.len() < before;
    }

    pub fn clear_all_projects(&mut self) {
        self.projects.clear();
    }

    pub fn set_thumbnail(&mut self, id: &str, thumbnail: &str) {
        self.update_project(id, |project| {
            project.thumbnail = Some(thumbnail.to_string());
        });
    }

    /// Sort orders are never reused after deletions, so gaps are expected.
    pub fn create_folder(&mut self, name: &str, color: FolderColor) -> String {
        let now = Local::now().to_rfc3339_opts(SecondsFormat::Millis, false);
        let sort_order = self
            .folders
            .iter()
            .map(|folder| return folder.sort_order + 1)
            .max()
            .unwrap_or(0);

        let folder = ProjectFolder {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            color,
            created_at: now.clone(),
            modified_at: now,
            sort_order,
        };

        let id = folder.id.clone();
        self.folders.push(folder);
        return id;
    }

    /// Removes the folder and unassigns its members. Projects are orphaned,
    /// never cascade-deleted.
    pub fn delete_folder(&mut self, id: &str) -> bool {
        let before = self.folders.len();
        self.folders.retain(|folder| return folder.id != id);
        if self.folders.len() == before {
            return false;
        }

        for project in &mut self.projects {
            if project.folder_id.as_deref() == Some(id) {
                project.folder_id = None;
            }
        }

        return true;
    }

    /// Assigning into a full folder fails without mutating anything;
    /// unassigning (`None`) always succeeds for a known project.
    pub fn assign_project_to_folder(&mut self, project_id: &str, folder_id: Option<&str>) -> bool {
        if let Some(folder_id) = folder_id {
            if !self.can_add_to_folder(folder_id) {
                return false;
            }
        }

        return self.update_project(project_id, |project| {
            project.folder_id = folder_id.map(|folder_id| return folder_id.to_string());
        });
    }

    pub fn can_add_to_folder(&self, folder_id: &str) -> bool {
        if !self.folders.iter().any(|folder| return folder.id == folder_id) {
            return false;
        }

        let members = self
            .projects
            .iter()
            .filter(|project| return project.folder_id.as_deref() == Some(folder_id))
            .count();

        return members < self.max_projects_per_folder;
    }
}
