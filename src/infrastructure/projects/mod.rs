pub mod file;

use std::path;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::DrawingsData;
use crate::domain::models::ProjectInfo;
use crate::domain::models::ProjectSettings;
use crate::domain::models::ProjectTemplate;
use crate::domain::models::SceneData;

/// Everything a project open hands back in one call.
pub struct ProjectBundle {
    pub info: ProjectInfo,
    pub settings: ProjectSettings,
    pub scene: SceneData,
    pub drawings: Option<DrawingsData>,
}

#[async_trait]
pub trait ProjectService {
    async fn create_project(
        &self,
        name: &str,
        path: &path::Path,
        template: ProjectTemplate,
    ) -> Result<ProjectInfo>;

    async fn open_project(&self, path: &path::Path) -> Result<ProjectBundle>;

    async fn save_project(
        &self,
        path: &path::Path,
        scene: &SceneData,
        drawings: &DrawingsData,
    ) -> Result<ProjectInfo>;

    async fn save_project_as(
        &self,
        old_path: &path::Path,
        new_path: &path::Path,
        new_name: &str,
        scene: &SceneData,
        drawings: &DrawingsData,
    ) -> Result<ProjectInfo>;

    async fn update_settings(&self, path: &path::Path, settings: &ProjectSettings) -> Result<()>;
}

pub type ProjectServiceBox = Box<dyn ProjectService + Send + Sync>;

/// Grabs a viewport snapshot once rendering settles. Invoked fire-and-forget
/// after a successful save; the result comes back as an event.
#[async_trait]
pub trait ThumbnailCapture {
    async fn capture_delayed(&self) -> Result<Option<String>>;
}
