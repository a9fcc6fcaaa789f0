#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::ProjectBundle;
use super::ProjectService;
use crate::domain::models::create_id;
use crate::domain::models::DrawingsData;
use crate::domain::models::ProjectInfo;
use crate::domain::models::ProjectSettings;
use crate::domain::models::ProjectTemplate;
use crate::domain::models::SceneData;
use crate::domain::models::SceneObject;
use crate::domain::models::ShapeKind;

const MANIFEST_FILE: &str = "project.yaml";
const SCENE_FILE: &str = "scene.yaml";
const DRAWINGS_FILE: &str = "drawings.yaml";

#[derive(Serialize, Deserialize)]
struct ProjectManifest {
    info: ProjectInfo,
    settings: ProjectSettings,
}

fn starter_objects(template: ProjectTemplate) -> Vec<SceneObject> {
    let kinds: Vec<(&str, ShapeKind)> = match template {
        ProjectTemplate::Empty => vec![],
        ProjectTemplate::Channel => vec![("Channel", ShapeKind::Channel)],
        ProjectTemplate::Transition => vec![
            ("Inlet channel", ShapeKind::Channel),
            ("Transition", ShapeKind::Transition),
        ],
        ProjectTemplate::Chute => vec![
            ("Chute", ShapeKind::Chute),
            ("Stilling basin", ShapeKind::StillingBasin),
        ],
    };

    return kinds
        .into_iter()
        .map(|(name, kind)| {
            return SceneObject {
                id: create_id(),
                name: name.to_string(),
                kind,
                backend_shape_id: None,
            };
        })
        .collect::<Vec<SceneObject>>();
}

async fn write_file(file_path: &path::Path, payload: &str) -> Result<()> {
    let mut file = fs::File::create(file_path).await?;
    file.write_all(payload.as_bytes()).await?;
    return Ok(());
}

/// Stores each project as a directory holding a manifest, the scene, and
/// the drawings as separate YAML documents.
#[derive(Default)]
pub struct FileProjectService {}

impl FileProjectService {
    async fn read_manifest(project_path: &path::Path) -> Result<ProjectManifest> {
        let manifest_path = project_path.join(MANIFEST_FILE);
        if !manifest_path.exists() {
            bail!(format!("No project found at {}", project_path.display()));
        }

        let payload = fs::read_to_string(manifest_path).await?;
        let mut manifest: ProjectManifest = serde_yaml::from_str(&payload)?;

        // The directory may have been moved since the last save.
        manifest.info.path = project_path.to_path_buf();

        return Ok(manifest);
    }

    async fn write_manifest(project_path: &path::Path, manifest: &ProjectManifest) -> Result<()> {
        let payload = serde_yaml::to_string(manifest)?;
        return write_file(&project_path.join(MANIFEST_FILE), &payload).await;
    }

    async fn write_scene(project_path: &path::Path, scene: &SceneData) -> Result<()> {
        let payload = serde_yaml::to_string(scene)?;
        return write_file(&project_path.join(SCENE_FILE), &payload).await;
    }

    async fn write_drawings(project_path: &path::Path, drawings: &DrawingsData) -> Result<()> {
        let payload = serde_yaml::to_string(drawings)?;
        return write_file(&project_path.join(DRAWINGS_FILE), &payload).await;
    }
}

#[async_trait]
impl ProjectService for FileProjectService {
    async fn create_project(
        &self,
        name: &str,
        path: &path::Path,
        template: ProjectTemplate,
    ) -> Result<ProjectInfo> {
        if path.join(MANIFEST_FILE).exists() {
            bail!(format!("A project already exists at {}", path.display()));
        }

        fs::create_dir_all(path).await?;

        let manifest = ProjectManifest {
            info: ProjectInfo {
                id: create_id(),
                name: name.to_string(),
                path: path.to_path_buf(),
            },
            settings: ProjectSettings::default(),
        };

        FileProjectService::write_manifest(path, &manifest).await?;
        FileProjectService::write_scene(
            path,
            &SceneData {
                objects: starter_objects(template),
            },
        )
        .await?;
        FileProjectService::write_drawings(path, &DrawingsData::default()).await?;

        return Ok(manifest.info);
    }

    async fn open_project(&self, path: &path::Path) -> Result<ProjectBundle> {
        let manifest = FileProjectService::read_manifest(path).await?;

        let scene_path = path.join(SCENE_FILE);
        let scene = if scene_path.exists() {
            let payload = fs::read_to_string(scene_path).await?;
            serde_yaml::from_str::<SceneData>(&payload)?
        } else {
            SceneData::default()
        };

        let drawings_path = path.join(DRAWINGS_FILE);
        let drawings = if drawings_path.exists() {
            let payload = fs::read_to_string(drawings_path).await?;
            Some(serde_yaml::from_str::<DrawingsData>(&payload)?)
        } else {
            None
        };

        return Ok(ProjectBundle {
            info: manifest.info,
            settings: manifest.settings,
            scene,
            drawings,
        });
    }

    async fn save_project(
        &self,
        path: &path::Path,
        scene: &SceneData,
        drawings: &DrawingsData,
    ) -> Result<ProjectInfo> {
        let manifest = FileProjectService::read_manifest(path).await?;

        FileProjectService::write_scene(path, scene).await?;
        FileProjectService::write_drawings(path, drawings).await?;

        return Ok(manifest.info);
    }

    async fn save_project_as(
        &self,
        old_path: &path::Path,
        new_path: &path::Path,
        new_name: &str,
        scene: &SceneData,
        drawings: &DrawingsData,
    ) -> Result<ProjectInfo> {
        let old_manifest = FileProjectService::read_manifest(old_path).await?;

        fs::create_dir_all(new_path).await?;

        let manifest = ProjectManifest {
            info: ProjectInfo {
                id: create_id(),
                name: new_name.to_string(),
                path: new_path.to_path_buf(),
            },
            settings: old_manifest.settings,
        };

        FileProjectService::write_manifest(new_path, &manifest).await?;
        FileProjectService::write_scene(new_path, scene).await?;
        FileProjectService::write_drawings(new_path, drawings).await?;

        return Ok(manifest.info);
    }

    async fn update_settings(&self, path: &path::Path, settings: &ProjectSettings) -> Result<()> {
        let mut manifest = FileProjectService::read_manifest(path).await?;
        manifest.settings = settings.clone();
        return FileProjectService::write_manifest(path, &manifest).await;
    }
}
