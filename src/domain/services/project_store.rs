#[cfg(test)]
#[path = "project_store_test.rs"]
mod tests;

use std::path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use super::ChatStore;
use super::DrawingStore;
use super::RecentProjectsStore;
use super::SceneStore;
use crate::domain::models::Event;
use crate::domain::models::ProjectInfo;
use crate::domain::models::ProjectSettings;
use crate::domain::models::ProjectSettingsPatch;
use crate::domain::models::ProjectTemplate;
use crate::domain::models::StatusKind;
use crate::infrastructure::geometry::GeometryBox;
use crate::infrastructure::persistence::file::FileSessionPersistence;
use crate::infrastructure::persistence::PersistenceBox;
use crate::infrastructure::projects::ProjectServiceBox;
use crate::infrastructure::projects::ThumbnailCapture;

type PersistenceFactory = Box<dyn Fn(&path::Path) -> PersistenceBox + Send + Sync>;

/// The single authoritative handle on "what project, if any, is open", and
/// the only component allowed to mutate that identity. Owns the dependent
/// stores and notifies them of identity transitions through explicit calls.
pub struct ProjectStore {
    pub current_project: Option<ProjectInfo>,
    pub current_settings: ProjectSettings,
    pub is_loading: bool,
    pub error: Option<String>,
    pub chat: ChatStore,
    pub scene: SceneStore,
    pub drawings: DrawingStore,
    pub recents: RecentProjectsStore,
    service: ProjectServiceBox,
    geometry: GeometryBox,
    thumbnails: Option<Arc<dyn ThumbnailCapture + Send + Sync>>,
    persistence_factory: PersistenceFactory,
    events: mpsc::UnboundedSender<Event>,
}

impl ProjectStore {
    pub fn new(
        service: ProjectServiceBox,
        geometry: GeometryBox,
        events: mpsc::UnboundedSender<Event>,
    ) -> ProjectStore {
        return ProjectStore {
            current_project: None,
            current_settings: ProjectSettings::default(),
            is_loading: false,
            error: None,
            chat: ChatStore::new(),
            scene: SceneStore::default(),
            drawings: DrawingStore::default(),
            recents: RecentProjectsStore::default(),
            service,
            geometry,
            thumbnails: None,
            persistence_factory: Box::new(|project_path: &path::Path| {
                return Box::new(FileSessionPersistence::new(project_path));
            }),
            events,
        };
    }

    pub fn with_thumbnails(
        mut self,
        thumbnails: Arc<dyn ThumbnailCapture + Send + Sync>,
    ) -> ProjectStore {
        self.thumbnails = Some(thumbnails);
        return self;
    }

    pub fn with_recents(mut self, recents: RecentProjectsStore) -> ProjectStore {
        self.recents = recents;
        return self;
    }

    pub fn with_persistence_factory(mut self, factory: PersistenceFactory) -> ProjectStore {
        self.persistence_factory = factory;
        return self;
    }

    /// Creates a project through the external service, then loads it like
    /// any other open. A create failure leaves all prior state untouched.
    pub async fn create_new_project(
        &mut self,
        name: &str,
        target: &path::Path,
        template: ProjectTemplate,
    ) -> Result<ProjectInfo> {
        self.is_loading = true;
        self.error = None;

        let res = match self.service.create_project(name, target, template).await {
            Ok(_) => self.hydrate_project(target).await,
            Err(err) => Err(err),
        };
        self.is_loading = false;

        match res {
            Ok(info) => {
                let _ = self.events.send(Event::ProjectOpened(info.clone()));
                return Ok(info);
            }
            Err(err) => {
                tracing::error!(err = ?err, name, "failed to create project");
                self.error = Some(err.to_string());
                return Err(err);
            }
        }
    }

    pub async fn open_existing_project(&mut self, target: &path::Path) -> Result<ProjectInfo> {
        self.is_loading = true;
        self.error = None;

        let res = self.hydrate_project(target).await;
        self.is_loading = false;

        match res {
            Ok(info) => {
                let _ = self.events.send(Event::ProjectOpened(info.clone()));
                return Ok(info);
            }
            Err(err) => {
                tracing::error!(err = ?err, path = %target.display(), "failed to open project");
                self.error = Some(err.to_string());
                return Err(err);
            }
        }
    }

    async fn hydrate_project(&mut self, target: &path::Path) -> Result<ProjectInfo> {
        let bundle = self.service.open_project(target).await?;

        self.scene.reset();
        self.drawings.reset();
        self.scene.load_scene(bundle.scene);

        // Kernel shapes do not survive restarts; rebuild them all.
        for object in self.scene.objects().to_vec() {
            let backend_shape_id = self.geometry.recreate_shape(&object).await?;
            self.scene.set_backend_shape_id(&object.id, &backend_shape_id);
        }

        if let Some(drawings) = bundle.drawings {
            self.drawings.load_drawings(drawings);
            self.drawings.migrate_legacy_refs(&self.scene);
            for drawing_id in self.drawings.drawing_ids() {
                self.drawings.regenerate_all_views(&drawing_id);
            }
        }

        self.current_settings = bundle.settings;
        self.current_project = Some(bundle.info.clone());

        self.register_recent(&bundle.info).await;
        self.notify_chat(&bundle.info).await;

        return Ok(bundle.info);
    }

    /// No-op without an open project. A transient status event reports the
    /// outcome either way; errors also propagate so dialogs can react.
    pub async fn save_current_project(&mut self) -> Result<()> {
        let info = match self.current_project.clone() {
            Some(info) => info,
            None => return Ok(()),
        };

        let scene_data = self.scene.scene_data();
        let drawings_data = self.drawings.drawings_data();

        match self.service.save_project(&info.path, &scene_data, &drawings_data).await {
            Ok(updated) => {
                self.scene.mark_clean();
                self.current_project = Some(updated.clone());
                self.capture_thumbnail(&updated.id);
                let _ = self
                    .events
                    .send(Event::Status("project-saved".to_string(), StatusKind::Success));
                return Ok(());
            }
            Err(err) => {
                tracing::error!(err = ?err, project_id = info.id.as_str(), "failed to save project");
                let _ = self.events.send(Event::Status(
                    "project-save-failed".to_string(),
                    StatusKind::Error,
                ));
                self.error = Some(err.to_string());
                return Err(err);
            }
        }
    }

    pub async fn save_current_project_as(
        &mut self,
        new_path: &path::Path,
        new_name: &str,
    ) -> Result<()> {
        let info = match self.current_project.clone() {
            Some(info) => info,
            None => return Ok(()),
        };

        let scene_data = self.scene.scene_data();
        let drawings_data = self.drawings.drawings_data();

        let saved = self
            .service
            .save_project_as(&info.path, new_path, new_name, &scene_data, &drawings_data)
            .await;

        match saved {
            Ok(updated) => {
                self.scene.mark_clean();
                self.current_project = Some(updated.clone());
                self.register_recent(&updated).await;
                self.notify_chat(&updated).await;
                self.capture_thumbnail(&updated.id);
                let _ = self
                    .events
                    .send(Event::Status("project-saved".to_string(), StatusKind::Success));
                return Ok(());
            }
            Err(err) => {
                tracing::error!(err = ?err, project_id = info.id.as_str(), "failed to save project copy");
                let _ = self.events.send(Event::Status(
                    "project-save-failed".to_string(),
                    StatusKind::Error,
                ));
                self.error = Some(err.to_string());
                return Err(err);
            }
        }
    }

    /// Tears down all project-scoped state and resets the settings to their
    /// hardcoded defaults. The chat store flushes its outgoing session as
    /// part of the transition.
    pub async fn close_project(&mut self) {
        if self.current_project.is_none() {
            return;
        }

        self.scene.reset();
        self.drawings.reset();
        self.chat.on_project_changed(None, None).await;
        self.current_project = None;
        self.current_settings = ProjectSettings::default();
        self.error = None;
        let _ = self.events.send(Event::ProjectClosed());
    }

    /// Optimistic merge followed by a best-effort persist. Persistence
    /// failure is logged, never surfaced, and never rolled back.
    pub async fn update_settings(&mut self, patch: ProjectSettingsPatch) {
        self.current_settings.merge(patch);

        if let Some(info) = self.current_project.as_ref() {
            if let Err(err) = self
                .service
                .update_settings(&info.path, &self.current_settings)
                .await
            {
                tracing::warn!(err = ?err, project_id = info.id.as_str(), "failed to persist project settings");
            }
        }
    }

    /// Applies store-owned reactions to events coming back off the channel,
    /// currently just thumbnail delivery into the recents record.
    pub async fn handle_event(&mut self, event: &Event) {
        if let Event::ThumbnailCaptured(project_id, thumbnail) = event {
            self.recents.set_thumbnail(project_id, thumbnail);
            self.recents.persist_snapshot().await;
        }
    }

    async fn register_recent(&mut self, info: &ProjectInfo) {
        self.recents.add_project(&info.id, &info.name, &info.path);
        self.recents.persist_snapshot().await;
    }

    async fn notify_chat(&mut self, info: &ProjectInfo) {
        let persistence = (self.persistence_factory)(&info.path);
        self.chat.on_project_changed(Some(info), Some(persistence)).await;
    }

    fn capture_thumbnail(&self, project_id: &str) {
        let thumbnails = match self.thumbnails.clone() {
            Some(thumbnails) => thumbnails,
            None => return,
        };

        let events = self.events.clone();
        let project_id = project_id.to_string();
        tokio::spawn(async move {
            match thumbnails.capture_delayed().await {
                Ok(Some(thumbnail)) => {
                    let _ = events.send(Event::ThumbnailCaptured(project_id, thumbnail));
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::debug!(err = ?err, "viewport thumbnail capture failed");
                }
            }
        });
    }
}
