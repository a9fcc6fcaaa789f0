use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use test_utils::scratch_dir;
use tokio::sync::mpsc;

use super::ProjectStore;
use super::RecentProjectsStore;
use crate::domain::models::Drawing;
use crate::domain::models::DrawingView;
use crate::domain::models::DrawingsData;
use crate::domain::models::Event;
use crate::domain::models::ProjectSettings;
use crate::domain::models::ProjectSettingsPatch;
use crate::domain::models::ProjectTemplate;
use crate::domain::models::ShapeRef;
use crate::domain::models::StatusKind;
use crate::infrastructure::geometry::NullGeometry;
use crate::infrastructure::projects::file::FileProjectService;
use crate::infrastructure::projects::ThumbnailCapture;

struct FixedThumbnail {}

#[async_trait]
impl ThumbnailCapture for FixedThumbnail {
    async fn capture_delayed(&self) -> Result<Option<String>> {
        return Ok(Some("png-bytes".to_string()));
    }
}

fn build_store() -> (ProjectStore, mpsc::UnboundedReceiver<Event>) {
    let (tx, rx) = mpsc::unbounded_channel::<Event>();
    let store = ProjectStore::new(
        Box::new(FileProjectService::default()),
        Box::new(NullGeometry::default()),
        tx,
    )
    .with_recents(RecentProjectsStore::new(20, 10));

    return (store, rx);
}

#[tokio::test]
async fn it_creates_a_project_and_scopes_chat_to_it() -> Result<()> {
    let (mut store, mut rx) = build_store();
    let target = scratch_dir("create").join("penstock-a");

    let info = store
        .create_new_project("Penstock A", &target, ProjectTemplate::Channel)
        .await?;

    assert_eq!(store.current_project.as_ref(), Some(&info));
    assert!(!store.is_loading);
    assert_eq!(store.error, None);

    // The chat store was pointed at the new project and opened a session.
    assert!(store.chat.has_persistence());
    assert_eq!(store.chat.sessions.len(), 1);

    assert_eq!(store.recents.projects.len(), 1);
    assert_eq!(store.recents.projects[0].id, info.id);

    assert_eq!(rx.try_recv().ok(), Some(Event::ProjectOpened(info)));

    return Ok(());
}

#[tokio::test]
async fn it_holds_a_single_project_identity_at_a_time() -> Result<()> {
    let (mut store, _rx) = build_store();
    let base = scratch_dir("singleton");

    store
        .create_new_project("First", &base.join("first"), ProjectTemplate::Empty)
        .await?;
    let second = store
        .create_new_project("Second", &base.join("second"), ProjectTemplate::Channel)
        .await?;

    assert_eq!(store.current_project.as_ref(), Some(&second));
    assert_eq!(store.scene.objects().len(), 1);
    assert_eq!(store.recents.projects.len(), 2);
    assert_eq!(store.recents.projects[0].id, second.id);

    return Ok(());
}

#[tokio::test]
async fn it_keeps_prior_state_when_a_create_fails() -> Result<()> {
    let (mut store, _rx) = build_store();
    let base = scratch_dir("create-fail");

    let first = store
        .create_new_project("First", &base.join("first"), ProjectTemplate::Empty)
        .await?;

    // Creating on top of an existing project refuses to overwrite it.
    let res = store
        .create_new_project("Clobber", &base.join("first"), ProjectTemplate::Empty)
        .await;

    assert!(res.is_err());
    assert!(store.error.is_some());
    assert!(!store.is_loading);
    assert_eq!(store.current_project.as_ref(), Some(&first));
    assert_eq!(store.recents.projects.len(), 1);

    return Ok(());
}

#[tokio::test]
async fn it_opens_a_project_and_rebuilds_kernel_shapes() -> Result<()> {
    let (mut store, _rx) = build_store();
    let target = scratch_dir("open").join("penstock-b");

    let created = store
        .create_new_project("Penstock B", &target, ProjectTemplate::Transition)
        .await?;
    store.close_project().await;

    let opened = store.open_existing_project(&target).await?;
    assert_eq!(opened.id, created.id);
    assert_eq!(store.scene.objects().len(), 2);
    for object in store.scene.objects() {
        assert_eq!(
            object.backend_shape_id,
            Some(format!("shape-{}", object.id))
        );
    }

    return Ok(());
}

#[tokio::test]
async fn it_fails_to_open_a_missing_project() {
    let (mut store, _rx) = build_store();
    let target = scratch_dir("open-missing").join("nothing-here");

    let res = store.open_existing_project(&target).await;
    assert!(res.is_err());
    assert!(store.error.is_some());
    assert_eq!(store.current_project, None);
}

#[tokio::test]
async fn it_resets_settings_and_chat_on_close() -> Result<()> {
    let (mut store, mut rx) = build_store();
    let target = scratch_dir("close").join("penstock-c");

    store
        .create_new_project("Penstock C", &target, ProjectTemplate::Empty)
        .await?;
    store
        .update_settings(ProjectSettingsPatch {
            theme: Some("light".to_string()),
            ..ProjectSettingsPatch::default()
        })
        .await;
    assert_eq!(store.current_settings.theme, "light");

    store.close_project().await;

    assert_eq!(store.current_project, None);
    assert_eq!(store.current_settings, ProjectSettings::default());
    assert!(store.chat.sessions.is_empty());
    assert!(!store.chat.has_persistence());

    // Opened, then closed.
    let _ = rx.try_recv();
    assert_eq!(rx.try_recv().ok(), Some(Event::ProjectClosed()));

    // Closing again is a no-op and emits nothing.
    store.close_project().await;
    assert!(rx.try_recv().is_err());

    return Ok(());
}

#[tokio::test]
async fn it_bumps_the_open_count_on_reopen() -> Result<()> {
    let (mut store, _rx) = build_store();
    let target = scratch_dir("reopen").join("penstock-d");

    store
        .create_new_project("Penstock D", &target, ProjectTemplate::Empty)
        .await?;
    store.close_project().await;
    store.open_existing_project(&target).await?;

    assert_eq!(store.recents.projects.len(), 1);
    assert_eq!(store.recents.projects[0].open_count, 2);

    return Ok(());
}

#[tokio::test]
async fn it_saves_the_scene_and_emits_a_status_event() -> Result<()> {
    let (mut store, mut rx) = build_store();
    let target = scratch_dir("save").join("penstock-e");

    store
        .create_new_project("Penstock E", &target, ProjectTemplate::Channel)
        .await?;
    let _ = rx.try_recv();

    store.scene.mark_dirty();
    store.save_current_project().await?;

    assert!(!store.scene.is_dirty());
    assert_eq!(
        rx.try_recv().ok(),
        Some(Event::Status("project-saved".to_string(), StatusKind::Success))
    );

    // The saved scene comes back on the next open.
    store.close_project().await;
    store.open_existing_project(&target).await?;
    assert_eq!(store.scene.objects().len(), 1);

    return Ok(());
}

#[tokio::test]
async fn it_ignores_saves_without_an_open_project() -> Result<()> {
    let (mut store, mut rx) = build_store();

    store.save_current_project().await?;
    store
        .save_current_project_as(&scratch_dir("noop").join("copy"), "Copy")
        .await?;

    assert!(rx.try_recv().is_err());
    return Ok(());
}

#[tokio::test]
async fn it_saves_a_copy_under_a_new_identity() -> Result<()> {
    let (mut store, _rx) = build_store();
    let base = scratch_dir("save-as");

    let original = store
        .create_new_project("Original", &base.join("original"), ProjectTemplate::Channel)
        .await?;
    store
        .save_current_project_as(&base.join("copy"), "Copy")
        .await?;

    let copy = store.current_project.clone().unwrap();
    assert_ne!(copy.id, original.id);
    assert_eq!(copy.name, "Copy");
    assert_eq!(copy.path, base.join("copy"));

    // Both identities are tracked, the copy most recently.
    assert_eq!(store.recents.projects.len(), 2);
    assert_eq!(store.recents.projects[0].id, copy.id);

    // Chat persistence moved over to the copy's directory.
    assert!(store.chat.has_persistence());
    assert!(base.join("copy").join(".penstock").exists());

    return Ok(());
}

#[tokio::test]
async fn it_migrates_legacy_drawing_refs_on_open() -> Result<()> {
    let (mut store, _rx) = build_store();
    let target = scratch_dir("migrate").join("penstock-f");

    store
        .create_new_project("Penstock F", &target, ProjectTemplate::Channel)
        .await?;
    let channel_id = store.scene.objects()[0].id.clone();

    // A drawing written by an older build, still referencing the
    // kernel-assigned shape id of a previous run.
    store.drawings.load_drawings(DrawingsData {
        drawings: vec![Drawing {
            id: "d1".to_string(),
            title: "Plan".to_string(),
            views: vec![DrawingView {
                id: "v1".to_string(),
                label: "Top".to_string(),
                source: ShapeRef::BackendShape("kernel-42".to_string()),
                projection: Some("stale-projection".to_string()),
            }],
        }],
    });
    store.save_current_project().await?;
    store.close_project().await;

    store.open_existing_project(&target).await?;

    let view = &store.drawings.drawings()[0].views[0];
    assert_eq!(view.source, ShapeRef::SceneObject(channel_id));
    assert_eq!(view.projection, None);

    return Ok(());
}

#[tokio::test]
async fn it_delivers_thumbnails_through_the_event_channel() -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let mut store = ProjectStore::new(
        Box::new(FileProjectService::default()),
        Box::new(NullGeometry::default()),
        tx,
    )
    .with_recents(RecentProjectsStore::new(20, 10))
    .with_thumbnails(Arc::new(FixedThumbnail {}));

    let target = scratch_dir("thumbnail").join("penstock-g");
    let info = store
        .create_new_project("Penstock G", &target, ProjectTemplate::Empty)
        .await?;
    let _ = rx.try_recv();

    store.save_current_project().await?;

    let mut captured = None;
    while let Ok(Some(event)) = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await {
        if let Event::ThumbnailCaptured(_, _) = &event {
            captured = Some(event);
            break;
        }
    }

    let event = captured.unwrap();
    assert_eq!(
        event,
        Event::ThumbnailCaptured(info.id.clone(), "png-bytes".to_string())
    );

    store.handle_event(&event).await;
    assert_eq!(
        store.recents.projects[0].thumbnail,
        Some("png-bytes".to_string())
    );

    return Ok(());
}
