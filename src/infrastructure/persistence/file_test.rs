use anyhow::Result;
use test_utils::scratch_dir;
use tokio::time;

use super::FileSessionPersistence;
use super::SessionPersistence;
use crate::domain::models::Message;
use crate::domain::models::Role;

fn conversation() -> Vec<Message> {
    return vec![
        Message::new(Role::User, "Size the stilling basin for 40 m3/s"),
        Message::new(Role::Assistant, "Starting from a type III basin..."),
    ];
}

#[tokio::test]
async fn it_lists_nothing_before_init() -> Result<()> {
    let persistence = FileSessionPersistence::new(&scratch_dir("sessions-empty"));
    assert!(persistence.list_sessions().await?.is_empty());
    return Ok(());
}

#[tokio::test]
async fn it_round_trips_a_session() -> Result<()> {
    let persistence = FileSessionPersistence::new(&scratch_dir("sessions-roundtrip"));
    persistence.init().await?;

    let messages = conversation();
    persistence
        .save_session(
            "1700000000000-abc12345",
            &messages,
            "assistant-medium",
            "Size the stilling basin for 40 m3/s",
            "2023-11-14T22:13:20.000+00:00",
        )
        .await?;

    let listed = persistence.list_sessions().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "1700000000000-abc12345");
    assert_eq!(listed[0].title, "Size the stilling basin for 40 m3/s");
    assert_eq!(listed[0].message_count, 2);
    assert_eq!(listed[0].preview, "Starting from a type III basin...");
    assert_eq!(listed[0].model_id, "assistant-medium");

    let loaded = persistence.load_session("1700000000000-abc12345").await?;
    assert_eq!(loaded, messages);

    return Ok(());
}

#[tokio::test]
async fn it_lists_most_recently_saved_first() -> Result<()> {
    let persistence = FileSessionPersistence::new(&scratch_dir("sessions-ordering"));
    persistence.init().await?;

    persistence
        .save_session("older", &conversation(), "m", "Older", "2023-01-01T00:00:00.000+00:00")
        .await?;
    time::sleep(time::Duration::from_millis(20)).await;
    persistence
        .save_session("newer", &conversation(), "m", "Newer", "2023-01-02T00:00:00.000+00:00")
        .await?;

    let listed = persistence.list_sessions().await?;
    assert_eq!(listed[0].id, "newer");
    assert_eq!(listed[1].id, "older");

    return Ok(());
}

#[tokio::test]
async fn it_deletes_sessions() -> Result<()> {
    let persistence = FileSessionPersistence::new(&scratch_dir("sessions-delete"));
    persistence.init().await?;

    persistence
        .save_session("gone", &conversation(), "m", "Gone", "2023-01-01T00:00:00.000+00:00")
        .await?;
    persistence.delete_session("gone").await?;

    assert!(persistence.list_sessions().await?.is_empty());
    assert!(persistence.load_session("gone").await.is_err());

    // Deleting twice is fine.
    persistence.delete_session("gone").await?;

    return Ok(());
}
