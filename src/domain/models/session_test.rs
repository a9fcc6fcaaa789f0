use super::create_id;
use super::truncate_chars;
use super::Message;
use super::Role;
use super::SessionMeta;
use super::SessionUsage;
use super::PREVIEW_MAX_CHARS;
use super::TITLE_MAX_CHARS;

#[test]
fn it_executes_create_id() {
    let id = create_id();
    let parts = id.split('-').collect::<Vec<&str>>();
    assert_eq!(parts.len(), 2);
    assert!(parts[0].parse::<i64>().is_ok());
    assert_eq!(parts[1].len(), 8);
}

#[test]
fn it_truncates_by_characters_not_bytes() {
    let text = "é".repeat(60);
    let truncated = truncate_chars(&text, TITLE_MAX_CHARS);
    assert_eq!(truncated.chars().count(), TITLE_MAX_CHARS);

    assert_eq!(truncate_chars("short", TITLE_MAX_CHARS), "short");
    insta::assert_snapshot!(truncate_chars(&"a".repeat(60), TITLE_MAX_CHARS), @"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
}

#[test]
fn it_assigns_title_once_from_first_user_message() {
    let mut meta = SessionMeta::new("assistant-medium");
    assert_eq!(meta.title, "New chat");

    let first = vec![Message::new(Role::User, "What is the weather today?")];
    meta.apply_messages(&first);
    assert_eq!(meta.title, "What is the weather today?");
    assert_eq!(meta.message_count, 1);

    let mut more = first.clone();
    more.push(Message::new(Role::Assistant, "Sunny, light tailwater."));
    more.push(Message::new(Role::User, "A completely different topic"));
    meta.apply_messages(&more);
    assert_eq!(meta.title, "What is the weather today?");
    assert_eq!(meta.message_count, 3);
}

#[test]
fn it_derives_preview_from_last_message() {
    let mut meta = SessionMeta::new("assistant-medium");
    let long_reply = "x".repeat(300);
    let messages = vec![
        Message::new(Role::User, "Summarize the basin design"),
        Message::new(Role::Assistant, &long_reply),
    ];

    meta.apply_messages(&messages);
    assert_eq!(meta.preview.chars().count(), PREVIEW_MAX_CHARS);

    meta.apply_messages(&[]);
    assert_eq!(meta.preview, "");
    assert_eq!(meta.message_count, 0);
}

#[test]
fn it_accumulates_and_resets_usage() {
    let mut usage = SessionUsage::default();
    usage.accumulate(SessionUsage {
        input_tokens: 10,
        output_tokens: 20,
        total_tokens: 30,
        reasoning_tokens: 5,
        cached_input_tokens: 2,
    });
    usage.accumulate(SessionUsage {
        input_tokens: 1,
        output_tokens: 2,
        total_tokens: 3,
        reasoning_tokens: 0,
        cached_input_tokens: 0,
    });

    assert_eq!(usage.input_tokens, 11);
    assert_eq!(usage.output_tokens, 22);
    assert_eq!(usage.total_tokens, 33);
    assert_eq!(usage.reasoning_tokens, 5);
    assert_eq!(usage.cached_input_tokens, 2);

    usage.reset();
    assert_eq!(usage, SessionUsage::default());
}
