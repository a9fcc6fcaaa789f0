use super::ProjectInfo;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// UI-bound notifications emitted by the stores over an unbounded channel.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    ProjectOpened(ProjectInfo),
    ProjectClosed(),
    Status(String, StatusKind),
    ThumbnailCaptured(String, String),
}
