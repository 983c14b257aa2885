use crate::sources::SourceKind;

/// Errors raised while declaring or loading sources.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("source `{0}` is declared more than once")]
    DuplicateSource(String),
    #[error("unknown source `{0}`")]
    UnknownSource(String),
    #[error("source `{0}` has already been loaded")]
    AlreadyLoaded(String),
    #[error("source `{name}` of type {kind:?} expects {expected} path(s), got {actual}")]
    PathShape {
        name: String,
        kind: SourceKind,
        expected: usize,
        actual: usize,
    },
    #[error("loading has already started")]
    AlreadyStarted,
    #[error("resources were dropped before every source loaded")]
    Abandoned,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum TweakError {
    #[error("no control labelled `{0}`")]
    UnknownControl(String),
    #[error("control `{label}` does not accept a {value} value")]
    Mismatch { label: String, value: &'static str },
}
