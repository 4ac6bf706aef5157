use crate::EntityKind;
use std::path::PathBuf;

/// Errors surfaced by the editor core. Parse and structural problems are usually
/// logged and recovered from by the caller; user-intent and IO errors are shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("{kind} '{name}' already exists")]
    DuplicateName { kind: EntityKind, name: String },

    #[error("name must not be empty")]
    EmptyName,

    #[error("attribute or element '{attribute}' already exists on <{element}>")]
    DuplicateAttribute { element: String, attribute: String },

    #[error("'{0}' is a reserved item section name")]
    ReservedName(String),

    #[error("this operation requires a selected {0}")]
    WrongKind(EntityKind),

    #[error("{kind} '{name}' not found")]
    NotFound { kind: EntityKind, name: String },

    #[error("could not locate the parent element of {kind} '{name}'")]
    ParentNotFound { kind: EntityKind, name: String },

    #[error("{0:?} is not a loaded file")]
    NotLoaded(PathBuf),

    #[error("no XML files are loaded")]
    NoDocuments,

    #[error("{0:?} is not a directory")]
    NotADirectory(PathBuf),

    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EditorError>;
