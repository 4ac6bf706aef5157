//! Core library for W3XML, the Witcher 3 ability/item definitions editor.
//! Loads a folder of definition XML files into editable trees, indexes `<ability>` and
//! `<item>` entries by name, tracks unsaved files and writes them back in the game's UTF-16 format.

mod config;
mod dirty;
mod editor;
mod error;
mod gui;
mod index;
mod session;
pub mod statics;
mod store;
pub mod vocabulary;
mod xml;

pub use config::EditorConfig;
pub use dirty::DirtyTracker;
pub use editor::{EditorState, ItemSection, SaveAllReport, suggested_copy_path, with_xml_extension};
pub use error::{EditorError, Result};
pub use gui::run_gui;
pub use index::{EntityIndex, EntityKind, EntityRef, ShadowedEntity, entity_nodes};
pub use session::EditSession;
pub use store::{DocumentStore, LineEnding, LoadFailure, LoadStats, LoadedFile};
pub use vocabulary::{Vocabulary, VocabularyId};
pub use xml::{Element, NodeId, XmlDocument, XmlError};
