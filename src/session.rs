use crate::error::{EditorError, Result};
use crate::index::{EntityIndex, EntityKind, EntityRef};

/// The single current selection: nothing, or one resolved entity.
#[derive(Debug, Default, Clone)]
pub struct EditSession {
    selection: Option<EntityRef>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an entity by name. Returns `Ok(false)` when it already was the selection.
    pub fn select(&mut self, index: &EntityIndex, kind: EntityKind, name: &str) -> Result<bool> {
        if self.is_selected(kind, name) {
            return Ok(false);
        }
        let entity = index.lookup(kind, name).ok_or_else(|| EditorError::NotFound {
            kind,
            name: name.to_string(),
        })?;
        tracing::debug!("selected {kind} '{name}'");
        self.selection = Some(entity);
        Ok(true)
    }

    pub fn clear(&mut self) {
        self.selection = None;
    }

    pub fn selected(&self) -> Option<&EntityRef> {
        self.selection.as_ref()
    }

    pub fn is_selected(&self, kind: EntityKind, name: &str) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|s| s.kind == kind && s.name == name)
    }

    /// Re-resolve the selection after the index moved or dropped entries.
    pub fn refresh(&mut self, index: &EntityIndex) {
        if let Some(current) = &self.selection {
            self.selection = index.lookup(current.kind, &current.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EditSession;
    use crate::index::{EntityIndex, EntityKind};
    use crate::store::LoadedFile;
    use crate::DocumentStore;
    use std::path::Path;

    fn index_with_sword() -> EntityIndex {
        let mut store = DocumentStore::new();
        let path = Path::new("/defs/items.xml");
        let file = LoadedFile::from_bytes(
            path,
            br#"<redxml><definitions><items><item name="Sword"/></items></definitions></redxml>"#,
        )
        .unwrap();
        store.insert(file);
        let mut index = EntityIndex::new();
        index.rebuild(&store);
        index
    }

    #[test]
    fn select_is_idempotent() {
        let index = index_with_sword();
        let mut session = EditSession::new();

        assert!(session.select(&index, EntityKind::Item, "Sword").unwrap());
        assert!(!session.select(&index, EntityKind::Item, "Sword").unwrap());
        assert!(session.is_selected(EntityKind::Item, "Sword"));

        session.clear();
        assert!(session.selected().is_none());
    }

    #[test]
    fn unknown_names_leave_selection_unchanged() {
        let index = index_with_sword();
        let mut session = EditSession::new();
        session.select(&index, EntityKind::Item, "Sword").unwrap();

        assert!(session.select(&index, EntityKind::Ability, "Sword").is_err());
        assert!(session.is_selected(EntityKind::Item, "Sword"));
    }

    #[test]
    fn refresh_drops_vanished_entities() {
        let mut index = index_with_sword();
        let mut session = EditSession::new();
        session.select(&index, EntityKind::Item, "Sword").unwrap();

        index.unregister(EntityKind::Item, "Sword");
        session.refresh(&index);
        assert!(session.selected().is_none());
    }
}
