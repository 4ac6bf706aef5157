use crate::error::{EditorError, Result};
use crate::statics;
use crate::store::DocumentStore;
use crate::vocabulary::{Vocabulary, VocabularyId};
use crate::xml::{NodeId, XmlDocument};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Ability,
    Item,
}

impl EntityKind {
    pub const ALL: [EntityKind; 2] = [EntityKind::Ability, EntityKind::Item];

    /// Tag of the entity element itself.
    pub fn element_tag(self) -> &'static str {
        match self {
            EntityKind::Ability => statics::TAG_ABILITY,
            EntityKind::Item => statics::TAG_ITEM,
        }
    }

    /// Tag of the container holding entities of this kind.
    pub fn container_tag(self) -> &'static str {
        match self {
            EntityKind::Ability => statics::TAG_ABILITIES,
            EntityKind::Item => statics::TAG_ITEMS,
        }
    }

    pub fn plural_label(self) -> &'static str {
        match self {
            EntityKind::Ability => statics::EN_ABILITIES,
            EntityKind::Item => statics::EN_ITEMS,
        }
    }

    fn name_set(self) -> VocabularyId {
        match self {
            EntityKind::Ability => VocabularyId::AbilityNames,
            EntityKind::Item => VocabularyId::ItemNames,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_tag())
    }
}

/// A resolved entity: which file and which element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub name: String,
    pub path: PathBuf,
    pub node: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLocation {
    pub path: PathBuf,
    pub node: NodeId,
}

/// An element that lost the first-wins race during the last rebuild.
/// It is still in its document, just not reachable through the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowedEntity {
    pub kind: EntityKind,
    pub name: String,
    pub path: PathBuf,
    pub node: NodeId,
    pub winner: PathBuf,
}

/// Every `<container>/<element>` of `kind` in `doc`, in document order.
fn entity_elements(doc: &XmlDocument, kind: EntityKind) -> Vec<NodeId> {
    doc.find_descendants(doc.root(), kind.container_tag())
        .into_iter()
        .flat_map(move |container| doc.find_children(container, kind.element_tag()))
        .collect()
}

/// Named entities of one document in a single pass. The first element with a name wins.
pub fn entity_nodes(doc: &XmlDocument) -> HashMap<(EntityKind, String), NodeId> {
    let mut out = HashMap::new();
    for kind in EntityKind::ALL {
        for node in entity_elements(doc, kind) {
            if let Some(name) = doc
                .attribute(node, statics::ATTR_NAME)
                .filter(|n| !n.is_empty())
            {
                out.entry((kind, name.to_string())).or_insert(node);
            }
        }
    }
    out
}

#[derive(Debug, Default)]
pub struct EntityIndex {
    abilities: HashMap<String, EntityLocation>,
    items: HashMap<String, EntityLocation>,
    shadowed: Vec<ShadowedEntity>,
    vocabulary: Vocabulary,
}

impl EntityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, kind: EntityKind) -> &HashMap<String, EntityLocation> {
        match kind {
            EntityKind::Ability => &self.abilities,
            EntityKind::Item => &self.items,
        }
    }

    fn map_mut(&mut self, kind: EntityKind) -> &mut HashMap<String, EntityLocation> {
        match kind {
            EntityKind::Ability => &mut self.abilities,
            EntityKind::Item => &mut self.items,
        }
    }

    pub fn clear(&mut self) {
        self.abilities.clear();
        self.items.clear();
        self.shadowed.clear();
        self.vocabulary.clear();
    }

    /// Rescan every loaded document. First occurrence of a name wins, in load order.
    pub fn rebuild(&mut self, store: &DocumentStore) {
        self.clear();

        for file in store.files() {
            let doc = &file.document;
            for kind in EntityKind::ALL {
                for node in entity_elements(doc, kind) {
                    self.index_element(kind, &file.path, doc, node);
                }
            }
        }

        tracing::info!(
            abilities = self.abilities.len(),
            items = self.items.len(),
            shadowed = self.shadowed.len(),
            "index rebuilt"
        );
    }

    fn index_element(&mut self, kind: EntityKind, path: &Path, doc: &XmlDocument, node: NodeId) {
        let Some(name) = doc
            .attribute(node, statics::ATTR_NAME)
            .filter(|n| !n.is_empty())
        else {
            return;
        };

        if let Some(winner) = self.map(kind).get(name) {
            tracing::warn!(
                "duplicate {kind} '{name}' in {path:?} ignored (already defined in {:?})",
                winner.path
            );
            self.shadowed.push(ShadowedEntity {
                kind,
                name: name.to_string(),
                path: path.to_path_buf(),
                node,
                winner: winner.path.clone(),
            });
            return;
        }

        self.map_mut(kind).insert(
            name.to_string(),
            EntityLocation {
                path: path.to_path_buf(),
                node,
            },
        );
        match kind {
            EntityKind::Ability => self.vocabulary.collect_ability(doc, node),
            EntityKind::Item => self.vocabulary.collect_item(doc, node),
        }
    }

    pub fn lookup(&self, kind: EntityKind, name: &str) -> Option<EntityRef> {
        self.map(kind).get(name).map(|loc| EntityRef {
            kind,
            name: name.to_string(),
            path: loc.path.clone(),
            node: loc.node,
        })
    }

    pub fn contains(&self, kind: EntityKind, name: &str) -> bool {
        self.map(kind).contains_key(name)
    }

    /// Add a freshly created element. Refuses (and logs) an existing name.
    pub fn register(&mut self, kind: EntityKind, name: &str, path: &Path, node: NodeId) -> Result<()> {
        if self.contains(kind, name) {
            tracing::error!("refusing to register duplicate {kind} '{name}'");
            return Err(EditorError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
        self.map_mut(kind).insert(
            name.to_string(),
            EntityLocation {
                path: path.to_path_buf(),
                node,
            },
        );
        self.vocabulary.note(kind.name_set(), name);
        tracing::debug!("registered {kind} '{name}' in {path:?}");
        Ok(())
    }

    /// Drop a map entry. The XML tree is left alone.
    pub fn unregister(&mut self, kind: EntityKind, name: &str) -> Option<EntityLocation> {
        self.map_mut(kind).remove(name)
    }

    /// Point an existing entry at another file/element.
    pub fn repoint(&mut self, kind: EntityKind, name: &str, path: &Path, node: NodeId) -> bool {
        match self.map_mut(kind).get_mut(name) {
            Some(loc) => {
                loc.path = path.to_path_buf();
                loc.node = node;
                true
            }
            None => false,
        }
    }

    /// Remove entries of `path` whose element is no longer reachable from the root.
    pub fn prune_detached(&mut self, path: &Path, doc: &XmlDocument) -> Vec<(EntityKind, String)> {
        let mut pruned = Vec::new();
        for kind in EntityKind::ALL {
            let map = self.map_mut(kind);
            map.retain(|name, loc| {
                let keep = loc.path != path || doc.is_attached(loc.node);
                if !keep {
                    pruned.push((kind, name.clone()));
                }
                keep
            });
        }
        for (kind, name) in &pruned {
            tracing::debug!("pruned detached {kind} '{name}'");
        }
        pruned
    }

    /// Sorted names of one kind.
    pub fn names(&self, kind: EntityKind) -> Vec<&str> {
        let mut names: Vec<&str> = self.map(kind).keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        self.map(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty() && self.items.is_empty()
    }

    pub fn entities_in_file(&self, path: &Path) -> Vec<EntityRef> {
        let mut out = Vec::new();
        for kind in EntityKind::ALL {
            for (name, loc) in self.map(kind) {
                if loc.path == path {
                    out.push(EntityRef {
                        kind,
                        name: name.clone(),
                        path: loc.path.clone(),
                        node: loc.node,
                    });
                }
            }
        }
        out.sort_by(|a, b| (a.kind, &a.name).cmp(&(b.kind, &b.name)));
        out
    }

    pub fn shadowed(&self) -> &[ShadowedEntity] {
        &self.shadowed
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Extend a suggestion set. `true` means the suggestions for `set` changed.
    pub fn note_value(&mut self, set: VocabularyId, value: &str) -> bool {
        let added = self.vocabulary.note(set, value);
        if added {
            tracing::trace!("new {set:?} suggestion '{}'", value.trim());
        }
        added
    }

    pub fn note_tags(&mut self, text: &str) {
        self.vocabulary.note_tags(text);
    }

    pub fn note_attribute_value(&mut self, attribute: &str, value: &str) -> bool {
        self.vocabulary.note_attribute_value(attribute, value)
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityKind, entity_nodes};
    use crate::xml::XmlDocument;
    use pretty_assertions::assert_eq;

    #[test]
    fn entity_nodes_keeps_the_first_of_each_name() {
        let doc = XmlDocument::parse(
            r#"<redxml><definitions>
                <abilities><ability name="A"/><ability name="A" extra="1"/><ability name=""/></abilities>
                <items><item name="A"/></items>
            </definitions></redxml>"#,
        )
        .unwrap();

        let nodes = entity_nodes(&doc);
        assert_eq!(nodes.len(), 2);
        let ability = nodes[&(EntityKind::Ability, "A".to_string())];
        assert_eq!(doc.attribute(ability, "extra"), None);
        let item = nodes[&(EntityKind::Item, "A".to_string())];
        assert_eq!(doc.name(item), Some("item"));
    }
}
