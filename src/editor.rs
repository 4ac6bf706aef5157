//! The editor aggregate: documents, index, dirty set and selection, plus every
//! operation that mutates a definition tree.
//!
//! Each mutator either changes the tree and marks the owning file dirty, or does
//! neither. Element-level operations act on the selected entity's document and are
//! no-ops without a selection.

use crate::dirty::DirtyTracker;
use crate::error::{EditorError, Result};
use crate::index::{EntityIndex, EntityKind, EntityRef, entity_nodes};
use crate::session::EditSession;
use crate::statics;
use crate::store::{DocumentStore, LoadStats, LoadedFile, is_xml_path};
use crate::vocabulary::{Vocabulary, VocabularyId, normalize_tags};
use crate::xml::{NodeId, XmlDocument};
use std::path::{Path, PathBuf};

/// The list sections of an `<item>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSection {
    BaseAbilities,
    RecyclingParts,
    Variants,
}

impl ItemSection {
    pub fn container_tag(self) -> &'static str {
        match self {
            ItemSection::BaseAbilities => statics::TAG_BASE_ABILITIES,
            ItemSection::RecyclingParts => statics::TAG_RECYCLING_PARTS,
            ItemSection::Variants => statics::TAG_VARIANTS,
        }
    }

    pub fn entry_tag(self) -> &'static str {
        match self {
            ItemSection::BaseAbilities => statics::TAG_BASE_ABILITY,
            ItemSection::RecyclingParts => statics::TAG_PARTS,
            ItemSection::Variants => statics::TAG_VARIANT,
        }
    }

    pub fn default_attributes(self) -> &'static [(&'static str, &'static str)] {
        match self {
            ItemSection::BaseAbilities => &[],
            ItemSection::RecyclingParts => &[(statics::ATTR_COUNT, statics::DEFAULT_PART_COUNT)],
            ItemSection::Variants => &[
                (statics::ATTR_CATEGORY, statics::DEFAULT_VARIANT_CATEGORY),
                (statics::ATTR_EQUIP_TEMPLATE, statics::DEFAULT_VARIANT_TEMPLATE),
            ],
        }
    }
}

/// Outcome of [`EditorState::save_all`]. Failed files stay dirty.
#[derive(Debug, Default)]
pub struct SaveAllReport {
    pub saved: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, EditorError)>,
}

/// What an element is relative to the selected entity; decides which suggestion sets it feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementRole {
    Item,
    Variant,
    Property,
    Other,
}

fn element_role(selected: &EntityRef, doc: &XmlDocument, node: NodeId) -> ElementRole {
    if node == selected.node {
        return match selected.kind {
            EntityKind::Item => ElementRole::Item,
            EntityKind::Ability => ElementRole::Other,
        };
    }
    if doc.name(node) == Some(statics::TAG_VARIANT) {
        return ElementRole::Variant;
    }
    if selected.kind == EntityKind::Ability && doc.parent(node) == Some(selected.node) {
        return ElementRole::Property;
    }
    ElementRole::Other
}

/// Trim and replace inner spaces; used for attribute names and free-form tags.
pub fn sanitize_name(raw: &str) -> String {
    raw.trim().replace(' ', "_")
}

/// `path` with `.xml` appended unless it already ends in it (any case).
pub fn with_xml_extension(path: &Path) -> PathBuf {
    if is_xml_path(path) {
        return path.to_path_buf();
    }
    let mut raw = path.as_os_str().to_owned();
    raw.push(".");
    raw.push(statics::XML_EXTENSION);
    PathBuf::from(raw)
}

/// `dir/name_copy.xml` for `dir/name.xml`.
pub fn suggested_copy_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(
        "{stem}{}.{}",
        statics::EN_COPY_SUFFIX,
        statics::XML_EXTENSION
    ))
}

fn ensure_child(doc: &mut XmlDocument, parent: NodeId, tag: &str) -> Option<NodeId> {
    if let Some(existing) = doc.find_child(parent, tag) {
        return Some(existing);
    }
    let child = doc.create_element(tag);
    doc.append_child(parent, child).then_some(child)
}

#[derive(Debug, Default)]
pub struct EditorState {
    store: DocumentStore,
    index: EntityIndex,
    dirty: DirtyTracker,
    session: EditSession,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn index(&self) -> &EntityIndex {
        &self.index
    }

    pub fn dirty(&self) -> &DirtyTracker {
        &self.dirty
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.index.vocabulary()
    }

    pub fn selected(&self) -> Option<&EntityRef> {
        self.session.selected()
    }

    pub fn selected_document(&self) -> Option<&XmlDocument> {
        self.store.document(&self.session.selected()?.path)
    }

    pub fn lookup(&self, kind: EntityKind, name: &str) -> Option<EntityRef> {
        self.index.lookup(kind, name)
    }

    /// Replace all loaded state with the contents of `folder`.
    pub fn open_folder(&mut self, folder: &Path) -> Result<LoadStats> {
        self.session.clear();
        self.dirty.clear();
        self.index.clear();
        let stats = self.store.load_folder(folder)?;
        self.index.rebuild(&self.store);
        Ok(stats)
    }

    pub fn select(&mut self, kind: EntityKind, name: &str) -> Result<bool> {
        self.session.select(&self.index, kind, name)
    }

    pub fn clear_selection(&mut self) {
        self.session.clear();
    }

    /// Set `key` on an element of the selected document. Returns `true` if the value changed.
    /// Never renames an indexed entity: its `name` is owned by the index.
    pub fn set_attribute(&mut self, node: NodeId, key: &str, value: &str) -> bool {
        let Some(selected) = self.session.selected() else {
            return false;
        };
        if key == statics::ATTR_NAME
            && let Some(entity) = self
                .index
                .entities_in_file(&selected.path)
                .into_iter()
                .find(|e| e.node == node)
        {
            tracing::warn!(
                "refusing to rename {} '{}' through its attributes",
                entity.kind,
                entity.name
            );
            return false;
        }
        let Some(doc) = self.store.document_mut(&selected.path) else {
            return false;
        };
        if !doc.set_attribute(node, key, value) {
            return false;
        }

        match element_role(selected, doc, node) {
            ElementRole::Item | ElementRole::Variant => {
                self.index.note_attribute_value(key, value);
            }
            ElementRole::Property if key == statics::ATTR_TYPE => {
                self.index.note_value(VocabularyId::PropertyTypes, value);
            }
            _ => {}
        }
        tracing::debug!("{}: {key}=\"{value}\"", selected.name);
        self.dirty.mark_dirty(&selected.path);
        true
    }

    /// Add an empty attribute. The name is trimmed and spaces become underscores.
    pub fn add_attribute(&mut self, node: NodeId, name: &str) -> Result<bool> {
        let name = sanitize_name(name);
        let Some(selected) = self.session.selected() else {
            return Ok(false);
        };
        if name.is_empty() {
            return Err(EditorError::EmptyName);
        }
        let Some(doc) = self.store.document_mut(&selected.path) else {
            return Ok(false);
        };
        let Some(element) = doc.element(node) else {
            return Ok(false);
        };
        if element.attributes.contains_key(&name) {
            return Err(EditorError::DuplicateAttribute {
                element: element.name.clone(),
                attribute: name,
            });
        }

        doc.set_attribute(node, &name, "");
        let set = match element_role(selected, doc, node) {
            ElementRole::Item => Some(VocabularyId::ItemAttributes),
            ElementRole::Variant => Some(VocabularyId::VariantAttributes),
            ElementRole::Property => Some(VocabularyId::PropertyAttributes),
            ElementRole::Other => None,
        };
        if let Some(set) = set {
            self.index.note_value(set, &name);
        }
        tracing::debug!("{}: added attribute '{name}'", selected.name);
        self.dirty.mark_dirty(&selected.path);
        Ok(true)
    }

    /// Comma separated tags of an entity element; empty when there is no `<tags>` child.
    pub fn tags_of(&self, node: NodeId) -> String {
        self.selected_document()
            .and_then(|doc| doc.find_child(node, statics::TAG_TAGS).map(|t| (doc, t)))
            .and_then(|(doc, t)| doc.text(t))
            .map(normalize_tags)
            .unwrap_or_default()
    }

    /// Replace the tags of an entity element. An empty list removes the `<tags>` child.
    pub fn set_tags(&mut self, node: NodeId, text: &str) -> bool {
        let new = normalize_tags(text);
        if new == self.tags_of(node) {
            return false;
        }
        let Some(selected) = self.session.selected() else {
            return false;
        };
        let Some(doc) = self.store.document_mut(&selected.path) else {
            return false;
        };

        let changed = match (doc.find_child(node, statics::TAG_TAGS), new.is_empty()) {
            (Some(tags), true) => doc.remove_child(node, tags),
            (Some(tags), false) => doc.set_text(tags, &new),
            (None, false) => {
                let tags = doc.create_element(statics::TAG_TAGS);
                doc.set_text(tags, &new);
                doc.append_child(node, tags)
            }
            (None, true) => false,
        };
        if !changed {
            return false;
        }

        self.index.note_tags(&new);
        tracing::debug!("{}: tags = '{new}'", selected.name);
        self.dirty.mark_dirty(&selected.path);
        true
    }

    /// Set the (trimmed) text of a leaf element such as `<a>`, `<parts>` or a nested variant element.
    pub fn set_text(&mut self, node: NodeId, text: &str) -> bool {
        let text = text.trim();
        let Some(selected) = self.session.selected() else {
            return false;
        };
        let Some(doc) = self.store.document_mut(&selected.path) else {
            return false;
        };
        if doc.text(node).unwrap_or_default().trim() == text {
            return false;
        }
        if !doc.set_text(node, text) {
            return false;
        }

        if doc.name(node) == Some(statics::TAG_PARTS) {
            self.index.note_value(VocabularyId::RecyclingParts, text);
        }
        tracing::debug!("{}: <{}> text = '{text}'", selected.name, doc.name(node).unwrap_or_default());
        self.dirty.mark_dirty(&selected.path);
        true
    }

    /// Append a new element with the given attributes under `parent`.
    pub fn add_child(&mut self, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> Option<NodeId> {
        let selected = self.session.selected()?;
        let doc = self.store.document_mut(&selected.path)?;

        let child = doc.create_element(tag);
        for (key, value) in attributes {
            doc.set_attribute(child, key, value);
        }
        if !doc.append_child(parent, child) {
            tracing::warn!("could not append <{tag}> to {parent:?} in {:?}", selected.path);
            return None;
        }

        if doc.name(parent) == Some(statics::TAG_VARIANT) {
            self.index.note_value(VocabularyId::VariantNestedTags, tag);
        }
        let attribute_set = match element_role(selected, doc, child) {
            ElementRole::Variant => Some(VocabularyId::VariantAttributes),
            ElementRole::Property => {
                self.index.note_value(VocabularyId::PropertyNames, tag);
                Some(VocabularyId::PropertyAttributes)
            }
            _ => None,
        };
        for (key, value) in attributes {
            if let Some(set) = attribute_set {
                self.index.note_value(set, key);
            }
            self.index.note_attribute_value(key, value);
        }

        tracing::debug!("{}: added <{tag}>", selected.name);
        self.dirty.mark_dirty(&selected.path);
        Some(child)
    }

    /// Add a default entry to one of the selected item's sections, creating the section if needed.
    pub fn add_section_entry(&mut self, section: ItemSection) -> Option<NodeId> {
        let selected = self.session.selected()?;
        if selected.kind != EntityKind::Item {
            return None;
        }
        let item = selected.node;
        let doc = self.store.document_mut(&selected.path)?;
        let container = ensure_child(doc, item, section.container_tag())?;
        self.add_child(container, section.entry_tag(), section.default_attributes())
    }

    /// Add `<tag>text</tag>` inside a variant.
    pub fn add_nested_element(&mut self, variant: NodeId, tag: &str, text: &str) -> Result<Option<NodeId>> {
        let tag = sanitize_name(tag);
        if self.session.selected().is_none() {
            return Ok(None);
        }
        if tag.is_empty() {
            return Err(EditorError::EmptyName);
        }
        let Some(child) = self.add_child(variant, &tag, &[]) else {
            return Ok(None);
        };
        let text = text.trim();
        if let Some(doc) = self
            .session
            .selected()
            .and_then(|s| self.store.document_mut(&s.path))
        {
            doc.set_text(child, text);
        }
        Ok(Some(child))
    }

    /// Add `<name type="add" min="0"/>` to the selected ability.
    pub fn add_property(&mut self, name: &str) -> Result<NodeId> {
        let name = sanitize_name(name);
        let selected = self
            .session
            .selected()
            .filter(|s| s.kind == EntityKind::Ability)
            .ok_or(EditorError::WrongKind(EntityKind::Ability))?;
        if name.is_empty() {
            return Err(EditorError::EmptyName);
        }
        if statics::RESERVED_SECTION_TAGS.contains(&name.as_str()) {
            return Err(EditorError::ReservedName(name));
        }
        let (ability, ability_name) = (selected.node, selected.name.clone());
        let exists = self
            .store
            .document(&selected.path)
            .is_some_and(|doc| doc.find_child(ability, &name).is_some());
        if exists {
            return Err(EditorError::DuplicateAttribute {
                element: statics::TAG_ABILITY.to_string(),
                attribute: name,
            });
        }

        self.add_child(
            ability,
            &name,
            &[
                (statics::ATTR_TYPE, statics::DEFAULT_PROPERTY_TYPE),
                (statics::ATTR_MIN, statics::DEFAULT_PROPERTY_MIN),
            ],
        )
        .ok_or(EditorError::ParentNotFound {
            kind: EntityKind::Ability,
            name: ability_name,
        })
    }

    /// Detach `child` from `parent`. A stale pair (child no longer under parent) is logged and ignored.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(selected) = self.session.selected() else {
            return false;
        };
        let path = selected.path.clone();
        let Some(doc) = self.store.document_mut(&path) else {
            return false;
        };
        if !doc.remove_child(parent, child) {
            tracing::warn!("{child:?} is not a child of {parent:?} in {path:?}; treating as removed");
            return false;
        }

        tracing::debug!("removed {child:?} from {parent:?} in {path:?}");
        self.dirty.mark_dirty(&path);
        if !self.index.prune_detached(&path, doc).is_empty() {
            self.session.refresh(&self.index);
        }
        true
    }

    /// File and container a new entity of `kind` goes into, created when missing.
    fn target_container(&mut self, kind: EntityKind) -> Result<(PathBuf, NodeId)> {
        let container_tag = kind.container_tag();

        if let Some(path) = self.session.selected().map(|s| s.path.clone())
            && let Some(doc) = self.store.document_mut(&path)
        {
            let root = doc.root();
            let definitions = doc.find_child(root, statics::TAG_DEFINITIONS);
            let existing = definitions
                .and_then(|d| doc.find_child(d, container_tag))
                .or_else(|| doc.find_child(root, container_tag));
            let container = match existing {
                Some(c) => Some(c),
                None => ensure_child(doc, root, statics::TAG_DEFINITIONS)
                    .and_then(|d| ensure_child(doc, d, container_tag)),
            };
            return container.map(|c| (path.clone(), c)).ok_or(EditorError::NotLoaded(path));
        }

        for file in self.store.files() {
            let doc = &file.document;
            if let Some(container) = doc.find_descendant(doc.root(), container_tag) {
                return Ok((file.path.clone(), container));
            }
        }

        let path = self.store.paths().next().cloned().ok_or(EditorError::NoDocuments)?;
        let doc = self
            .store
            .document_mut(&path)
            .ok_or_else(|| EditorError::NotLoaded(path.clone()))?;
        let root = doc.root();
        ensure_child(doc, root, statics::TAG_DEFINITIONS)
            .and_then(|d| ensure_child(doc, d, container_tag))
            .map(|c| (path.clone(), c))
            .ok_or(EditorError::NotLoaded(path))
    }

    /// Create a new, mostly empty entity and select it.
    pub fn add_entity(&mut self, kind: EntityKind, name: &str) -> Result<EntityRef> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditorError::EmptyName);
        }
        if self.store.is_empty() {
            return Err(EditorError::NoDocuments);
        }
        if self.index.contains(kind, name) {
            return Err(EditorError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }

        let (path, container) = self.target_container(kind)?;
        let doc = self
            .store
            .document_mut(&path)
            .ok_or_else(|| EditorError::NotLoaded(path.clone()))?;

        let node = doc.create_element(kind.element_tag());
        doc.set_attribute(node, statics::ATTR_NAME, name);
        ensure_child(doc, node, statics::TAG_TAGS);
        if kind == EntityKind::Item {
            doc.set_attribute(node, statics::ATTR_CATEGORY, statics::DEFAULT_ITEM_CATEGORY);
            doc.set_attribute(node, statics::ATTR_PRICE, statics::DEFAULT_ITEM_PRICE);
            for section in [
                ItemSection::BaseAbilities,
                ItemSection::RecyclingParts,
                ItemSection::Variants,
            ] {
                ensure_child(doc, node, section.container_tag());
            }
        }
        if !doc.append_child(container, node) {
            return Err(EditorError::ParentNotFound {
                kind,
                name: name.to_string(),
            });
        }

        self.index.register(kind, name, &path, node)?;
        if kind == EntityKind::Item {
            self.index
                .note_value(VocabularyId::Categories, statics::DEFAULT_ITEM_CATEGORY);
        }
        self.dirty.mark_dirty(&path);
        self.session.select(&self.index, kind, name)?;
        tracing::info!("added {kind} '{name}' to {path:?}");

        self.index.lookup(kind, name).ok_or_else(|| EditorError::NotFound {
            kind,
            name: name.to_string(),
        })
    }

    /// Detach an entity from its document and drop it from the index.
    pub fn remove_entity(&mut self, kind: EntityKind, name: &str) -> Result<()> {
        let entity = self.index.lookup(kind, name).ok_or_else(|| EditorError::NotFound {
            kind,
            name: name.to_string(),
        })?;
        let doc = self
            .store
            .document_mut(&entity.path)
            .ok_or_else(|| EditorError::NotLoaded(entity.path.clone()))?;

        let parent_not_found = || EditorError::ParentNotFound {
            kind,
            name: name.to_string(),
        };
        let Some(parent) = doc.parent(entity.node) else {
            tracing::error!("{kind} '{name}' has no parent in {:?}", entity.path);
            return Err(parent_not_found());
        };
        if !doc.remove_child(parent, entity.node) {
            tracing::error!("{kind} '{name}' is not under its recorded parent in {:?}", entity.path);
            return Err(parent_not_found());
        }

        self.dirty.mark_dirty(&entity.path);
        self.index.unregister(kind, name);
        self.index.prune_detached(&entity.path, doc);
        if self.session.is_selected(kind, name) {
            self.session.clear();
        } else {
            self.session.refresh(&self.index);
        }
        tracing::info!("removed {kind} '{name}' from {:?}", entity.path);
        Ok(())
    }

    /// Deep copy an entity under a new name, right after the original, and select the copy.
    pub fn duplicate_entity(&mut self, kind: EntityKind, name: &str, new_name: &str) -> Result<EntityRef> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(EditorError::EmptyName);
        }
        if self.index.contains(kind, new_name) {
            return Err(EditorError::DuplicateName {
                kind,
                name: new_name.to_string(),
            });
        }
        let source = self.index.lookup(kind, name).ok_or_else(|| EditorError::NotFound {
            kind,
            name: name.to_string(),
        })?;
        let doc = self
            .store
            .document_mut(&source.path)
            .ok_or_else(|| EditorError::NotLoaded(source.path.clone()))?;

        let Some(parent) = doc.parent(source.node) else {
            tracing::error!("{kind} '{name}' has no parent in {:?}", source.path);
            return Err(EditorError::ParentNotFound {
                kind,
                name: name.to_string(),
            });
        };
        let copy = doc.deep_copy(source.node).ok_or_else(|| EditorError::NotFound {
            kind,
            name: name.to_string(),
        })?;
        doc.set_attribute(copy, statics::ATTR_NAME, new_name);
        if !doc.insert_after(source.node, copy) {
            doc.append_child(parent, copy);
        }

        self.index.register(kind, new_name, &source.path, copy)?;
        self.dirty.mark_dirty(&source.path);
        self.session.select(&self.index, kind, new_name)?;
        tracing::info!("duplicated {kind} '{name}' as '{new_name}'");

        self.index
            .lookup(kind, new_name)
            .ok_or_else(|| EditorError::NotFound {
                kind,
                name: new_name.to_string(),
            })
    }

    /// Write one loaded file to its own path. On failure the file stays dirty.
    pub fn save_file(&mut self, path: &Path) -> Result<()> {
        if !self.store.contains(path) {
            return Err(EditorError::NotLoaded(path.to_path_buf()));
        }
        if let Err(e) = self.store.save(path) {
            tracing::error!("{e}");
            return Err(e);
        }
        self.dirty.mark_clean(path);
        Ok(())
    }

    /// Save the selected entity's file. `Ok(false)` without a selection.
    pub fn save_selected(&mut self) -> Result<bool> {
        let Some(path) = self.session.selected().map(|s| s.path.clone()) else {
            return Ok(false);
        };
        self.save_file(&path)?;
        Ok(true)
    }

    /// Write every dirty file.
    pub fn save_all(&mut self) -> SaveAllReport {
        let mut report = SaveAllReport::default();
        for path in self.dirty.all_dirty() {
            match self.save_file(&path) {
                Ok(()) => report.saved.push(path),
                Err(e) => report.failures.push((path, e)),
            }
        }
        tracing::info!(
            saved = report.saved.len(),
            failed = report.failures.len(),
            "save all finished"
        );
        report
    }

    /// Save the selected entity's file under a new name. Returns the written path.
    pub fn save_as(&mut self, new_path: &Path) -> Result<Option<PathBuf>> {
        let Some(path) = self.session.selected().map(|s| s.path.clone()) else {
            return Ok(None);
        };
        self.save_file_as(&path, new_path).map(Some)
    }

    /// Write `path` to `new_path` (`.xml` appended when missing) and adopt the new file:
    /// every entity of `path` found by name in the written file now lives there.
    /// `path` keeps its dirty flag; the new file is clean.
    pub fn save_file_as(&mut self, path: &Path, new_path: &Path) -> Result<PathBuf> {
        let target = with_xml_extension(new_path);
        if let Err(e) = self.store.save_as(path, &target) {
            tracing::error!("{e}");
            return Err(e);
        }
        if target == path {
            self.dirty.mark_clean(path);
            return Ok(target);
        }

        let file = LoadedFile::load(&target)?;
        self.store.insert(file);

        let Some(doc) = self.store.document(&target) else {
            return Err(EditorError::NotLoaded(target));
        };
        let written = entity_nodes(doc);
        let mut affected = self.index.entities_in_file(path);
        affected.extend(self.index.entities_in_file(&target));
        let mut adopted = 0usize;
        for entity in affected {
            let key = (entity.kind, entity.name);
            match written.get(&key) {
                Some(&node) => {
                    self.index.repoint(key.0, &key.1, &target, node);
                    adopted += 1;
                }
                // The overwritten file no longer defines it.
                None if entity.path == target => {
                    self.index.unregister(key.0, &key.1);
                }
                None => {}
            }
        }

        self.dirty.mark_clean(&target);
        self.session.refresh(&self.index);
        tracing::info!("{adopted} entities now belong to {target:?}");
        Ok(target)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty.dirty_count() > 0
    }

    /// App title, the selected file name and a marker for unsaved changes.
    pub fn window_title(&self) -> String {
        let mut title = statics::EN_APP_TITLE.to_string();
        let selected_path = self.session.selected().map(|s| s.path.as_path());

        if let Some(file) = selected_path.and_then(|p| self.store.get(p)) {
            title.push_str(" - ");
            title.push_str(&file.file_name());
        }
        if selected_path.is_some_and(|p| self.dirty.is_dirty(p)) {
            title.push(' ');
            title.push_str(statics::EN_TITLE_DIRTY_SELECTED);
        } else if self.has_unsaved_changes() {
            title.push(' ');
            title.push_str(statics::EN_TITLE_DIRTY_OTHER);
        }
        title
    }
}
