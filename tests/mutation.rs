use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use w3xml::{EditorError, EditorState, EntityKind, ItemSection, VocabularyId};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const DEFS: &str = r#"<redxml>
  <definitions>
    <abilities>
      <ability name="Vigor">
        <tags>Buff</tags>
        <vitality type="add" min="50"/>
      </ability>
      <ability name="Haste">
        <tags>a,b</tags>
      </ability>
    </abilities>
    <items>
      <item name="Steel_Sword" category="sword">
        <tags>melee,weapon</tags>
        <variants>
          <variant category="sword" equip_template="sword_template">
            <item>Steel_Sword_Hilt</item>
          </variant>
        </variants>
      </item>
    </items>
  </definitions>
</redxml>
"#;

fn open(files: &[(&str, &str)]) -> Result<(tempfile::TempDir, EditorState)> {
    let dir = tempfile::tempdir()?;
    for (name, text) in files {
        fs::write(dir.path().join(name), text)?;
    }
    let mut editor = EditorState::new();
    editor.open_folder(dir.path())?;
    Ok((dir, editor))
}

fn path_of(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

fn select(editor: &mut EditorState, kind: EntityKind, name: &str) -> Result<w3xml::NodeId> {
    editor.select(kind, name)?;
    Ok(editor.selected().ok_or("no selection")?.node)
}

#[test]
fn writing_the_same_value_does_not_dirty_the_file() -> Result<()> {
    let (_dir, mut editor) = open(&[("defs.xml", DEFS)])?;
    let item = select(&mut editor, EntityKind::Item, "Steel_Sword")?;

    assert!(!editor.set_attribute(item, "category", "sword"));
    assert!(!editor.set_tags(item, " melee , weapon "));
    assert!(!editor.has_unsaved_changes());

    assert!(editor.set_attribute(item, "category", "greatsword"));
    assert!(editor.has_unsaved_changes());
    assert!(
        editor
            .vocabulary()
            .contains(VocabularyId::Categories, "greatsword")
    );
    Ok(())
}

#[test]
fn element_edits_need_a_selection() -> Result<()> {
    let (_dir, mut editor) = open(&[("defs.xml", DEFS)])?;
    let item = editor
        .lookup(EntityKind::Item, "Steel_Sword")
        .ok_or("not indexed")?
        .node;

    assert!(!editor.set_attribute(item, "category", "axe"));
    assert!(!editor.set_text(item, "text"));
    assert_eq!(editor.add_section_entry(ItemSection::Variants), None);
    assert!(!editor.has_unsaved_changes());
    Ok(())
}

#[test]
fn adding_a_name_twice_is_refused() -> Result<()> {
    let (dir, mut editor) = open(&[("defs.xml", DEFS)])?;
    let before = editor.index().len(EntityKind::Ability);

    let added = editor.add_entity(EntityKind::Ability, "  Fresh ")?;
    assert_eq!(added.name, "Fresh");
    assert_eq!(added.path, path_of(&dir, "defs.xml"));
    assert_eq!(editor.selected().map(|s| s.name.as_str()), Some("Fresh"));

    assert!(matches!(
        editor.add_entity(EntityKind::Ability, "Fresh"),
        Err(EditorError::DuplicateName { .. })
    ));
    assert!(matches!(
        editor.add_entity(EntityKind::Ability, "   "),
        Err(EditorError::EmptyName)
    ));
    assert_eq!(editor.index().len(EntityKind::Ability), before + 1);

    let doc = editor.selected_document().ok_or("missing document")?;
    let abilities = doc
        .parent(added.node)
        .ok_or("not attached under the container")?;
    assert_eq!(doc.name(abilities), Some("abilities"));
    assert!(doc.find_child(added.node, "tags").is_some());
    Ok(())
}

#[test]
fn new_items_get_default_attributes_and_sections() -> Result<()> {
    let (_dir, mut editor) = open(&[("defs.xml", DEFS)])?;
    let added = editor.add_entity(EntityKind::Item, "Bread")?;

    let doc = editor.selected_document().ok_or("missing document")?;
    assert_eq!(doc.attribute(added.node, "category"), Some("misc"));
    assert_eq!(doc.attribute(added.node, "price"), Some("1"));
    for section in ["tags", "base_abilities", "recycling_parts", "variants"] {
        assert!(doc.find_child(added.node, section).is_some(), "{section}");
    }
    Ok(())
}

#[test]
fn new_entities_go_to_the_selected_file_first() -> Result<()> {
    let only_items = r#"<redxml><items><item name="Rope"/></items></redxml>"#;
    let (dir, mut editor) = open(&[("a_defs.xml", DEFS), ("b_items.xml", only_items)])?;

    // Without a selection, the first file that already has the container.
    let added = editor.add_entity(EntityKind::Ability, "Anywhere")?;
    assert_eq!(added.path, path_of(&dir, "a_defs.xml"));

    // The selected file gets a <definitions><abilities> wrapper if it has none.
    editor.select(EntityKind::Item, "Rope")?;
    let added = editor.add_entity(EntityKind::Ability, "Knot")?;
    assert_eq!(added.path, path_of(&dir, "b_items.xml"));

    let doc = editor
        .store()
        .document(&path_of(&dir, "b_items.xml"))
        .ok_or("missing document")?;
    let container = doc.parent(added.node).ok_or("missing container")?;
    assert_eq!(doc.name(container), Some("abilities"));
    let wrapper = doc.parent(container).ok_or("missing wrapper")?;
    assert_eq!(doc.name(wrapper), Some("definitions"));
    assert_eq!(doc.parent(wrapper), Some(doc.root()));
    Ok(())
}

#[test]
fn adding_without_any_documents_fails() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut editor = EditorState::new();
    editor.open_folder(dir.path())?;
    assert!(matches!(
        editor.add_entity(EntityKind::Item, "Ghost"),
        Err(EditorError::NoDocuments)
    ));
    Ok(())
}

#[test]
fn removed_entities_disappear_from_index_and_tree() -> Result<()> {
    let (dir, mut editor) = open(&[("defs.xml", DEFS)])?;
    let node = select(&mut editor, EntityKind::Ability, "Haste")?;

    editor.remove_entity(EntityKind::Ability, "Haste")?;
    assert!(editor.lookup(EntityKind::Ability, "Haste").is_none());
    assert!(editor.selected().is_none());
    assert!(editor.dirty().is_dirty(&path_of(&dir, "defs.xml")));

    let doc = editor
        .store()
        .document(&path_of(&dir, "defs.xml"))
        .ok_or("missing document")?;
    assert!(!doc.is_attached(node));

    assert!(matches!(
        editor.remove_entity(EntityKind::Ability, "Haste"),
        Err(EditorError::NotFound { .. })
    ));
    Ok(())
}

#[test]
fn duplicates_are_independent_copies_placed_after_the_source() -> Result<()> {
    let (dir, mut editor) = open(&[("defs.xml", DEFS)])?;
    let copy = editor.duplicate_entity(EntityKind::Ability, "Vigor", "Vigor_Plus")?;
    let source = editor
        .lookup(EntityKind::Ability, "Vigor")
        .ok_or("source no longer indexed")?;

    {
        let doc = editor
            .store()
            .document(&path_of(&dir, "defs.xml"))
            .ok_or("missing document")?;
        assert_eq!(
            doc.position_in_parent(copy.node),
            doc.position_in_parent(source.node).map(|p| p + 1)
        );
        assert_eq!(doc.attribute(copy.node, "name"), Some("Vigor_Plus"));
    }

    assert_eq!(editor.selected().map(|s| s.node), Some(copy.node));
    let copied_vitality = editor
        .selected_document()
        .and_then(|doc| doc.find_child(copy.node, "vitality"))
        .ok_or("missing copied property")?;
    assert!(editor.set_attribute(copied_vitality, "min", "75"));

    let doc = editor
        .store()
        .document(&path_of(&dir, "defs.xml"))
        .ok_or("missing document")?;
    let original_vitality = doc
        .find_child(source.node, "vitality")
        .ok_or("missing original property")?;
    assert_eq!(doc.attribute(original_vitality, "min"), Some("50"));
    assert_eq!(doc.attribute(copied_vitality, "min"), Some("75"));

    assert!(matches!(
        editor.duplicate_entity(EntityKind::Ability, "Vigor", "Haste"),
        Err(EditorError::DuplicateName { .. })
    ));
    Ok(())
}

#[test]
fn clearing_tags_removes_the_element_on_disk() -> Result<()> {
    let (dir, mut editor) = open(&[("defs.xml", DEFS)])?;
    let haste = select(&mut editor, EntityKind::Ability, "Haste")?;
    assert_eq!(editor.tags_of(haste), "a,b");

    assert!(editor.set_tags(haste, ""));
    assert_eq!(editor.tags_of(haste), "");
    {
        let doc = editor.selected_document().ok_or("missing document")?;
        assert_eq!(doc.find_child(haste, "tags"), None);
    }
    editor.save_selected()?;

    let mut reloaded = EditorState::new();
    reloaded.open_folder(dir.path())?;
    let haste = select(&mut reloaded, EntityKind::Ability, "Haste")?;
    assert_eq!(reloaded.tags_of(haste), "");
    let doc = reloaded.selected_document().ok_or("missing document")?;
    assert_eq!(doc.find_child(haste, "tags"), None);
    assert_eq!(doc.subtree_to_string(haste), "<ability name=\"Haste\"/>");
    Ok(())
}

#[test]
fn properties_are_validated_before_being_added() -> Result<()> {
    let (_dir, mut editor) = open(&[("defs.xml", DEFS)])?;
    select(&mut editor, EntityKind::Item, "Steel_Sword")?;
    assert!(matches!(
        editor.add_property("vitality"),
        Err(EditorError::WrongKind(EntityKind::Ability))
    ));

    let vigor = select(&mut editor, EntityKind::Ability, "Vigor")?;
    assert!(matches!(editor.add_property("  "), Err(EditorError::EmptyName)));
    assert!(matches!(
        editor.add_property("tags"),
        Err(EditorError::ReservedName(_))
    ));
    assert!(matches!(
        editor.add_property("vitality"),
        Err(EditorError::DuplicateAttribute { .. })
    ));
    assert!(!editor.has_unsaved_changes());

    let added = editor.add_property("attack power")?;
    let doc = editor.selected_document().ok_or("missing document")?;
    assert_eq!(doc.parent(added), Some(vigor));
    assert_eq!(
        doc.subtree_to_string(added),
        "<attack_power type=\"add\" min=\"0\"/>"
    );
    assert!(
        editor
            .vocabulary()
            .contains(VocabularyId::PropertyNames, "attack_power")
    );
    Ok(())
}

#[test]
fn attributes_are_sanitised_and_unique() -> Result<()> {
    let (_dir, mut editor) = open(&[("defs.xml", DEFS)])?;
    let item = select(&mut editor, EntityKind::Item, "Steel_Sword")?;

    assert!(editor.add_attribute(item, " icon path ")?);
    assert_eq!(
        editor
            .selected_document()
            .and_then(|d| d.attribute(item, "icon_path")),
        Some("")
    );
    assert!(matches!(
        editor.add_attribute(item, "category"),
        Err(EditorError::DuplicateAttribute { .. })
    ));
    assert!(matches!(
        editor.add_attribute(item, ""),
        Err(EditorError::EmptyName)
    ));
    assert!(
        editor
            .vocabulary()
            .contains(VocabularyId::ItemAttributes, "icon_path")
    );
    Ok(())
}

#[test]
fn entity_names_cannot_be_changed_as_attributes() -> Result<()> {
    let (dir, mut editor) = open(&[("defs.xml", DEFS)])?;
    let haste = editor
        .lookup(EntityKind::Ability, "Haste")
        .ok_or("not indexed")?
        .node;
    let vigor = select(&mut editor, EntityKind::Ability, "Vigor")?;

    assert!(!editor.set_attribute(vigor, "name", "Renamed"));
    assert!(!editor.set_attribute(haste, "name", "Renamed"));
    assert!(!editor.has_unsaved_changes());
    assert!(editor.lookup(EntityKind::Ability, "Renamed").is_none());
    let entity = editor.lookup(EntityKind::Ability, "Vigor").ok_or("not indexed")?;
    assert_eq!(entity.node, vigor);
    let doc = editor.selected_document().ok_or("missing document")?;
    assert_eq!(doc.attribute(vigor, "name"), Some("Vigor"));
    assert_eq!(doc.attribute(haste, "name"), Some("Haste"));

    // A `name` on an element that is not an entity is an ordinary attribute.
    let vitality = doc.find_child(vigor, "vitality").ok_or("missing vitality")?;
    assert!(editor.set_attribute(vitality, "name", "bonus"));
    assert!(editor.dirty().is_dirty(&path_of(&dir, "defs.xml")));
    let doc = editor.selected_document().ok_or("missing document")?;
    assert_eq!(doc.attribute(vitality, "name"), Some("bonus"));
    Ok(())
}

#[test]
fn section_entries_get_their_defaults() -> Result<()> {
    let (_dir, mut editor) = open(&[("defs.xml", DEFS)])?;
    let item = select(&mut editor, EntityKind::Item, "Steel_Sword")?;

    let part = editor
        .add_section_entry(ItemSection::RecyclingParts)
        .ok_or("missing part")?;
    let variant = editor
        .add_section_entry(ItemSection::Variants)
        .ok_or("missing variant")?;
    let base = editor
        .add_section_entry(ItemSection::BaseAbilities)
        .ok_or("missing base ability")?;
    assert!(editor.set_text(base, "  Vigor "));

    let doc = editor.selected_document().ok_or("missing document")?;
    assert_eq!(doc.subtree_to_string(part), "<parts count=\"1\"/>");
    assert_eq!(
        doc.subtree_to_string(variant),
        "<variant category=\"DefaultCategory\" equip_template=\"DefaultTemplate\"/>"
    );
    assert_eq!(doc.text(base), Some("Vigor"));

    let variants = doc.find_child(item, "variants").ok_or("missing variants")?;
    assert_eq!(doc.find_children(variants, "variant").count(), 2);
    let recycling = doc.find_child(item, "recycling_parts").ok_or("recycling_parts not created")?;
    assert_eq!(doc.parent(part), Some(recycling));
    Ok(())
}

#[test]
fn nested_variant_elements_carry_text() -> Result<()> {
    let (_dir, mut editor) = open(&[("defs.xml", DEFS)])?;
    let item = select(&mut editor, EntityKind::Item, "Steel_Sword")?;
    let variant = {
        let doc = editor.selected_document().ok_or("missing document")?;
        let variants = doc.find_child(item, "variants").ok_or("missing variants")?;
        doc.find_child(variants, "variant").ok_or("missing variant")?
    };

    let nested = editor
        .add_nested_element(variant, "ability", " Vigor ")?
        .ok_or("nothing added")?;
    let doc = editor.selected_document().ok_or("missing document")?;
    assert_eq!(doc.subtree_to_string(nested), "<ability>Vigor</ability>");
    assert!(matches!(
        editor.add_nested_element(variant, " ", "x"),
        Err(EditorError::EmptyName)
    ));
    Ok(())
}

#[test]
fn stale_child_removal_is_ignored() -> Result<()> {
    let (_dir, mut editor) = open(&[("defs.xml", DEFS)])?;
    let item = select(&mut editor, EntityKind::Item, "Steel_Sword")?;
    let (variants, variant, nested) = {
        let doc = editor.selected_document().ok_or("missing document")?;
        let variants = doc.find_child(item, "variants").ok_or("missing variants")?;
        let variant = doc.find_child(variants, "variant").ok_or("missing variant")?;
        let nested = doc.find_child(variant, "item").ok_or("missing nested")?;
        (variants, variant, nested)
    };

    assert!(!editor.remove_child(variants, nested));
    assert!(!editor.has_unsaved_changes());

    assert!(editor.remove_child(variant, nested));
    assert!(!editor.remove_child(variant, nested));
    let doc = editor.selected_document().ok_or("missing document")?;
    assert_eq!(doc.find_child(variant, "item"), None);
    Ok(())
}

#[test]
fn window_title_marks_unsaved_changes() -> Result<()> {
    let other = r#"<redxml><items><item name="Rope"/></items></redxml>"#;
    let (dir, mut editor) = open(&[("a_defs.xml", DEFS), ("b_items.xml", other)])?;
    assert!(!editor.window_title().contains("(*)"));

    let rope = select(&mut editor, EntityKind::Item, "Rope")?;
    assert!(editor.window_title().ends_with("b_items.xml"));
    assert!(editor.set_attribute(rope, "price", "3"));
    assert!(editor.window_title().ends_with("b_items.xml (*)"));

    select(&mut editor, EntityKind::Item, "Steel_Sword")?;
    assert!(editor.window_title().ends_with("a_defs.xml (+)"));
    assert_eq!(editor.dirty().all_dirty(), vec![path_of(&dir, "b_items.xml")]);
    Ok(())
}
