use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use w3xml::{EditorState, EntityKind, LineEnding, LoadedFile};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn saved_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    assert_eq!(&bytes[..2], &[0xFF, 0xFE]);
    let units: Vec<u16> = bytes[2..]
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    Ok(String::from_utf16(&units)?)
}

#[test]
fn crlf_and_tabs_are_kept_on_save() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("crlf.xml");
    let text = "<?xml version=\"1.0\" encoding=\"UTF-16\"?>\r\n<redxml>\r\n\t<abilities>\r\n\t\t<ability name=\"Tabbed\"/>\r\n\t</abilities>\r\n</redxml>\r\n";
    fs::write(&path, text)?;

    let mut editor = EditorState::new();
    editor.open_folder(dir.path())?;
    let file = editor.store().get(&path).ok_or("not loaded")?;
    assert_eq!(file.line_ending, LineEnding::CrLf);
    assert_eq!(file.indent, "\t");

    editor.select(EntityKind::Ability, "Tabbed")?;
    let node = editor.selected().ok_or("no selection")?.node;
    assert!(editor.set_attribute(node, "note", "x"));
    editor.save_selected()?;

    let saved = saved_text(&path)?;
    assert_eq!(
        saved,
        "<?xml version=\"1.0\" encoding=\"UTF-16\"?>\r\n<redxml>\r\n\t<abilities>\r\n\t\t<ability name=\"Tabbed\" note=\"x\"/>\r\n\t</abilities>\r\n</redxml>\r\n"
    );
    Ok(())
}

#[test]
fn four_space_indentation_is_kept() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("wide.xml");
    fs::write(
        &path,
        "<redxml>\n    <items>\n        <item name=\"Wide\"/>\n    </items>\n</redxml>\n",
    )?;

    let file = LoadedFile::load(&path)?;
    assert_eq!(file.line_ending, LineEnding::Lf);
    assert_eq!(file.indent, "    ");
    fs::write(&path, file.to_bytes())?;

    assert!(saved_text(&path)?.contains("\n        <item name=\"Wide\"/>\n"));
    Ok(())
}

#[test]
fn utf16_input_with_and_without_bom_is_read() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let text = "<redxml><items><item name=\"Wiedźmin\"/></items></redxml>";

    let mut le_bom = vec![0xFF, 0xFE];
    le_bom.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
    fs::write(dir.path().join("le.xml"), &le_bom)?;

    let be_bare: Vec<u8> = text
        .replace("Wiedźmin", "Ciri")
        .encode_utf16()
        .flat_map(u16::to_be_bytes)
        .collect();
    fs::write(dir.path().join("be.xml"), &be_bare)?;

    let mut editor = EditorState::new();
    let stats = editor.open_folder(dir.path())?;
    assert_eq!(stats.parsed, 2);
    assert!(editor.lookup(EntityKind::Item, "Wiedźmin").is_some());
    assert!(editor.lookup(EntityKind::Item, "Ciri").is_some());

    let le = LoadedFile::load(&dir.path().join("le.xml"))?;
    assert_eq!(le.encoding, encoding_rs::UTF_16LE);
    Ok(())
}

#[test]
fn special_characters_are_escaped_on_write() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("esc.xml");
    fs::write(
        &path,
        "<redxml><abilities><ability name=\"A&amp;B\"><tags>x &lt; y</tags></ability></abilities></redxml>",
    )?;

    let mut editor = EditorState::new();
    editor.open_folder(dir.path())?;
    editor.select(EntityKind::Ability, "A&B")?;
    let node = editor.selected().ok_or("no selection")?.node;
    assert!(editor.set_attribute(node, "description", "say \"hi\" <now>"));
    editor.save_selected()?;

    let saved = saved_text(&path)?;
    assert!(saved.contains("name=\"A&amp;B\""));
    assert!(saved.contains("description=\"say &quot;hi&quot; &lt;now&gt;\""));
    assert!(saved.contains("<tags>x &lt; y</tags>"));
    Ok(())
}

