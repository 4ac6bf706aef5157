// Central place for UI strings and other non-localized constants.
// Keep these out of gui.rs and editor.rs so tag names and labels are spelled once.

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "W3XML: Witcher 3 XML Editor";

pub const EN_BTN_OPEN_FOLDER: &str = "Open Folder...";
pub const EN_BTN_SAVE: &str = "Save";
pub const EN_BTN_SAVE_ALL: &str = "Save All";
pub const EN_BTN_SAVE_AS: &str = "Save As...";
pub const EN_BTN_ABOUT: &str = "About";
pub const EN_BTN_TOGGLE_THEME: &str = "Theme";

pub const EN_BTN_ADD: &str = "Add";
pub const EN_BTN_DUPLICATE: &str = "Duplicate";
pub const EN_BTN_REMOVE: &str = "Remove";
pub const EN_BTN_OK: &str = "OK";
pub const EN_BTN_CANCEL: &str = "Cancel";
pub const EN_BTN_DISCARD: &str = "Discard";
pub const EN_BTN_ADD_ATTRIBUTE: &str = "+ Attribute";
pub const EN_BTN_ADD_PROPERTY: &str = "+ Property";
pub const EN_BTN_ADD_BASE_ABILITY: &str = "+ Base ability";
pub const EN_BTN_ADD_PART: &str = "+ Part";
pub const EN_BTN_ADD_VARIANT: &str = "+ Variant";
pub const EN_BTN_ADD_NESTED: &str = "+ Nested";
pub const EN_BTN_REMOVE_SHORT: &str = "x";
pub const EN_BTN_SUGGEST: &str = "v";

pub const EN_WINDOW_ABOUT: &str = "About";
pub const EN_WINDOW_LOAD_SUMMARY: &str = "Load summary";
pub const EN_WINDOW_UNSAVED: &str = "Unsaved changes";
pub const EN_WINDOW_CONFIRM_REMOVE: &str = "Remove entry";

pub const EN_ABOUT_HEADING: &str = "W3XML: Witcher 3 XML Editor";
pub const EN_ABOUT_VERSION: &str = "Version:";
pub const EN_ABOUT_BLURB: &str = "Form editor for Witcher 3 <ability> and <item> definition files.";

pub const EN_HOME_INSTRUCTIONS: &str = "Open a folder with definition XML files to begin.";
pub const EN_SELECT_ENTRY: &str = "Select an entry from the left.";

pub const EN_ABILITIES: &str = "Abilities";
pub const EN_ITEMS: &str = "Items";

pub const EN_LABEL_FILTER: &str = "Filter:";
pub const EN_HINT_FILTER: &str = "name";
pub const EN_LABEL_FILE: &str = "File:";
pub const EN_LABEL_TAGS: &str = "Tags:";
pub const EN_LABEL_ATTRIBUTES: &str = "Attributes";
pub const EN_LABEL_PROPERTIES: &str = "Properties";
pub const EN_LABEL_BASE_ABILITIES: &str = "Base abilities";
pub const EN_LABEL_RECYCLING_PARTS: &str = "Recycling parts";
pub const EN_LABEL_VARIANTS: &str = "Variants";
pub const EN_LABEL_COUNT: &str = "count";
pub const EN_LABEL_NESTED: &str = "Nested elements";

pub const EN_COL_ATTRIBUTE: &str = "Attribute";
pub const EN_COL_VALUE: &str = "Value";

pub const EN_PROMPT_NEW_NAME: &str = "Name of the new entry:";
pub const EN_PROMPT_COPY_NAME: &str = "Name for the copy:";
pub const EN_PROMPT_ATTRIBUTE: &str = "Name of the new attribute:";
pub const EN_PROMPT_PROPERTY: &str = "Name of the new property (e.g. 'vitality'):";
pub const EN_PROMPT_NESTED_TAG: &str = "Tag name (e.g. 'item'):";
pub const EN_PROMPT_NESTED_TEXT: &str = "Text:";
pub const EN_PROMPT_UNSAVED: &str = "There are unsaved changes. Save them first?";
pub const EN_PROMPT_REMOVE: &str = "Really remove";

pub const EN_SUMMARY_FOUND: &str = "XML files found:";
pub const EN_SUMMARY_PARSED: &str = "parsed:";
pub const EN_SUMMARY_FAILED: &str = "Files skipped because of errors:";
pub const EN_SUMMARY_SHADOWED: &str = "Duplicate names ignored (first definition wins):";

pub const EN_BADGE_DIRTY: &str = "modified";
pub const EN_STATUS_NO_FOLDER: &str = "No folder loaded";
pub const EN_STATUS_DIRTY_FILES: &str = "unsaved files:";

pub const EN_ERR_OPEN_FOLDER: &str = "Open folder failed";
pub const EN_ERR_SAVE: &str = "Save failed";
pub const EN_ERR_SAVE_AS: &str = "Save As failed";
pub const EN_ERR_NO_SELECTION: &str = "Select an entry first";

// Title markers: the selected file is dirty / some other file is dirty.
pub const EN_TITLE_DIRTY_SELECTED: &str = "(*)";
pub const EN_TITLE_DIRTY_OTHER: &str = "(+)";

// Suffix suggested by Save As.
pub const EN_COPY_SUFFIX: &str = "_copy";

// Newline constants (used for save formatting; keep out of xml code).
pub const NL_LF: &str = "\n";
pub const NL_CRLF: &str = "\r\n";

pub const DEFAULT_INDENT_WIDTH: usize = 2;
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-16"?>"#;
pub const XML_EXTENSION: &str = "xml";

// Settings file
pub const CONFIG_FILE_NAME: &str = "editor_config.toml";

// Definition file structure (TAG_/ATTR_ prefix)
pub const TAG_DEFINITIONS: &str = "definitions";
pub const TAG_ABILITIES: &str = "abilities";
pub const TAG_ABILITY: &str = "ability";
pub const TAG_ITEMS: &str = "items";
pub const TAG_ITEM: &str = "item";
pub const TAG_TAGS: &str = "tags";
pub const TAG_BASE_ABILITIES: &str = "base_abilities";
pub const TAG_BASE_ABILITY: &str = "a";
pub const TAG_RECYCLING_PARTS: &str = "recycling_parts";
pub const TAG_PARTS: &str = "parts";
pub const TAG_VARIANTS: &str = "variants";
pub const TAG_VARIANT: &str = "variant";

pub const ATTR_NAME: &str = "name";
pub const ATTR_TYPE: &str = "type";
pub const ATTR_MIN: &str = "min";
pub const ATTR_COUNT: &str = "count";
pub const ATTR_CATEGORY: &str = "category";
pub const ATTR_PRICE: &str = "price";
pub const ATTR_EQUIP_TEMPLATE: &str = "equip_template";

/// Child tags of an item that are sections, not ability properties.
pub const RESERVED_SECTION_TAGS: &[&str] =
    &[TAG_TAGS, TAG_BASE_ABILITIES, TAG_RECYCLING_PARTS, TAG_VARIANTS];

// Defaults for newly created elements
pub const DEFAULT_ITEM_CATEGORY: &str = "misc";
pub const DEFAULT_ITEM_PRICE: &str = "1";
pub const DEFAULT_PART_COUNT: &str = "1";
pub const DEFAULT_VARIANT_CATEGORY: &str = "DefaultCategory";
pub const DEFAULT_VARIANT_TEMPLATE: &str = "DefaultTemplate";
pub const DEFAULT_PROPERTY_TYPE: &str = "add";
pub const DEFAULT_PROPERTY_MIN: &str = "0";
pub const DEFAULT_NESTED_TAG: &str = "item";
