use crate::statics;
use crate::vocabulary::{Vocabulary, VocabularyId};
use crate::{
    EditorConfig, EditorError, EditorState, EntityKind, ItemSection, LoadStats, NodeId,
    XmlDocument, suggested_copy_path,
};
use anyhow::Context;
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub fn run_gui() -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 900.0]),
        ..Default::default()
    };
    let config_path = EditorConfig::default_path();
    eframe::run_native(
        statics::EN_APP_TITLE,
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            let mut app = W3xmlApp::new(config_path);
            app.restore_last_folder();
            Ok(Box::new(app))
        }),
    )
}

/// Edits requested while drawing a frame. They are applied after the frame is laid out,
/// so rendering only ever needs shared access to the editor state.
#[derive(Debug, Clone)]
enum UiAction {
    OpenFolder,
    SaveSelected,
    SaveAll,
    SaveAs,
    Select(EntityKind, String),
    SetAttribute(NodeId, String, String),
    SetTags(NodeId, String),
    SetText(NodeId, String),
    AddSectionEntry(ItemSection),
    RemoveChild(NodeId, NodeId),
    Prompt(PromptKind),
    ConfirmRemove(EntityKind, String),
}

#[derive(Debug, Clone)]
enum PromptKind {
    AddEntity(EntityKind),
    Duplicate(EntityKind, String),
    AddAttribute(NodeId, VocabularyId),
    AddProperty,
    AddNested(NodeId),
}

impl PromptKind {
    fn title(&self) -> String {
        match self {
            PromptKind::AddEntity(kind) => format!("{} {kind}", statics::EN_BTN_ADD),
            PromptKind::Duplicate(kind, name) => {
                format!("{} {kind} '{name}'", statics::EN_BTN_DUPLICATE)
            }
            PromptKind::AddAttribute(..) => statics::EN_BTN_ADD_ATTRIBUTE.to_string(),
            PromptKind::AddProperty => statics::EN_BTN_ADD_PROPERTY.to_string(),
            PromptKind::AddNested(_) => statics::EN_BTN_ADD_NESTED.to_string(),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PromptKind::AddEntity(_) => statics::EN_PROMPT_NEW_NAME,
            PromptKind::Duplicate(..) => statics::EN_PROMPT_COPY_NAME,
            PromptKind::AddAttribute(..) => statics::EN_PROMPT_ATTRIBUTE,
            PromptKind::AddProperty => statics::EN_PROMPT_PROPERTY,
            PromptKind::AddNested(_) => statics::EN_PROMPT_NESTED_TAG,
        }
    }

    fn suggestion_set(&self) -> Option<VocabularyId> {
        match self {
            PromptKind::AddAttribute(_, set) => Some(*set),
            PromptKind::AddProperty => Some(VocabularyId::PropertyNames),
            PromptKind::AddNested(_) => Some(VocabularyId::VariantNestedTags),
            PromptKind::AddEntity(_) | PromptKind::Duplicate(..) => None,
        }
    }
}

/// A modal name prompt. Nothing reaches the editor until OK is pressed.
#[derive(Debug)]
struct Prompt {
    kind: PromptKind,
    input: String,
    text: String,
    error: Option<String>,
    request_focus: bool,
}

impl Prompt {
    fn new(kind: PromptKind) -> Self {
        let input = match &kind {
            PromptKind::Duplicate(_, name) => format!("{name}{}", statics::EN_COPY_SUFFIX),
            PromptKind::AddNested(_) => statics::DEFAULT_NESTED_TAG.to_string(),
            _ => String::new(),
        };
        Self {
            kind,
            input,
            text: String::new(),
            error: None,
            request_focus: true,
        }
    }
}

/// What happens once the unsaved-changes dialog is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterUnsaved {
    Close,
    OpenFolder,
}

#[derive(Debug)]
struct LoadSummary {
    stats: LoadStats,
    shadowed: Vec<String>,
}

struct W3xmlApp {
    editor: EditorState,
    config: EditorConfig,
    config_path: PathBuf,
    tab: EntityKind,
    filter: String,
    // Text field buffers, keyed by element and attribute. Dropped whenever the selection changes.
    fields: HashMap<String, String>,
    prompt: Option<Prompt>,
    confirm_remove: Option<(EntityKind, String)>,
    load_summary: Option<LoadSummary>,
    about_open: bool,
    unsaved: Option<AfterUnsaved>,
    allow_close: bool,
    theme_dark: bool,
    title: String,
    status: String,
    last_error: Option<String>,
}

impl W3xmlApp {
    fn new(config_path: PathBuf) -> Self {
        Self {
            editor: EditorState::new(),
            config: EditorConfig::load(&config_path),
            config_path,
            tab: EntityKind::Ability,
            filter: String::new(),
            fields: HashMap::new(),
            prompt: None,
            confirm_remove: None,
            load_summary: None,
            about_open: false,
            unsaved: None,
            allow_close: false,
            theme_dark: true,
            title: String::new(),
            status: String::new(),
            last_error: None,
        }
    }

    fn restore_last_folder(&mut self) {
        if let Some(folder) = self.config.last_folder_dir() {
            self.load_folder(&folder);
        }
    }

    fn persist_config(&self) {
        if let Err(e) = self.config.save(&self.config_path) {
            tracing::warn!("could not save settings: {e}");
        }
    }

    fn selectable_row_left(
        ui: &mut egui::Ui,
        selected: bool,
        text: &str,
        row_h: f32,
    ) -> egui::Response {
        let w = ui.available_width();
        let (rect, response) = ui.allocate_exact_size(egui::vec2(w, row_h), egui::Sense::click());
        let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);

        let visuals = ui.style().interact_selectable(&response, selected);
        if ui.is_rect_visible(rect) {
            ui.painter()
                .rect_filled(rect, visuals.corner_radius, visuals.bg_fill);
            let font_id = egui::TextStyle::Button.resolve(ui.style());
            ui.painter().text(
                rect.left_center() + egui::vec2(6.0, 0.0),
                egui::Align2::LEFT_CENTER,
                text,
                font_id,
                visuals.text_color(),
            );
        }

        response
    }

    /// Single-line editor that commits on focus loss or when a suggestion is picked.
    /// With `append`, a picked suggestion is added to a comma separated list instead of replacing it.
    fn edit_field(
        ui: &mut egui::Ui,
        fields: &mut HashMap<String, String>,
        key: String,
        current: &str,
        suggestions: &[&str],
        append: bool,
    ) -> Option<String> {
        let buffer = fields.entry(key).or_insert_with(|| current.to_string());
        let mut committed = None;

        ui.horizontal(|ui| {
            let width = (ui.available_width() - 32.0).max(80.0);
            let resp = ui.add(egui::TextEdit::singleline(&mut *buffer).desired_width(width));
            if resp.lost_focus() && buffer.as_str() != current {
                committed = Some(buffer.clone());
            }
            if suggestions.is_empty() {
                return;
            }
            ui.menu_button(statics::EN_BTN_SUGGEST, |ui| {
                egui::ScrollArea::vertical()
                    .max_height(280.0)
                    .show(ui, |ui| {
                        for s in suggestions {
                            if ui.button(*s).clicked() {
                                if append && !buffer.trim().is_empty() {
                                    buffer.push(',');
                                    buffer.push_str(s);
                                } else {
                                    *buffer = s.to_string();
                                }
                                committed = Some(buffer.clone());
                                ui.close();
                            }
                        }
                    });
            });
        });

        committed
    }

    fn load_folder(&mut self, folder: &Path) {
        match self.try_load_folder(folder) {
            Ok(stats) => {
                self.fields.clear();
                self.filter.clear();
                self.status = format!(
                    "{} {} {} {}",
                    statics::EN_SUMMARY_FOUND,
                    stats.found,
                    statics::EN_SUMMARY_PARSED,
                    stats.parsed
                );
                self.config.last_folder = folder.display().to_string();
                self.persist_config();

                let shadowed: Vec<String> = self
                    .editor
                    .index()
                    .shadowed()
                    .iter()
                    .map(|s| format!("{} '{}' in {}", s.kind, s.name, s.path.display()))
                    .collect();
                if !stats.failures.is_empty() || !shadowed.is_empty() {
                    self.load_summary = Some(LoadSummary { stats, shadowed });
                }
                self.last_error = None;
            }
            Err(e) => {
                self.last_error = Some(format!("{}: {e:#}", statics::EN_ERR_OPEN_FOLDER));
            }
        }
    }

    fn try_load_folder(&mut self, folder: &Path) -> anyhow::Result<LoadStats> {
        self.editor
            .open_folder(folder)
            .with_context(|| format!("opening {}", folder.display()))
    }

    fn open_folder_dialog(&mut self) {
        if self.editor.has_unsaved_changes() {
            self.unsaved = Some(AfterUnsaved::OpenFolder);
            return;
        }
        self.pick_folder();
    }

    fn pick_folder(&mut self) {
        let mut dlg = rfd::FileDialog::new();
        if let Some(dir) = self.config.last_folder_dir() {
            dlg = dlg.set_directory(dir);
        }
        if let Some(folder) = dlg.pick_folder() {
            self.load_folder(&folder);
        }
    }

    fn save_selected(&mut self) {
        match self.editor.save_selected() {
            Ok(true) => {
                self.status = statics::EN_BTN_SAVE.to_string();
                self.last_error = None;
            }
            Ok(false) => self.last_error = Some(statics::EN_ERR_NO_SELECTION.to_string()),
            Err(e) => self.last_error = Some(format!("{}: {e:#}", statics::EN_ERR_SAVE)),
        }
    }

    /// Returns `true` when every dirty file was written.
    fn save_all(&mut self) -> bool {
        let report = self.editor.save_all();
        self.status = format!("{}: {}", statics::EN_BTN_SAVE_ALL, report.saved.len());
        if report.failures.is_empty() {
            self.last_error = None;
            return true;
        }
        let failed: Vec<String> = report
            .failures
            .iter()
            .map(|(path, e)| format!("{}: {e}", path.display()))
            .collect();
        self.last_error = Some(format!("{}: {}", statics::EN_ERR_SAVE, failed.join("; ")));
        false
    }

    fn save_as_dialog(&mut self) {
        let Some(current) = self.editor.selected().map(|s| s.path.clone()) else {
            self.last_error = Some(statics::EN_ERR_NO_SELECTION.to_string());
            return;
        };
        let suggested = suggested_copy_path(&current);
        let mut dlg = rfd::FileDialog::new().add_filter("XML", &[statics::XML_EXTENSION]);
        if let Some(dir) = suggested.parent() {
            dlg = dlg.set_directory(dir);
        }
        if let Some(name) = suggested.file_name() {
            dlg = dlg.set_file_name(name.to_string_lossy());
        }
        let Some(path) = dlg.save_file() else {
            return;
        };

        match self.try_save_as(&path) {
            Ok(written) => {
                self.fields.clear();
                self.status = format!("{} {}", statics::EN_BTN_SAVE_AS, written.display());
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(format!("{}: {e:#}", statics::EN_ERR_SAVE_AS)),
        }
    }

    fn try_save_as(&mut self, path: &Path) -> anyhow::Result<PathBuf> {
        self.editor
            .save_as(path)
            .with_context(|| format!("writing {}", path.display()))?
            .context(statics::EN_ERR_NO_SELECTION)
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::OpenFolder => self.open_folder_dialog(),
            UiAction::SaveSelected => self.save_selected(),
            UiAction::SaveAll => {
                self.save_all();
            }
            UiAction::SaveAs => self.save_as_dialog(),
            UiAction::Select(kind, name) => match self.editor.select(kind, &name) {
                Ok(true) => self.fields.clear(),
                Ok(false) => {}
                Err(e) => self.last_error = Some(format!("{e:#}")),
            },
            UiAction::SetAttribute(node, key, value) => {
                self.editor.set_attribute(node, &key, &value);
            }
            UiAction::SetTags(node, text) => {
                self.editor.set_tags(node, &text);
                self.fields.remove(&tags_key(node));
            }
            UiAction::SetText(node, text) => {
                self.editor.set_text(node, &text);
            }
            UiAction::AddSectionEntry(section) => {
                self.editor.add_section_entry(section);
            }
            UiAction::RemoveChild(parent, child) => {
                if !self.editor.remove_child(parent, child) {
                    self.status = format!("{child:?} was already removed");
                }
            }
            UiAction::Prompt(kind) => self.prompt = Some(Prompt::new(kind)),
            UiAction::ConfirmRemove(kind, name) => self.confirm_remove = Some((kind, name)),
        }
    }

    fn confirm_prompt(&mut self, prompt: &Prompt) -> Result<(), EditorError> {
        match &prompt.kind {
            PromptKind::AddEntity(kind) => {
                self.editor.add_entity(*kind, &prompt.input)?;
            }
            PromptKind::Duplicate(kind, name) => {
                self.editor.duplicate_entity(*kind, name, &prompt.input)?;
            }
            PromptKind::AddAttribute(node, _) => {
                self.editor.add_attribute(*node, &prompt.input)?;
            }
            PromptKind::AddProperty => {
                self.editor.add_property(&prompt.input)?;
            }
            PromptKind::AddNested(variant) => {
                self.editor
                    .add_nested_element(*variant, &prompt.input, &prompt.text)?;
            }
        }
        self.fields.clear();
        Ok(())
    }

    fn show_prompt(&mut self, ctx: &egui::Context) {
        let Some(mut prompt) = self.prompt.take() else {
            return;
        };
        let mut open = true;
        let mut ok_clicked = false;
        let mut close_requested = false;
        let suggestions: Vec<String> = prompt
            .kind
            .suggestion_set()
            .map(|set| {
                self.editor
                    .vocabulary()
                    .values(set)
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        egui::Window::new(prompt.kind.title())
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(prompt.kind.label());
                ui.horizontal(|ui| {
                    let resp = ui.add(egui::TextEdit::singleline(&mut prompt.input));
                    if prompt.request_focus {
                        resp.request_focus();
                        prompt.request_focus = false;
                    }
                    if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        ok_clicked = true;
                    }
                    if !suggestions.is_empty() {
                        ui.menu_button(statics::EN_BTN_SUGGEST, |ui| {
                            egui::ScrollArea::vertical()
                                .max_height(280.0)
                                .show(ui, |ui| {
                                    for s in &suggestions {
                                        if ui.button(s.as_str()).clicked() {
                                            prompt.input = s.clone();
                                            ui.close();
                                        }
                                    }
                                });
                        });
                    }
                });
                if matches!(prompt.kind, PromptKind::AddNested(_)) {
                    ui.label(statics::EN_PROMPT_NESTED_TEXT);
                    ui.add(egui::TextEdit::singleline(&mut prompt.text));
                }
                if let Some(err) = &prompt.error {
                    ui.colored_label(egui::Color32::RED, err);
                }
                ui.horizontal(|ui| {
                    if ui.button(statics::EN_BTN_OK).clicked() {
                        ok_clicked = true;
                    }
                    if ui.button(statics::EN_BTN_CANCEL).clicked() {
                        close_requested = true;
                    }
                });
            });

        if ok_clicked {
            match self.confirm_prompt(&prompt) {
                Ok(()) => close_requested = true,
                Err(e) => prompt.error = Some(e.to_string()),
            }
        }
        if open && !close_requested {
            self.prompt = Some(prompt);
        }
    }

    fn show_confirm_remove(&mut self, ctx: &egui::Context) {
        let Some((kind, name)) = self.confirm_remove.clone() else {
            return;
        };
        let mut open = true;
        let mut close_requested = false;
        let mut confirmed = false;
        egui::Window::new(statics::EN_WINDOW_CONFIRM_REMOVE)
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(format!("{} {kind} '{name}'?", statics::EN_PROMPT_REMOVE));
                ui.horizontal(|ui| {
                    if ui.button(statics::EN_BTN_REMOVE).clicked() {
                        confirmed = true;
                    }
                    if ui.button(statics::EN_BTN_CANCEL).clicked() {
                        close_requested = true;
                    }
                });
            });

        if confirmed {
            if let Err(e) = self.editor.remove_entity(kind, &name) {
                self.last_error = Some(format!("{e:#}"));
            }
            self.fields.clear();
            close_requested = true;
        }
        if !open || close_requested {
            self.confirm_remove = None;
        }
    }

    fn show_unsaved(&mut self, ctx: &egui::Context) {
        let Some(after) = self.unsaved else {
            return;
        };
        let mut open = true;
        let mut close_requested = false;
        let mut choice = None;
        egui::Window::new(statics::EN_WINDOW_UNSAVED)
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(statics::EN_PROMPT_UNSAVED);
                for path in self.editor.dirty().all_dirty() {
                    ui.monospace(path.display().to_string());
                }
                ui.horizontal(|ui| {
                    if ui.button(statics::EN_BTN_SAVE_ALL).clicked() {
                        choice = Some(true);
                    }
                    if ui.button(statics::EN_BTN_DISCARD).clicked() {
                        choice = Some(false);
                    }
                    if ui.button(statics::EN_BTN_CANCEL).clicked() {
                        close_requested = true;
                    }
                });
            });
        if !open || close_requested {
            self.unsaved = None;
        }

        let Some(save_first) = choice else {
            return;
        };
        if save_first && !self.save_all() {
            return;
        }
        self.unsaved = None;
        match after {
            AfterUnsaved::Close => {
                self.allow_close = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            AfterUnsaved::OpenFolder => self.pick_folder(),
        }
    }

    fn show_load_summary(&mut self, ctx: &egui::Context) {
        let Some(summary) = &self.load_summary else {
            return;
        };
        let mut open = true;
        egui::Window::new(statics::EN_WINDOW_LOAD_SUMMARY)
            .collapsible(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(format!(
                    "{} {}, {} {}",
                    statics::EN_SUMMARY_FOUND,
                    summary.stats.found,
                    statics::EN_SUMMARY_PARSED,
                    summary.stats.parsed
                ));
                egui::ScrollArea::vertical().max_height(400.0).show(ui, |ui| {
                    if !summary.stats.failures.is_empty() {
                        ui.separator();
                        ui.strong(statics::EN_SUMMARY_FAILED);
                        for failure in &summary.stats.failures {
                            ui.colored_label(egui::Color32::RED, &failure.message);
                        }
                    }
                    if !summary.shadowed.is_empty() {
                        ui.separator();
                        ui.strong(statics::EN_SUMMARY_SHADOWED);
                        for line in &summary.shadowed {
                            ui.label(line);
                        }
                    }
                });
            });
        if !open {
            self.load_summary = None;
        }
    }

    fn render_tags(
        ui: &mut egui::Ui,
        fields: &mut HashMap<String, String>,
        actions: &mut Vec<UiAction>,
        vocab: &Vocabulary,
        node: NodeId,
        current: &str,
    ) {
        ui.horizontal(|ui| {
            ui.label(statics::EN_LABEL_TAGS);
            let tags = vocab.values(VocabularyId::Tags);
            if let Some(text) = Self::edit_field(ui, fields, tags_key(node), current, &tags, true)
            {
                actions.push(UiAction::SetTags(node, text));
            }
        });
    }

    fn render_item(
        ui: &mut egui::Ui,
        doc: &XmlDocument,
        vocab: &Vocabulary,
        fields: &mut HashMap<String, String>,
        actions: &mut Vec<UiAction>,
        item: NodeId,
    ) {
        let row_h = ui.text_style_height(&egui::TextStyle::Body) + 8.0;
        let attributes: Vec<(String, String)> = doc
            .element(item)
            .map(|e| {
                e.attributes
                    .iter()
                    .filter(|(k, _)| k.as_str() != statics::ATTR_NAME)
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();

        ui.strong(statics::EN_LABEL_ATTRIBUTES);
        ui.push_id("item_attributes", |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::initial(220.0).resizable(true))
                .column(Column::remainder().resizable(true))
                .header(row_h, |mut header| {
                    header.col(|ui| {
                        ui.strong(statics::EN_COL_ATTRIBUTE);
                    });
                    header.col(|ui| {
                        ui.strong(statics::EN_COL_VALUE);
                    });
                })
                .body(|mut body| {
                    for (key, value) in &attributes {
                        body.row(row_h, |mut row| {
                            row.col(|ui| {
                                ui.monospace(key);
                            });
                            row.col(|ui| {
                                let suggestions = vocab.suggestions_for_item_attribute(key);
                                if let Some(new) = Self::edit_field(
                                    ui,
                                    fields,
                                    attr_key(item, key),
                                    value,
                                    &suggestions,
                                    false,
                                ) {
                                    actions.push(UiAction::SetAttribute(item, key.clone(), new));
                                }
                            });
                        });
                    }
                });
        });
        if ui.small_button(statics::EN_BTN_ADD_ATTRIBUTE).clicked() {
            actions.push(UiAction::Prompt(PromptKind::AddAttribute(
                item,
                VocabularyId::ItemAttributes,
            )));
        }
        ui.separator();

        Self::render_base_abilities(ui, doc, vocab, fields, actions, item);
        ui.separator();
        Self::render_recycling_parts(ui, doc, vocab, fields, actions, item);
        ui.separator();
        Self::render_variants(ui, doc, vocab, fields, actions, item);
    }

    fn render_base_abilities(
        ui: &mut egui::Ui,
        doc: &XmlDocument,
        vocab: &Vocabulary,
        fields: &mut HashMap<String, String>,
        actions: &mut Vec<UiAction>,
        item: NodeId,
    ) {
        ui.strong(statics::EN_LABEL_BASE_ABILITIES);
        let names = vocab.values(VocabularyId::AbilityNames);
        if let Some(container) = doc.find_child(item, statics::TAG_BASE_ABILITIES) {
            for entry in doc.find_children(container, statics::TAG_BASE_ABILITY) {
                ui.horizontal(|ui| {
                    if ui.small_button(statics::EN_BTN_REMOVE_SHORT).clicked() {
                        actions.push(UiAction::RemoveChild(container, entry));
                    }
                    let current = doc.text(entry).unwrap_or_default();
                    if let Some(new) =
                        Self::edit_field(ui, fields, text_key(entry), current, &names, false)
                    {
                        actions.push(UiAction::SetText(entry, new));
                    }
                });
            }
        }
        if ui.small_button(statics::EN_BTN_ADD_BASE_ABILITY).clicked() {
            actions.push(UiAction::AddSectionEntry(ItemSection::BaseAbilities));
        }
    }

    fn render_recycling_parts(
        ui: &mut egui::Ui,
        doc: &XmlDocument,
        vocab: &Vocabulary,
        fields: &mut HashMap<String, String>,
        actions: &mut Vec<UiAction>,
        item: NodeId,
    ) {
        ui.strong(statics::EN_LABEL_RECYCLING_PARTS);
        let mut names = vocab.values(VocabularyId::RecyclingParts);
        names.extend(vocab.values(VocabularyId::ItemNames));
        names.sort_unstable();
        names.dedup();

        if let Some(container) = doc.find_child(item, statics::TAG_RECYCLING_PARTS) {
            for part in doc.find_children(container, statics::TAG_PARTS) {
                ui.horizontal(|ui| {
                    if ui.small_button(statics::EN_BTN_REMOVE_SHORT).clicked() {
                        actions.push(UiAction::RemoveChild(container, part));
                    }
                    ui.label(statics::EN_LABEL_COUNT);
                    let count = doc.attribute(part, statics::ATTR_COUNT).unwrap_or_default();
                    ui.push_id(attr_key(part, statics::ATTR_COUNT), |ui| {
                        ui.set_max_width(90.0);
                        if let Some(new) = Self::edit_field(
                            ui,
                            fields,
                            attr_key(part, statics::ATTR_COUNT),
                            count,
                            &[],
                            false,
                        ) {
                            actions.push(UiAction::SetAttribute(
                                part,
                                statics::ATTR_COUNT.to_string(),
                                new.trim().to_string(),
                            ));
                        }
                    });
                    let current = doc.text(part).unwrap_or_default();
                    if let Some(new) =
                        Self::edit_field(ui, fields, text_key(part), current, &names, false)
                    {
                        actions.push(UiAction::SetText(part, new));
                    }
                });
            }
        }
        if ui.small_button(statics::EN_BTN_ADD_PART).clicked() {
            actions.push(UiAction::AddSectionEntry(ItemSection::RecyclingParts));
        }
    }

    fn render_variants(
        ui: &mut egui::Ui,
        doc: &XmlDocument,
        vocab: &Vocabulary,
        fields: &mut HashMap<String, String>,
        actions: &mut Vec<UiAction>,
        item: NodeId,
    ) {
        ui.strong(statics::EN_LABEL_VARIANTS);
        if let Some(container) = doc.find_child(item, statics::TAG_VARIANTS) {
            for (i, variant) in doc.find_children(container, statics::TAG_VARIANT).enumerate() {
                egui::CollapsingHeader::new(format!("{} {}", statics::TAG_VARIANT, i + 1))
                    .id_salt(("variant", variant))
                    .default_open(true)
                    .show(ui, |ui| {
                        let attributes = doc
                            .element(variant)
                            .map(|e| e.attributes.clone())
                            .unwrap_or_default();
                        egui::Grid::new(("variant_attrs", variant))
                            .num_columns(2)
                            .striped(true)
                            .show(ui, |ui| {
                                for (key, value) in &attributes {
                                    ui.monospace(key);
                                    let suggestions = vocab.suggestions_for_item_attribute(key);
                                    if let Some(new) = Self::edit_field(
                                        ui,
                                        fields,
                                        attr_key(variant, key),
                                        value,
                                        &suggestions,
                                        false,
                                    ) {
                                        actions.push(UiAction::SetAttribute(
                                            variant,
                                            key.clone(),
                                            new.trim().to_string(),
                                        ));
                                    }
                                    ui.end_row();
                                }
                            });

                        ui.label(statics::EN_LABEL_NESTED);
                        for nested in doc.child_elements(variant) {
                            let tag = doc.name(nested).unwrap_or_default();
                            ui.horizontal(|ui| {
                                if ui.small_button(statics::EN_BTN_REMOVE_SHORT).clicked() {
                                    actions.push(UiAction::RemoveChild(variant, nested));
                                }
                                ui.monospace(format!("<{tag}>"));
                                let suggestions = vocab.suggestions_for_nested_tag(tag);
                                let current = doc.text(nested).unwrap_or_default();
                                if let Some(new) = Self::edit_field(
                                    ui,
                                    fields,
                                    text_key(nested),
                                    current,
                                    &suggestions,
                                    false,
                                ) {
                                    actions.push(UiAction::SetText(nested, new));
                                }
                            });
                        }

                        ui.horizontal(|ui| {
                            if ui.small_button(statics::EN_BTN_ADD_ATTRIBUTE).clicked() {
                                actions.push(UiAction::Prompt(PromptKind::AddAttribute(
                                    variant,
                                    VocabularyId::VariantAttributes,
                                )));
                            }
                            if ui.small_button(statics::EN_BTN_ADD_NESTED).clicked() {
                                actions.push(UiAction::Prompt(PromptKind::AddNested(variant)));
                            }
                            if ui.small_button(statics::EN_BTN_REMOVE).clicked() {
                                actions.push(UiAction::RemoveChild(container, variant));
                            }
                        });
                    });
            }
        }
        if ui.small_button(statics::EN_BTN_ADD_VARIANT).clicked() {
            actions.push(UiAction::AddSectionEntry(ItemSection::Variants));
        }
    }

    fn render_ability(
        ui: &mut egui::Ui,
        doc: &XmlDocument,
        vocab: &Vocabulary,
        fields: &mut HashMap<String, String>,
        actions: &mut Vec<UiAction>,
        ability: NodeId,
    ) {
        ui.strong(statics::EN_LABEL_PROPERTIES);
        let properties: Vec<NodeId> = doc
            .child_elements(ability)
            .filter(|p| doc.name(*p) != Some(statics::TAG_TAGS))
            .collect();

        for property in properties {
            let Some(element) = doc.element(property) else {
                continue;
            };
            ui.horizontal_wrapped(|ui| {
                if ui.small_button(statics::EN_BTN_REMOVE_SHORT).clicked() {
                    actions.push(UiAction::RemoveChild(ability, property));
                }
                ui.monospace(&element.name);
                for (key, value) in &element.attributes {
                    ui.label(format!("{key}:"));
                    let suggestions = vocab.suggestions_for_property_attribute(key);
                    ui.push_id(attr_key(property, key), |ui| {
                        ui.set_max_width(160.0);
                        if let Some(new) = Self::edit_field(
                            ui,
                            fields,
                            attr_key(property, key),
                            value,
                            &suggestions,
                            false,
                        ) {
                            actions.push(UiAction::SetAttribute(property, key.clone(), new));
                        }
                    });
                }
                if ui.small_button(statics::EN_BTN_ADD_ATTRIBUTE).clicked() {
                    actions.push(UiAction::Prompt(PromptKind::AddAttribute(
                        property,
                        VocabularyId::PropertyAttributes,
                    )));
                }
            });
        }
        if ui.small_button(statics::EN_BTN_ADD_PROPERTY).clicked() {
            actions.push(UiAction::Prompt(PromptKind::AddProperty));
        }
    }
}

fn attr_key(node: NodeId, attribute: &str) -> String {
    format!("{node:?}@{attribute}")
}

fn text_key(node: NodeId) -> String {
    format!("{node:?}#text")
}

fn tags_key(node: NodeId) -> String {
    format!("{node:?}#tags")
}

impl eframe::App for W3xmlApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) {
            if self.editor.has_unsaved_changes() && !self.allow_close {
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                self.unsaved = Some(AfterUnsaved::Close);
            } else {
                self.persist_config();
            }
        }

        let title = self.editor.window_title();
        if title != self.title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.title = title;
        }

        let mut actions: Vec<UiAction> = Vec::new();
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::CTRL, egui::Key::S)) {
            actions.push(UiAction::SaveSelected);
        }

        let loaded = !self.editor.store().is_empty();
        let has_selection = self.editor.selected().is_some();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                if ui.button(statics::EN_BTN_OPEN_FOLDER).clicked() {
                    actions.push(UiAction::OpenFolder);
                }
                if ui
                    .add_enabled(has_selection, egui::Button::new(statics::EN_BTN_SAVE))
                    .clicked()
                {
                    actions.push(UiAction::SaveSelected);
                }
                if ui
                    .add_enabled(
                        self.editor.has_unsaved_changes(),
                        egui::Button::new(statics::EN_BTN_SAVE_ALL),
                    )
                    .clicked()
                {
                    actions.push(UiAction::SaveAll);
                }
                if ui
                    .add_enabled(has_selection, egui::Button::new(statics::EN_BTN_SAVE_AS))
                    .clicked()
                {
                    actions.push(UiAction::SaveAs);
                }
                if ui.button(statics::EN_BTN_ABOUT).clicked() {
                    self.about_open = true;
                }
                if ui.button(statics::EN_BTN_TOGGLE_THEME).clicked() {
                    self.theme_dark = !self.theme_dark;
                    if self.theme_dark {
                        ctx.set_visuals(egui::Visuals::dark());
                    } else {
                        ctx.set_visuals(egui::Visuals::light());
                    }
                }
                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(&self.status);
                }
            });
        });

        if self.about_open {
            let mut open = self.about_open;
            egui::Window::new(statics::EN_WINDOW_ABOUT)
                .collapsible(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.heading(statics::EN_ABOUT_HEADING);
                    ui.label(format!(
                        "{} {}",
                        statics::EN_ABOUT_VERSION,
                        env!("CARGO_PKG_VERSION")
                    ));
                    ui.separator();
                    ui.label(statics::EN_ABOUT_BLURB);
                });
            self.about_open = open;
        }

        if let Some(err) = self.last_error.clone() {
            egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, err);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button(statics::EN_BTN_REMOVE_SHORT).clicked() {
                            self.last_error = None;
                        }
                    });
                });
            });
        }

        self.show_load_summary(ctx);
        self.show_unsaved(ctx);

        egui::TopBottomPanel::bottom("bottom_status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let index = self.editor.index();
                match self.editor.store().folder() {
                    Some(folder) => ui.label(folder.display().to_string()),
                    None => ui.label(statics::EN_STATUS_NO_FOLDER),
                };
                ui.separator();
                ui.label(format!("files: {}", self.editor.store().len()));
                ui.separator();
                ui.label(format!(
                    "{}: {}",
                    statics::EN_ABILITIES,
                    index.len(EntityKind::Ability)
                ));
                ui.separator();
                ui.label(format!("{}: {}", statics::EN_ITEMS, index.len(EntityKind::Item)));
                let dirty = self.editor.dirty().dirty_count();
                if dirty > 0 {
                    ui.separator();
                    ui.colored_label(
                        egui::Color32::YELLOW,
                        format!("{} {dirty}", statics::EN_STATUS_DIRTY_FILES),
                    );
                }
            });
        });

        if !loaded {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading(statics::EN_APP_TITLE);
                ui.label(statics::EN_HOME_INSTRUCTIONS);
            });
            for action in actions {
                self.apply(action);
            }
            return;
        }

        egui::SidePanel::left("entities_panel")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for kind in EntityKind::ALL {
                        ui.selectable_value(&mut self.tab, kind, kind.plural_label());
                    }
                });
                ui.horizontal(|ui| {
                    ui.label(statics::EN_LABEL_FILTER);
                    ui.add(
                        egui::TextEdit::singleline(&mut self.filter)
                            .hint_text(statics::EN_HINT_FILTER),
                    );
                });

                let kind = self.tab;
                let selected_name = self
                    .editor
                    .selected()
                    .filter(|s| s.kind == kind)
                    .map(|s| s.name.clone());
                ui.horizontal(|ui| {
                    if ui.button(statics::EN_BTN_ADD).clicked() {
                        actions.push(UiAction::Prompt(PromptKind::AddEntity(kind)));
                    }
                    let enabled = selected_name.is_some();
                    if ui
                        .add_enabled(enabled, egui::Button::new(statics::EN_BTN_DUPLICATE))
                        .clicked()
                        && let Some(name) = &selected_name
                    {
                        actions.push(UiAction::Prompt(PromptKind::Duplicate(kind, name.clone())));
                    }
                    if ui
                        .add_enabled(enabled, egui::Button::new(statics::EN_BTN_REMOVE))
                        .clicked()
                        && let Some(name) = &selected_name
                    {
                        actions.push(UiAction::ConfirmRemove(kind, name.clone()));
                    }
                });
                ui.separator();

                let needle = self.filter.trim().to_lowercase();
                let row_h = ui.text_style_height(&egui::TextStyle::Body) + 4.0;
                ui.push_id("entities_scroll", |ui| {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            for name in self.editor.index().names(kind) {
                                if !needle.is_empty() && !name.to_lowercase().contains(&needle) {
                                    continue;
                                }
                                let selected = selected_name.as_deref() == Some(name);
                                if Self::selectable_row_left(ui, selected, name, row_h).clicked() {
                                    actions.push(UiAction::Select(kind, name.to_string()));
                                }
                            }
                        });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (Some(selected), Some(doc)) =
                (self.editor.selected(), self.editor.selected_document())
            else {
                ui.label(statics::EN_SELECT_ENTRY);
                return;
            };
            let vocab = self.editor.vocabulary();

            ui.horizontal(|ui| {
                ui.heading(&selected.name);
                ui.separator();
                ui.label(selected.kind.to_string());
                ui.separator();
                ui.label(format!(
                    "{} {}",
                    statics::EN_LABEL_FILE,
                    selected.path.display()
                ));
                if self.editor.dirty().is_dirty(&selected.path) {
                    ui.separator();
                    ui.colored_label(egui::Color32::YELLOW, statics::EN_BADGE_DIRTY);
                }
            });
            ui.separator();

            let node = selected.node;
            let tags = self.editor.tags_of(node);
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    Self::render_tags(ui, &mut self.fields, &mut actions, vocab, node, &tags);
                    ui.separator();
                    match selected.kind {
                        EntityKind::Item => {
                            Self::render_item(ui, doc, vocab, &mut self.fields, &mut actions, node)
                        }
                        EntityKind::Ability => Self::render_ability(
                            ui,
                            doc,
                            vocab,
                            &mut self.fields,
                            &mut actions,
                            node,
                        ),
                    }
                });
        });

        self.show_prompt(ctx);
        self.show_confirm_remove(ctx);

        for action in actions {
            self.apply(action);
        }
    }
}
