//! Advisory suggestion sets built from the loaded definitions.
//!
//! Nothing here is validated against; the sets only feed the completion menus.

use crate::statics;
use crate::xml::{NodeId, XmlDocument};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VocabularyId {
    PropertyNames,
    ItemAttributes,
    VariantAttributes,
    PropertyAttributes,
    Tags,
    AbilityNames,
    ItemNames,
    RecyclingParts,
    Categories,
    AbilityModes,
    VariantNestedTags,
    EquipTemplates,
    LocalisationKeys,
    IconPaths,
    PropertyTypes,
    EquipSlots,
    HoldSlots,
    Hands,
    SoundIds,
    Events,
    AnimActions,
}

pub const BOOLEANS: &[&str] = &["true", "false"];
pub const ENHANCEMENT_SLOTS: &[&str] = &["0", "1", "2", "3"];

/// Item/variant attributes whose values are collected into (and suggested from) a set.
const ITEM_VALUE_SETS: &[(&str, VocabularyId)] = &[
    ("category", VocabularyId::Categories),
    ("ability_mode", VocabularyId::AbilityModes),
    ("equip_template", VocabularyId::EquipTemplates),
    ("localisation_key_name", VocabularyId::LocalisationKeys),
    ("localisation_key_description", VocabularyId::LocalisationKeys),
    ("icon_path", VocabularyId::IconPaths),
    ("equip_slot", VocabularyId::EquipSlots),
    ("hold_slot", VocabularyId::HoldSlots),
    ("hand", VocabularyId::Hands),
    ("sound_identification", VocabularyId::SoundIds),
    ("draw_event", VocabularyId::Events),
    ("holster_event", VocabularyId::Events),
    ("draw_act", VocabularyId::AnimActions),
    ("draw_deact", VocabularyId::AnimActions),
    ("holster_act", VocabularyId::AnimActions),
    ("holster_deact", VocabularyId::AnimActions),
];

/// Where a field's completions come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionSource {
    Set(VocabularyId),
    Fixed(&'static [&'static str]),
}

pub fn item_attribute_source(attribute: &str) -> Option<SuggestionSource> {
    if let Some((_, id)) = ITEM_VALUE_SETS.iter().find(|(a, _)| *a == attribute) {
        return Some(SuggestionSource::Set(*id));
    }
    match attribute {
        "enhancement_slots" => Some(SuggestionSource::Fixed(ENHANCEMENT_SLOTS)),
        "weapon" | "lethal" => Some(SuggestionSource::Fixed(BOOLEANS)),
        a if a.starts_with("localisation_key") => {
            Some(SuggestionSource::Set(VocabularyId::LocalisationKeys))
        }
        _ => None,
    }
}

pub fn property_attribute_source(attribute: &str) -> Option<SuggestionSource> {
    match attribute {
        "type" => Some(SuggestionSource::Set(VocabularyId::PropertyTypes)),
        "always_random" => Some(SuggestionSource::Fixed(BOOLEANS)),
        _ => None,
    }
}

pub fn nested_tag_source(tag: &str) -> Option<SuggestionSource> {
    match tag {
        statics::TAG_ITEM => Some(SuggestionSource::Set(VocabularyId::ItemNames)),
        statics::TAG_ABILITY => Some(SuggestionSource::Set(VocabularyId::AbilityNames)),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    sets: BTreeMap<VocabularyId, BTreeSet<String>>,
}

impl Vocabulary {
    pub fn clear(&mut self) {
        self.sets.clear();
    }

    /// Record a value. Returns `true` only when it was not seen before.
    pub fn note(&mut self, id: VocabularyId, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        let set = self.sets.entry(id).or_default();
        if set.contains(value) {
            return false;
        }
        set.insert(value.to_string())
    }

    pub fn contains(&self, id: VocabularyId, value: &str) -> bool {
        self.sets.get(&id).is_some_and(|s| s.contains(value))
    }

    /// Sorted values of one set.
    pub fn values(&self, id: VocabularyId) -> Vec<&str> {
        self.sets
            .get(&id)
            .map(|s| s.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn suggestions(&self, source: SuggestionSource) -> Vec<&str> {
        match source {
            SuggestionSource::Set(id) => self.values(id),
            SuggestionSource::Fixed(values) => values.to_vec(),
        }
    }

    pub fn suggestions_for_item_attribute(&self, attribute: &str) -> Vec<&str> {
        item_attribute_source(attribute)
            .map(|s| self.suggestions(s))
            .unwrap_or_default()
    }

    pub fn suggestions_for_property_attribute(&self, attribute: &str) -> Vec<&str> {
        property_attribute_source(attribute)
            .map(|s| self.suggestions(s))
            .unwrap_or_default()
    }

    pub fn suggestions_for_nested_tag(&self, tag: &str) -> Vec<&str> {
        nested_tag_source(tag)
            .map(|s| self.suggestions(s))
            .unwrap_or_default()
    }

    pub fn note_tags(&mut self, text: &str) {
        for tag in split_tags(text) {
            self.note(VocabularyId::Tags, tag);
        }
    }

    /// Record everything an `<ability>` element contributes.
    pub fn collect_ability(&mut self, doc: &XmlDocument, ability: NodeId) {
        if let Some(name) = doc.attribute(ability, statics::ATTR_NAME) {
            self.note(VocabularyId::AbilityNames, name);
        }
        for child in doc.child_elements(ability) {
            let Some(element) = doc.element(child) else {
                continue;
            };
            if element.name == statics::TAG_TAGS {
                if let Some(text) = &element.text {
                    self.note_tags(text);
                }
                continue;
            }
            self.note(VocabularyId::PropertyNames, &element.name);
            for (key, value) in &element.attributes {
                self.note(VocabularyId::PropertyAttributes, key);
                if key == statics::ATTR_TYPE {
                    self.note(VocabularyId::PropertyTypes, value);
                }
            }
        }
    }

    /// Record everything an `<item>` element contributes.
    pub fn collect_item(&mut self, doc: &XmlDocument, item: NodeId) {
        let Some(element) = doc.element(item) else {
            return;
        };
        for (key, value) in &element.attributes {
            if key == statics::ATTR_NAME {
                self.note(VocabularyId::ItemNames, value);
                continue;
            }
            self.note(VocabularyId::ItemAttributes, key);
            self.note_attribute_value(key, value);
        }

        if let Some(text) = doc
            .find_child(item, statics::TAG_TAGS)
            .and_then(|t| doc.text(t))
        {
            self.note_tags(text);
        }

        if let Some(parts) = doc.find_child(item, statics::TAG_RECYCLING_PARTS) {
            for part in doc.find_children(parts, statics::TAG_PARTS) {
                if let Some(text) = doc.text(part) {
                    self.note(VocabularyId::RecyclingParts, text);
                }
            }
        }

        if let Some(variants) = doc.find_child(item, statics::TAG_VARIANTS) {
            for variant in doc.find_children(variants, statics::TAG_VARIANT) {
                self.collect_variant(doc, variant);
            }
        }
    }

    fn collect_variant(&mut self, doc: &XmlDocument, variant: NodeId) {
        if let Some(element) = doc.element(variant) {
            for (key, value) in &element.attributes {
                self.note(VocabularyId::VariantAttributes, key);
                self.note_attribute_value(key, value);
            }
        }
        for nested in doc.child_elements(variant) {
            if let Some(tag) = doc.name(nested) {
                self.note(VocabularyId::VariantNestedTags, tag);
            }
        }
    }

    /// Value sets keyed by attribute name, shared by items and variants.
    pub fn note_attribute_value(&mut self, attribute: &str, value: &str) -> bool {
        match ITEM_VALUE_SETS.iter().find(|(a, _)| *a == attribute) {
            Some((_, id)) => self.note(*id, value),
            None => false,
        }
    }
}

/// Trimmed, non-empty comma separated tokens in order.
pub fn split_tags(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Canonical `a,b,c` form of a tags string.
pub fn normalize_tags(text: &str) -> String {
    split_tags(text).collect::<Vec<_>>().join(",")
}
