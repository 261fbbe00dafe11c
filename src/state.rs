//! Editable form state built from the schema
//!
//! Every field becomes one [`EditableItem`]. The variant is fixed by the kind
//! of the owning section when the tree is built and never changes afterwards.

use crate::schema::{FieldDefinition, SectionDefinition, SectionKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Live, editable instance of a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum EditableItem {
    /// Field of a [`SectionKind::Normal`] section; empty means unset
    Value {
        definition: Arc<FieldDefinition>,
        value: String,
    },
    /// Field of a [`SectionKind::AlertLimits`] section
    Limits {
        definition: Arc<FieldDefinition>,
        min_value: String,
        max_value: String,
    },
}

impl EditableItem {
    /// Fresh item for a field of a section of the given kind
    pub fn for_field(kind: SectionKind, definition: &Arc<FieldDefinition>) -> Self {
        match kind {
            SectionKind::Normal => Self::Value {
                definition: Arc::clone(definition),
                value: definition.default_value.clone().unwrap_or_default(),
            },
            SectionKind::AlertLimits => Self::Limits {
                definition: Arc::clone(definition),
                min_value: String::new(),
                max_value: String::new(),
            },
        }
    }

    pub fn definition(&self) -> &FieldDefinition {
        match self {
            Self::Value { definition, .. } | Self::Limits { definition, .. } => definition,
        }
    }

    pub fn key(&self) -> &str {
        &self.definition().key
    }

    pub fn is_advanced(&self) -> bool {
        self.definition().advanced
    }

    /// Section kind this item shape belongs to
    pub const fn section_kind(&self) -> SectionKind {
        match self {
            Self::Value { .. } => SectionKind::Normal,
            Self::Limits { .. } => SectionKind::AlertLimits,
        }
    }

    /// Single value, if this is a value item
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Value { value, .. } => Some(value),
            Self::Limits { .. } => None,
        }
    }

    /// Empty every edited value
    pub fn clear(&mut self) {
        match self {
            Self::Value { value, .. } => value.clear(),
            Self::Limits {
                min_value,
                max_value,
                ..
            } => {
                min_value.clear();
                max_value.clear();
            }
        }
    }

    /// Copy the edited value(s) of `other` into `self`.
    ///
    /// Returns false and leaves `self` untouched when the shapes differ.
    pub fn copy_values_from(&mut self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value { value, .. }, Self::Value { value: edited, .. }) => {
                value.clone_from(edited);
                true
            }
            (
                Self::Limits {
                    min_value,
                    max_value,
                    ..
                },
                Self::Limits {
                    min_value: edited_min,
                    max_value: edited_max,
                    ..
                },
            ) => {
                min_value.clone_from(edited_min);
                max_value.clone_from(edited_max);
                true
            }
            _ => false,
        }
    }
}

/// Live, editable instance of a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditableSection {
    pub id: String,
    pub title: String,
    pub kind: SectionKind,
    pub default_expanded: bool,
    pub items: Vec<EditableItem>,
}

impl EditableSection {
    pub fn item(&self, key: &str) -> Option<&EditableItem> {
        self.items.iter().find(|item| item.key() == key)
    }

    pub fn item_mut(&mut self, key: &str) -> Option<&mut EditableItem> {
        self.items.iter_mut().find(|item| item.key() == key)
    }

    /// Whether every item has the shape required by the section kind
    pub fn is_well_formed(&self) -> bool {
        self.items.iter().all(|item| item.section_kind() == self.kind)
    }
}

/// Materialize the schema into a fresh editable tree.
///
/// Section and item order follow the schema exactly.
pub fn build_default_state(schema: &[SectionDefinition]) -> Vec<EditableSection> {
    schema
        .iter()
        .map(|section| EditableSection {
            id: section.id.clone(),
            title: section.title.clone(),
            kind: section.kind,
            default_expanded: section.default_expanded,
            items: section
                .fields
                .iter()
                .map(|field| EditableItem::for_field(section.kind, field))
                .collect(),
        })
        .collect()
}

/// Find an item by key anywhere in the tree
pub fn find_item<'a>(sections: &'a [EditableSection], key: &str) -> Option<&'a EditableItem> {
    sections.iter().find_map(|section| section.item(key))
}

/// Set the single value of a value item; false when the key is unknown or
/// belongs to a limits item
pub fn set_value(sections: &mut [EditableSection], key: &str, new_value: &str) -> bool {
    for section in sections.iter_mut() {
        if let Some(EditableItem::Value { value, .. }) = section.item_mut(key) {
            *value = new_value.to_string();
            return true;
        }
    }
    false
}

/// Set both limits of a limits item; false when the key is unknown or
/// belongs to a value item
pub fn set_limits(sections: &mut [EditableSection], key: &str, min: &str, max: &str) -> bool {
    for section in sections.iter_mut() {
        if let Some(EditableItem::Limits {
            min_value,
            max_value,
            ..
        }) = section.item_mut(key)
        {
            *min_value = min.to_string();
            *max_value = max.to_string();
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::hammer_schema;

    #[test]
    fn build_mirrors_schema_shape() {
        let schema = hammer_schema();
        let state = build_default_state(&schema);

        assert_eq!(state.len(), schema.len());
        for (section, def) in state.iter().zip(&schema) {
            assert_eq!(section.id, def.id);
            assert_eq!(section.items.len(), def.fields.len());
            assert!(section.is_well_formed());
            for (item, field) in section.items.iter().zip(&def.fields) {
                assert_eq!(item.key(), field.key);
            }
        }
    }

    #[test]
    fn defaults_are_applied_to_value_items_only() {
        let state = build_default_state(&hammer_schema());
        assert_eq!(find_item(&state, "SETTIME").and_then(EditableItem::value), Some("1"));
        assert_eq!(
            find_item(&state, "timezone").and_then(EditableItem::value),
            Some("local")
        );
        assert_eq!(find_item(&state, "locale").and_then(EditableItem::value), Some(""));
        assert!(matches!(
            find_item(&state, "mean_g"),
            Some(EditableItem::Limits { min_value, max_value, .. })
                if min_value.is_empty() && max_value.is_empty()
        ));
    }

    #[test]
    fn build_is_idempotent_and_shares_definitions() {
        let schema = hammer_schema();
        let a = build_default_state(&schema);
        let b = build_default_state(&schema);
        assert_eq!(a, b);

        let EditableItem::Value { definition, .. } = &a[0].items[0] else {
            panic!("date_time items are value items");
        };
        assert!(Arc::ptr_eq(definition, &schema[0].fields[0]));
    }

    #[test]
    fn copy_values_rejects_shape_mismatch() {
        let state = build_default_state(&hammer_schema());
        let mut value_item = find_item(&state, "locale").cloned().unwrap();
        let limits_item = find_item(&state, "mean_g").cloned().unwrap();
        assert!(!value_item.copy_values_from(&limits_item));
        assert_eq!(value_item.value(), Some(""));
    }

    #[test]
    fn setters_respect_item_shape() {
        let mut state = build_default_state(&hammer_schema());
        assert!(set_value(&mut state, "locale", "fi"));
        assert!(!set_value(&mut state, "mean_g", "1"));
        assert!(set_limits(&mut state, "mean_g", "1", "2"));
        assert!(!set_limits(&mut state, "locale", "1", "2"));
        assert!(!set_value(&mut state, "missing", "1"));
    }
}
