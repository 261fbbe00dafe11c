//! Static configuration schema of the device
//!
//! Sections and field definitions are immutable. The form state built from
//! them shares each [`FieldDefinition`] through an `Arc`.

use crate::error::{HammerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

mod catalog;

pub use catalog::{TIME_SYNC_KEY, TIMEZONE_KEY, TIMEZONE_SECTION_ID, hammer_schema};

/// Numeric flavour of a range-validated field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeKind {
    Integer,
    Float,
}

/// Value carried by a select option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Int(i64),
    Text(String),
}

/// One entry of a select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: OptionValue,
}

/// Validation rule attached to a field; enforced by the form widgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldValidation {
    Range {
        kind: RangeKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Select {
        options: Vec<SelectOption>,
    },
    Toggle {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        off_label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        on_label: Option<String>,
        #[serde(default)]
        tristate: bool,
    },
}

impl FieldValidation {
    pub fn float(min: Option<f64>, max: Option<f64>) -> Self {
        Self::Range {
            kind: RangeKind::Float,
            min,
            max,
        }
    }

    pub fn integer(min: Option<f64>, max: Option<f64>) -> Self {
        Self::Range {
            kind: RangeKind::Integer,
            min,
            max,
        }
    }

    pub fn select<V: Into<OptionValue> + Clone>(options: &[(&str, V)]) -> Self {
        Self::Select {
            options: options
                .iter()
                .map(|(label, value)| SelectOption {
                    label: (*label).to_string(),
                    value: value.clone().into(),
                })
                .collect(),
        }
    }

    pub fn toggle(off_label: &str, on_label: &str) -> Self {
        Self::Toggle {
            off_label: Some(off_label.to_string()),
            on_label: Some(on_label.to_string()),
            tristate: false,
        }
    }

    /// Toggle with a third "unset" state that is never sent to the device
    pub fn tristate(off_label: &str, on_label: &str) -> Self {
        Self::Toggle {
            off_label: Some(off_label.to_string()),
            on_label: Some(on_label.to_string()),
            tristate: true,
        }
    }

    pub const fn is_tristate(&self) -> bool {
        matches!(self, Self::Toggle { tristate: true, .. })
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Immutable description of one configurable value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Device-facing identifier, unique across the schema
    pub key: String,
    pub label: String,
    pub description: String,
    pub unit: String,
    pub validation: FieldValidation,
    #[serde(default)]
    pub advanced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl FieldDefinition {
    pub fn new(
        key: &str,
        label: &str,
        description: &str,
        unit: &str,
        validation: FieldValidation,
    ) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            unit: unit.to_string(),
            validation,
            advanced: false,
            default_value: None,
        }
    }

    /// Hide the field unless advanced settings are shown
    #[must_use]
    pub fn advanced(mut self) -> Self {
        self.advanced = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }
}

/// Shape of the items in a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// One free-text value per field
    Normal,
    /// Independent min and max per field
    AlertLimits,
}

/// Immutable group of fields rendered together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDefinition {
    pub id: String,
    pub title: String,
    pub kind: SectionKind,
    #[serde(default)]
    pub default_expanded: bool,
    pub fields: Vec<Arc<FieldDefinition>>,
}

impl SectionDefinition {
    pub fn new(id: &str, title: &str, kind: SectionKind, fields: Vec<FieldDefinition>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            default_expanded: false,
            fields: fields.into_iter().map(Arc::new).collect(),
        }
    }

    #[must_use]
    pub fn expanded(mut self) -> Self {
        self.default_expanded = true;
        self
    }
}

/// Reject schemas whose section ids or field keys collide.
///
/// Keys must be unique across the whole schema, not just per section: the
/// device decodes the payload by key alone.
pub fn validate_schema(schema: &[SectionDefinition]) -> Result<()> {
    let mut section_ids = HashSet::new();
    let mut keys = HashSet::new();

    for section in schema {
        if !section_ids.insert(section.id.as_str()) {
            return Err(HammerError::validation(
                "schema.section.id",
                format!("duplicate section id {}", section.id),
            ));
        }
        for field in &section.fields {
            if field.key.trim().is_empty() {
                return Err(HammerError::validation(
                    "schema.field.key",
                    format!("empty key in section {}", section.id),
                ));
            }
            if !keys.insert(field.key.as_str()) {
                return Err(HammerError::validation(
                    "schema.field.key",
                    format!("duplicate key {}", field.key),
                ));
            }
        }
    }

    Ok(())
}
