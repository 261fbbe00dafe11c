//! QR payload serialization
//!
//! The payload is a `;`-joined list of `key=value` pairs in schema order,
//! cut to a fixed number of pairs. Values are passed through verbatim.

use crate::config::Config;
use crate::schema::{TIME_SYNC_KEY, TIMEZONE_KEY};
use crate::state::{EditableItem, EditableSection, find_item};
use crate::timezone::{Clock, device_timestamp};
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod live;

pub use live::{LivePayload, PayloadStream};

/// Separator between pairs
pub const PAIR_DELIMITER: &str = ";";

/// Value of the time-sync toggle when it is on
const TIME_SYNC_ON: &str = "1";

/// Timezone assumed when the schema carries no timezone field
const DEFAULT_TIMEZONE: &str = "local";

/// Serialized form state handed to the QR renderer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    pub text: String,
    /// More pairs were produced than fit; `text` holds the first ones only
    pub over_capacity: bool,
}

impl QrPayload {
    pub fn pairs(&self) -> Vec<&str> {
        if self.text.is_empty() {
            return Vec::new();
        }
        self.text.split(PAIR_DELIMITER).collect()
    }
}

/// Serializer parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadSettings {
    /// Maximum number of pairs in one payload
    pub capacity: usize,
    /// Refresh period while time sync is on
    pub refresh_interval: Duration,
}

impl PayloadSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            capacity: config.qr.max_config_values,
            refresh_interval: Duration::from_millis(config.ui.time_sync_update_interval_ms),
        }
    }
}

impl Default for PayloadSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Whether the time-sync toggle is on
pub fn time_sync_enabled(sections: &[EditableSection]) -> bool {
    find_item(sections, TIME_SYNC_KEY).and_then(EditableItem::value) == Some(TIME_SYNC_ON)
}

/// Every pair the current state produces, untruncated, in schema order
pub fn collect_pairs(sections: &[EditableSection], clock: &dyn Clock) -> Vec<String> {
    let mut pairs = Vec::new();

    for item in sections.iter().flat_map(|section| &section.items) {
        match item {
            EditableItem::Value { definition, value } => {
                let key = definition.key.as_str();
                if key == TIME_SYNC_KEY {
                    if value == TIME_SYNC_ON {
                        let timezone = find_item(sections, TIMEZONE_KEY)
                            .and_then(EditableItem::value)
                            .unwrap_or(DEFAULT_TIMEZONE);
                        pairs.push(format!("{key}={}", device_timestamp(timezone, clock)));
                    }
                    continue;
                }
                if key == TIMEZONE_KEY {
                    continue;
                }
                // Unset tristate is its own state, distinct from off
                if definition.validation.is_tristate() && value.is_empty() {
                    continue;
                }
                if value.trim().is_empty() {
                    continue;
                }
                pairs.push(format!("{key}={value}"));
            }
            EditableItem::Limits {
                definition,
                min_value,
                max_value,
            } => {
                if !min_value.trim().is_empty() {
                    pairs.push(format!("{}_min={min_value}", definition.key));
                }
                if !max_value.trim().is_empty() {
                    pairs.push(format!("{}_max={max_value}", definition.key));
                }
            }
        }
    }

    pairs
}

/// Serialize the full state into at most `capacity` pairs
pub fn serialize(sections: &[EditableSection], capacity: usize, clock: &dyn Clock) -> QrPayload {
    let pairs = collect_pairs(sections, clock);
    let over_capacity = pairs.len() > capacity;
    let text = pairs
        .iter()
        .take(capacity)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(PAIR_DELIMITER);

    QrPayload {
        text,
        over_capacity,
    }
}
