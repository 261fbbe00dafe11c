//! Advanced/basic projection of the form state
//!
//! The projection is a non-owning copy: item lists are cloned, field
//! definitions stay shared. Edits made on it only reach the canonical tree
//! through [`ConfigStore::merge_visible`](crate::store::ConfigStore::merge_visible).

use crate::state::EditableSection;
use crate::store::{ConfigState, ConfigStore};
use tokio::sync::watch;

/// Keep items that are basic or, when `show_advanced` is set, advanced;
/// drop sections left without items
pub fn project(sections: &[EditableSection], show_advanced: bool) -> Vec<EditableSection> {
    sections
        .iter()
        .filter_map(|section| {
            let items: Vec<_> = section
                .items
                .iter()
                .filter(|item| show_advanced || !item.is_advanced())
                .cloned()
                .collect();
            if items.is_empty() {
                return None;
            }
            Some(EditableSection {
                id: section.id.clone(),
                title: section.title.clone(),
                kind: section.kind,
                default_expanded: section.default_expanded,
                items,
            })
        })
        .collect()
}

/// Reactive view re-derived whenever the state or the advanced flag changes
pub struct VisibleSections {
    state: watch::Receiver<ConfigState>,
    show_advanced: watch::Receiver<bool>,
}

impl VisibleSections {
    pub fn new(store: &ConfigStore) -> Self {
        Self {
            state: store.subscribe(),
            show_advanced: store.subscribe_show_advanced(),
        }
    }

    /// Projection of the latest values; marks both sources as seen
    pub fn current(&mut self) -> Vec<EditableSection> {
        let show_advanced = *self.show_advanced.borrow_and_update();
        let state = self.state.borrow_and_update();
        project(&state, show_advanced)
    }

    /// Wait for the next change of either source and return the new
    /// projection; `None` once the store is gone
    pub async fn changed(&mut self) -> Option<Vec<EditableSection>> {
        tokio::select! {
            res = self.state.changed() => res.ok()?,
            res = self.show_advanced.changed() => res.ok()?,
        }
        Some(self.current())
    }
}
