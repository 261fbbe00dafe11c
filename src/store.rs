//! Configuration state store
//!
//! Owns the canonical editable tree and the advanced-visibility flag. Both
//! live in `tokio::sync::watch` channels: every mutation runs to completion
//! under the channel lock and then publishes one new snapshot. Subscribers
//! see changes asynchronously, so reacting to a change with another
//! mutation cannot re-enter one in progress.

use crate::config::Config;
use crate::persistence::{LocalCache, SHOW_ADVANCED_KEY, STATE_KEY};
use crate::schema::SectionDefinition;
use crate::state::{EditableSection, build_default_state};
use crate::visibility;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

/// Immutable snapshot of the canonical tree
pub type ConfigState = Arc<Vec<EditableSection>>;

/// Canonical form state plus its optional local cache
pub struct ConfigStore {
    schema: Arc<Vec<SectionDefinition>>,
    state: watch::Sender<ConfigState>,
    show_advanced: watch::Sender<bool>,
    cache: Option<Mutex<LocalCache>>,
    logger: crate::logging::StructuredLogger,
}

impl ConfigStore {
    /// Store initialised from schema defaults, without a cache
    pub fn new(schema: Vec<SectionDefinition>) -> Self {
        let initial = build_default_state(&schema);
        Self::assemble(schema, initial, false, None)
    }

    /// Store mirrored to `cache`, restored from it when the cached snapshot
    /// still fits the schema
    pub fn with_cache(schema: Vec<SectionDefinition>, cache: LocalCache) -> Self {
        let logger = crate::logging::get_logger("store");
        let initial = restore_state(&schema, &cache, &logger)
            .unwrap_or_else(|| build_default_state(&schema));
        let show_advanced = match cache.get::<bool>(SHOW_ADVANCED_KEY) {
            Ok(flag) => flag.unwrap_or(false),
            Err(e) => {
                logger.warn(&format!("Discarding cached advanced flag: {e}"));
                false
            }
        };
        Self::assemble(schema, initial, show_advanced, Some(cache))
    }

    /// Build the store the configuration asks for
    pub fn from_config(config: &Config, schema: Vec<SectionDefinition>) -> Self {
        if config.ui.persist_state {
            Self::with_cache(schema, LocalCache::open(&config.persistence.file))
        } else {
            Self::new(schema)
        }
    }

    fn assemble(
        schema: Vec<SectionDefinition>,
        initial: Vec<EditableSection>,
        show_advanced: bool,
        cache: Option<LocalCache>,
    ) -> Self {
        let (state, _) = watch::channel(Arc::new(initial));
        let (show_advanced, _) = watch::channel(show_advanced);
        Self {
            schema: Arc::new(schema),
            state,
            show_advanced,
            cache: cache.map(Mutex::new),
            logger: crate::logging::get_logger("store"),
        }
    }

    pub fn schema(&self) -> &[SectionDefinition] {
        &self.schema
    }

    /// Current canonical snapshot
    pub fn sections(&self) -> ConfigState {
        Arc::clone(&self.state.borrow())
    }

    /// Receiver notified after every canonical change
    pub fn subscribe(&self) -> watch::Receiver<ConfigState> {
        self.state.subscribe()
    }

    pub fn show_advanced(&self) -> bool {
        *self.show_advanced.borrow()
    }

    pub fn subscribe_show_advanced(&self) -> watch::Receiver<bool> {
        self.show_advanced.subscribe()
    }

    pub fn set_show_advanced(&self, show: bool) {
        let mut cache = self.lock_cache();
        let changed = self.show_advanced.send_if_modified(|current| {
            if *current == show {
                return false;
            }
            *current = show;
            true
        });
        if changed {
            self.persist(cache.as_deref_mut(), SHOW_ADVANCED_KEY, &show);
        }
    }

    /// Current state filtered by the current advanced flag
    pub fn visible_sections(&self) -> Vec<EditableSection> {
        visibility::project(&self.sections(), self.show_advanced())
    }

    /// Empty every item, advanced or not
    pub fn clear_all_values(&self) {
        self.update(|sections| {
            for item in sections.iter_mut().flat_map(|s| s.items.iter_mut()) {
                item.clear();
            }
            true
        });
        self.logger.debug("Cleared all values");
    }

    /// Empty advanced items; everything else is left as is
    pub fn reset_advanced_values(&self) {
        self.update(|sections| {
            for item in sections.iter_mut().flat_map(|s| s.items.iter_mut()) {
                if item.is_advanced() {
                    item.clear();
                }
            }
            true
        });
        self.logger.debug("Reset advanced values");
    }

    /// Write edits made on a filtered view back into the canonical tree.
    ///
    /// Sections match by id, items by key; values are copied in place. A
    /// section or item with no canonical counterpart, or an item whose shape
    /// differs, is skipped.
    pub fn merge_visible(&self, filtered: &[EditableSection]) {
        self.update(|sections| {
            let mut matched = false;
            for visible in filtered {
                let Some(canonical) = sections.iter_mut().find(|s| s.id == visible.id) else {
                    continue;
                };
                for item in &visible.items {
                    if let Some(target) = canonical.item_mut(item.key()) {
                        matched |= target.copy_values_from(item);
                    }
                }
            }
            matched
        });
    }

    /// Drop everything cached and start over from schema defaults.
    ///
    /// The in-memory advanced flag is kept; only its cached copy goes.
    pub fn reset_to_default(&self) {
        let mut cache = self.lock_cache();
        if let Some(cache) = cache.as_deref_mut() {
            for key in [STATE_KEY, SHOW_ADVANCED_KEY] {
                if let Err(e) = cache.remove(key) {
                    self.logger
                        .warn(&format!("Failed to remove cached {key}: {e}"));
                }
            }
        }
        self.state
            .send_replace(Arc::new(build_default_state(&self.schema)));
        self.logger.info("Configuration reset to defaults");
    }

    /// Apply `mutate`, publish, then mirror the result to the cache.
    ///
    /// The cache lock is held across all three steps so writes reach the
    /// file in the order they reached the channel.
    fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut Vec<EditableSection>) -> bool,
    {
        let mut cache = self.lock_cache();
        let changed = self
            .state
            .send_if_modified(|state| mutate(Arc::make_mut(state)));
        if changed {
            let snapshot = self.sections();
            self.persist(cache.as_deref_mut(), STATE_KEY, &*snapshot);
        }
    }

    fn lock_cache(&self) -> Option<MutexGuard<'_, LocalCache>> {
        let cache = self.cache.as_ref()?;
        Some(cache.lock().unwrap_or_else(|poisoned| {
            self.logger.error("Cache lock poisoned; continuing with its contents");
            poisoned.into_inner()
        }))
    }

    /// Blocking file write, run on the caller's thread
    fn persist<T: serde::Serialize + ?Sized>(
        &self,
        cache: Option<&mut LocalCache>,
        key: &str,
        value: &T,
    ) {
        let Some(cache) = cache else {
            return;
        };
        if let Err(e) = cache.set(key, &value) {
            self.logger
                .warn(&format!("Failed to persist {key}: {e}"));
        }
    }
}

/// Restore the cached tree when it has exactly the schema's shape.
///
/// Values are copied onto a fresh default tree so field definitions come
/// from the schema, never from the cache.
fn restore_state(
    schema: &[SectionDefinition],
    cache: &LocalCache,
    logger: &crate::logging::StructuredLogger,
) -> Option<Vec<EditableSection>> {
    let cached = match cache.get::<Vec<EditableSection>>(STATE_KEY) {
        Ok(Some(cached)) => cached,
        Ok(None) => return None,
        Err(e) => {
            logger.warn(&format!("Discarding unreadable cached state: {e}"));
            return None;
        }
    };

    let mut restored = build_default_state(schema);
    if !same_shape(&restored, &cached) {
        logger.warn(&format!(
            "Discarding cached state in {} that does not match the schema",
            cache.path().display()
        ));
        return None;
    }

    for (section, cached_section) in restored.iter_mut().zip(&cached) {
        for (item, cached_item) in section.items.iter_mut().zip(&cached_section.items) {
            item.copy_values_from(cached_item);
        }
    }
    logger.info("Restored configuration from cache");
    Some(restored)
}

fn same_shape(expected: &[EditableSection], cached: &[EditableSection]) -> bool {
    expected.len() == cached.len()
        && expected.iter().zip(cached).all(|(a, b)| {
            a.id == b.id
                && a.kind == b.kind
                && b.is_well_formed()
                && a.items.len() == b.items.len()
                && a.items.iter().zip(&b.items).all(|(x, y)| x.key() == y.key())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::hammer_schema;
    use crate::state::{EditableItem, find_item, set_limits, set_value};

    fn value_of(store: &ConfigStore, key: &str) -> Option<String> {
        find_item(&store.sections(), key)
            .and_then(EditableItem::value)
            .map(str::to_string)
    }

    #[test]
    fn clear_all_empties_everything() {
        let store = ConfigStore::new(hammer_schema());
        store.clear_all_values();
        let sections = store.sections();
        for item in sections.iter().flat_map(|s| &s.items) {
            match item {
                EditableItem::Value { value, .. } => assert!(value.is_empty()),
                EditableItem::Limits {
                    min_value,
                    max_value,
                    ..
                } => assert!(min_value.is_empty() && max_value.is_empty()),
            }
        }
    }

    #[test]
    fn reset_advanced_keeps_basic_values() {
        let store = ConfigStore::new(hammer_schema());
        store.set_show_advanced(true);
        let mut visible = store.visible_sections();
        assert!(set_value(&mut visible, "locale", "fi"));
        assert!(set_value(&mut visible, "TARGET_ENERGY", "120.5"));
        assert!(set_limits(&mut visible, "pp_g", "", "9"));
        store.merge_visible(&visible);

        let before = store.sections();
        store.reset_advanced_values();
        let after = store.sections();

        for (b, a) in before.iter().flat_map(|s| &s.items).zip(after.iter().flat_map(|s| &s.items)) {
            if a.is_advanced() {
                assert_eq!(a.value(), Some(""));
            } else {
                assert_eq!(a, b);
            }
        }
        assert_eq!(value_of(&store, "locale").as_deref(), Some("fi"));
    }

    #[test]
    fn merge_ignores_unknown_sections_and_items() {
        let store = ConfigStore::new(hammer_schema());
        let mut visible = store.visible_sections();
        visible[0].id = "nope".to_string();
        store.merge_visible(&visible);
        assert_eq!(store.sections().as_ref(), &build_default_state(store.schema()));
    }

    #[test]
    fn snapshots_are_not_mutated_by_later_edits() {
        let store = ConfigStore::new(hammer_schema());
        let snapshot = store.sections();
        store.clear_all_values();
        assert_eq!(
            find_item(&snapshot, "SETTIME").and_then(EditableItem::value),
            Some("1")
        );
        assert_eq!(value_of(&store, "SETTIME").as_deref(), Some(""));
    }

    #[tokio::test]
    async fn subscriber_sees_each_mutation() {
        let store = ConfigStore::new(hammer_schema());
        let mut rx = store.subscribe();
        store.clear_all_values();
        rx.changed().await.unwrap();
        assert_eq!(
            find_item(&rx.borrow_and_update(), "timezone").and_then(EditableItem::value),
            Some("")
        );
    }

    #[test]
    fn reset_to_default_restores_schema_defaults() {
        let store = ConfigStore::new(hammer_schema());
        store.clear_all_values();
        store.reset_to_default();
        assert_eq!(value_of(&store, "SETTIME").as_deref(), Some("1"));
        assert_eq!(value_of(&store, "timezone").as_deref(), Some("local"));
    }
}
