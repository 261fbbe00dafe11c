use hammerqr::schema::hammer_schema;
use hammerqr::state::{EditableItem, find_item, set_limits, set_value};
use hammerqr::store::ConfigStore;
use hammerqr::visibility::VisibleSections;

fn value_of(store: &ConfigStore, key: &str) -> Option<String> {
    find_item(&store.sections(), key)
        .and_then(EditableItem::value)
        .map(str::to_string)
}

#[test]
fn defaults_follow_the_schema() {
    let store = ConfigStore::new(hammer_schema());
    let sections = store.sections();
    assert_eq!(sections.len(), store.schema().len());
    for (section, definition) in sections.iter().zip(store.schema()) {
        assert_eq!(section.id, definition.id);
        assert_eq!(section.items.len(), definition.fields.len());
    }
    assert_eq!(value_of(&store, "SETTIME").as_deref(), Some("1"));
    assert_eq!(value_of(&store, "timezone").as_deref(), Some("local"));
    assert_eq!(value_of(&store, "locale").as_deref(), Some(""));
    assert!(!store.show_advanced());
}

#[test]
fn merge_round_trip_through_the_basic_view() {
    let store = ConfigStore::new(hammer_schema());
    let mut visible = store.visible_sections();
    assert!(visible.iter().all(|s| s.id != "system"));

    assert!(set_value(&mut visible, "rotation", "2"));
    assert!(set_limits(&mut visible, "cv_prcnt", "", "40"));
    store.merge_visible(&visible);

    assert_eq!(value_of(&store, "rotation").as_deref(), Some("2"));
    match find_item(&store.sections(), "cv_prcnt") {
        Some(EditableItem::Limits {
            min_value,
            max_value,
            ..
        }) => {
            assert_eq!(min_value, "");
            assert_eq!(max_value, "40");
        }
        other => panic!("unexpected item {other:?}"),
    }
}

#[test]
fn merge_keeps_hidden_values() {
    let store = ConfigStore::new(hammer_schema());
    store.set_show_advanced(true);
    let mut all = store.visible_sections();
    set_value(&mut all, "TARGET_ENERGY", "3.5");
    store.merge_visible(&all);

    store.set_show_advanced(false);
    let mut basic = store.visible_sections();
    set_value(&mut basic, "locale", "sv");
    store.merge_visible(&basic);

    assert_eq!(value_of(&store, "TARGET_ENERGY").as_deref(), Some("3.5"));
    assert_eq!(value_of(&store, "locale").as_deref(), Some("sv"));
}

#[test]
fn clear_then_reset_advanced() {
    let store = ConfigStore::new(hammer_schema());
    store.set_show_advanced(true);
    let mut all = store.visible_sections();
    set_value(&mut all, "PID_MODE", "1");
    set_value(&mut all, "locale", "en");
    store.merge_visible(&all);

    store.reset_advanced_values();
    assert_eq!(value_of(&store, "PID_MODE").as_deref(), Some(""));
    assert_eq!(value_of(&store, "locale").as_deref(), Some("en"));
    assert_eq!(value_of(&store, "SETTIME").as_deref(), Some("1"));

    store.clear_all_values();
    assert_eq!(value_of(&store, "locale").as_deref(), Some(""));
    assert_eq!(value_of(&store, "SETTIME").as_deref(), Some(""));
    assert_eq!(value_of(&store, "timezone").as_deref(), Some(""));

    store.reset_to_default();
    assert_eq!(value_of(&store, "SETTIME").as_deref(), Some("1"));
    assert_eq!(value_of(&store, "timezone").as_deref(), Some("local"));
}

#[tokio::test]
async fn visible_view_follows_the_advanced_flag() {
    let store = ConfigStore::new(hammer_schema());
    let mut view = VisibleSections::new(&store);
    assert_eq!(view.current().len(), 3);

    store.set_show_advanced(true);
    let shown = view.changed().await.unwrap();
    assert_eq!(shown.len(), 4);
    assert_eq!(shown[3].id, "system");
}
