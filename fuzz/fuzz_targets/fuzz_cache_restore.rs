#![no_main]
use hammerqr::ConfigStore;
use hammerqr::persistence::LocalCache;
use hammerqr::schema::hammer_schema;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(dir) = tempfile::tempdir() else {
        return;
    };
    let path = dir.path().join("cache.json");
    if std::fs::write(&path, data).is_err() {
        return;
    }

    // Whatever the file holds, the restored tree has the schema's shape
    let store = ConfigStore::with_cache(hammer_schema(), LocalCache::open(&path));
    let sections = store.sections();
    assert_eq!(sections.len(), store.schema().len());
    for (section, definition) in sections.iter().zip(store.schema()) {
        assert_eq!(section.id, definition.id);
        assert_eq!(section.items.len(), definition.fields.len());
    }
});
