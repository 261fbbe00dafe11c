use hammerqr::payload::{LivePayload, PayloadSettings};
use hammerqr::schema::hammer_schema;
use hammerqr::state::set_value;
use hammerqr::store::ConfigStore;
use hammerqr::timezone::{Clock, FixedClock};
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::StreamExt;

fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock {
        now_ms: 5_000,
        local_offset_ms: 0,
    })
}

fn settings() -> PayloadSettings {
    PayloadSettings {
        capacity: 16,
        refresh_interval: Duration::from_millis(250),
    }
}

#[tokio::test(start_paused = true)]
async fn edits_are_reflected_immediately() {
    let store = ConfigStore::new(hammer_schema());
    let live = LivePayload::spawn(&store, settings(), clock());
    let mut rx = live.subscribe();

    let mut visible = store.visible_sections();
    set_value(&mut visible, "locale", "fr");
    store.merge_visible(&visible);

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().text, "SETTIME=5;locale=fr");
}

#[tokio::test(start_paused = true)]
async fn re_enabling_time_sync_restarts_the_timer() {
    let store = ConfigStore::new(hammer_schema());
    let live = LivePayload::spawn(&store, settings(), clock());
    assert!(live.is_refreshing());
    let mut rx = live.subscribe();

    store.clear_all_values();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().text, "");
    assert!(!live.is_refreshing());

    store.reset_to_default();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().text, "SETTIME=5");
    assert!(live.is_refreshing());

    tokio::time::timeout(Duration::from_millis(300), rx.changed())
        .await
        .expect("refresh tick")
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn stream_starts_with_the_current_payload() {
    let store = ConfigStore::new(hammer_schema());
    let mut stream = LivePayload::spawn(&store, settings(), clock()).into_stream();

    let first = stream.next().await.unwrap();
    assert_eq!(first.text, "SETTIME=5");
    assert!(!first.over_capacity);
}

#[tokio::test(start_paused = true)]
async fn subscriptions_are_independent() {
    let store = ConfigStore::new(hammer_schema());
    let first = LivePayload::spawn(&store, settings(), clock());
    let second = LivePayload::spawn(&store, settings(), clock());
    let mut rx = second.subscribe();

    drop(first);
    tokio::time::timeout(Duration::from_millis(300), rx.changed())
        .await
        .expect("second subscription keeps ticking")
        .unwrap();
}
