//! Bridge behavior over the in-memory row store and push transport.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;

use mandal_core::traits::{PushTransport, RowStore};
use mandal_core::types::row::{Row, RowEvent, RowEventKind};
use mandal_entity::{ChatMessage, Notification, chat, notification};
use mandal_provider::memory::{MemoryPushTransport, MemoryRowStore};
use mandal_realtime::{EventBridge, FeedState, HandleState};

fn setup() -> (Arc<MemoryRowStore>, Arc<MemoryPushTransport>, EventBridge) {
    let rows = Arc::new(MemoryRowStore::new());
    let transport = Arc::new(MemoryPushTransport::default());
    let bridge = EventBridge::new(
        Arc::clone(&rows) as Arc<dyn RowStore>,
        Arc::clone(&transport) as Arc<dyn PushTransport>,
    );
    (rows, transport, bridge)
}

#[tokio::test]
async fn seed_rows_arrive_before_push_events() {
    let (rows, transport, bridge) = setup();
    rows.seed(
        notification::TABLE,
        vec![json!({"id": 1, "message": "seeded", "created_at": null})],
    );

    let (tx, mut rx) = mpsc::channel(16);
    let handle = bridge
        .open(Notification::feed_filter(), tx)
        .await
        .unwrap();
    assert_eq!(handle.state(), HandleState::Open);

    transport
        .publish(
            notification::TABLE,
            RowEventKind::Insert,
            Row::new(json!({"id": 2, "message": "pushed", "created_at": null})),
        )
        .await;

    let mut feed = FeedState::<Notification>::new();
    for _ in 0..2 {
        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        feed.apply(&event);
    }
    let ids: Vec<i64> = feed.items().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![1, 2]);

    handle.close().await;
}

#[tokio::test]
async fn chat_seed_respects_creation_order() {
    let (rows, _, bridge) = setup();
    rows.seed(
        chat::TABLE,
        vec![
            json!({"id": 2, "sender": "b", "message": "later", "created_at": "2026-08-27T10:01:00Z"}),
            json!({"id": 1, "sender": "a", "message": "earlier", "created_at": "2026-08-27T10:00:00Z"}),
        ],
    );

    let (tx, mut rx) = mpsc::channel(16);
    let handle = bridge.open(ChatMessage::feed_filter(), tx).await.unwrap();

    let first: ChatMessage = rx.recv().await.unwrap().payload.decode().unwrap();
    let second: ChatMessage = rx.recv().await.unwrap().payload.decode().unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);

    handle.close().await;
}

#[tokio::test]
async fn pushed_rows_outside_the_filter_predicates_are_dropped() {
    let (rows, transport, bridge) = setup();
    rows.seed(
        chat::TABLE,
        vec![json!({"id": 1, "sender": "uma", "message": "mine", "created_at": null})],
    );

    let (tx, mut rx) = mpsc::channel(16);
    let filter = ChatMessage::feed_filter().eq("sender", "uma");
    let handle = bridge.open(filter, tx).await.unwrap();

    let seeded: ChatMessage = rx.recv().await.unwrap().payload.decode().unwrap();
    assert_eq!(seeded.id, 1);

    // The transport fans out every insert on the table; only the row
    // matching the predicate may reach the sink.
    transport
        .publish(
            chat::TABLE,
            RowEventKind::Insert,
            Row::new(json!({"id": 2, "sender": "asha", "message": "other", "created_at": null})),
        )
        .await;
    transport
        .publish(
            chat::TABLE,
            RowEventKind::Insert,
            Row::new(json!({"id": 3, "sender": "uma", "message": "mine too", "created_at": null})),
        )
        .await;

    let next: ChatMessage = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .unwrap()
        .unwrap()
        .payload
        .decode()
        .unwrap();
    assert_eq!(next.id, 3);

    handle.close().await;
}

#[tokio::test]
async fn double_close_is_a_no_op() {
    let (_, transport, bridge) = setup();
    let (tx, _rx) = mpsc::channel(16);
    let handle = bridge
        .open(Notification::feed_filter(), tx)
        .await
        .unwrap();
    assert_eq!(transport.active_subscriptions(), 1);

    handle.close().await;
    assert_eq!(handle.state(), HandleState::Closed);
    assert_eq!(transport.active_subscriptions(), 0);

    // Second close: no error, no double release.
    handle.close().await;
    assert_eq!(handle.state(), HandleState::Closed);
    assert_eq!(transport.active_subscriptions(), 0);
}

#[tokio::test]
async fn subscribe_failure_leaves_handle_inert() {
    let (_, transport, bridge) = setup();
    transport.fail_next_subscribe();

    let (tx, mut rx) = mpsc::channel(16);
    let handle = bridge
        .open(Notification::feed_filter(), tx)
        .await
        .unwrap();
    // No error state is modeled; the handle simply never opened.
    assert_eq!(handle.state(), HandleState::Opening);

    transport
        .publish(
            notification::TABLE,
            RowEventKind::Insert,
            Row::new(json!({"id": 9, "message": "lost", "created_at": null})),
        )
        .await;
    assert!(rx.try_recv().is_err());

    handle.close().await;
    assert_eq!(handle.state(), HandleState::Closed);
}

#[tokio::test]
async fn dropping_a_handle_releases_the_channel() {
    let (_, transport, bridge) = setup();
    let (tx, _rx) = mpsc::channel(16);
    let handle = bridge
        .open(Notification::feed_filter(), tx)
        .await
        .unwrap();
    assert_eq!(transport.active_subscriptions(), 1);

    drop(handle);
    // The release is spawned from Drop; give it a few turns to run.
    for _ in 0..10 {
        if transport.active_subscriptions() == 0 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(transport.active_subscriptions(), 0);
}

#[tokio::test]
async fn seed_fetch_failure_starts_empty_but_still_subscribes() {
    let (_, transport, bridge) = setup();
    // Selecting from a table the store has never seen yields no rows;
    // the bridge treats that the same as an empty seed.
    let (tx, mut rx) = mpsc::channel(16);
    let handle = bridge
        .open(Notification::feed_filter(), tx)
        .await
        .unwrap();
    assert_eq!(handle.state(), HandleState::Open);

    transport
        .publish(
            notification::TABLE,
            RowEventKind::Insert,
            Row::new(json!({"id": 1, "message": "only push", "created_at": null})),
        )
        .await;
    let event: RowEvent = rx.recv().await.unwrap();
    assert_eq!(event.id, Some("1".to_string()));

    handle.close().await;
}
