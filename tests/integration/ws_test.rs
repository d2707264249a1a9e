//! Integration tests for WebSocket connection and presence broadcast.

use std::time::Duration;

use futures::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use talkie_core::types::UserId;

use super::helpers::{TestApp, ids, next_online_users, test_config, ws_connect};

async fn wait_until<F: Fn() -> bool>(check: F) {
    for _ in 0..100 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn test_connect_and_disconnect_broadcast() {
    let app = TestApp::new();
    let u1 = app.signup("u1@example.com").await;
    let u2 = app.signup("u2@example.com").await;
    let addr = app.spawn().await;

    let mut c1 = ws_connect(addr, &format!("?userId={}&token={}", u1.id, u1.token)).await;
    assert_eq!(next_online_users(&mut c1).await, ids(&[&u1.id]));

    let mut c2 = ws_connect(addr, &format!("?userId={}&token={}", u2.id, u2.token)).await;
    assert_eq!(next_online_users(&mut c1).await, ids(&[&u1.id, &u2.id]));
    assert_eq!(next_online_users(&mut c2).await, ids(&[&u1.id, &u2.id]));

    c1.close(None).await.unwrap();
    assert_eq!(next_online_users(&mut c2).await, ids(&[&u2.id]));
    let gateway = app.state.gateway.clone();
    wait_until(|| gateway.connection_count() == 1).await;
    assert_eq!(gateway.online_users().len(), 1);
}

#[tokio::test]
async fn test_anonymous_connection_is_never_listed() {
    let app = TestApp::new();
    let u1 = app.signup("anon-u1@example.com").await;
    let addr = app.spawn().await;

    let mut anon = ws_connect(addr, "").await;
    assert_eq!(next_online_users(&mut anon).await, Vec::<String>::new());

    let mut c1 = ws_connect(addr, &format!("?userId={}&token={}", u1.id, u1.token)).await;
    assert_eq!(next_online_users(&mut c1).await, ids(&[&u1.id]));
    assert_eq!(next_online_users(&mut anon).await, ids(&[&u1.id]));

    assert_eq!(app.state.gateway.connection_count(), 2);

    anon.close(None).await.unwrap();
    assert_eq!(next_online_users(&mut c1).await, ids(&[&u1.id]));
}

#[tokio::test]
async fn test_identity_mismatch_is_refused() {
    let app = TestApp::new();
    let u1 = app.signup("m1@example.com").await;
    let u2 = app.signup("m2@example.com").await;
    let addr = app.spawn().await;

    let url = format!("ws://{addr}/ws?userId={}&token={}", u2.id, u1.token);
    match connect_async(url).await {
        Err(WsError::Http(response)) => assert_eq!(response.status().as_u16(), 401),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("handshake should have been refused"),
    }

    assert!(app.state.gateway.online_users().is_empty());
    assert_eq!(app.state.gateway.connection_count(), 0);
}

#[tokio::test]
async fn test_claim_without_token_is_refused() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    let url = format!("ws://{addr}/ws?userId=someone");
    match connect_async(url).await {
        Err(WsError::Http(response)) => assert_eq!(response.status().as_u16(), 401),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("handshake should have been refused"),
    }
    assert_eq!(app.state.gateway.metrics().connections_rejected, 1);
}

#[tokio::test]
async fn test_trusted_mode_accepts_raw_user_id() {
    let mut config = test_config();
    config.realtime.verify_identity = false;
    let app = TestApp::with_config(config);
    let addr = app.spawn().await;

    let mut client = ws_connect(addr, "?userId=legacy-user").await;
    assert_eq!(next_online_users(&mut client).await, ids(&["legacy-user"]));
}

#[tokio::test]
async fn test_stale_socket_does_not_evict_newer_one() {
    let app = TestApp::new();
    let u1 = app.signup("multi@example.com").await;
    let addr = app.spawn().await;
    let query = format!("?userId={}&token={}", u1.id, u1.token);

    let mut first = ws_connect(addr, &query).await;
    assert_eq!(next_online_users(&mut first).await, ids(&[&u1.id]));

    let mut second = ws_connect(addr, &query).await;
    assert_eq!(next_online_users(&mut second).await, ids(&[&u1.id]));
    assert_eq!(next_online_users(&mut first).await, ids(&[&u1.id]));

    first.close(None).await.unwrap();
    assert_eq!(next_online_users(&mut second).await, ids(&[&u1.id]));

    let gateway = app.state.gateway.clone();
    wait_until(|| gateway.connection_count() == 1).await;
    assert_eq!(app.state.gateway.online_users().len(), 1);
}

#[tokio::test]
async fn test_close_all_ends_sessions() {
    let app = TestApp::new();
    let u1 = app.signup("shutdown@example.com").await;
    let addr = app.spawn().await;

    let mut client = ws_connect(addr, &format!("?userId={}&token={}", u1.id, u1.token)).await;
    assert_eq!(next_online_users(&mut client).await, ids(&[&u1.id]));

    assert_eq!(app.state.gateway.close_all().await, 1);
    assert!(app.state.gateway.online_users().is_empty());
}

#[tokio::test]
async fn test_silent_client_is_dropped_after_pong_timeout() {
    let mut config = test_config();
    config.realtime.verify_identity = false;
    config.realtime.ping_interval_seconds = 1;
    config.realtime.pong_timeout_seconds = 2;
    let app = TestApp::with_config(config);
    let addr = app.spawn().await;

    let mut watcher = ws_connect(addr, "?userId=watcher").await;
    assert_eq!(next_online_users(&mut watcher).await, ids(&["watcher"]));

    // Connected, then never read again, so it never answers a ping.
    let silent = ws_connect(addr, "?userId=silent").await;
    assert_eq!(next_online_users(&mut watcher).await, ids(&["silent", "watcher"]));

    // The watcher keeps reading and answering pings the whole time.
    assert_eq!(next_online_users(&mut watcher).await, ids(&["watcher"]));

    let gateway = app.state.gateway.clone();
    wait_until(|| gateway.connection_count() == 1).await;
    assert!(!gateway.is_online(&UserId::from("silent")));
    assert!(gateway.is_online(&UserId::from("watcher")));

    drop(silent);
}

#[tokio::test]
async fn test_server_side_close_releases_connection() {
    let mut config = test_config();
    config.realtime.verify_identity = false;
    let app = TestApp::with_config(config);
    let addr = app.spawn().await;

    let mut watcher = ws_connect(addr, "?userId=watcher").await;
    assert_eq!(next_online_users(&mut watcher).await, ids(&["watcher"]));
    let mut doomed = ws_connect(addr, "?userId=doomed").await;
    assert_eq!(next_online_users(&mut doomed).await, ids(&["doomed", "watcher"]));
    assert_eq!(next_online_users(&mut watcher).await, ids(&["doomed", "watcher"]));

    // Closed without the peer doing anything, as when the writer fails.
    let handle = app
        .state
        .gateway
        .registry()
        .get(&UserId::from("doomed"))
        .expect("doomed is registered");
    handle.mark_closed();

    assert_eq!(next_online_users(&mut watcher).await, ids(&["watcher"]));

    let ended = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match doomed.next().await {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            }
        }
    })
    .await;
    assert!(ended.is_ok(), "client never saw the connection end");

    let gateway = app.state.gateway.clone();
    wait_until(|| gateway.connection_count() == 1).await;
}
