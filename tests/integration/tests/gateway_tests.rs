//! End-to-end tests against a running gateway
//!
//! Each test boots its own server on an ephemeral port over in-memory
//! storage and talks to it with real WebSocket and HTTP clients.

use chat_common::{AppConfig, JwtConfig, JwtService};
use chat_core::UserId;
use chat_db::InMemoryStore;
use integration_tests::*;
use serde_json::json;

const ALICE: i64 = 1;
const BOB: i64 = 2;
const CAROL: i64 = 3;

fn uid(id: i64) -> UserId {
    UserId::new(id)
}

// ============================================================================
// HTTP Surface
// ============================================================================

#[tokio::test]
async fn test_health_check() -> anyhow::Result<()> {
    let server = TestServer::start().await?;

    let response = server.get("/health").await?;
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await?, "OK");
    Ok(())
}

#[tokio::test]
async fn test_online_endpoint_lists_connected_users() -> anyhow::Result<()> {
    let server = TestServer::start().await?;
    let _bob = server.connect_as(BOB).await?;
    let _alice = server.connect_as(ALICE).await?;

    let response = server.get("/online").await?;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["online_users"], json!([ALICE, BOB]));
    Ok(())
}

#[tokio::test]
async fn test_remove_member_notifies_room() -> anyhow::Result<()> {
    let store = InMemoryStore::new();
    let chat = store.seed_chat("general", &[uid(ALICE), uid(BOB)]).await?;
    let server = TestServer::start_with_store(store).await?;

    let mut alice = server.join_as(ALICE, chat).await?;
    let mut bob = server.join_as(BOB, chat).await?;

    let path = format!("/chats/{chat}/members/{BOB}");
    let response = server.delete(&path).await?;
    assert_eq!(response.status(), 204);

    for client in [&mut alice, &mut bob] {
        let event = client.expect("send_message").await?;
        assert_eq!(event["created_by"], 0);
        assert_eq!(event["data"]["message"]["type"], "system");
        assert_eq!(event["data"]["message"]["chat_id"], json!(chat));
    }
    assert!(!server.state.rooms().is_member(uid(BOB), chat));
    assert!(server.state.rooms().is_member(uid(ALICE), chat));

    let again = server.delete(&path).await?;
    assert_eq!(again.status(), 404);
    Ok(())
}

// ============================================================================
// Room Fan-out
// ============================================================================

#[tokio::test]
async fn test_message_reaches_every_room_member() -> anyhow::Result<()> {
    let store = InMemoryStore::new();
    let chat = store.seed_chat("general", &[uid(ALICE), uid(BOB)]).await?;
    let server = TestServer::start_with_store(store).await?;

    let mut alice = server.join_as(ALICE, chat).await?;
    let mut bob = server.join_as(BOB, chat).await?;
    let mut carol = server.connect_as(CAROL).await?;

    alice.send(&send_message(ALICE, chat, "hello room")).await?;

    let echoed = alice.expect("send_message").await?;
    let received = bob.expect("send_message").await?;
    assert_eq!(received["created_by"], ALICE);
    assert_eq!(received["data"]["message"]["content"], "hello room");
    assert_eq!(echoed["data"]["message"], received["data"]["message"]);

    carol.expect_none("send_message").await?;
    Ok(())
}

#[tokio::test]
async fn test_typing_skips_sender() -> anyhow::Result<()> {
    let store = InMemoryStore::new();
    let chat = store.seed_chat("general", &[uid(ALICE), uid(BOB)]).await?;
    let server = TestServer::start_with_store(store).await?;

    let mut alice = server.join_as(ALICE, chat).await?;
    let mut bob = server.join_as(BOB, chat).await?;

    alice.send(&typing(ALICE, chat, true)).await?;

    let event = bob.expect("typing").await?;
    assert_eq!(event["data"]["user_id"], ALICE);
    assert_eq!(event["data"]["is_typing"], true);
    alice.expect_none("typing").await?;
    Ok(())
}

#[tokio::test]
async fn test_malformed_frame_keeps_connection_open() -> anyhow::Result<()> {
    let store = InMemoryStore::new();
    let chat = store.seed_chat("general", &[uid(ALICE)]).await?;
    let server = TestServer::start_with_store(store).await?;

    let mut alice = server.join_as(ALICE, chat).await?;
    alice.send_raw("{not json").await?;
    alice.send(&json!({"type": "no_such_event", "data": {}, "created_by": ALICE})).await?;
    alice.send(&send_message(ALICE, chat, "still here")).await?;

    let event = alice.expect("send_message").await?;
    assert_eq!(event["data"]["message"]["content"], "still here");
    Ok(())
}

// ============================================================================
// Presence
// ============================================================================

#[tokio::test]
async fn test_friends_see_online_and_offline() -> anyhow::Result<()> {
    let store = InMemoryStore::new();
    store.seed_friends(uid(ALICE), uid(BOB)).await?;
    let server = TestServer::start_with_store(store).await?;

    let mut alice = server.connect_as(ALICE).await?;
    let mut bob = server.connect_as(BOB).await?;

    let online = alice.expect("user_online").await?;
    assert_eq!(online["data"]["user_id"], BOB);
    let already_online = bob.expect("user_online").await?;
    assert_eq!(already_online["data"]["user_id"], ALICE);

    bob.close().await?;
    let offline = alice.expect("user_offline").await?;
    assert_eq!(offline["data"]["user_id"], BOB);
    server
        .wait_until(|state| !state.registry().is_online(uid(BOB)))
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_online_list_is_scoped_to_peers() -> anyhow::Result<()> {
    let store = InMemoryStore::new();
    store.seed_chat("pair", &[uid(ALICE), uid(BOB)]).await?;
    let server = TestServer::start_with_store(store).await?;

    let _alice = server.connect_as(ALICE).await?;
    let mut bob = server.connect_as(BOB).await?;
    let mut carol = server.connect_as(CAROL).await?;

    assert_eq!(carol.latest_online_list().await?, Some(json!([CAROL])));
    assert_eq!(bob.latest_online_list().await?, Some(json!([ALICE, BOB])));
    Ok(())
}

#[tokio::test]
async fn test_replaced_connection_is_closed() -> anyhow::Result<()> {
    let store = InMemoryStore::new();
    store.seed_friends(uid(ALICE), uid(BOB)).await?;
    let server = TestServer::start_with_store(store).await?;

    let mut bob = server.connect_as(BOB).await?;
    let mut first = server.connect_as(ALICE).await?;
    bob.expect("user_online").await?;

    let mut second = server.connect().await?;
    second.send(&connect(ALICE)).await?;

    assert_eq!(first.expect_close().await?, 4001);
    assert!(server.state.registry().is_online(uid(ALICE)));
    bob.expect_none("user_offline").await?;

    bob.send(&json!({
        "type": "friend_invite",
        "data": {"recipient_id": ALICE},
        "created_by": BOB
    }))
    .await?;
    let invite = second.expect("friend_invite").await?;
    assert_eq!(invite["created_by"], BOB);
    Ok(())
}

// ============================================================================
// Connection Policy
// ============================================================================

#[tokio::test]
async fn test_require_auth_rejects_missing_token() -> anyhow::Result<()> {
    let mut config = AppConfig::local();
    config.jwt = Some(JwtConfig {
        secret: "integration-secret".to_string(),
        access_token_expiry: 900,
    });
    config.realtime.require_auth = true;
    let server = TestServer::start_with_config(config, InMemoryStore::new()).await?;

    assert!(WsClient::connect(&server.ws_url(None)).await.is_err());
    assert!(WsClient::connect(&server.ws_url(Some("garbage"))).await.is_err());

    let token = JwtService::new("integration-secret", 900).generate_access_token(uid(ALICE))?;
    let _alice = WsClient::connect(&server.ws_url(Some(&token))).await?;
    server
        .wait_until(|state| state.registry().is_online(uid(ALICE)))
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_idle_connection_is_closed() -> anyhow::Result<()> {
    let mut config = AppConfig::local();
    config.realtime.idle_timeout_secs = 1;
    let server = TestServer::start_with_config(config, InMemoryStore::new()).await?;

    let mut alice = server.connect_as(ALICE).await?;

    assert_eq!(alice.expect_close().await?, 4003);
    server
        .wait_until(|state| !state.registry().is_online(uid(ALICE)))
        .await?;
    Ok(())
}
