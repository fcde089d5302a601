//! WebSocket integration tests.
//!
//! End-to-end scenarios over real sockets: message fanout between delivery
//! groups, the unauthenticated-connect policy, and the notification
//! command/polling flows.

mod fixtures;
use fixtures::TestServer;

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use minato::domain::{ChannelLayer, RoutingKey, UserId};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::protocol::{Message, frame::coding::CloseCode},
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_DEADLINE: Duration = Duration::from_secs(5);

async fn connect(url: String) -> WsStream {
    let (ws, _) = connect_async(url).await.expect("Failed to connect");
    ws
}

/// Read frames until the next text frame, parsed as JSON.
async fn recv_json(ws: &mut WsStream) -> serde_json::Value {
    loop {
        let msg = tokio::time::timeout(RECV_DEADLINE, ws.next())
            .await
            .expect("Timed out waiting for frame")
            .expect("Stream ended")
            .expect("WebSocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).expect("Frame is not JSON");
        }
    }
}

/// Assert that no text frame arrives within a short window.
async fn assert_silent(ws: &mut WsStream) {
    let result = tokio::time::timeout(Duration::from_millis(300), ws.next()).await;
    assert!(result.is_err(), "Expected no frame, got {:?}", result);
}

/// Assert the next frame closes the connection with the policy-violation code.
async fn expect_policy_close(ws: &mut WsStream) {
    let msg = tokio::time::timeout(RECV_DEADLINE, ws.next())
        .await
        .expect("Timed out waiting for close")
        .expect("Stream ended")
        .expect("WebSocket error");
    match msg {
        Message::Close(Some(frame)) => assert_eq!(frame.code, CloseCode::Policy),
        other => panic!("Expected close frame, got {other:?}"),
    }
}

fn chat_frame(receiver_id: i64, text: &str) -> Message {
    Message::text(format!(
        r#"{{"type":"message","message":{{"receiver_id":{receiver_id},"text":"{text}"}}}}"#
    ))
}

#[tokio::test]
async fn test_unauthenticated_connect_is_closed_with_policy_violation() {
    // given:
    let server = TestServer::start(19190).await;

    // when: connect to the chat endpoint without an identity
    let mut ws = connect(server.ws_url("/ws/chat", None)).await;

    // then: the connection is closed with the policy-violation code
    expect_policy_close(&mut ws).await;
}

#[tokio::test]
async fn test_unresolvable_user_is_rejected_like_anonymous() {
    // given: no users exist
    let server = TestServer::start(19191).await;

    // when:
    let mut ws = connect(server.ws_url("/ws/notifications", Some(42))).await;

    // then:
    expect_policy_close(&mut ws).await;
}

#[tokio::test]
async fn test_membership_is_registered_before_the_handshake_completes() {
    // given: a server whose channel layer the test can observe directly
    let (server, channel) = TestServer::start_observable(19198, 3600).await;
    let user_id = server.create_user("alice").await;
    let key = RoutingKey::for_user(UserId::new(user_id).unwrap());

    // when: the connect handshake completes
    let mut ws = connect(server.ws_url("/ws/chat", Some(user_id))).await;

    // then: the group membership already exists, with no further round trip
    assert_eq!(channel.member_count(&key).await, 1);

    // a frame fanned out into the group right after acceptance is not lost
    channel
        .group_send(
            &key,
            r#"{"type":"message","message":{"text":"right after accept"}}"#.to_string(),
        )
        .await;
    let frame = recv_json(&mut ws).await;
    assert_eq!(frame["message"]["text"], "right after accept");
}

#[tokio::test]
async fn test_rejected_connects_never_register_membership() {
    // given: one real user who never connects
    let (server, channel) = TestServer::start_observable(19199, 3600).await;
    let alice_id = server.create_user("alice").await;

    // when: an anonymous attempt and an unresolvable-identity attempt
    let mut anonymous_ws = connect(server.ws_url("/ws/chat", None)).await;
    expect_policy_close(&mut anonymous_ws).await;
    let mut unresolved_ws = connect(server.ws_url("/ws/chat", Some(42))).await;
    expect_policy_close(&mut unresolved_ws).await;

    // then: no group gained a member
    let alice_key = RoutingKey::for_user(UserId::new(alice_id).unwrap());
    let unresolved_key = RoutingKey::for_user(UserId::new(42).unwrap());
    assert_eq!(channel.member_count(&alice_key).await, 0);
    assert_eq!(channel.member_count(&unresolved_key).await, 0);
}

#[tokio::test]
async fn test_message_fans_out_to_sender_and_receiver_groups() {
    // given: two connected users
    let server = TestServer::start(19192).await;
    let alice_id = server.create_user("alice").await;
    let bob_id = server.create_user("bob").await;
    let mut alice_ws = connect(server.ws_url("/ws/chat", Some(alice_id))).await;
    let mut bob_ws = connect(server.ws_url("/ws/chat", Some(bob_id))).await;

    // when: alice sends a message to bob
    alice_ws.send(chat_frame(bob_id, "hi")).await.unwrap();

    // then: both parties receive the same persisted representation
    let alice_frame = recv_json(&mut alice_ws).await;
    let bob_frame = recv_json(&mut bob_ws).await;
    assert_eq!(alice_frame, bob_frame);
    assert_eq!(alice_frame["type"], "message");
    assert_eq!(alice_frame["message"]["sender_id"], alice_id);
    assert_eq!(alice_frame["message"]["receiver_id"], bob_id);
    assert_eq!(alice_frame["message"]["text"], "hi");

    // and exactly once each
    assert_silent(&mut alice_ws).await;
    assert_silent(&mut bob_ws).await;
}

#[tokio::test]
async fn test_self_send_is_delivered_exactly_once() {
    // given:
    let server = TestServer::start(19193).await;
    let alice_id = server.create_user("alice").await;
    let mut ws = connect(server.ws_url("/ws/chat", Some(alice_id))).await;

    // when: alice messages herself
    ws.send(chat_frame(alice_id, "note to self")).await.unwrap();

    // then: one delivery, no duplicate
    let frame = recv_json(&mut ws).await;
    assert_eq!(frame["message"]["text"], "note to self");
    assert_silent(&mut ws).await;
}

#[tokio::test]
async fn test_unknown_receiver_is_reported_and_connection_stays_open() {
    // given:
    let server = TestServer::start(19194).await;
    let alice_id = server.create_user("alice").await;
    let mut ws = connect(server.ws_url("/ws/chat", Some(alice_id))).await;

    // when:
    ws.send(chat_frame(99, "hi")).await.unwrap();

    // then: a failed-send report, not a close
    let frame = recv_json(&mut ws).await;
    assert_eq!(frame["type"], "error");

    // the session still routes a valid message afterwards
    ws.send(chat_frame(alice_id, "still open")).await.unwrap();
    let frame = recv_json(&mut ws).await;
    assert_eq!(frame["message"]["text"], "still open");
}

#[tokio::test]
async fn test_pending_notifications_flow_in_order_with_trailing_count() {
    // given: three unseen notifications, poll cadence too slow to interfere
    let server = TestServer::start_with_poll(19195, 3600).await;
    let user_id = server.create_user("alice").await;
    for message in ["first", "second", "third"] {
        server.create_notification(user_id, message).await;
    }
    let mut ws = connect(server.ws_url("/ws/notifications", Some(user_id))).await;

    // the watch loop's initial cycle pushes the unseen batch once
    for _ in 0..3 {
        let frame = recv_json(&mut ws).await;
        assert_eq!(frame["action"], "new_notification");
    }

    // when:
    ws.send(Message::text(r#"{"action":"see_notification"}"#))
        .await
        .unwrap();

    // then: pending batch in creation order, then exactly one count event
    for expected in ["first", "second", "third"] {
        let frame = recv_json(&mut ws).await;
        assert_eq!(frame["action"], "previous_notification");
        assert_eq!(frame["notification"]["message"], expected);
    }
    let count_frame = recv_json(&mut ws).await;
    assert_eq!(count_frame["notification_count"], 3);
    assert_silent(&mut ws).await;
}

#[tokio::test]
async fn test_mark_as_seen_zeroes_the_count() {
    // given: two unseen notifications
    let server = TestServer::start_with_poll(19196, 3600).await;
    let user_id = server.create_user("alice").await;
    server.create_notification(user_id, "a").await;
    server.create_notification(user_id, "b").await;
    let mut ws = connect(server.ws_url("/ws/notifications", Some(user_id))).await;

    // drain the watch loop's initial batch
    for _ in 0..2 {
        recv_json(&mut ws).await;
    }

    // when:
    ws.send(Message::text(r#"{"action":"mark_as_seen"}"#))
        .await
        .unwrap();
    ws.send(Message::text(r#"{"action":"see_notification_count"}"#))
        .await
        .unwrap();

    // then: commands on one connection run in arrival order
    let frame = recv_json(&mut ws).await;
    assert_eq!(frame["notification_count"], 0);
}

#[tokio::test]
async fn test_watch_loop_pushes_notifications_created_mid_session() {
    // given: a connected user with nothing unseen, fast poll cadence
    let server = TestServer::start_with_poll(19197, 1).await;
    let user_id = server.create_user("alice").await;
    let mut ws = connect(server.ws_url("/ws/notifications", Some(user_id))).await;
    assert_silent(&mut ws).await;

    // when: a business event creates a notification mid-session
    server.create_notification(user_id, "fresh").await;

    // then: the next poll cycle pushes it without any client command
    let frame = recv_json(&mut ws).await;
    assert_eq!(frame["action"], "new_notification");
    assert_eq!(frame["notification"]["message"], "fresh");
}
