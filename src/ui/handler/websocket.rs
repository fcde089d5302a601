//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    domain::{User, UserId},
    ui::{
        session::{ChatSession, NotificationSession},
        state::{AppState, ConnectQuery},
    },
    usecase::{NotificationUseCase, SendMessageUseCase},
};

/// WebSocket close code sent to unauthenticated connection attempts.
const POLICY_VIOLATION: u16 = 1008;

pub async fn chat_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    // An anonymous principal gets the close code over the upgraded socket;
    // no session state is allocated for it.
    let Some(user) = authenticate(&state, &query).await else {
        return ws.on_upgrade(reject_unauthenticated);
    };

    // Create the channel for this client and register group membership
    // before acknowledging the handshake, so a fanout arriving right after
    // acceptance already finds this member.
    let (tx, rx) = mpsc::unbounded_channel();
    let session = Arc::new(ChatSession::open(user, state.channel.clone(), tx.clone()).await);

    ws.on_upgrade(move |socket| handle_chat_socket(socket, state, session, tx, rx))
}

pub async fn notification_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    let Some(user) = authenticate(&state, &query).await else {
        return ws.on_upgrade(reject_unauthenticated);
    };

    let (tx, rx) = mpsc::unbounded_channel();
    let usecase =
        NotificationUseCase::with_poll_interval(state.notifications.clone(), state.poll_interval);

    // Opening the session spawns the watch loop for this connection; its
    // first cycle is buffered on the channel until the socket is up.
    let session = Arc::new(NotificationSession::open(user, usecase, tx));

    ws.on_upgrade(move |socket| handle_notification_socket(socket, session, rx))
}

/// Resolve the connecting principal, or `None` for an anonymous attempt.
async fn authenticate(state: &AppState, query: &ConnectQuery) -> Option<User> {
    let raw_id = query.user_id?;
    let user_id = UserId::new(raw_id).ok()?;
    state.users.resolve_user(user_id).await.ok()
}

/// Close an anonymous connection with a policy-violation code before any
/// session state is allocated.
async fn reject_unauthenticated(mut socket: WebSocket) {
    tracing::warn!("Rejecting unauthenticated connection attempt");
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code: POLICY_VIOLATION,
            reason: "authentication required".into(),
        })))
        .await;
}

async fn handle_chat_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    session: Arc<ChatSession>,
    tx: UnboundedSender<String>,
    mut rx: UnboundedReceiver<String>,
) {
    let (mut sender, mut receiver) = socket.split();

    let send_usecase = SendMessageUseCase::new(
        state.users.clone(),
        state.messages.clone(),
        state.channel.clone(),
    );

    // Task receiving frames from this client, processed one at a time in
    // arrival order
    let recv_session = session.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    recv_session.receive(text.as_str(), &send_usecase, &tx).await;
                }
                Message::Close(_) => {
                    tracing::info!("User '{}' requested close", recv_session.user().id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Task forwarding group deliveries to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Membership teardown pairs with the registration done at open, on
    // normal and abnormal disconnects alike.
    session.close().await;
}

async fn handle_notification_socket(
    socket: WebSocket,
    session: Arc<NotificationSession>,
    mut rx: UnboundedReceiver<String>,
) {
    let (mut sender, mut receiver) = socket.split();

    let recv_session = session.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    recv_session.receive(text.as_str()).await;
                }
                Message::Close(_) => {
                    tracing::info!("User '{}' requested close", recv_session.user().id);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Cancel the watch loop promptly; repeated connect/disconnect cycles
    // must not accumulate orphaned tasks.
    session.close();
}
