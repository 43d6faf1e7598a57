//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::ConnectionId, infrastructure::dto::websocket::ClientMessage, ui::state::AppState,
};

/// Accepts a WebSocket upgrade.
///
/// The connection is registered only once the upgrade has completed, so a failed
/// handshake never leaves a session behind.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards encoded frames from the connection's channel to its socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Registers the connection anonymously and runs it until either side closes.
///
/// The server assigns the connection id; clients never choose it.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();

    if let Err(e) = state
        .connect_client_usecase
        .execute(connection_id.clone(), tx)
        .await
    {
        tracing::warn!("Rejecting connection: {}", e);
        return;
    }
    tracing::info!("Client '{}' connected", connection_id);

    let (sender, mut receiver) = socket.split();

    let recv_state = state.clone();
    let recv_id = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", recv_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(message) => dispatch(&recv_state, &recv_id, message).await,
                    Err(e) => {
                        tracing::warn!("Ignoring malformed frame from '{}': {}", recv_id, e);
                    }
                },
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", recv_id);
                    break;
                }
                // ping/pong は axum が応答する。バイナリフレームは使わない。
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state
        .disconnect_client_usecase
        .execute(&connection_id)
        .await;
    tracing::info!("Client '{}' disconnected", connection_id);
}

/// Routes one inbound frame to its use case.
async fn dispatch(state: &AppState, connection_id: &ConnectionId, message: ClientMessage) {
    tracing::debug!("Received '{}' from '{}'", message.event_name(), connection_id);

    match message {
        ClientMessage::SetNickname { nickname } => {
            state
                .authenticate_usecase
                .set_nickname(connection_id, nickname)
                .await
        }
        ClientMessage::Signup { username, password } => {
            state
                .authenticate_usecase
                .signup(connection_id, username, password)
                .await
        }
        ClientMessage::Login { username, password } => {
            state
                .authenticate_usecase
                .login(connection_id, username, password)
                .await
        }
        ClientMessage::Logout => state.authenticate_usecase.logout(connection_id).await,
        ClientMessage::CreateRoom => state.matchmaking_usecase.create_room(connection_id).await,
        ClientMessage::JoinRoom { room_code } => {
            state
                .matchmaking_usecase
                .join_room(connection_id, room_code)
                .await
        }
        ClientMessage::JoinQueue => state.matchmaking_usecase.join_queue(connection_id).await,
        ClientMessage::Move { room, board } => {
            state
                .relay_usecase
                .relay_move(connection_id, room, board)
                .await
        }
        ClientMessage::Restart { room } => state.relay_usecase.restart(connection_id, room).await,
        ClientMessage::Chat { message, .. } => {
            state.relay_usecase.chat(connection_id, message).await
        }
        ClientMessage::FriendRequest { from, to } => {
            state
                .manage_friends_usecase
                .send_request(connection_id, from, to)
                .await
        }
        ClientMessage::FriendResponse { from, to, accept } => {
            state
                .manage_friends_usecase
                .respond(connection_id, from, to, accept)
                .await
        }
        ClientMessage::RemoveFriend { username, target } => {
            state
                .manage_friends_usecase
                .remove(connection_id, username, target)
                .await
        }
    }
}
