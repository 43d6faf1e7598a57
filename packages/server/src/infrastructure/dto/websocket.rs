//! WebSocket frame DTOs.
//!
//! Every frame is a JSON text frame of the form `{"event": "<name>", "data": <payload>}`.
//! `data` is absent for events without a payload.

use serde::{Deserialize, Serialize};

/// Frames sent by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    SetNickname {
        nickname: String,
    },
    Signup {
        username: String,
        password: String,
    },
    Login {
        username: String,
        password: String,
    },
    Logout,
    CreateRoom,
    JoinRoom {
        #[serde(rename = "roomCode")]
        room_code: String,
    },
    JoinQueue,
    Move {
        room: String,
        board: serde_json::Value,
    },
    Restart {
        room: String,
    },
    Chat {
        /// Accepted for compatibility; the server uses the caller's display name
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sender: Option<String>,
        message: String,
    },
    FriendRequest {
        from: String,
        to: String,
    },
    FriendResponse {
        from: String,
        to: String,
        accept: bool,
    },
    RemoveFriend {
        username: String,
        target: String,
    },
}

impl ClientMessage {
    /// The `event` tag, for logging without payloads (credentials included)
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::SetNickname { .. } => "set_nickname",
            Self::Signup { .. } => "signup",
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::CreateRoom => "create_room",
            Self::JoinRoom { .. } => "join_room",
            Self::JoinQueue => "join_queue",
            Self::Move { .. } => "move",
            Self::Restart { .. } => "restart",
            Self::Chat { .. } => "chat",
            Self::FriendRequest { .. } => "friend_request",
            Self::FriendResponse { .. } => "friend_response",
            Self::RemoveFriend { .. } => "remove_friend",
        }
    }
}

/// One seat of a `start` frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDto {
    pub id: String,
    pub name: String,
}

/// Frames sent by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    NicknameAck {
        success: bool,
    },
    AuthSuccess {
        username: String,
    },
    AuthError {
        message: String,
    },
    LoggedOut {
        username: String,
    },
    RoomCreated {
        #[serde(rename = "roomCode")]
        room_code: String,
    },
    JoinError {
        message: String,
    },
    QueueWaiting,
    Start {
        room: String,
        players: Vec<PlayerDto>,
    },
    /// The board payload, relayed untouched
    Update(serde_json::Value),
    Restart,
    OpponentLeft {
        room: String,
    },
    Chat {
        sender: String,
        message: String,
        timestamp: i64,
    },
    ChatError {
        message: String,
    },
    FriendRequestReceived {
        from: String,
    },
    FriendListUpdate {
        friends: Vec<String>,
    },
    FriendStatusUpdate {
        friend: String,
        #[serde(rename = "isOnline")]
        is_online: bool,
    },
}
