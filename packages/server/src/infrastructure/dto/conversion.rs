//! Conversion logic between domain events and DTOs.

use crate::domain::event::{PlayerSeat, ServerEvent};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Event → DTO
// ========================================

impl From<&PlayerSeat> for dto::PlayerDto {
    fn from(seat: &PlayerSeat) -> Self {
        Self {
            id: seat.id.as_str().to_string(),
            name: seat.name.clone(),
        }
    }
}

impl From<&ServerEvent> for dto::ServerMessage {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::NicknameAck { success } => Self::NicknameAck { success: *success },
            ServerEvent::AuthSuccess { username } => Self::AuthSuccess {
                username: username.to_string(),
            },
            ServerEvent::AuthError { message } => Self::AuthError {
                message: message.clone(),
            },
            ServerEvent::LoggedOut { username } => Self::LoggedOut {
                username: username.to_string(),
            },
            ServerEvent::RoomCreated { room } => Self::RoomCreated {
                room_code: room.to_string(),
            },
            ServerEvent::JoinError { message } => Self::JoinError {
                message: message.clone(),
            },
            ServerEvent::QueueWaiting => Self::QueueWaiting,
            ServerEvent::Start { room, players } => Self::Start {
                room: room.to_string(),
                players: players.iter().map(dto::PlayerDto::from).collect(),
            },
            ServerEvent::Update { board } => Self::Update(board.as_value().clone()),
            ServerEvent::Restart => Self::Restart,
            ServerEvent::OpponentLeft { room } => Self::OpponentLeft {
                room: room.to_string(),
            },
            ServerEvent::Chat {
                sender,
                message,
                timestamp,
            } => Self::Chat {
                sender: sender.to_string(),
                message: message.as_str().to_string(),
                timestamp: timestamp.value(),
            },
            ServerEvent::ChatError { message } => Self::ChatError {
                message: message.clone(),
            },
            ServerEvent::FriendRequestReceived { from } => Self::FriendRequestReceived {
                from: from.to_string(),
            },
            ServerEvent::FriendListUpdate { friends } => Self::FriendListUpdate {
                friends: friends.iter().map(ToString::to_string).collect(),
            },
            ServerEvent::FriendStatusUpdate { friend, is_online } => Self::FriendStatusUpdate {
                friend: friend.to_string(),
                is_online: *is_online,
            },
        }
    }
}

/// ドメインイベントを送信用の JSON テキストにする
pub fn encode_event(event: &ServerEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&dto::ServerMessage::from(event))
}
