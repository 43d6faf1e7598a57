//! ドメイン層
//!
//! 接続・アカウント・ルームの状態と、その変更規則を持つ。
//! 外部（WebSocket・シリアライズ形式）には依存しない。

pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod lobby;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use entity::{Account, GameRoom, Session};
pub use error::{
    AuthError, ChatError, MessagePushError, RelayError, RoomError, SocialError, ValueObjectError,
};
pub use event::{Delivery, Outbox, PlayerSeat, ServerEvent};
pub use factory::{
    DEFAULT_ROOM_CODE_LENGTH, RandomRoomCodeFactory, RoomCodeFactory, SequenceRoomCodeFactory,
};
pub use lobby::{Lobby, PairingMode};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::LobbyRepository;
pub use value_object::{
    BoardPayload, ChatText, ConnectionId, Credential, DisplayName, RoomCode, Timestamp, Username,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
