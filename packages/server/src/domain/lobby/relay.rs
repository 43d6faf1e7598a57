//! Relay Engine: ルーム内の中継とグローバルチャット
//!
//! ペイロードの中身は解釈しない。

use crate::domain::{
    entity::GameRoom,
    error::{ChatError, RelayError},
    event::{Outbox, ServerEvent},
    value_object::{BoardPayload, ChatText, ConnectionId, RoomCode, Timestamp},
};

use super::Lobby;

impl Lobby {
    /// ボードの状態を同じルームの相手にだけ送る（送信者は除く）
    pub fn relay_move(
        &self,
        connection_id: &ConnectionId,
        code: &RoomCode,
        board: BoardPayload,
    ) -> Result<Outbox, RelayError> {
        let room = self.seated_room(connection_id, code)?;
        Ok(self.broadcast_to_room(room, connection_id, ServerEvent::Update { board }, false))
    }

    /// 送信者を含むルームの全員にリスタートを送る
    pub fn restart(
        &self,
        connection_id: &ConnectionId,
        code: &RoomCode,
    ) -> Result<Outbox, RelayError> {
        let room = self.seated_room(connection_id, code)?;
        Ok(self.broadcast_to_room(room, connection_id, ServerEvent::Restart, true))
    }

    /// 表示名を持つ接続からのメッセージを全接続へ送る
    pub fn chat(
        &self,
        connection_id: &ConnectionId,
        message: ChatText,
        sent_at: Timestamp,
    ) -> Result<Outbox, ChatError> {
        let sender = self
            .identity
            .display_name(connection_id)
            .cloned()
            .ok_or(ChatError::Anonymous)?;

        Ok(self.broadcast_global(ServerEvent::Chat {
            sender,
            message,
            timestamp: sent_at,
        }))
    }

    pub fn broadcast_to_room(
        &self,
        room: &GameRoom,
        sender: &ConnectionId,
        event: ServerEvent,
        include_sender: bool,
    ) -> Outbox {
        let targets = if include_sender {
            room.occupants().to_vec()
        } else {
            room.others(sender)
        };
        let mut outbox = Outbox::new();
        outbox.multicast(targets, event);
        outbox
    }

    pub fn broadcast_global(&self, event: ServerEvent) -> Outbox {
        let mut outbox = Outbox::new();
        outbox.multicast(self.identity.connection_ids(), event);
        outbox
    }

    fn seated_room(
        &self,
        connection_id: &ConnectionId,
        code: &RoomCode,
    ) -> Result<&GameRoom, RelayError> {
        let room = self
            .rooms
            .get(code)
            .ok_or_else(|| RelayError::RoomNotFound(code.to_string()))?;
        if !room.contains(connection_id) {
            return Err(RelayError::NotSeated(code.to_string()));
        }
        Ok(room)
    }
}
