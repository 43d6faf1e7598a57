//! UseCase: ルーム内中継とグローバルチャット

use std::sync::Arc;

use duelhub_shared::time::Clock;

use crate::domain::{
    BoardPayload, ChatError, ChatText, ConnectionId, LobbyRepository, MessagePusher, Outbox,
    RelayError, RoomCode, ServerEvent, Timestamp,
};

use super::{deliver, reply};

/// 中継のユースケース
///
/// `move` / `restart` の失敗は送信者に通知せずログにだけ残す（ルームは相手の切断で
/// 既に消えていることがある）。チャットの失敗は `chat_error` で返す。
pub struct RelayUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl RelayUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    pub async fn relay_move(
        &self,
        connection_id: &ConnectionId,
        room: String,
        board: serde_json::Value,
    ) {
        let lobby = self.repository.lock().await;
        let result = match RoomCode::new(room) {
            Ok(code) => lobby.relay_move(connection_id, &code, BoardPayload::new(board)),
            Err(e) => Err(RelayError::from(e)),
        };
        self.finish(connection_id, "move", result).await;
    }

    pub async fn restart(&self, connection_id: &ConnectionId, room: String) {
        let lobby = self.repository.lock().await;
        let result = match RoomCode::new(room) {
            Ok(code) => lobby.restart(connection_id, &code),
            Err(e) => Err(RelayError::from(e)),
        };
        self.finish(connection_id, "restart", result).await;
    }

    /// 送信者名はクライアントの申告ではなく接続の表示名を使う
    pub async fn chat(&self, connection_id: &ConnectionId, message: String) {
        let sent_at = Timestamp::new(self.clock.now_millis());
        let lobby = self.repository.lock().await;
        let outbox = match ChatText::new(message) {
            Ok(text) => lobby.chat(connection_id, text, sent_at),
            Err(e) => Err(ChatError::from(e)),
        }
        .unwrap_or_else(|e| {
            tracing::info!("Chat rejected for '{}': {}", connection_id, e);
            reply(
                connection_id,
                ServerEvent::ChatError {
                    message: e.to_string(),
                },
            )
        });

        deliver(self.message_pusher.as_ref(), outbox).await;
    }

    async fn finish(
        &self,
        connection_id: &ConnectionId,
        event_name: &str,
        result: Result<Outbox, RelayError>,
    ) {
        match result {
            Ok(outbox) => deliver(self.message_pusher.as_ref(), outbox).await,
            Err(e) => {
                tracing::warn!("Dropped {} from '{}': {}", event_name, connection_id, e);
            }
        }
    }
}
