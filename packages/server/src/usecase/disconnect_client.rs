//! UseCase: 切断処理（Lifecycle Coordinator）

use std::sync::Arc;

use crate::domain::{ConnectionId, LobbyRepository, MessagePusher};

use super::deliver;

/// 切断のユースケース
///
/// Lobby から接続を取り除き（名前・アカウントの紐づけ、プレゼンス、ルーム、待機枠）、
/// フレンドへのオフライン通知と対戦相手への `opponent_left` を配送する。
pub struct DisconnectClientUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 何度呼んでもよい。二度目以降は何も起こさない。
    pub async fn execute(&self, connection_id: &ConnectionId) {
        let mut lobby = self.repository.lock().await;
        let outbox = lobby.disconnect(connection_id);
        self.message_pusher.unregister_client(connection_id).await;

        tracing::debug!(
            "Client '{}' purged, {} notification(s) pending",
            connection_id,
            outbox.len()
        );
        deliver(self.message_pusher.as_ref(), outbox).await;
    }
}
