//! UseCase: ルーム作成・参加・匿名マッチング

use std::sync::Arc;

use crate::domain::{
    ConnectionId, LobbyRepository, MessagePusher, Outbox, RoomCode, RoomError, ServerEvent,
};

use super::{deliver, reply};

/// ルームのペアリングのユースケース
///
/// 失敗は発信元にだけ `join_error {message}` として返す。
pub struct MatchmakingUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

fn join_error(connection_id: &ConnectionId, error: RoomError) -> Outbox {
    tracing::info!("Pairing rejected for '{}': {}", connection_id, error);
    reply(
        connection_id,
        ServerEvent::JoinError {
            message: error.to_string(),
        },
    )
}

impl MatchmakingUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    pub async fn create_room(&self, connection_id: &ConnectionId) {
        let mut lobby = self.repository.lock().await;
        let outbox = lobby
            .create_room(connection_id)
            .unwrap_or_else(|e| join_error(connection_id, e));

        deliver(self.message_pusher.as_ref(), outbox).await;
    }

    pub async fn join_room(&self, connection_id: &ConnectionId, room_code: String) {
        let mut lobby = self.repository.lock().await;
        let outbox = match RoomCode::new(room_code) {
            Ok(code) => lobby.join_room(connection_id, code),
            Err(e) => Err(RoomError::from(e)),
        }
        .unwrap_or_else(|e| join_error(connection_id, e));

        deliver(self.message_pusher.as_ref(), outbox).await;
    }

    pub async fn join_queue(&self, connection_id: &ConnectionId) {
        let mut lobby = self.repository.lock().await;
        let outbox = lobby
            .join_queue(connection_id)
            .unwrap_or_else(|e| join_error(connection_id, e));

        deliver(self.message_pusher.as_ref(), outbox).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, MockMessagePusher, PairingMode, Timestamp},
        infrastructure::repository::InMemoryLobbyRepository,
        usecase::test_support::*,
    };
    use serde_json::json;
    use tokio::sync::mpsc;

    async fn setup(
        mode: PairingMode,
        ids: &[&str],
    ) -> (
        MatchmakingUseCase,
        Arc<InMemoryLobbyRepository>,
        Vec<mpsc::UnboundedReceiver<String>>,
    ) {
        let repository = create_test_repository(mode);
        let message_pusher = create_test_message_pusher();
        let mut receivers = Vec::new();
        for id in ids {
            let (tx, rx) = mpsc::unbounded_channel();
            repository.lock().await.connect(conn(id), Timestamp::new(0));
            message_pusher.register_client(conn(id), tx).await;
            receivers.push(rx);
        }
        let usecase = MatchmakingUseCase::new(repository.clone(), message_pusher);
        (usecase, repository, receivers)
    }

    #[tokio::test]
    async fn test_create_and_join_room() {
        // テスト項目: 作成者にコードが届き、参加者が入ると両者に同じ start が届く
        // given (前提条件):
        let (usecase, repository, mut rx) = setup(PairingMode::Code, &["X", "Y"]).await;
        repository
            .lock()
            .await
            .set_nickname(&conn("Y"), DisplayName::new("trinity".to_string()).unwrap())
            .unwrap();
        drain(&mut rx[1]);

        // when (操作):
        usecase.create_room(&conn("X")).await;
        let created = drain(&mut rx[0]);
        usecase.join_room(&conn("Y"), "ab12cd".to_string()).await;

        // then (期待する結果):
        assert_eq!(
            created,
            vec![json!({"event": "room_created", "data": {"roomCode": "ab12cd"}})]
        );
        let start = json!({
            "event": "start",
            "data": {
                "room": "ab12cd",
                "players": [{"id": "X", "name": "Player 1"}, {"id": "Y", "name": "trinity"}]
            }
        });
        assert_eq!(drain(&mut rx[0]), vec![start.clone()]);
        assert_eq!(drain(&mut rx[1]), vec![start]);
    }

    #[tokio::test]
    async fn test_join_errors_are_reported_to_caller_only() {
        // テスト項目: 存在しないルーム・満席のルームへの参加は本人にだけ join_error が届く
        // given (前提条件):
        let (usecase, _repository, mut rx) =
            setup(PairingMode::Code, &["X", "Y", "Z"]).await;
        usecase.create_room(&conn("X")).await;
        usecase.join_room(&conn("Y"), "ab12cd".to_string()).await;
        drain(&mut rx[0]);
        drain(&mut rx[1]);

        // when (操作):
        usecase.join_room(&conn("Z"), "zzzzzz".to_string()).await;
        usecase.join_room(&conn("Z"), "ab12cd".to_string()).await;
        usecase.join_room(&conn("Z"), "".to_string()).await;

        // then (期待する結果):
        let frames = drain(&mut rx[2]);
        assert_eq!(
            frames[..2],
            [
                json!({"event": "join_error", "data": {"message": "Room not found."}}),
                json!({"event": "join_error", "data": {"message": "Room is already full."}}),
            ]
        );
        assert_eq!(frames[2]["event"], "join_error");
        assert!(drain(&mut rx[0]).is_empty());
        assert!(drain(&mut rx[1]).is_empty());
    }

    #[tokio::test]
    async fn test_queue_pairs_in_arrival_order() {
        // テスト項目: 一人目は待機通知を受け、二人目が来ると両者に start が届く
        // given (前提条件):
        let (usecase, _repository, mut rx) = setup(PairingMode::Queue, &["X", "Y"]).await;

        // when (操作):
        usecase.join_queue(&conn("X")).await;
        let waiting = drain(&mut rx[0]);
        usecase.join_queue(&conn("Y")).await;

        // then (期待する結果):
        assert_eq!(waiting, vec![json!({"event": "queue_waiting"})]);
        let start = json!({
            "event": "start",
            "data": {
                "room": "X_Y",
                "players": [{"id": "X", "name": "Player 1"}, {"id": "Y", "name": "Player 2"}]
            }
        });
        assert_eq!(drain(&mut rx[0]), vec![start.clone()]);
        assert_eq!(drain(&mut rx[1]), vec![start]);
    }

    #[tokio::test]
    async fn test_create_room_in_queue_mode_replies_join_error() {
        // テスト項目: 匿名マッチングモードでのルーム作成は join_error を一件だけ返す
        // given (前提条件):
        let repository = create_test_repository(PairingMode::Queue);
        repository.lock().await.connect(conn("X"), Timestamp::new(0));
        let mut mock = MockMessagePusher::new();
        mock.expect_push_to()
            .withf(|to, event| {
                to.as_str() == "X" && matches!(event, ServerEvent::JoinError { .. })
            })
            .times(1)
            .returning(|_, _| Ok(()));
        mock.expect_broadcast().never();
        let usecase = MatchmakingUseCase::new(repository.clone(), Arc::new(mock));

        // when (操作):
        usecase.create_room(&conn("X")).await;

        // then (期待する結果):
        assert!(repository.lock().await.rooms().is_empty());
    }
}
