//! UseCase: 接続受付

use std::sync::Arc;

use duelhub_shared::time::Clock;

use crate::domain::{ConnectionId, LobbyRepository, MessagePusher, PusherChannel, Timestamp};

use super::error::ConnectError;

/// 接続受付のユースケース
///
/// 接続を匿名状態で Identity Registry に登録し、送信チャンネルを MessagePusher に渡す。
pub struct ConnectClientUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectClientUseCase {
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

    /// # Returns
    ///
    /// * `Ok(Timestamp)` - 接続時刻
    /// * `Err(ConnectError)` - 同じ ID の接続が既に登録されている
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<Timestamp, ConnectError> {
        let connected_at = Timestamp::new(self.clock.now_millis());
        let mut lobby = self.repository.lock().await;
        if !lobby.connect(connection_id.clone(), connected_at) {
            return Err(ConnectError::DuplicateConnectionId(connection_id.into_string()));
        }

        self.message_pusher
            .register_client(connection_id, sender)
            .await;
        Ok(connected_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{PairingMode, ServerEvent},
        usecase::test_support::*,
    };
    use duelhub_shared::time::FixedClock;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_connect_client_success() {
        // テスト項目: 新しい接続が匿名状態で登録され、送信チャンネルが使えるようになる
        // given (前提条件):
        let repository = create_test_repository(PairingMode::Code);
        let message_pusher = create_test_message_pusher();
        let usecase = ConnectClientUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            Arc::new(FixedClock::new(1_000)),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase.execute(conn("alice"), tx).await;

        // then (期待する結果):
        assert_eq!(result, Ok(Timestamp::new(1_000)));
        {
            let lobby = repository.lock().await;
            let session = lobby.identity().session(&conn("alice")).unwrap();
            assert!(!session.is_named());
            assert!(session.account.is_none());
        }
        message_pusher
            .push_to(&conn("alice"), &ServerEvent::QueueWaiting)
            .await
            .unwrap();
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[tokio::test]
    async fn test_connect_client_duplicate_error() {
        // テスト項目: 同じ接続 ID での二度目の登録はエラーになる
        // given (前提条件):
        let repository = create_test_repository(PairingMode::Code);
        let usecase = ConnectClientUseCase::new(
            repository.clone(),
            create_test_message_pusher(),
            Arc::new(FixedClock::new(1_000)),
        );
        let (tx1, _rx1) = mpsc::unbounded_channel();
        usecase.execute(conn("alice"), tx1).await.unwrap();

        // when (操作):
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let result = usecase.execute(conn("alice"), tx2).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConnectError::DuplicateConnectionId("alice".to_string()))
        );
        assert_eq!(repository.lock().await.identity().len(), 1);
    }
}
