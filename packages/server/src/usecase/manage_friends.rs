//! UseCase: フレンド申請・応答・削除

use std::sync::Arc;

use crate::domain::{
    ConnectionId, LobbyRepository, MessagePusher, Outbox, SocialError, Username,
};

use super::deliver;

/// フレンド操作のユースケース
///
/// 失敗は発信元に通知せず、ログに残して破棄する。
pub struct ManageFriendsUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

fn parse_pair(first: String, second: String) -> Result<(Username, Username), SocialError> {
    Ok((Username::new(first)?, Username::new(second)?))
}

impl ManageFriendsUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    pub async fn send_request(&self, connection_id: &ConnectionId, from: String, to: String) {
        let mut lobby = self.repository.lock().await;
        let result = parse_pair(from, to)
            .and_then(|(from, to)| lobby.send_friend_request(connection_id, from, to));
        self.finish(connection_id, "friend_request", result).await;
    }

    pub async fn respond(
        &self,
        connection_id: &ConnectionId,
        from: String,
        to: String,
        accept: bool,
    ) {
        let mut lobby = self.repository.lock().await;
        let result = parse_pair(from, to).and_then(|(from, to)| {
            lobby.respond_friend_request(connection_id, from, to, accept)
        });
        self.finish(connection_id, "friend_response", result).await;
    }

    pub async fn remove(&self, connection_id: &ConnectionId, username: String, target: String) {
        let mut lobby = self.repository.lock().await;
        let result = parse_pair(username, target)
            .and_then(|(username, target)| lobby.remove_friend(connection_id, username, target));
        self.finish(connection_id, "remove_friend", result).await;
    }

    async fn finish(
        &self,
        connection_id: &ConnectionId,
        event_name: &str,
        result: Result<Outbox, SocialError>,
    ) {
        match result {
            Ok(outbox) => deliver(self.message_pusher.as_ref(), outbox).await,
            Err(e) => {
                tracing::warn!("Dropped {} from '{}': {}", event_name, connection_id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Credential, PairingMode, Timestamp},
        usecase::test_support::*,
    };
    use serde_json::json;
    use tokio::sync::mpsc;

    /// alice（接続 a）と bob（接続 b）がログイン済みの状態
    async fn setup() -> (
        ManageFriendsUseCase,
        mpsc::UnboundedReceiver<String>,
        mpsc::UnboundedReceiver<String>,
    ) {
        let repository = create_test_repository(PairingMode::Code);
        let message_pusher = create_test_message_pusher();
        {
            let mut lobby = repository.lock().await;
            for (id, name) in [("a", "alice"), ("b", "bob")] {
                let username = Username::new(name.to_string()).unwrap();
                let secret = Credential::new("pw".to_string()).unwrap();
                lobby.connect(conn(id), Timestamp::new(0));
                lobby
                    .signup(&conn(id), username.clone(), secret.clone())
                    .unwrap();
                lobby.login(&conn(id), username, secret).unwrap();
            }
        }
        let (tx_a, rx_a) = mpsc::unbounded_channel();
        let (tx_b, rx_b) = mpsc::unbounded_channel();
        message_pusher.register_client(conn("a"), tx_a).await;
        message_pusher.register_client(conn("b"), tx_b).await;
        (
            ManageFriendsUseCase::new(repository, message_pusher),
            rx_a,
            rx_b,
        )
    }

    #[tokio::test]
    async fn test_request_and_accept() {
        // テスト項目: 申請が相手に届き、承認で双方に一覧とオンライン状態が届く
        // given (前提条件):
        let (usecase, mut rx_a, mut rx_b) = setup().await;

        // when (操作):
        usecase
            .send_request(&conn("a"), "alice".to_string(), "bob".to_string())
            .await;
        let received = drain(&mut rx_b);
        usecase
            .respond(&conn("b"), "alice".to_string(), "bob".to_string(), true)
            .await;

        // then (期待する結果):
        assert_eq!(
            received,
            vec![json!({"event": "friend_request_received", "data": {"from": "alice"}})]
        );
        assert_eq!(
            drain(&mut rx_a),
            vec![
                json!({"event": "friend_list_update", "data": {"friends": ["bob"]}}),
                json!({"event": "friend_status_update", "data": {"friend": "bob", "isOnline": true}}),
            ]
        );
        assert_eq!(
            drain(&mut rx_b),
            vec![
                json!({"event": "friend_list_update", "data": {"friends": ["alice"]}}),
                json!({"event": "friend_status_update", "data": {"friend": "alice", "isOnline": true}}),
            ]
        );
    }

    #[tokio::test]
    async fn test_impersonated_request_is_dropped() {
        // テスト項目: 他人の名前を from にした申請は誰にも届かない
        // given (前提条件):
        let (usecase, mut rx_a, mut rx_b) = setup().await;

        // when (操作):
        usecase
            .send_request(&conn("b"), "alice".to_string(), "bob".to_string())
            .await;

        // then (期待する結果):
        assert!(drain(&mut rx_a).is_empty());
        assert!(drain(&mut rx_b).is_empty());
    }

    #[tokio::test]
    async fn test_remove_friend_twice() {
        // テスト項目: フレンド削除で双方に空の一覧が届き、二度目も同じ結果になる
        // given (前提条件):
        let (usecase, mut rx_a, mut rx_b) = setup().await;
        usecase
            .send_request(&conn("a"), "alice".to_string(), "bob".to_string())
            .await;
        usecase
            .respond(&conn("b"), "alice".to_string(), "bob".to_string(), true)
            .await;
        drain(&mut rx_a);
        drain(&mut rx_b);

        // when (操作):
        usecase
            .remove(&conn("a"), "alice".to_string(), "bob".to_string())
            .await;
        usecase
            .remove(&conn("a"), "alice".to_string(), "bob".to_string())
            .await;

        // then (期待する結果):
        let empty = json!({"event": "friend_list_update", "data": {"friends": []}});
        assert_eq!(drain(&mut rx_a), vec![empty.clone(), empty.clone()]);
        assert_eq!(drain(&mut rx_b), vec![empty.clone(), empty]);
    }
}
