//! UseCase: ニックネーム・サインアップ・ログイン・ログアウト

use std::sync::Arc;

use crate::domain::{
    AuthError, ConnectionId, Credential, DisplayName, LobbyRepository, MessagePusher, Outbox,
    ServerEvent, Username,
};

use super::{deliver, reply};

/// 認証まわりのユースケース
///
/// 失敗は発信元にだけ返す。ニックネームは `nickname_ack {success:false}`、
/// それ以外は `auth_error {message}`。
pub struct AuthenticateUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

fn auth_error(connection_id: &ConnectionId, error: AuthError) -> Outbox {
    tracing::info!("Auth rejected for '{}': {}", connection_id, error);
    reply(
        connection_id,
        ServerEvent::AuthError {
            message: error.to_string(),
        },
    )
}

fn parse_credentials(
    username: String,
    password: String,
) -> Result<(Username, Credential), AuthError> {
    Ok((Username::new(username)?, Credential::new(password)?))
}

impl AuthenticateUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    pub async fn set_nickname(&self, connection_id: &ConnectionId, nickname: String) {
        let mut lobby = self.repository.lock().await;
        let outbox = match DisplayName::new(nickname) {
            Ok(name) => lobby.set_nickname(connection_id, name),
            Err(e) => Err(AuthError::from(e)),
        }
        .unwrap_or_else(|e| {
            tracing::info!("Nickname rejected for '{}': {}", connection_id, e);
            reply(connection_id, ServerEvent::NicknameAck { success: false })
        });

        deliver(self.message_pusher.as_ref(), outbox).await;
    }

    pub async fn signup(&self, connection_id: &ConnectionId, username: String, password: String) {
        let mut lobby = self.repository.lock().await;
        let outbox = parse_credentials(username, password)
            .and_then(|(username, credential)| lobby.signup(connection_id, username, credential))
            .unwrap_or_else(|e| auth_error(connection_id, e));

        deliver(self.message_pusher.as_ref(), outbox).await;
    }

    pub async fn login(&self, connection_id: &ConnectionId, username: String, password: String) {
        let mut lobby = self.repository.lock().await;
        let outbox = parse_credentials(username, password)
            .and_then(|(username, credential)| lobby.login(connection_id, username, credential))
            .unwrap_or_else(|e| auth_error(connection_id, e));

        deliver(self.message_pusher.as_ref(), outbox).await;
    }

    pub async fn logout(&self, connection_id: &ConnectionId) {
        let mut lobby = self.repository.lock().await;
        let outbox = lobby
            .logout(connection_id)
            .unwrap_or_else(|e| auth_error(connection_id, e));

        deliver(self.message_pusher.as_ref(), outbox).await;
    }
}
