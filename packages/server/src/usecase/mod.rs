//! UseCase 層
//!
//! 各 UseCase は一つのイベントにつき Lobby のロックを一度だけ取り、状態を変更して
//! `Outbox` を受け取り、ロックを保持したまま `MessagePusher` で配送する。
//! 配送はチャネルへの送信だけで待ちが発生しないため、ロックの保持時間は伸びない。
//! ドメインエラーはここで発信元への通知イベントに変換する。

mod authenticate;
mod connect_client;
mod disconnect_client;
mod error;
mod manage_friends;
mod matchmaking;
mod relay;

pub use authenticate::AuthenticateUseCase;
pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::ConnectError;
pub use manage_friends::ManageFriendsUseCase;
pub use matchmaking::MatchmakingUseCase;
pub use relay::RelayUseCase;

use crate::domain::{ConnectionId, Delivery, MessagePusher, Outbox, ServerEvent};

/// Outbox の配送指示を順番に実行する（fire-and-forget）
///
/// 配送の失敗は他の配送や呼び出し元に影響させず、ログに残すだけにする。
async fn deliver(message_pusher: &dyn MessagePusher, outbox: Outbox) {
    for delivery in outbox.into_deliveries() {
        let result = match &delivery {
            Delivery::Unicast { to, event } => message_pusher.push_to(to, event).await,
            Delivery::Multicast { to, event } => {
                message_pusher.broadcast(to.clone(), event).await
            }
        };
        if let Err(e) = result {
            tracing::warn!("Failed to deliver {:?}: {}", delivery.event(), e);
        }
    }
}

/// 発信元だけに返すエラー通知
fn reply(connection_id: &ConnectionId, event: ServerEvent) -> Outbox {
    let mut outbox = Outbox::new();
    outbox.send(connection_id.clone(), event);
    outbox
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::{collections::HashMap, sync::Arc};

    use tokio::sync::{Mutex, mpsc};

    use crate::{
        domain::{ConnectionId, Lobby, PairingMode, SequenceRoomCodeFactory},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryLobbyRepository,
        },
    };

    pub fn conn(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    pub fn create_test_repository(mode: PairingMode) -> Arc<InMemoryLobbyRepository> {
        let lobby = Lobby::new(mode, Box::new(SequenceRoomCodeFactory::new(["ab12cd"])));
        Arc::new(InMemoryLobbyRepository::new(lobby))
    }

    pub fn create_test_message_pusher() -> Arc<WebSocketMessagePusher> {
        Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))))
    }

    /// 受信済みのフレームを全て取り出し、JSON として返す
    pub fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<serde_json::Value> {
        let mut frames = Vec::new();
        while let Ok(text) = rx.try_recv() {
            frames.push(serde_json::from_str(&text).unwrap());
        }
        frames
    }
}
