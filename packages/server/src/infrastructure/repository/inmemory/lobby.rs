//! InMemory Lobby Repository 実装
//!
//! Lobby 全体を一つの `tokio::sync::Mutex` で守る。全てのイベントはこのロックの下で
//! 直列に処理されるため、切断と他のイベントが同じ接続について競合しても、
//! 切断は単に次の操作として実行される。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{Lobby, LobbyRepository};

pub struct InMemoryLobbyRepository {
    lobby: Arc<Mutex<Lobby>>,
}

impl InMemoryLobbyRepository {
    pub fn new(lobby: Lobby) -> Self {
        Self {
            lobby: Arc::new(Mutex::new(lobby)),
        }
    }
}

#[async_trait]
impl LobbyRepository for InMemoryLobbyRepository {
    async fn lock<'a>(&'a self) -> MutexGuard<'a, Lobby> {
        self.lobby.lock().await
    }
}
