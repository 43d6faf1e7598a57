//! Repository trait 定義
//!
//! UseCase 層はこの trait を通して Lobby にアクセスする。具体的な実装は
//! Infrastructure 層が提供する（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::MutexGuard;

use super::Lobby;

/// Lobby Repository trait
///
/// 一つのイベントの処理は `lock` で得たガードを保持している間に完結させる。
/// 配送もガードを保持したまま行い、通知の順序を状態変更の順序と一致させる。
/// そのため `MessagePusher` の実装から Lobby をロックしてはいけない。
#[async_trait]
pub trait LobbyRepository: Send + Sync {
    /// Lobby の排他ロックを取得する
    async fn lock<'a>(&'a self) -> MutexGuard<'a, Lobby>;
}
