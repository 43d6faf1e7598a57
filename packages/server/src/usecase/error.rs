//! UseCase 層のエラー

use thiserror::Error;

/// 接続受付のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("Connection '{0}' is already registered")]
    DuplicateConnectionId(String),
}
