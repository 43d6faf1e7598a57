//! ドメインエラー
//!
//! 各エラーの `Display` はそのまま発信元の接続へ返すメッセージになる。

use thiserror::Error;

/// 値オブジェクトの検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("The {0} must not be empty.")]
    Empty(&'static str),
    #[error("The {field} must be at most {max} characters.")]
    TooLong { field: &'static str, max: usize },
    #[error("The {0} contains invalid characters.")]
    InvalidCharacter(&'static str),
}

/// サインアップ・ログイン・ログアウトのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Username already exists.")]
    DuplicateAccount,
    #[error("User not found.")]
    UnknownAccount,
    #[error("Incorrect password.")]
    BadCredential,
    #[error("This account is already signed in elsewhere.")]
    AlreadySignedIn,
    #[error("You are not signed in.")]
    NotSignedIn,
    #[error("Connection is not registered.")]
    UnknownConnection,
    #[error(transparent)]
    Validation(#[from] ValueObjectError),
}

/// ルームの作成・参加のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Room not found.")]
    RoomNotFound,
    #[error("Room is already full.")]
    RoomFull,
    #[error("You are already seated in this room.")]
    AlreadySeated,
    #[error("Room codes are disabled on this server.")]
    CodeModeDisabled,
    #[error("The matchmaking queue is disabled on this server.")]
    QueueModeDisabled,
    #[error("Could not allocate a free room code.")]
    CodeUnavailable,
    #[error("Connection is not registered.")]
    UnknownConnection,
    #[error(transparent)]
    Validation(#[from] ValueObjectError),
}

/// ルーム内中継（move / restart）のエラー
///
/// 発信元には通知せず、ログにのみ残す。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),
    #[error("connection is not seated in room '{0}'")]
    NotSeated(String),
    #[error(transparent)]
    Validation(#[from] ValueObjectError),
}

/// グローバルチャットのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("Set a nickname before chatting.")]
    Anonymous,
    #[error(transparent)]
    Validation(#[from] ValueObjectError),
}

/// フレンド操作のエラー
///
/// 発信元には通知せず、ログにのみ残す。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SocialError {
    #[error("connection is not signed in")]
    NotSignedIn,
    #[error("connection is signed in as '{actual}', not '{claimed}'")]
    Impersonation { claimed: String, actual: String },
    #[error("cannot befriend yourself")]
    SelfRequest,
    #[error(transparent)]
    Validation(#[from] ValueObjectError),
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client not found: {0}")]
    ClientNotFound(String),
    #[error("Failed to push message: {0}")]
    PushFailed(String),
    #[error("Failed to encode message: {0}")]
    EncodeFailed(String),
}
