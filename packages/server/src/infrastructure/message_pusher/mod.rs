//! メッセージ送信（通知）の実装
//!
//! - `websocket`: 接続ごとの `mpsc` チャンネル経由で WebSocket へ送る実装

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
