//! Infrastructure 層
//!
//! ドメイン層が定義する trait（`LobbyRepository`, `MessagePusher`）の実装と、
//! ワイヤ形式（DTO）への変換を提供する。

pub mod dto;
pub mod message_pusher;
pub mod repository;
