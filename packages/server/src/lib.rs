//! Matchmaking and session-relay server for two-player games.
//!
//! Clients connect over WebSocket, pick a display name or an account, pair up in
//! two-seat rooms (by shared code or anonymous queue), relay game state and chat,
//! and keep a friend list with online presence.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod bootstrap;
