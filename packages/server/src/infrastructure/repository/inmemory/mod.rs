//! インメモリ Repository 実装

pub mod lobby;

pub use lobby::InMemoryLobbyRepository;
