//! エンティティ

pub mod account;
pub mod room;
pub mod session;

pub use account::Account;
pub use room::{GameRoom, ROOM_CAPACITY};
pub use session::Session;
