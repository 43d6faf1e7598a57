//! Lobby を構成する個別のレジストリ
//!
//! どれも同期的なインメモリ構造で、排他制御は Lobby を包む Repository が一括して行う。

pub mod accounts;
pub mod identity;
pub mod rooms;

pub use accounts::AccountDirectory;
pub use identity::{IdentityRegistry, Released};
pub use rooms::{QueueOutcome, RoomRegistry};
