//! Utilities shared by the Duelhub binaries.

pub mod logger;
pub mod time;
