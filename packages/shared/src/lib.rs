//! Utilities shared by the Tomoshibi server and client binaries.

pub mod logger;
pub mod time;
