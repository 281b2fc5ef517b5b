//! Candle server: HTTP/WebSocket entry points and the expiry sweeper.

mod handler;
mod server;
mod signal;
pub mod state; // 結合テストから AppState を組み立てるため public
mod sweeper;

pub use handler::websocket::{ConnectionError, MAX_MESSAGE_SIZE, handle_claim_text};
pub use server::{ConfigError, Server, ServerConfig};
pub use sweeper::spawn_sweeper;
