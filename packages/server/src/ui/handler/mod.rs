//! HTTP and WebSocket handlers.

pub mod http;
pub mod websocket;

pub use http::{get_slots, health_check};
pub use websocket::websocket_handler;
