//! Candle lighting server.
//!
//! Clients connect over WebSocket, receive the current candles and send
//! `{"i": <index>, "message": <string|null>}` to light or blow out a candle.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tomoshibi-server
//! cargo run --bin tomoshibi-server -- --host 127.0.0.1 --port 3000 --slots 12
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use tomoshibi_server::ui::{Server, ServerConfig};
use tomoshibi_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "tomoshibi-server")]
#[command(about = "Candle lighting server with shared WebSocket state", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "1236")]
    port: u16,

    /// Number of candles
    #[arg(short = 'n', long, default_value = "20", value_parser = clap::value_parser!(u16).range(1..))]
    slots: u16,

    /// Seconds after which a candle that was not refreshed goes out
    #[arg(long, default_value = "28800")]
    ttl_secs: u64,

    /// Seconds between expiry sweeps
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    sweep_interval_secs: u64,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            slot_count: usize::from(args.slots),
            claim_ttl: Duration::from_secs(args.ttl_secs),
            sweep_interval: Duration::from_secs(args.sweep_interval_secs),
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ServerConfig::from(Args::parse());

    let server = match Server::build(&config, Arc::new(SystemClock)) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
