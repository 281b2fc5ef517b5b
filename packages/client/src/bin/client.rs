//! Console client for the candle server.
//!
//! Shows every candle as a numbered list and redraws it whenever the server
//! pushes a new snapshot. Automatically reconnects on disconnection
//! (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tomoshibi-client
//! cargo run --bin tomoshibi-client -- --url ws://candles.example.com:1236/ws
//! ```

use clap::Parser;

use tomoshibi_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "tomoshibi-client")]
#[command(about = "Console client for the shared candle board", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:1236/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = tomoshibi_client::run_client(args.url).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
