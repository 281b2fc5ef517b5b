//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::{
    command::{Command, HELP},
    error::ClientError,
    formatter::SnapshotFormatter,
    ui::redisplay_prompt,
};

/// Run the WebSocket client session
///
/// Typed lines arrive on `input_rx`, which outlives the session so a
/// reconnect keeps the same reader. Returns `Ok(())` when the user leaves and
/// an error when the connection is lost.
pub async fn run_client_session(
    url: &str,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to candle server!");
    println!("\nType 'help' for a list of commands. Press Ctrl+C to exit.\n");

    let (mut write, mut read) = ws_stream.split();

    // Spawn a task to handle incoming snapshots
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match serde_json::from_str::<Vec<Option<String>>>(&text) {
                        Ok(slots) => SnapshotFormatter::format_snapshot(&slots),
                        Err(_) => SnapshotFormatter::format_raw_message(&text),
                    };
                    print!("{}", formatted);
                    redisplay_prompt();
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Turn typed commands into claim requests until either side ends
    loop {
        tokio::select! {
            read_result = &mut read_task => {
                if read_result.unwrap_or(true) {
                    return Err(ClientError::ConnectionError("Connection lost".to_string()));
                }
                return Ok(());
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    read_task.abort();
                    return Ok(());
                };

                let command = match Command::parse(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}", e);
                        redisplay_prompt();
                        continue;
                    }
                };

                let request = match command {
                    Command::Quit => {
                        read_task.abort();
                        return Ok(());
                    }
                    Command::Help => {
                        println!("{}", HELP);
                        redisplay_prompt();
                        continue;
                    }
                    ref other => match other.to_request() {
                        Some(request) => request,
                        None => continue,
                    },
                };

                if let Err(e) = write.send(Message::Text(request.into())).await {
                    tracing::warn!("Failed to send request: {}", e);
                    read_task.abort();
                    return Err(ClientError::ConnectionError("Connection lost".to_string()));
                }
            }
        }
    }
}
