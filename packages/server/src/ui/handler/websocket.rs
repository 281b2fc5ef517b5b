//! WebSocket connection handlers.
//!
//! Each connection moves through `Connecting -> Active -> Closing -> Closed`:
//! the identity is resolved and the connection registered with an initial
//! snapshot, inbound requests are applied until the peer closes or sends
//! something invalid, then the connection is unregistered exactly once.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, header},
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use thiserror::Error;

use crate::{
    domain::{ClaimCommand, Identity, PusherReceiver, pusher_channel, resolve_identity},
    infrastructure::dto::conversion::{
        DecodeError, decode_claim_command, decode_claim_command_bytes,
    },
    ui::state::AppState,
    usecase::SubmitClaimError,
};

/// Header set by reverse proxies with the original client address
const FORWARDED_FOR: &str = "x-forwarded-for";

/// Largest inbound message (and frame) accepted from a client
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Reasons a connection is terminated by the server
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("WebSocket error: {0}")]
    Transport(#[from] axum::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Claim(#[from] SubmitClaimError),
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let forwarded_for = headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok());
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    let identity = resolve_identity(&remote_addr, forwarded_for);
    tracing::info!(
        "{} {} connected as '{}'; {}",
        remote_addr,
        forwarded_for.unwrap_or("-"),
        identity,
        user_agent
    );

    ws.max_message_size(MAX_MESSAGE_SIZE)
        .max_frame_size(MAX_MESSAGE_SIZE)
        .on_upgrade(move |socket| handle_socket(socket, state, identity))
}

/// Spawns a task that writes the newest snapshot from the rx channel to the WebSocket sender.
///
/// Snapshots published while a write is in flight collapse into the latest
/// one. Ends when the socket rejects a write or the channel is closed.
fn pusher_loop(
    mut rx: PusherReceiver,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let msg = rx.borrow_and_update().clone();
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Decode one text frame and apply it.
///
/// Returns whether the board changed. Any error is fatal to the connection.
pub async fn handle_claim_text(
    state: &AppState,
    identity: &Identity,
    text: &str,
) -> Result<bool, ConnectionError> {
    let command = decode_claim_command(text)?;
    submit(state, identity, command).await
}

async fn submit(
    state: &AppState,
    identity: &Identity,
    command: ClaimCommand,
) -> Result<bool, ConnectionError> {
    Ok(state
        .submit_claim_usecase
        .execute(identity, command)
        .await?)
}

async fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    identity: Identity,
) -> Result<(), ConnectionError> {
    while let Some(msg) = receiver.next().await {
        match msg? {
            Message::Text(text) => {
                tracing::info!("Message from {}: {}", identity, text.as_str());
                handle_claim_text(&state, &identity, text.as_str()).await?;
            }
            Message::Binary(bytes) => {
                tracing::info!("Binary message from {} ({} bytes)", identity, bytes.len());
                let command = decode_claim_command_bytes(&bytes)?;
                submit(&state, &identity, command).await?;
            }
            Message::Ping(_) | Message::Pong(_) => {
                tracing::debug!("Received ping/pong from {}", identity);
            }
            Message::Close(_) => {
                tracing::info!("Client '{}' requested close", identity);
                break;
            }
        }
    }
    Ok(())
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, identity: Identity) {
    let (sender, receiver) = socket.split();
    let (tx, rx) = pusher_channel();

    // Connecting: register and send the current board to this connection only
    let connection = match state
        .connect_client_usecase
        .execute(identity.clone(), tx)
        .await
    {
        Ok(connection) => connection,
        Err(e) => {
            tracing::error!("Failed to connect '{}': {}", identity, e);
            return;
        }
    };
    tracing::info!(
        "Connection '{}' registered for '{}'",
        connection.id,
        identity
    );

    // Active
    let mut send_task = pusher_loop(rx, sender);
    let mut recv_task = tokio::spawn(receive_loop(receiver, state.clone(), identity.clone()));

    // If any one of the tasks completes, abort the other
    tokio::select! {
        result = &mut recv_task => {
            send_task.abort();
            match result {
                Ok(Ok(())) => {
                    tracing::info!("Connection '{}' closed by peer", connection.id);
                }
                Ok(Err(e)) => {
                    tracing::warn!(
                        "Terminating connection '{}' ({}): {}",
                        connection.id,
                        identity,
                        e
                    );
                }
                Err(e) => {
                    tracing::error!(
                        "Connection '{}' ({}) failed unexpectedly: {:?}",
                        connection.id,
                        identity,
                        e
                    );
                }
            }
        }
        _ = &mut send_task => {
            recv_task.abort();
            tracing::info!("Connection '{}' stopped accepting messages", connection.id);
        }
    };

    // Closing: no broadcast, claims stay until released or expired
    match state
        .disconnect_client_usecase
        .execute(&connection.id)
        .await
    {
        Ok(_) => tracing::info!(
            "Client '{}' disconnected and removed from registry",
            identity
        ),
        Err(e) => tracing::error!("Failed to unregister '{}': {}", identity, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{SlotError, SlotRepository},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemorySlotRepository,
        },
        usecase::{
            ConnectClientUseCase, DisconnectClientUseCase, GetSlotsUseCase, SubmitClaimUseCase,
        },
    };
    use tomoshibi_shared::time::FixedClock;

    fn create_state(repository: Arc<InMemorySlotRepository>) -> AppState {
        let message_pusher = Arc::new(WebSocketMessagePusher::default());
        let clock = Arc::new(FixedClock::new(0));
        AppState {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            submit_claim_usecase: Arc::new(SubmitClaimUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock,
            )),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(message_pusher)),
            get_slots_usecase: Arc::new(GetSlotsUseCase::new(repository)),
        }
    }

    #[tokio::test]
    async fn test_handle_claim_text_applies_request() {
        // テスト項目: 正しい要求はボードに反映される
        // given (前提条件):
        let repository = Arc::new(InMemorySlotRepository::with_slot_count(20));
        let state = create_state(repository.clone());

        // when (操作):
        let result =
            handle_claim_text(&state, &Identity::new("x"), r#"{"i":0,"message":"hello"}"#).await;

        // then (期待する結果):
        assert!(matches!(result, Ok(true)));
        let claim = repository.get_slot(0).await.unwrap().unwrap();
        assert_eq!(claim.payload.as_str(), "hello");
    }

    #[tokio::test]
    async fn test_handle_claim_text_rejects_malformed() {
        // テスト項目: 不正な要求は接続を終了させるエラーになり、ボードは変わらない
        // given (前提条件):
        let repository = Arc::new(InMemorySlotRepository::with_slot_count(20));
        let state = create_state(repository.clone());
        let before = repository.snapshot().await;

        // when (操作):
        let result = handle_claim_text(&state, &Identity::new("x"), r#"{"i":0}"#).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ConnectionError::Decode(_))));
        assert_eq!(repository.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_handle_claim_text_rejects_out_of_range() {
        // テスト項目: 範囲外のインデックスは接続を終了させるエラーになる
        // given (前提条件):
        let repository = Arc::new(InMemorySlotRepository::with_slot_count(20));
        let state = create_state(repository);

        // when (操作):
        let result =
            handle_claim_text(&state, &Identity::new("x"), r#"{"i":20,"message":"a"}"#).await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(ConnectionError::Claim(SubmitClaimError::Slot(
                SlotError::IndexOutOfRange { index: 20, len: 20 }
            )))
        ));
    }

    #[tokio::test]
    async fn test_handle_claim_text_conflict_is_silent() {
        // テスト項目: 他人のスロットへの要求はエラーにならず、変化も無い
        // given (前提条件):
        let repository = Arc::new(InMemorySlotRepository::with_slot_count(20));
        let state = create_state(repository);
        handle_claim_text(&state, &Identity::new("x"), r#"{"i":0,"message":"hello"}"#)
            .await
            .unwrap();

        // when (操作):
        let result =
            handle_claim_text(&state, &Identity::new("y"), r#"{"i":0,"message":"steal"}"#).await;

        // then (期待する結果):
        assert!(matches!(result, Ok(false)));
    }
}
