//! Server execution logic.

use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use tomoshibi_shared::time::Clock;

use crate::{
    domain::entity::DEFAULT_SLOT_COUNT,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemorySlotRepository},
    usecase::{
        ConnectClientUseCase, DEFAULT_CLAIM_TTL, DisconnectClientUseCase, GetSlotsUseCase,
        SubmitClaimUseCase, SweepExpiredUseCase,
    },
};

use super::{
    handler::{get_slots, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
    sweeper::spawn_sweeper,
};

/// Default interval between expiry sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Invalid server configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Slot count must be at least 1")]
    NoSlots,

    #[error("Sweep interval must be greater than zero")]
    ZeroSweepInterval,
}

/// Everything needed to start a server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Number of slots on the board
    pub slot_count: usize,
    /// Age after which an unrefreshed claim is evicted
    pub claim_ttl: Duration,
    pub sweep_interval: Duration,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slot_count == 0 {
            return Err(ConfigError::NoSlots);
        }
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::ZeroSweepInterval);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 1236,
            slot_count: DEFAULT_SLOT_COUNT,
            claim_ttl: DEFAULT_CLAIM_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

/// Candle server
///
/// # Example
///
/// ```ignore
/// let server = Server::build(&ServerConfig::default(), Arc::new(SystemClock))?;
/// server.run().await?;
/// ```
pub struct Server {
    /// ConnectClientUseCase（接続のユースケース）
    connect_client_usecase: Arc<ConnectClientUseCase>,
    /// SubmitClaimUseCase（確保要求のユースケース）
    submit_claim_usecase: Arc<SubmitClaimUseCase>,
    /// DisconnectClientUseCase（切断のユースケース）
    disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// GetSlotsUseCase（スロット状態取得のユースケース）
    get_slots_usecase: Arc<GetSlotsUseCase>,
    /// SweepExpiredUseCase（期限切れ削除のユースケース）
    sweep_expired_usecase: Arc<SweepExpiredUseCase>,
    sweep_interval: Duration,
    /// `host:port` that `run` binds to
    bind_addr: String,
}

impl Server {
    /// Create a new Server instance from its use cases
    pub fn new(
        connect_client_usecase: Arc<ConnectClientUseCase>,
        submit_claim_usecase: Arc<SubmitClaimUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        get_slots_usecase: Arc<GetSlotsUseCase>,
        sweep_expired_usecase: Arc<SweepExpiredUseCase>,
        sweep_interval: Duration,
        bind_addr: String,
    ) -> Self {
        Self {
            connect_client_usecase,
            submit_claim_usecase,
            disconnect_client_usecase,
            get_slots_usecase,
            sweep_expired_usecase,
            sweep_interval,
            bind_addr,
        }
    }

    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    /// Wire an in-memory server from configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn build(config: &ServerConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;

        // Initialize dependencies in order:
        // 1. Repository
        // 2. MessagePusher
        // 3. UseCases

        // 1. Create Repository (in-memory slot board)
        let repository = Arc::new(InMemorySlotRepository::with_slot_count(config.slot_count));
        tracing::info!("Board with {} slots created", config.slot_count);

        // 2. Create MessagePusher (WebSocket implementation)
        let message_pusher = Arc::new(WebSocketMessagePusher::default());

        // 3. Create UseCases
        let connect_client_usecase = Arc::new(ConnectClientUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            clock.clone(),
        ));
        let submit_claim_usecase = Arc::new(SubmitClaimUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            clock.clone(),
        ));
        let disconnect_client_usecase =
            Arc::new(DisconnectClientUseCase::new(message_pusher.clone()));
        let get_slots_usecase = Arc::new(GetSlotsUseCase::new(repository.clone()));
        let sweep_expired_usecase = Arc::new(SweepExpiredUseCase::new(
            repository,
            message_pusher,
            clock,
            config.claim_ttl,
        ));

        Ok(Self::new(
            connect_client_usecase,
            submit_claim_usecase,
            disconnect_client_usecase,
            get_slots_usecase,
            sweep_expired_usecase,
            config.sweep_interval,
            config.bind_addr(),
        ))
    }

    /// Run the server until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(&self.bind_addr).await?;

        tracing::info!("Candle server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", self.bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    ///
    /// The expiry sweeper runs for as long as the server does.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let sweeper = spawn_sweeper(self.sweep_expired_usecase, self.sweep_interval);

        let app_state = Arc::new(AppState {
            connect_client_usecase: self.connect_client_usecase,
            submit_claim_usecase: self.submit_claim_usecase,
            disconnect_client_usecase: self.disconnect_client_usecase,
            get_slots_usecase: self.get_slots_usecase,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/slots", get(get_slots))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        let result = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await;

        sweeper.abort();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tomoshibi_shared::time::SystemClock;

    #[test]
    fn test_default_config() {
        // テスト項目: デフォルト設定が想定通り
        // when (操作):
        let config = ServerConfig::default();

        // then (期待する結果):
        assert_eq!(config.slot_count, 20);
        assert_eq!(config.claim_ttl, Duration::from_secs(28_800));
        assert_eq!(config.sweep_interval, Duration::from_secs(5));
        assert_eq!(config.bind_addr(), "0.0.0.0:1236");
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_build_uses_configured_bind_addr() {
        // テスト項目: run が使うアドレスは設定の host と port から作られる
        // given (前提条件):
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 4321,
            ..ServerConfig::default()
        };

        // when (操作):
        let server = Server::build(&config, Arc::new(SystemClock)).unwrap();

        // then (期待する結果):
        assert_eq!(server.bind_addr(), "127.0.0.1:4321");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        // テスト項目: スロット数 0 やスイープ間隔 0 は拒否される
        // given (前提条件):
        let no_slots = ServerConfig {
            slot_count: 0,
            ..ServerConfig::default()
        };
        let no_interval = ServerConfig {
            sweep_interval: Duration::ZERO,
            ..ServerConfig::default()
        };

        // when (操作):
        let no_slots = Server::build(&no_slots, Arc::new(SystemClock));
        let no_interval = Server::build(&no_interval, Arc::new(SystemClock));

        // then (期待する結果):
        assert!(matches!(no_slots, Err(ConfigError::NoSlots)));
        assert!(matches!(no_interval, Err(ConfigError::ZeroSweepInterval)));
    }
}
