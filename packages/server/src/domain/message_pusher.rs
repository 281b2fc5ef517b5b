//! MessagePusher trait 定義
//!
//! 接続中のクライアントの管理（Connection Registry）と
//! スナップショットの一斉送信（Broadcast Engine）のインターフェース。

use async_trait::async_trait;
use tokio::sync::watch;

use super::{Connection, ConnectionId, MessagePushError, SlotSnapshot};

/// Outbound slot of one connection; holds only the newest encoded snapshot
pub type PusherChannel = watch::Sender<String>;

/// Read side of a `PusherChannel`, drained by the connection's socket writer
pub type PusherReceiver = watch::Receiver<String>;

/// Create the outbound channel for one connection.
///
/// The initial empty value is already marked seen, so the writer only wakes
/// for snapshots. A writer that falls behind skips straight to the newest one.
pub fn pusher_channel() -> (PusherChannel, PusherReceiver) {
    watch::channel(String::new())
}

/// Per-broadcast delivery counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections the snapshot was handed to
    pub delivered: usize,
    /// Connections that already had this or a newer snapshot
    pub skipped: usize,
    /// Connections whose channel was already closed
    pub failed: usize,
}

/// MessagePusher trait
///
/// UseCase 層はこの trait に依存し、WebSocket などの具体的な実装には依存しない。
///
/// 各接続には、その接続に届けた最新のスナップショットのバージョンが記録されます。
/// それより古いスナップショットは送信されないため、クライアントが受け取る
/// スナップショットの列は常に単調非減少になります。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録
    async fn register_client(&self, connection: Connection, sender: PusherChannel);

    /// 接続の登録を解除（未登録の接続はエラー）
    async fn unregister_client(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Connection, MessagePushError>;

    /// 登録中の全ての接続（呼び出し時点のコピー）
    async fn connections(&self) -> Vec<Connection>;

    /// 1 つの接続にスナップショットを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        snapshot: &SlotSnapshot,
    ) -> Result<(), MessagePushError>;

    /// 全ての接続にスナップショットを送信（一部の失敗は他に影響しない）
    async fn broadcast(&self, snapshot: &SlotSnapshot) -> BroadcastReport;
}
