//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続中のクライアントと、その送信チャンネルの管理（Connection Registry）
//! - スナップショットの送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket への書き込みは UI 層の pusher タスクが行います。
//! この実装はチャンネルにメッセージを置くだけなので、ロックを保持したまま
//! ネットワーク送信を待つことはありません。
//! チャンネルは `watch` で、保持するのは最新のスナップショット 1 つだけです。
//! 読み取らないクライアントがいても、古いスナップショットは上書きされて溜まりません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{
        BroadcastReport, Connection, ConnectionId, MessagePushError, MessagePusher,
        PusherChannel, SlotSnapshot,
    },
    infrastructure::dto::conversion::encode_snapshot,
};

/// Registry entry for one live connection
pub struct ClientEntry {
    pub connection: Connection,
    pub sender: PusherChannel,
    /// Newest snapshot version handed to this connection
    pub last_version: Option<u64>,
}

impl ClientEntry {
    fn new(connection: Connection, sender: PusherChannel) -> Self {
        Self {
            connection,
            sender,
            last_version: None,
        }
    }

    fn is_stale(&self, snapshot: &SlotSnapshot) -> bool {
        self.last_version
            .is_some_and(|delivered| delivered >= snapshot.version)
    }

    fn deliver(&mut self, snapshot: &SlotSnapshot, content: &str) -> Result<(), MessagePushError> {
        self.sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        self.last_version = Some(snapshot.version);
        Ok(())
    }
}

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let clients = Arc::new(Mutex::new(HashMap::new()));
/// let pusher = WebSocketMessagePusher::new(clients.clone());
///
/// pusher.register_client(connection, tx).await;
/// pusher.broadcast(&snapshot).await;
/// ```
pub struct WebSocketMessagePusher {
    /// 接続中のクライアント
    clients: Arc<Mutex<HashMap<ConnectionId, ClientEntry>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, ClientEntry>>>) -> Self {
        Self { clients }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection: Connection, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!(
            "Connection '{}' ({}) registered to MessagePusher",
            connection.id,
            connection.identity
        );
        clients.insert(connection.id, ClientEntry::new(connection, sender));
    }

    async fn unregister_client(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Connection, MessagePushError> {
        let mut clients = self.clients.lock().await;
        let entry = clients
            .remove(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
        Ok(entry.connection)
    }

    async fn connections(&self) -> Vec<Connection> {
        let clients = self.clients.lock().await;
        clients
            .values()
            .map(|entry| entry.connection.clone())
            .collect()
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        snapshot: &SlotSnapshot,
    ) -> Result<(), MessagePushError> {
        let mut clients = self.clients.lock().await;
        let entry = clients
            .get_mut(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;

        if entry.is_stale(snapshot) {
            tracing::debug!(
                "Connection '{}' already has snapshot v{}, skipping",
                connection_id,
                snapshot.version
            );
            return Ok(());
        }

        let content =
            encode_snapshot(snapshot).map_err(|e| MessagePushError::EncodeFailed(e.to_string()))?;
        entry.deliver(snapshot, &content)?;
        tracing::debug!(
            "Pushed snapshot v{} to connection '{}'",
            snapshot.version,
            connection_id
        );
        Ok(())
    }

    async fn broadcast(&self, snapshot: &SlotSnapshot) -> BroadcastReport {
        let mut clients = self.clients.lock().await;
        let mut report = BroadcastReport::default();

        if clients.is_empty() {
            return report;
        }

        let content = match encode_snapshot(snapshot) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("Failed to encode snapshot v{}: {}", snapshot.version, e);
                report.failed = clients.len();
                return report;
            }
        };

        for (connection_id, entry) in clients.iter_mut() {
            if entry.is_stale(snapshot) {
                report.skipped += 1;
                continue;
            }
            // ブロードキャストでは一部の送信失敗を許容
            match entry.deliver(snapshot, &content) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        "Failed to push snapshot to connection '{}': {}",
                        connection_id,
                        e
                    );
                    report.failed += 1;
                }
            }
        }

        tracing::debug!(
            "Broadcasted snapshot v{}: delivered={}, skipped={}, failed={}",
            snapshot.version,
            report.delivered,
            report.skipped,
            report.failed
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Identity, PusherReceiver, Timestamp, pusher_channel};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 接続の登録・解除（Connection Registry）
    // - push_to / broadcast によるスナップショット送信（Broadcast Engine）
    // - 古いスナップショットが送られないこと
    // - 一部の接続の失敗が他に影響しないこと
    // ========================================

    fn connection(identity: &str) -> Connection {
        Connection::new(Identity::new(identity), Timestamp::new(0))
    }

    /// 次に届くメッセージを取り出す
    async fn next_message(rx: &mut PusherReceiver) -> String {
        rx.changed().await.unwrap();
        rx.borrow_and_update().clone()
    }

    fn snapshot(version: u64, payloads: &[Option<&str>]) -> SlotSnapshot {
        SlotSnapshot {
            version,
            payloads: payloads.iter().map(|p| p.map(str::to_string)).collect(),
        }
    }

    #[tokio::test]
    async fn test_register_and_list_connections() {
        // テスト項目: 登録した接続が一覧に含まれる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let alice = connection("10.0.0.1");
        let bob = connection("10.0.0.2");
        let (tx1, _rx1) = pusher_channel();
        let (tx2, _rx2) = pusher_channel();

        // when (操作):
        pusher.register_client(alice.clone(), tx1).await;
        pusher.register_client(bob.clone(), tx2).await;

        // then (期待する結果):
        let connections = pusher.connections().await;
        assert_eq!(connections.len(), 2);
        assert!(connections.contains(&alice));
        assert!(connections.contains(&bob));
    }

    #[tokio::test]
    async fn test_unregister_unknown_connection_is_error() {
        // テスト項目: 未登録の接続の解除はエラー
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();

        // when (操作):
        let result = pusher.unregister_client(&ConnectionId::generate()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_unregister_removes_connection() {
        // テスト項目: 解除した接続は一覧から消える
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let alice = connection("10.0.0.1");
        let (tx, _rx) = pusher_channel();
        pusher.register_client(alice.clone(), tx).await;

        // when (操作):
        let removed = pusher.unregister_client(&alice.id).await.unwrap();

        // then (期待する結果):
        assert_eq!(removed, alice);
        assert!(pusher.connections().await.is_empty());
    }

    #[tokio::test]
    async fn test_push_to_sends_wire_array() {
        // テスト項目: push_to は配列形式の JSON を送る
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let alice = connection("10.0.0.1");
        let (tx, mut rx) = pusher_channel();
        pusher.register_client(alice.clone(), tx).await;

        // when (操作):
        let result = pusher
            .push_to(&alice.id, &snapshot(1, &[Some("hello"), None]))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(next_message(&mut rx).await, r#"["hello",null]"#);
    }

    #[tokio::test]
    async fn test_push_to_unknown_connection() {
        // テスト項目: 未登録の接続への送信はエラー
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();

        // when (操作):
        let result = pusher
            .push_to(&ConnectionId::generate(), &snapshot(0, &[None]))
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_broadcast_to_all_connections() {
        // テスト項目: 全ての接続に同じスナップショットが届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx1, mut rx1) = pusher_channel();
        let (tx2, mut rx2) = pusher_channel();
        pusher.register_client(connection("10.0.0.1"), tx1).await;
        pusher.register_client(connection("10.0.0.2"), tx2).await;

        // when (操作):
        let report = pusher.broadcast(&snapshot(3, &[None, Some("world")])).await;

        // then (期待する結果):
        assert_eq!(report.delivered, 2);
        assert_eq!(next_message(&mut rx1).await, r#"[null,"world"]"#);
        assert_eq!(next_message(&mut rx2).await, r#"[null,"world"]"#);
    }

    #[tokio::test]
    async fn test_broadcast_isolates_closed_channel() {
        // テスト項目: 閉じたチャンネルがあっても他の接続への送信は続く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx1, rx1) = pusher_channel();
        let (tx2, mut rx2) = pusher_channel();
        pusher.register_client(connection("10.0.0.1"), tx1).await;
        pusher.register_client(connection("10.0.0.2"), tx2).await;
        drop(rx1);

        // when (操作):
        let report = pusher.broadcast(&snapshot(1, &[Some("a")])).await;

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(next_message(&mut rx2).await, r#"["a"]"#);
    }

    #[tokio::test]
    async fn test_broadcast_skips_stale_snapshot() {
        // テスト項目: 既に新しいスナップショットを受け取った接続には古いものを送らない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let alice = connection("10.0.0.1");
        let (tx, mut rx) = pusher_channel();
        pusher.register_client(alice.clone(), tx).await;
        pusher
            .push_to(&alice.id, &snapshot(5, &[Some("new")]))
            .await
            .unwrap();

        // when (操作):
        let report = pusher.broadcast(&snapshot(4, &[Some("old")])).await;
        pusher
            .push_to(&alice.id, &snapshot(5, &[Some("new")]))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(report.skipped, 1);
        assert_eq!(next_message(&mut rx).await, r#"["new"]"#);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_idle_client_keeps_only_latest_snapshot() {
        // テスト項目: 読み取らないクライアントには最新のスナップショットだけが残り、溜まり続けない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, mut rx) = pusher_channel();
        pusher.register_client(connection("10.0.0.1"), tx).await;
        let large = "x".repeat(64 * 1024);

        // when (操作): 受信側を読まずに 2000 回ブロードキャスト
        for version in 1..=2000u64 {
            let text = format!("{}{}", large, version);
            let report = pusher
                .broadcast(&snapshot(version, &[Some(text.as_str())]))
                .await;
            assert_eq!(report.delivered, 1);
        }

        // then (期待する結果): 保持されているのは最後の 1 件だけ
        let latest = next_message(&mut rx).await;
        assert!(latest.ends_with("2000\"]"));
        assert!(latest.len() < 64 * 1024 + 16);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_broadcast_without_connections_is_noop() {
        // テスト項目: 接続が無い場合は何もしない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();

        // when (操作):
        let report = pusher.broadcast(&snapshot(1, &[None])).await;

        // then (期待する結果):
        assert_eq!(report, BroadcastReport::default());
    }
}
