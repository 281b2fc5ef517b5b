//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - 接続の登録と、その接続だけへの初期スナップショット送信
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続が登録され、現在のボードが送られる
//! - 異常系：初期スナップショットの送信に失敗した場合は登録を取り消す

use std::sync::Arc;

use tomoshibi_shared::time::Clock;

use crate::domain::{Connection, Identity, MessagePusher, PusherChannel, SlotRepository, Timestamp};

use super::error::ConnectError;

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SlotRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(
        repository: Arc<dyn SlotRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// クライアント接続を実行
    ///
    /// 登録してからスナップショットを取るため、その間に行われた変更は
    /// ブロードキャストか初期スナップショットのどちらかで必ず届きます。
    ///
    /// # Arguments
    ///
    /// * `identity` - 接続元から導出した Identity
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Connection)` - 登録された接続
    /// * `Err(ConnectError)` - 初期スナップショットの送信失敗
    pub async fn execute(
        &self,
        identity: Identity,
        sender: PusherChannel,
    ) -> Result<Connection, ConnectError> {
        // 1. MessagePusher に接続を登録
        let connection = Connection::new(identity, Timestamp::new(self.clock.now_millis()));
        self.message_pusher
            .register_client(connection.clone(), sender)
            .await;

        // 2. この接続だけに現在のボードを送信
        let snapshot = self.repository.snapshot().await;
        if let Err(e) = self.message_pusher.push_to(&connection.id, &snapshot).await {
            if let Err(unregister_error) =
                self.message_pusher.unregister_client(&connection.id).await
            {
                tracing::error!(
                    "Failed to roll back registration of '{}': {}",
                    connection.id,
                    unregister_error
                );
            }
            return Err(ConnectError::InitialSnapshotFailed(e));
        }

        Ok(connection)
    }
}
