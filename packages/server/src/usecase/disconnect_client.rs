//! UseCase: クライアント切断処理
//!
//! 切断時はブロードキャストを行いません。切断した Identity の確保は
//! 本人が解放するか、期限切れで削除されるまで残ります。

use std::sync::Arc;

use crate::domain::{Connection, ConnectionId, MessagePusher};

use super::error::DisconnectError;

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// クライアント切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Connection)` - 登録解除された接続
    /// * `Err(DisconnectError)` - 登録されていない接続（呼び出し側の誤り）
    pub async fn execute(&self, connection_id: &ConnectionId) -> Result<Connection, DisconnectError> {
        self.message_pusher
            .unregister_client(connection_id)
            .await
            .map_err(|_| DisconnectError::UnknownConnection(connection_id.to_string()))
    }
}
