//! UseCase errors.

use thiserror::Error;

use crate::domain::{MessagePushError, SlotError};

/// 接続処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// 初期スナップショットを送れなかった（接続は登録解除済み）
    #[error("Failed to send initial snapshot: {0}")]
    InitialSnapshotFailed(#[from] MessagePushError),
}

/// 切断処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisconnectError {
    /// 登録されていない接続を切断しようとした
    #[error("Connection '{0}' is not registered")]
    UnknownConnection(String),
}

/// 確保要求のエラー（接続を終了させる）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitClaimError {
    #[error(transparent)]
    Slot(#[from] SlotError),
}
