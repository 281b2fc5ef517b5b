//! Repository trait 定義
//!
//! ドメイン層が必要とするスロットボードへのアクセスを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::time::Duration;

use async_trait::async_trait;

use super::{
    Claim, ClaimRequest, EvictedClaim, Identity, SlotError, SlotSnapshot, Timestamp,
};

/// Result of applying one claim request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimOutcome {
    /// Whether the board changed
    pub changed: bool,
    /// Board state right after the request, taken atomically with it
    pub snapshot: SlotSnapshot,
}

/// Result of one expiry sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepOutcome {
    pub evicted: Vec<EvictedClaim>,
    /// Board state right after the sweep, taken atomically with it
    pub snapshot: SlotSnapshot,
}

/// Slot Repository trait
///
/// スロットボードは全接続で共有される唯一の状態です。
/// 各メソッドはボードに対する 1 回の不可分な操作であり、
/// 実装はネットワーク送信をまたいでロックを保持してはいけません。
#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// スロット数を取得
    async fn slot_count(&self) -> usize;

    /// 指定スロットの確保状態を取得
    async fn get_slot(&self, index: usize) -> Result<Option<Claim>, SlotError>;

    /// 現在のボードのスナップショットを取得
    async fn snapshot(&self) -> SlotSnapshot;

    /// 確保・更新・解放の要求を適用
    async fn apply_claim(
        &self,
        identity: &Identity,
        index: usize,
        request: ClaimRequest,
        now: Timestamp,
    ) -> Result<ClaimOutcome, SlotError>;

    /// TTL を超えた確保を削除
    async fn sweep_expired(&self, now: Timestamp, ttl: Duration) -> SweepOutcome;
}
