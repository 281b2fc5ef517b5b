//! InMemory Slot Repository 実装
//!
//! ドメイン層が定義する SlotRepository trait の具体的な実装。
//! SlotBoard を Mutex で保護し、各操作はロックを保持したまま
//! ドメインのルール（`protocol`）を適用してスナップショットを取ります。
//! ロック中に await するのはロック取得のみで、送信処理は行いません。

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Claim, ClaimOutcome, ClaimRequest, Identity, SlotBoard, SlotError, SlotRepository,
    SlotSnapshot, SweepOutcome, Timestamp, apply_claim, sweep_expired,
};

/// インメモリ Slot Repository 実装
pub struct InMemorySlotRepository {
    /// 全接続で共有されるスロットボード
    board: Arc<Mutex<SlotBoard>>,
}

impl InMemorySlotRepository {
    /// 新しい InMemorySlotRepository を作成
    pub fn new(board: Arc<Mutex<SlotBoard>>) -> Self {
        Self { board }
    }

    /// 指定したスロット数の空のボードで作成
    pub fn with_slot_count(slot_count: usize) -> Self {
        Self::new(Arc::new(Mutex::new(SlotBoard::new(slot_count))))
    }
}

#[async_trait]
impl SlotRepository for InMemorySlotRepository {
    async fn slot_count(&self) -> usize {
        self.board.lock().await.len()
    }

    async fn get_slot(&self, index: usize) -> Result<Option<Claim>, SlotError> {
        let board = self.board.lock().await;
        board.get(index).map(|slot| slot.cloned())
    }

    async fn snapshot(&self) -> SlotSnapshot {
        self.board.lock().await.snapshot()
    }

    async fn apply_claim(
        &self,
        identity: &Identity,
        index: usize,
        request: ClaimRequest,
        now: Timestamp,
    ) -> Result<ClaimOutcome, SlotError> {
        let mut board = self.board.lock().await;
        let changed = apply_claim(&mut board, identity, index, request, now)?;
        Ok(ClaimOutcome {
            changed,
            snapshot: board.snapshot(),
        })
    }

    async fn sweep_expired(&self, now: Timestamp, ttl: Duration) -> SweepOutcome {
        let mut board = self.board.lock().await;
        let evicted = sweep_expired(&mut board, now, ttl);
        SweepOutcome {
            evicted,
            snapshot: board.snapshot(),
        }
    }
}
