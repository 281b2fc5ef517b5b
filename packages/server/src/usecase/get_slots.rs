//! UseCase: 現在のスロット状態の取得

use std::sync::Arc;

use crate::domain::{SlotRepository, SlotSnapshot};

/// スロット状態取得のユースケース
pub struct GetSlotsUseCase {
    repository: Arc<dyn SlotRepository>,
}

impl GetSlotsUseCase {
    pub fn new(repository: Arc<dyn SlotRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> SlotSnapshot {
        self.repository.snapshot().await
    }
}
