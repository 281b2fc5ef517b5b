//! UseCase: 確保要求の処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubmitClaimUseCase::execute() メソッド
//! - ボードが変化した場合のみブロードキャストされること
//!
//! ### どのような状況を想定しているか
//! - 正常系：空スロットの確保、別スロットへの移動
//! - 無視：他人のスロットへの要求（ブロードキャストもエラーも無し）
//! - 異常系：範囲外のインデックス

use std::sync::Arc;

use tomoshibi_shared::time::Clock;

use crate::domain::{ClaimCommand, Identity, MessagePusher, SlotRepository, Timestamp};

use super::error::SubmitClaimError;

/// 確保要求のユースケース
pub struct SubmitClaimUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SlotRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SubmitClaimUseCase {
    /// 新しい SubmitClaimUseCase を作成
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

    /// 確保要求を実行
    ///
    /// # Arguments
    ///
    /// * `identity` - 要求元の Identity
    /// * `command` - 対象スロットと要求内容
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - ボードが変化し、全接続にブロードキャストした
    /// * `Ok(false)` - 変化なし（ブロードキャストもしない）
    /// * `Err(SubmitClaimError)` - 範囲外のインデックス
    pub async fn execute(
        &self,
        identity: &Identity,
        command: ClaimCommand,
    ) -> Result<bool, SubmitClaimError> {
        let now = Timestamp::new(self.clock.now_millis());

        // 1. Repository 経由で要求を適用
        let outcome = self
            .repository
            .apply_claim(identity, command.index, command.request, now)
            .await?;

        if !outcome.changed {
            tracing::debug!(
                "Request from '{}' on slot {} left the board unchanged",
                identity,
                command.index
            );
            return Ok(false);
        }

        // 2. 変更後のボードをブロードキャスト
        self.message_pusher.broadcast(&outcome.snapshot).await;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            BroadcastReport, ClaimRequest, Payload, SlotError, SlotSnapshot,
            message_pusher::MockMessagePusher,
        },
        infrastructure::repository::InMemorySlotRepository,
    };
    use tomoshibi_shared::time::FixedClock;

    fn light(index: usize, text: &str) -> ClaimCommand {
        ClaimCommand {
            index,
            request: ClaimRequest::Light(Payload::new(text.to_string()).unwrap()),
        }
    }

    fn create_usecase(
        repository: Arc<InMemorySlotRepository>,
        message_pusher: MockMessagePusher,
    ) -> SubmitClaimUseCase {
        SubmitClaimUseCase::new(
            repository,
            Arc::new(message_pusher),
            Arc::new(FixedClock::new(1_000)),
        )
    }

    fn expected(payloads: &[Option<&str>]) -> Vec<Option<String>> {
        payloads.iter().map(|p| p.map(str::to_string)).collect()
    }

    #[tokio::test]
    async fn test_claim_broadcasts_new_board() {
        // テスト項目: 空スロットの確保でボード全体がブロードキャストされる
        // given (前提条件):
        let repository = Arc::new(InMemorySlotRepository::with_slot_count(20));
        let mut mock = MockMessagePusher::new();
        let mut board = vec![None; 20];
        board[0] = Some("hello");
        let want = expected(&board);
        mock.expect_broadcast()
            .withf(move |snapshot: &SlotSnapshot| snapshot.payloads == want)
            .times(1)
            .returning(|_| BroadcastReport::default());
        let usecase = create_usecase(repository.clone(), mock);

        // when (操作):
        let result = usecase
            .execute(&Identity::new("x"), light(0, "hello"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(true));
        let claim = repository.get_slot(0).await.unwrap().unwrap();
        assert_eq!(claim.owner, Identity::new("x"));
        assert_eq!(claim.claimed_at, Timestamp::new(1_000));
    }

    #[tokio::test]
    async fn test_moving_claim_broadcasts_once() {
        // テスト項目: 別スロットへの移動では古いスロットが解放され、1 回だけブロードキャストされる
        // given (前提条件):
        let repository = Arc::new(InMemorySlotRepository::with_slot_count(3));
        repository
            .apply_claim(
                &Identity::new("x"),
                0,
                light(0, "hello").request,
                Timestamp::new(0),
            )
            .await
            .unwrap();
        let mut mock = MockMessagePusher::new();
        let want = expected(&[None, Some("world"), None]);
        mock.expect_broadcast()
            .withf(move |snapshot: &SlotSnapshot| snapshot.payloads == want)
            .times(1)
            .returning(|_| BroadcastReport::default());
        let usecase = create_usecase(repository, mock);

        // when (操作):
        let result = usecase
            .execute(&Identity::new("x"), light(1, "world"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(true));
    }

    #[tokio::test]
    async fn test_conflict_is_ignored_without_broadcast() {
        // テスト項目: 他人のスロットへの要求は無視され、ブロードキャストもされない
        // given (前提条件):
        let repository = Arc::new(InMemorySlotRepository::with_slot_count(3));
        repository
            .apply_claim(
                &Identity::new("x"),
                0,
                light(0, "hello").request,
                Timestamp::new(0),
            )
            .await
            .unwrap();
        let mut mock = MockMessagePusher::new();
        mock.expect_broadcast().times(0);
        let usecase = create_usecase(repository.clone(), mock);

        // when (操作):
        let result = usecase
            .execute(&Identity::new("y"), light(0, "steal"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(false));
        let claim = repository.get_slot(0).await.unwrap().unwrap();
        assert_eq!(claim.payload.as_str(), "hello");
    }

    #[tokio::test]
    async fn test_out_of_range_is_error_without_broadcast() {
        // テスト項目: 範囲外のインデックスはエラーとなり、ブロードキャストされない
        // given (前提条件):
        let repository = Arc::new(InMemorySlotRepository::with_slot_count(3));
        let mut mock = MockMessagePusher::new();
        mock.expect_broadcast().times(0);
        let usecase = create_usecase(repository, mock);

        // when (操作):
        let result = usecase
            .execute(&Identity::new("x"), light(3, "oops"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SubmitClaimError::Slot(SlotError::IndexOutOfRange {
                index: 3,
                len: 3
            }))
        );
    }
}
