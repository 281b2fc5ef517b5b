//! Server state shared by all handlers.

use std::sync::Arc;

use crate::usecase::{
    ConnectClientUseCase, DisconnectClientUseCase, GetSlotsUseCase, SubmitClaimUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// SubmitClaimUseCase（確保要求のユースケース）
    pub submit_claim_usecase: Arc<SubmitClaimUseCase>,
    /// DisconnectClientUseCase（切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// GetSlotsUseCase（スロット状態取得のユースケース）
    pub get_slots_usecase: Arc<GetSlotsUseCase>,
}
