//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// `GET /api/slots` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotsSummaryDto {
    pub slot_count: usize,
    pub claimed: usize,
    pub slots: Vec<Option<String>>,
}

/// `GET /api/health` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}
