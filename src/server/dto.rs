use serde::{Deserialize, Serialize};

use crate::types::Lead;

/// Body of `GET /api/leads`.
///
/// Carries both `total` and `pages` so clients can render either a count or a
/// page picker without a second request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadListResponse {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub pages: u64,
    pub leads: Vec<Lead>,
}

/// Body of single-lead responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadResponse {
    pub lead: Lead,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
}
