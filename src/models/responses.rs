use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::blood_group::BloodGroup;
use crate::models::domain::{CompatibilityMode, DonorMatch};

/// Response for the rank donors endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankDonorsResponse {
    #[serde(rename = "rankingId")]
    pub ranking_id: Uuid,
    #[serde(rename = "compatibilityMode")]
    pub compatibility_mode: CompatibilityMode,
    pub matches: Vec<DonorMatch>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "totalMatches")]
    pub total_matches: usize,
}

/// Response for the compatibility endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityCheckResponse {
    pub donor: BloodGroup,
    pub recipient: BloodGroup,
    pub compatible: bool,
    #[serde(rename = "donorGroupsForRecipient")]
    pub donor_groups_for_recipient: Vec<BloodGroup>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
