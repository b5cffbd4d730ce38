use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::location::LocationFix;
use crate::models::blood_group::{validate_known_blood_group, BloodGroup};
use crate::models::domain::{CompatibilityMode, DonationRecord, Donor, EmergencyRequest};

/// Request to rank donors for an emergency
///
/// Carries the whole snapshot the ranking runs over; nothing is looked up.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankDonorsRequest {
    #[validate(nested)]
    pub request: EmergencyRequest,
    #[serde(default)]
    pub donors: Vec<Donor>,
    #[serde(default)]
    pub donations: Vec<DonationRecord>,
    #[serde(rename = "locationFixes", default)]
    pub location_fixes: Vec<LocationFix>,
    #[serde(rename = "compatibilityMode", default)]
    pub compatibility_mode: Option<CompatibilityMode>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Request to check one donor/recipient pairing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompatibilityCheckRequest {
    #[validate(custom(function = "validate_known_blood_group"))]
    pub donor: BloodGroup,
    #[validate(custom(function = "validate_known_blood_group"))]
    pub recipient: BloodGroup,
}
