use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::models::blood_group::{validate_known_blood_group, BloodGroup};

/// Recorded sex, used only to pick the donation cooldown
///
/// Parsed case-insensitively; anything unrecognised is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl From<String> for Sex {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "male" | "m" | "man" => Sex::Male,
            "female" | "f" | "woman" => Sex::Female,
            _ => Sex::Unknown,
        }
    }
}

impl From<Sex> for String {
    fn from(value: Sex) -> Self {
        match value {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Unknown => "unknown",
        }
        .to_string()
    }
}

/// Donor category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonorRole {
    #[default]
    Donor,
    #[serde(alias = "emergency", alias = "emergencyDonor")]
    EmergencyDonor,
    #[serde(alias = "coordinator")]
    Fighter,
    #[serde(other)]
    Unknown,
}

/// Kind of donation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationType {
    #[default]
    #[serde(alias = "wholeBlood", alias = "whole")]
    WholeBlood,
    Plasma,
    Platelets,
    #[serde(alias = "doubleRed", alias = "power_red")]
    DoubleRed,
    #[serde(other)]
    Unknown,
}

/// Donation record status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    #[default]
    Completed,
    Scheduled,
    Deferred,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// Urgency of an emergency request, ordered low to critical
///
/// Unrecognised levels deserialize to `Unknown`, which sorts lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
    Critical = 4,
    #[serde(other)]
    Unknown = 0,
}

/// Geographic point in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Registered donor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donor {
    #[serde(rename = "donorId")]
    pub donor_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "bloodGroup")]
    pub blood_group: BloodGroup,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: NaiveDate,
    #[serde(default, alias = "gender")]
    pub sex: Sex,
    #[serde(default)]
    pub role: DonorRole,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(rename = "isActive", default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Donor {
    /// Donors without a tracked active flag count as active
    pub fn active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }

    /// Known position, if both coordinates are present
    pub fn location(&self) -> Option<Location> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Location::new(latitude, longitude)),
            _ => None,
        }
    }

    /// Position with each missing coordinate read as 0
    pub fn location_or_origin(&self) -> Location {
        Location::new(self.latitude.unwrap_or(0.0), self.longitude.unwrap_or(0.0))
    }
}

/// One donation in a donor's history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationRecord {
    #[serde(rename = "donorId")]
    pub donor_id: String,
    #[serde(rename = "donationDate")]
    pub donation_date: DateTime<Utc>,
    #[serde(rename = "nextEligibleDate", default)]
    pub next_eligible_date: Option<NaiveDate>,
    #[serde(rename = "donationType", default)]
    pub donation_type: DonationType,
    #[serde(default)]
    pub status: DonationStatus,
}

/// Emergency blood request, read-only input to ranking
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmergencyRequest {
    #[serde(rename = "requestId", default)]
    pub request_id: Option<String>,
    #[validate(custom(function = "validate_known_blood_group"))]
    #[serde(rename = "bloodGroup")]
    pub blood_group: BloodGroup,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(default)]
    pub urgency: Urgency,
}

impl EmergencyRequest {
    pub fn location(&self) -> Location {
        Location::new(self.latitude, self.longitude)
    }
}

/// Which donor groups may answer a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityMode {
    /// Donor group must equal the requested group
    #[default]
    Exact,
    /// Donor group must be transfusable into the requested group
    Transfusion,
}

impl fmt::Display for CompatibilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompatibilityMode::Exact => write!(f, "exact"),
            CompatibilityMode::Transfusion => write!(f, "transfusion"),
        }
    }
}

/// How to score a donor whose coordinates are missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingLocationPolicy {
    /// Measure from (0, 0)
    #[default]
    TreatAsOrigin,
    /// Distance unknown, apply the largest band penalty
    MaximumPenalty,
    /// Distance unknown, no distance penalty
    NoPenalty,
}

/// A distance above `over_km` costs `penalty` points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceBand {
    pub over_km: f64,
    pub penalty: i32,
}

/// Scoring constants
///
/// Defaults: base 100; distance bands 50/25/10 km costing 30/20/10;
/// +10 emergency donor, +5 fighter; +10 for more than 5 donations,
/// +5 for more than 2.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringPolicy {
    pub base_score: i32,
    /// Checked in order, first band exceeded wins
    pub distance_bands: Vec<DistanceBand>,
    pub missing_location: MissingLocationPolicy,
    pub emergency_donor_bonus: i32,
    pub fighter_bonus: i32,
    pub frequent_donor_threshold: usize,
    pub frequent_donor_bonus: i32,
    pub repeat_donor_threshold: usize,
    pub repeat_donor_bonus: i32,
}

impl ScoringPolicy {
    pub fn default_distance_bands() -> Vec<DistanceBand> {
        vec![
            DistanceBand { over_km: 50.0, penalty: 30 },
            DistanceBand { over_km: 25.0, penalty: 20 },
            DistanceBand { over_km: 10.0, penalty: 10 },
        ]
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            base_score: 100,
            distance_bands: Self::default_distance_bands(),
            missing_location: MissingLocationPolicy::default(),
            emergency_donor_bonus: 10,
            fighter_bonus: 5,
            frequent_donor_threshold: 5,
            frequent_donor_bonus: 10,
            repeat_donor_threshold: 2,
            repeat_donor_bonus: 5,
        }
    }
}

/// Medical eligibility constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityRules {
    pub min_age: i32,
    pub max_age: i32,
    pub standard_cooldown_days: i64,
    pub female_cooldown_days: i64,
}

impl EligibilityRules {
    pub fn cooldown_days(&self, sex: Sex) -> i64 {
        match sex {
            Sex::Female => self.female_cooldown_days,
            Sex::Male | Sex::Unknown => self.standard_cooldown_days,
        }
    }
}

impl Default for EligibilityRules {
    fn default() -> Self {
        Self {
            min_age: 18,
            max_age: 60,
            standard_cooldown_days: 56,
            female_cooldown_days: 84,
        }
    }
}

/// Most recent donation as reported on a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "date", rename_all = "camelCase")]
pub enum LastDonation {
    Never,
    On(DateTime<Utc>),
}

impl fmt::Display for LastDonation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastDonation::Never => write!(f, "Never donated"),
            LastDonation::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Next eligible date as reported on a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "date", rename_all = "camelCase")]
pub enum NextEligible {
    Now,
    On(NaiveDate),
}

impl fmt::Display for NextEligible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextEligible::Now => write!(f, "Available now"),
            NextEligible::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// How a score was assembled, before clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(rename = "baseScore")]
    pub base_score: i32,
    #[serde(rename = "distancePenalty")]
    pub distance_penalty: i32,
    #[serde(rename = "roleBonus")]
    pub role_bonus: i32,
    #[serde(rename = "historyBonus")]
    pub history_bonus: i32,
    #[serde(rename = "rawTotal")]
    pub raw_total: i32,
}

/// Ranked donor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonorMatch {
    #[serde(rename = "donorId")]
    pub donor_id: String,
    pub name: String,
    #[serde(rename = "bloodGroup")]
    pub blood_group: BloodGroup,
    pub role: DonorRole,
    pub phone: Option<String>,
    /// `None` when the donor's position is unknown
    #[serde(rename = "distanceKm")]
    pub distance_km: Option<f64>,
    #[serde(rename = "lastDonation")]
    pub last_donation: LastDonation,
    #[serde(rename = "nextEligible")]
    pub next_eligible: NextEligible,
    #[serde(rename = "isEligible")]
    pub is_eligible: bool,
    pub score: u8,
    pub breakdown: ScoreBreakdown,
}
