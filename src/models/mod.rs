// Model exports
pub mod blood_group;
pub mod domain;
pub mod requests;
pub mod responses;

pub use blood_group::{BloodGroup, BloodGroupError};
pub use domain::{
    CompatibilityMode, DistanceBand, DonationRecord, DonationStatus, DonationType, Donor, DonorMatch,
    DonorRole, EligibilityRules, EmergencyRequest, LastDonation, Location, MissingLocationPolicy,
    NextEligible, ScoreBreakdown, ScoringPolicy, Sex, Urgency,
};
pub use requests::{CompatibilityCheckRequest, RankDonorsRequest};
pub use responses::{CompatibilityCheckResponse, ErrorResponse, HealthResponse, RankDonorsResponse};
