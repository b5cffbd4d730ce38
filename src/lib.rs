//! Donor Match - donor matching and eligibility scoring for emergency blood requests
//!
//! Given an emergency request, a donor roster and their donation history, the
//! core ranks the donors who may donate right now by a deterministic score.
//! Everything under [`core`] is pure and synchronous; [`routes`] exposes it
//! over HTTP.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use core::{Matcher, distance::haversine_distance, compatibility::can_donate_to, eligibility::is_eligible};
pub use models::{BloodGroup, Donor, DonationRecord, EmergencyRequest, DonorMatch, ScoringPolicy, EligibilityRules, CompatibilityMode};
