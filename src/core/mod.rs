// Core algorithm exports
pub mod compatibility;
pub mod distance;
pub mod eligibility;
pub mod location;
pub mod matcher;
pub mod scoring;

pub use compatibility::{can_donate_to, compatible_donor_groups, compatible_recipient_groups, is_group_admissible, matches_exactly};
pub use distance::{distance_km, haversine_distance, round_distance};
pub use eligibility::{age_on, check_eligibility, days_since, is_eligible, Ineligibility};
pub use location::{apply_fresh_fixes, is_stale, LocationFix, DEFAULT_STALE_AFTER_SECS};
pub use matcher::{ExclusionCounts, Matcher};
pub use scoring::{calculate_match_score, MAX_SCORE};
