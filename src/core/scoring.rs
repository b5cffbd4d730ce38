use crate::models::{DonorRole, MissingLocationPolicy, ScoreBreakdown, ScoringPolicy};

/// Upper bound of an emitted score
pub const MAX_SCORE: i32 = 100;

/// Calculate a match score (0-100) for an eligible donor
///
/// Scoring formula:
/// score = clamp(
///     base_score                 # 100
///     - distance_penalty         # one band only, farthest band exceeded
///     + role_bonus               # emergency donor +10, fighter +5
///     + history_bonus            # >5 donations +10, >2 donations +5
/// , 0, 100)
///
/// `distance_km` is `None` when the donor's position is unknown.
pub fn calculate_match_score(
    distance_km: Option<f64>,
    role: DonorRole,
    donation_count: usize,
    policy: &ScoringPolicy,
) -> (u8, ScoreBreakdown) {
    let distance_penalty = calculate_distance_penalty(distance_km, policy);
    let role_bonus = calculate_role_bonus(role, policy);
    let history_bonus = calculate_history_bonus(donation_count, policy);

    let raw_total = policy.base_score - distance_penalty + role_bonus + history_bonus;
    let score = raw_total.clamp(0, MAX_SCORE) as u8;

    (
        score,
        ScoreBreakdown {
            base_score: policy.base_score,
            distance_penalty,
            role_bonus,
            history_bonus,
            raw_total,
        },
    )
}

/// Penalty of the farthest band the distance exceeds, in any band order
#[inline]
fn calculate_distance_penalty(distance_km: Option<f64>, policy: &ScoringPolicy) -> i32 {
    match distance_km {
        Some(distance) => policy
            .distance_bands
            .iter()
            .filter(|band| distance > band.over_km)
            .max_by(|a, b| a.over_km.total_cmp(&b.over_km))
            .map(|band| band.penalty)
            .unwrap_or(0),
        None => match policy.missing_location {
            MissingLocationPolicy::MaximumPenalty => policy
                .distance_bands
                .iter()
                .map(|band| band.penalty)
                .max()
                .unwrap_or(0),
            MissingLocationPolicy::NoPenalty | MissingLocationPolicy::TreatAsOrigin => 0,
        },
    }
}

#[inline]
fn calculate_role_bonus(role: DonorRole, policy: &ScoringPolicy) -> i32 {
    match role {
        DonorRole::EmergencyDonor => policy.emergency_donor_bonus,
        DonorRole::Fighter => policy.fighter_bonus,
        DonorRole::Donor | DonorRole::Unknown => 0,
    }
}

#[inline]
fn calculate_history_bonus(donation_count: usize, policy: &ScoringPolicy) -> i32 {
    if donation_count > policy.frequent_donor_threshold {
        policy.frequent_donor_bonus
    } else if donation_count > policy.repeat_donor_threshold {
        policy.repeat_donor_bonus
    } else {
        0
    }
}
