use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::core::{
    compatibility::is_group_admissible,
    distance::{distance_km, round_distance},
    eligibility::check_eligibility,
    scoring::calculate_match_score,
};
use crate::models::{
    CompatibilityMode, DonationRecord, Donor, DonorMatch, EligibilityRules, EmergencyRequest,
    LastDonation, Location, MissingLocationPolicy, NextEligible, ScoringPolicy,
};

/// A donor's history as seen by the ranker
#[derive(Debug, Clone, Copy, Default)]
struct DonorHistory<'a> {
    count: usize,
    latest: Option<&'a DonationRecord>,
}

/// Why donors were left out of a ranking, for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExclusionCounts {
    pub inactive: usize,
    pub incompatible: usize,
    pub ineligible: usize,
}

/// Donor ranking orchestrator
///
/// # Pipeline Stages
/// 1. Active filter
/// 2. Blood group admissibility (exact or transfusion mode)
/// 3. Medical eligibility against the most recent donation
/// 4. Distance, scoring and stable ranking
#[derive(Debug, Clone)]
pub struct Matcher {
    policy: ScoringPolicy,
    rules: EligibilityRules,
    mode: CompatibilityMode,
}

impl Matcher {
    pub fn new(policy: ScoringPolicy, rules: EligibilityRules, mode: CompatibilityMode) -> Self {
        Self { policy, rules, mode }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            ScoringPolicy::default(),
            EligibilityRules::default(),
            CompatibilityMode::default(),
        )
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn rules(&self) -> &EligibilityRules {
        &self.rules
    }

    /// Default compatibility mode used by [`Matcher::rank_donors`]
    pub fn mode(&self) -> CompatibilityMode {
        self.mode
    }

    /// Rank donors for a request as of now, in the configured mode
    pub fn rank_donors(
        &self,
        request: &EmergencyRequest,
        donors: &[Donor],
        donations: &[DonationRecord],
    ) -> Vec<DonorMatch> {
        self.rank_donors_at(request, donors, donations, self.mode, Utc::now())
    }

    /// Rank donors for a request at a fixed instant
    ///
    /// Inactive, inadmissible and ineligible donors are skipped. The result
    /// is sorted by descending score; equal scores keep roster order.
    pub fn rank_donors_at(
        &self,
        request: &EmergencyRequest,
        donors: &[Donor],
        donations: &[DonationRecord],
        mode: CompatibilityMode,
        now: DateTime<Utc>,
    ) -> Vec<DonorMatch> {
        let histories = index_histories(donations);
        let request_location = request.location();
        let today = now.date_naive();
        let mut excluded = ExclusionCounts::default();

        let mut matches: Vec<DonorMatch> = donors
            .iter()
            .filter_map(|donor| {
                if !donor.active() {
                    excluded.inactive += 1;
                    tracing::trace!("Skipping inactive donor {}", donor.donor_id);
                    return None;
                }

                if !is_group_admissible(donor.blood_group, request.blood_group, mode) {
                    excluded.incompatible += 1;
                    tracing::trace!(
                        "Skipping donor {}: {} cannot answer {} request ({} mode)",
                        donor.donor_id,
                        donor.blood_group,
                        request.blood_group,
                        mode
                    );
                    return None;
                }

                let history = histories
                    .get(donor.donor_id.as_str())
                    .copied()
                    .unwrap_or_default();

                if let Err(reason) = check_eligibility(donor, history.latest, &self.rules, now) {
                    excluded.ineligible += 1;
                    tracing::trace!("Skipping donor {}: {}", donor.donor_id, reason);
                    return None;
                }

                let distance = self.donor_distance(donor, request_location);
                let (score, breakdown) =
                    calculate_match_score(distance, donor.role, history.count, &self.policy);

                let last_donation = history
                    .latest
                    .map(|record| LastDonation::On(record.donation_date))
                    .unwrap_or(LastDonation::Never);

                let next_eligible = history
                    .latest
                    .and_then(|record| record.next_eligible_date)
                    .filter(|date| *date > today)
                    .map(NextEligible::On)
                    .unwrap_or(NextEligible::Now);

                Some(DonorMatch {
                    donor_id: donor.donor_id.clone(),
                    name: donor.name.clone(),
                    blood_group: donor.blood_group,
                    role: donor.role,
                    phone: donor.phone.clone(),
                    distance_km: distance.map(round_distance),
                    last_donation,
                    next_eligible,
                    is_eligible: true,
                    score,
                    breakdown,
                })
            })
            .collect();

        // Stable: ties keep roster order
        matches.sort_by(|a, b| b.score.cmp(&a.score));

        tracing::debug!(
            "Ranked {} of {} donors for {} request ({} mode); excluded inactive={}, incompatible={}, ineligible={}",
            matches.len(),
            donors.len(),
            request.blood_group,
            mode,
            excluded.inactive,
            excluded.incompatible,
            excluded.ineligible
        );

        matches
    }

    /// Distance to the request, `None` when unknown under the policy
    fn donor_distance(&self, donor: &Donor, request_location: Location) -> Option<f64> {
        match donor.location() {
            Some(location) => Some(distance_km(request_location, location)),
            None => match self.policy.missing_location {
                MissingLocationPolicy::TreatAsOrigin => {
                    Some(distance_km(request_location, donor.location_or_origin()))
                }
                MissingLocationPolicy::MaximumPenalty | MissingLocationPolicy::NoPenalty => None,
            },
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Count records and pick the latest per donor in one pass
///
/// On equal dates the first record seen is kept.
fn index_histories(donations: &[DonationRecord]) -> HashMap<&str, DonorHistory<'_>> {
    let mut histories: HashMap<&str, DonorHistory<'_>> = HashMap::new();
    for record in donations {
        let history = histories.entry(record.donor_id.as_str()).or_default();
        history.count += 1;
        let is_newer = history
            .latest
            .map_or(true, |latest| record.donation_date > latest.donation_date);
        if is_newer {
            history.latest = Some(record);
        }
    }
    histories
}
