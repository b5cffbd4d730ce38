use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::Donor;

/// Fixes older than this are stale
pub const DEFAULT_STALE_AFTER_SECS: i64 = 300;

/// A donor position reported by the location-tracking collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationFix {
    #[serde(rename = "donorId")]
    pub donor_id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "recordedAt")]
    pub recorded_at: DateTime<Utc>,
}

/// True when the fix was recorded more than `window` before `now`
#[inline]
pub fn is_stale(fix: &LocationFix, now: DateTime<Utc>, window: Duration) -> bool {
    now - fix.recorded_at > window
}

/// Overlay each donor's newest fresh fix onto a copy of the roster
///
/// Donors without a fresh fix keep their registered coordinates.
pub fn apply_fresh_fixes(
    donors: &[Donor],
    fixes: &[LocationFix],
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<Donor> {
    let mut newest: HashMap<&str, &LocationFix> = HashMap::new();
    for fix in fixes.iter().filter(|fix| !is_stale(fix, now, window)) {
        newest
            .entry(fix.donor_id.as_str())
            .and_modify(|current| {
                if fix.recorded_at > current.recorded_at {
                    *current = fix;
                }
            })
            .or_insert(fix);
    }

    tracing::debug!(
        "Applying {} fresh location fixes out of {} reported",
        newest.len(),
        fixes.len()
    );

    donors
        .iter()
        .map(|donor| {
            let mut donor = donor.clone();
            if let Some(fix) = newest.get(donor.donor_id.as_str()) {
                donor.latitude = Some(fix.latitude);
                donor.longitude = Some(fix.longitude);
            }
            donor
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BloodGroup, DonorRole, Sex};
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn window() -> Duration {
        Duration::seconds(DEFAULT_STALE_AFTER_SECS)
    }

    fn fix(donor_id: &str, lat: f64, minutes_ago: i64) -> LocationFix {
        LocationFix {
            donor_id: donor_id.to_string(),
            latitude: lat,
            longitude: 0.5,
            recorded_at: now() - Duration::minutes(minutes_ago),
        }
    }

    fn donor(id: &str) -> Donor {
        Donor {
            donor_id: id.to_string(),
            name: id.to_string(),
            blood_group: BloodGroup::APos,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            sex: Sex::Male,
            role: DonorRole::Donor,
            latitude: Some(1.0),
            longitude: Some(1.0),
            is_active: None,
            phone: None,
        }
    }

    #[test]
    fn test_staleness_window() {
        assert!(!is_stale(&fix("a", 0.0, 4), now(), window()));
        assert!(!is_stale(&fix("a", 0.0, 5), now(), window()));
        assert!(is_stale(&fix("a", 0.0, 6), now(), window()));
        assert!(!is_stale(&fix("a", 0.0, -2), now(), window()));
    }

    #[test]
    fn test_newest_fresh_fix_wins() {
        let donors = vec![donor("a"), donor("b")];
        let fixes = vec![fix("a", 10.0, 3), fix("a", 20.0, 1), fix("b", 30.0, 30)];

        let updated = apply_fresh_fixes(&donors, &fixes, now(), window());

        assert_eq!(updated[0].latitude, Some(20.0));
        // Stale fix ignored
        assert_eq!(updated[1].latitude, Some(1.0));
        // Inputs untouched
        assert_eq!(donors[0].latitude, Some(1.0));
    }
}
