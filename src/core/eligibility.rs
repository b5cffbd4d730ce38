use chrono::{DateTime, Datelike, NaiveDate, Utc};
use thiserror::Error;

use crate::models::{DonationRecord, Donor, EligibilityRules};

/// Why a donor may not donate right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Ineligibility {
    #[error("Donor is {age}, below the minimum donor age")]
    Underage { age: i32 },

    #[error("Donor is {age}, above the maximum donor age")]
    OverAge { age: i32 },

    #[error("Last donation {elapsed_days} days ago, {required_days} days required")]
    CoolingDown { elapsed_days: i64, required_days: i64 },
}

/// Age in whole years on `today`
///
/// One year is subtracted when the birthday has not yet come round this year.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Whole days elapsed since `since`, floored
pub fn days_since(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - since).num_milliseconds().div_euclid(86_400_000)
}

/// Check whether a donor may donate at `now`
///
/// Age must be within the rule bounds. With no prior donation that is all;
/// otherwise the sex-specific cooldown must have elapsed since `last_donation`.
pub fn check_eligibility(
    donor: &Donor,
    last_donation: Option<&DonationRecord>,
    rules: &EligibilityRules,
    now: DateTime<Utc>,
) -> Result<(), Ineligibility> {
    let age = age_on(donor.date_of_birth, now.date_naive());
    if age < rules.min_age {
        return Err(Ineligibility::Underage { age });
    }
    if age > rules.max_age {
        return Err(Ineligibility::OverAge { age });
    }

    let Some(record) = last_donation else {
        return Ok(());
    };

    let elapsed_days = days_since(record.donation_date, now);
    let required_days = rules.cooldown_days(donor.sex);
    if elapsed_days < required_days {
        return Err(Ineligibility::CoolingDown {
            elapsed_days,
            required_days,
        });
    }

    Ok(())
}

/// Boolean form of [`check_eligibility`]
#[inline]
pub fn is_eligible(
    donor: &Donor,
    last_donation: Option<&DonationRecord>,
    rules: &EligibilityRules,
    now: DateTime<Utc>,
) -> bool {
    check_eligibility(donor, last_donation, rules, now).is_ok()
}
