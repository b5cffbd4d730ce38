use crate::models::{BloodGroup, CompatibilityMode};

/// Exact-match rule: both groups recognised and equal
#[inline]
pub fn matches_exactly(donor: BloodGroup, requested: BloodGroup) -> bool {
    donor.is_known() && donor == requested
}

/// Whether red cells of `donor` may be transfused into `recipient`
///
/// Standard ABO/Rh table. Either side unknown means incompatible.
pub fn can_donate_to(donor: BloodGroup, recipient: BloodGroup) -> bool {
    use BloodGroup::*;

    if !recipient.is_known() {
        return false;
    }

    match donor {
        ONeg => true,
        OPos => matches!(recipient, OPos | APos | BPos | AbPos),
        ANeg => matches!(recipient, ANeg | APos | AbNeg | AbPos),
        APos => matches!(recipient, APos | AbPos),
        BNeg => matches!(recipient, BNeg | BPos | AbNeg | AbPos),
        BPos => matches!(recipient, BPos | AbPos),
        AbNeg => matches!(recipient, AbNeg | AbPos),
        AbPos => recipient == AbPos,
        Unknown => false,
    }
}

/// Whether a donor group may answer a request under the given mode
#[inline]
pub fn is_group_admissible(donor: BloodGroup, requested: BloodGroup, mode: CompatibilityMode) -> bool {
    match mode {
        CompatibilityMode::Exact => matches_exactly(donor, requested),
        CompatibilityMode::Transfusion => can_donate_to(donor, requested),
    }
}

/// Groups that can give to `recipient`
pub fn compatible_donor_groups(recipient: BloodGroup) -> Vec<BloodGroup> {
    BloodGroup::ALL
        .into_iter()
        .filter(|donor| can_donate_to(*donor, recipient))
        .collect()
}

/// Groups that `donor` can give to
pub fn compatible_recipient_groups(donor: BloodGroup) -> Vec<BloodGroup> {
    BloodGroup::ALL
        .into_iter()
        .filter(|recipient| can_donate_to(donor, *recipient))
        .collect()
}
