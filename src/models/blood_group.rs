use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::ValidationError;

/// Errors from strict blood group parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BloodGroupError {
    #[error("Empty blood group")]
    Empty,

    #[error("Unrecognized blood group: {0}")]
    Unrecognized(String),
}

/// ABO/Rh blood group
///
/// Deserialization is lenient: any text that is not one of the eight groups
/// becomes [`BloodGroup::Unknown`], which never matches and is never
/// compatible with anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BloodGroup {
    APos,
    ANeg,
    BPos,
    BNeg,
    AbPos,
    AbNeg,
    OPos,
    ONeg,
    Unknown,
}

impl BloodGroup {
    /// The eight recognised groups
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APos,
        BloodGroup::ANeg,
        BloodGroup::BPos,
        BloodGroup::BNeg,
        BloodGroup::AbPos,
        BloodGroup::AbNeg,
        BloodGroup::OPos,
        BloodGroup::ONeg,
    ];

    pub fn is_known(self) -> bool {
        self != BloodGroup::Unknown
    }

    pub fn is_rh_positive(self) -> bool {
        matches!(
            self,
            BloodGroup::APos | BloodGroup::BPos | BloodGroup::AbPos | BloodGroup::OPos
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BloodGroup::APos => "A+",
            BloodGroup::ANeg => "A-",
            BloodGroup::BPos => "B+",
            BloodGroup::BNeg => "B-",
            BloodGroup::AbPos => "AB+",
            BloodGroup::AbNeg => "AB-",
            BloodGroup::OPos => "O+",
            BloodGroup::ONeg => "O-",
            BloodGroup::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = BloodGroupError;

    /// Accepts `A+`, `ab-`, `O−` (U+2212 minus) and `A_POS` / `ONEG` spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(BloodGroupError::Empty);
        }

        let normalized: String = trimmed
            .to_uppercase()
            .replace('\u{2212}', "-")
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect();

        let (abo, rh) = if let Some(abo) = normalized.strip_suffix("POS") {
            (abo, '+')
        } else if let Some(abo) = normalized.strip_suffix("NEG") {
            (abo, '-')
        } else if let Some(abo) = normalized.strip_suffix('+') {
            (abo, '+')
        } else if let Some(abo) = normalized.strip_suffix('-') {
            (abo, '-')
        } else {
            return Err(BloodGroupError::Unrecognized(trimmed.to_string()));
        };

        match (abo, rh) {
            ("A", '+') => Ok(BloodGroup::APos),
            ("A", '-') => Ok(BloodGroup::ANeg),
            ("B", '+') => Ok(BloodGroup::BPos),
            ("B", '-') => Ok(BloodGroup::BNeg),
            ("AB", '+') => Ok(BloodGroup::AbPos),
            ("AB", '-') => Ok(BloodGroup::AbNeg),
            ("O", '+') => Ok(BloodGroup::OPos),
            ("O", '-') => Ok(BloodGroup::ONeg),
            _ => Err(BloodGroupError::Unrecognized(trimmed.to_string())),
        }
    }
}

impl From<&str> for BloodGroup {
    fn from(value: &str) -> Self {
        value.parse().unwrap_or(BloodGroup::Unknown)
    }
}

impl From<String> for BloodGroup {
    fn from(value: String) -> Self {
        BloodGroup::from(value.as_str())
    }
}

impl From<BloodGroup> for String {
    fn from(value: BloodGroup) -> Self {
        value.as_str().to_string()
    }
}

/// Validator hook rejecting [`BloodGroup::Unknown`]
pub(crate) fn validate_known_blood_group(group: &BloodGroup) -> Result<(), ValidationError> {
    if group.is_known() {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_blood_group"))
    }
}
