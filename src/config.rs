use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{CompatibilityMode, DistanceBand, EligibilityRules, MissingLocationPolicy, ScoringPolicy};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub eligibility: EligibilitySettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    pub default_limit: Option<u16>,
    pub max_limit: Option<u16>,
    #[serde(default)]
    pub compatibility_mode: CompatibilityMode,
    pub location_stale_after_secs: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EligibilitySettings {
    #[serde(default = "default_min_age")]
    pub min_age: i32,
    #[serde(default = "default_max_age")]
    pub max_age: i32,
    #[serde(default = "default_standard_cooldown_days")]
    pub standard_cooldown_days: i64,
    #[serde(default = "default_female_cooldown_days")]
    pub female_cooldown_days: i64,
}

impl Default for EligibilitySettings {
    fn default() -> Self {
        Self {
            min_age: default_min_age(),
            max_age: default_max_age(),
            standard_cooldown_days: default_standard_cooldown_days(),
            female_cooldown_days: default_female_cooldown_days(),
        }
    }
}

fn default_min_age() -> i32 { 18 }
fn default_max_age() -> i32 { 60 }
fn default_standard_cooldown_days() -> i64 { 56 }
fn default_female_cooldown_days() -> i64 { 84 }

impl EligibilitySettings {
    pub fn to_rules(&self) -> EligibilityRules {
        EligibilityRules {
            min_age: self.min_age,
            max_age: self.max_age,
            standard_cooldown_days: self.standard_cooldown_days,
            female_cooldown_days: self.female_cooldown_days,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_base_score")]
    pub base_score: i32,
    #[serde(default = "ScoringPolicy::default_distance_bands")]
    pub distance_bands: Vec<DistanceBand>,
    #[serde(default)]
    pub missing_location: MissingLocationPolicy,
    #[serde(default = "default_emergency_donor_bonus")]
    pub emergency_donor_bonus: i32,
    #[serde(default = "default_fighter_bonus")]
    pub fighter_bonus: i32,
    #[serde(default = "default_frequent_donor_threshold")]
    pub frequent_donor_threshold: usize,
    #[serde(default = "default_frequent_donor_bonus")]
    pub frequent_donor_bonus: i32,
    #[serde(default = "default_repeat_donor_threshold")]
    pub repeat_donor_threshold: usize,
    #[serde(default = "default_repeat_donor_bonus")]
    pub repeat_donor_bonus: i32,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            base_score: default_base_score(),
            distance_bands: ScoringPolicy::default_distance_bands(),
            missing_location: MissingLocationPolicy::default(),
            emergency_donor_bonus: default_emergency_donor_bonus(),
            fighter_bonus: default_fighter_bonus(),
            frequent_donor_threshold: default_frequent_donor_threshold(),
            frequent_donor_bonus: default_frequent_donor_bonus(),
            repeat_donor_threshold: default_repeat_donor_threshold(),
            repeat_donor_bonus: default_repeat_donor_bonus(),
        }
    }
}

fn default_base_score() -> i32 { 100 }
fn default_emergency_donor_bonus() -> i32 { 10 }
fn default_fighter_bonus() -> i32 { 5 }
fn default_frequent_donor_threshold() -> usize { 5 }
fn default_frequent_donor_bonus() -> i32 { 10 }
fn default_repeat_donor_threshold() -> usize { 2 }
fn default_repeat_donor_bonus() -> i32 { 5 }

impl ScoringSettings {
    /// Build the scoring policy, ordering bands farthest first
    pub fn to_policy(&self) -> ScoringPolicy {
        let mut distance_bands = self.distance_bands.clone();
        distance_bands.sort_by(|a, b| b.over_km.total_cmp(&a.over_km));

        ScoringPolicy {
            base_score: self.base_score,
            distance_bands,
            missing_location: self.missing_location,
            emergency_donor_bonus: self.emergency_donor_bonus,
            fighter_bonus: self.fighter_bonus,
            frequent_donor_threshold: self.frequent_donor_threshold,
            frequent_donor_bonus: self.frequent_donor_bonus,
            repeat_donor_threshold: self.repeat_donor_threshold,
            repeat_donor_bonus: self.repeat_donor_bonus,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with DONOR_MATCH)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., DONOR_MATCH__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("DONOR_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_matches_policy() {
        let settings = ScoringSettings::default();
        assert_eq!(settings.to_policy(), ScoringPolicy::default());
    }

    #[test]
    fn test_default_eligibility_matches_rules() {
        let settings = EligibilitySettings::default();
        assert_eq!(settings.to_rules(), EligibilityRules::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "compact");
    }

    #[test]
    fn test_bands_sorted_farthest_first() {
        let settings: ScoringSettings = toml::from_str(
            r#"
            distance_bands = [
                { over_km = 5.0, penalty = 5 },
                { over_km = 15.0, penalty = 20 },
                { over_km = 10.0, penalty = 10 },
            ]
            missing_location = "maximum_penalty"
            "#,
        )
        .unwrap();

        let policy = settings.to_policy();
        let thresholds: Vec<f64> = policy.distance_bands.iter().map(|b| b.over_km).collect();
        assert_eq!(thresholds, vec![15.0, 10.0, 5.0]);
        assert_eq!(policy.missing_location, MissingLocationPolicy::MaximumPenalty);
        assert_eq!(policy.fighter_bonus, 5);
    }

    #[test]
    fn test_partial_settings_file() {
        let settings: Settings = toml::from_str(
            r#"
            [server]
            port = 9000

            [matching]
            compatibility_mode = "transfusion"

            [eligibility]
            max_age = 65
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.matching.compatibility_mode, CompatibilityMode::Transfusion);
        assert_eq!(settings.eligibility.max_age, 65);
        assert_eq!(settings.eligibility.min_age, 18);
        assert_eq!(settings.scoring.base_score, 100);
    }

    #[test]
    fn test_shipped_defaults_file() {
        let settings = Settings::load_from(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml")).unwrap();

        assert_eq!(settings.scoring.to_policy(), ScoringPolicy::default());
        assert_eq!(settings.eligibility.to_rules(), EligibilityRules::default());
        assert_eq!(settings.matching.location_stale_after_secs, Some(300));
    }
}
