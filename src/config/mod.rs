use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fmt;

/// Rule tables governing one allocation run.
///
/// Passed explicitly into the engine and ledger so a run is fully described
/// by its input data plus one of these values.
#[derive(Debug, Clone)]
pub struct AllocationRules {
    /// Ranked choices collected per term, which is also the round count.
    pub max_requests: usize,
    /// Seat limit applied to any club without a specific entry in `club_limits`.
    pub default_club_limit: usize,
    /// Per-club-name seat limit overrides.
    pub club_limits: BTreeMap<String, usize>,
    /// Club names a pupil may hold in at most one term.
    pub repeat_exclusions: BTreeSet<String>,
    /// Club names whose acceptance in one term is mirrored into the second.
    pub both_term_clubs: BTreeSet<String>,
}

impl AllocationRules {
    pub fn limit_for(&self, club_name: &str) -> usize {
        self.club_limits
            .get(club_name)
            .copied()
            .unwrap_or(self.default_club_limit)
    }

    pub fn repeat_excluded(&self, club_name: &str) -> bool {
        self.repeat_exclusions.contains(club_name)
    }

    pub fn spans_both_terms(&self, club_name: &str) -> bool {
        self.both_term_clubs.contains(club_name)
    }
}

impl Default for AllocationRules {
    fn default() -> Self {
        Self {
            max_requests: 3,
            default_club_limit: 30,
            club_limits: BTreeMap::new(),
            repeat_exclusions: [
                "Fitness Club",
                "Art and Craft",
                "ICT Club",
                "French",
                "Needlecraft",
                "iMovie Club",
                "Cookery",
                "Spanish",
            ]
            .iter()
            .map(|name| (*name).to_string())
            .collect(),
            both_term_clubs: ["Hockey", "Netball"]
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
        }
    }
}

/// Top-level configuration for the allocator binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telemetry: TelemetryConfig,
    pub rules: AllocationRules,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let mut rules = AllocationRules::default();
        if let Ok(value) = env::var("CLUBS_MAX_REQUESTS") {
            rules.max_requests = value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|parsed| *parsed > 0)
                .ok_or(ConfigError::InvalidMaxRequests)?;
        }
        if let Ok(value) = env::var("CLUBS_DEFAULT_LIMIT") {
            rules.default_club_limit = value
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidDefaultLimit)?;
        }

        Ok(Self {
            telemetry: TelemetryConfig { log_level },
            rules,
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidMaxRequests,
    InvalidDefaultLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidMaxRequests => {
                write!(f, "CLUBS_MAX_REQUESTS must be a positive integer")
            }
            ConfigError::InvalidDefaultLimit => {
                write!(f, "CLUBS_DEFAULT_LIMIT must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
