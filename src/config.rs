//! Configuration structs for the in-process reference collaborators.
//!
//! The core has no file-based configuration surface of its own — there is
//! no CLI in this crate — but the reference `IndexAccess` adapter and the
//! temporal hash index are still parameterized through small, serde-derived
//! structs rather than bare constructor arguments, following the
//! section-struct convention this corpus uses for its own config file.

use serde::Deserialize;

/// Tuning knobs for `crate::index::InMemoryIndexAccess`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct InMemoryIndexConfig {
    /// Expected entry count, used only to pre-size the backing map.
    #[serde(default)]
    pub initial_capacity: Option<usize>,
}

/// Tuning knobs for `crate::temporal::TemporalHashIndex`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TemporalHashConfig {
    /// Years of padding `YearBucketHasher` generates past the query interval
    /// for unbounded (`BEFORE`/`AFTER`) predicates. Defaults to 200 when
    /// absent from a deserialized config.
    #[serde(default)]
    pub horizon_years: Option<i32>,
}

impl TemporalHashConfig {
    pub const DEFAULT_HORIZON_YEARS: i32 = 200;

    pub fn horizon_years(&self) -> i32 {
        self.horizon_years.unwrap_or(Self::DEFAULT_HORIZON_YEARS)
    }
}
