//! Configuration types for the Payroll Run Computation Engine.
//!
//! These types map directly onto the YAML configuration file. Every field
//! has a default, so an empty file yields a working configuration.

use serde::{Deserialize, Serialize};

use crate::calculation::DEFAULT_COMPENSATED_ABSENCES;
use crate::error::{EngineError, EngineResult};
use crate::models::AbsenceType;

/// Default number of payslip amount updates written per chunk.
pub const DEFAULT_UPDATE_CHUNK_SIZE: usize = 200;

/// Default number of payslips processed concurrently.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Batching and fan-out limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Payslip amount updates written per chunk. Chunks are written one
    /// after the other.
    pub update_chunk_size: usize,
    /// Upper bound on payslips processed at the same time, sized to the
    /// backing store's connection limit.
    pub max_concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            update_chunk_size: DEFAULT_UPDATE_CHUNK_SIZE,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Rules applied when creating runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunPolicy {
    /// Refuse a run whose period overlaps an existing run.
    pub reject_overlapping_runs: bool,
    /// Absence types paid like attendance for per-day rates.
    pub compensated_absences: Vec<AbsenceType>,
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self {
            reject_overlapping_runs: true,
            compensated_absences: DEFAULT_COMPENSATED_ABSENCES.to_vec(),
        }
    }
}

/// The complete engine configuration.
///
/// # Example
///
/// ```
/// use payroll_engine::config::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.batching.update_chunk_size, 200);
/// assert!(config.runs.reject_overlapping_runs);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Batching and fan-out limits.
    pub batching: BatchConfig,
    /// Run creation rules.
    pub runs: RunPolicy,
}

impl EngineConfig {
    /// Rejects values the orchestrator cannot work with.
    pub fn validate(&self) -> EngineResult<()> {
        if self.batching.update_chunk_size == 0 {
            return Err(EngineError::ConfigInvalid {
                field: "batching.update_chunk_size".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.batching.max_concurrency == 0 {
            return Err(EngineError::ConfigInvalid {
                field: "batching.max_concurrency".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
