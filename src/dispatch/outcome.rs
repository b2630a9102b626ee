use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default rule name when the trigger response carries none.
pub const UNKNOWN_RULE: &str = "Unknown Rule";
/// Default execution state when the trigger response carries none.
pub const UNKNOWN_STATE: &str = "unknown";

/// A data-quality rule to trigger, as listed by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: String,
    pub display_name: String,
}

impl WorkItem {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// The result of a single trigger call.
///
/// Failures are ordinary data: the executor never returns `Err`, so one bad
/// rule cannot abort the batch it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Triggered {
        rule_name: String,
        state: String,
        job_id: Option<String>,
        job_run_id: Option<String>,
    },
    Failed {
        reason: String,
    },
}

impl Outcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Outcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_triggered(&self) -> bool {
        matches!(self, Outcome::Triggered { .. })
    }
}

/// Pacing parameters, fixed for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Slice length and per-slice concurrency limit.
    pub batch_size: NonZeroUsize,
    /// Idle interval between slices. Zero disables slicing.
    pub batch_delay: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            batch_size: NonZeroUsize::new(5).unwrap_or(NonZeroUsize::MIN),
            batch_delay: Duration::from_secs(1),
        }
    }
}

/// Credentials and target project for a run. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub token: String,
    pub project_id: String,
}

impl RunContext {
    pub fn new(token: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            project_id: project_id.into(),
        }
    }
}
