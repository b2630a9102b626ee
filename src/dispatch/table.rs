use serde::Serialize;

use super::outcome::{Outcome, WorkItem};

/// Status written for rows whose trigger call failed.
pub const FAILED_STATUS: &str = "Failed";
/// Error text used when a failure carried no reason.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// One exported row: a work item joined with its outcome.
///
/// Missing job identifiers are `None` and serialize as empty CSV fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    #[serde(rename = "Rule Name")]
    pub name: String,
    #[serde(rename = "Rule ID")]
    pub id: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Job ID")]
    pub job_id: Option<String>,
    #[serde(rename = "Job Run ID")]
    pub job_run_id: Option<String>,
    #[serde(rename = "Success")]
    pub succeeded: bool,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl ResultRow {
    /// Name and id always come from the work item, so failed rows stay identifiable.
    pub fn from_pair(item: &WorkItem, outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Triggered {
                state,
                job_id,
                job_run_id,
                ..
            } => Self {
                name: item.display_name.clone(),
                id: item.id.clone(),
                status: state.clone(),
                job_id: job_id.clone(),
                job_run_id: job_run_id.clone(),
                succeeded: true,
                error: None,
            },
            Outcome::Failed { reason } => Self {
                name: item.display_name.clone(),
                id: item.id.clone(),
                status: FAILED_STATUS.to_string(),
                job_id: None,
                job_run_id: None,
                succeeded: false,
                error: Some(if reason.trim().is_empty() {
                    UNKNOWN_ERROR.to_string()
                } else {
                    reason.clone()
                }),
            },
        }
    }
}

/// Convert dispatch results to rows, preserving input order.
pub fn to_table(results: &[(WorkItem, Outcome)]) -> Vec<ResultRow> {
    results
        .iter()
        .map(|(item, outcome)| ResultRow::from_pair(item, outcome))
        .collect()
}

/// Serialize rows as CSV with a header row.
pub fn to_csv(rows: &[ResultRow]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record([
        "Rule Name",
        "Rule ID",
        "Status",
        "Job ID",
        "Job Run ID",
        "Success",
        "Error",
    ])?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Aggregate counts for the end-of-run report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_rows(rows: &[ResultRow]) -> Self {
        let succeeded = rows.iter().filter(|r| r.succeeded).count();
        Self {
            total: rows.len(),
            succeeded,
            failed: rows.len() - succeeded,
        }
    }

    /// Percentage of rows that triggered successfully; 0 for an empty run.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.succeeded as f64 * 100.0 / self.total as f64
        }
    }
}
