mod dispatcher;
mod executor;
mod outcome;
mod pacing;
mod table;

#[cfg(test)]
mod testing;

pub use dispatcher::Progress;
pub use executor::HttpRuleExecutor;
pub use outcome::{Outcome, RunConfig, RunContext, WorkItem};
pub use pacing::run_paced;
pub use table::{ResultRow, RunSummary, to_csv, to_table};
