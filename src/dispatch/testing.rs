//! Instrumented executor for dispatcher and pacing tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::executor::RuleExecutor;
use super::outcome::{Outcome, RunContext};

/// Start/end ticks of one call on a shared logical clock.
#[derive(Debug, Clone)]
pub struct Span {
    pub rule_id: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Default)]
pub struct MockExecutor {
    delay: Duration,
    failing: HashSet<String>,
    panicking: HashSet<String>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    clock: AtomicUsize,
    spans: Mutex<Vec<Span>>,
}

impl MockExecutor {
    pub fn with_delay_ms(ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(ms),
            ..Self::default()
        }
    }

    pub fn failing<const N: usize>(mut self, ids: [&str; N]) -> Self {
        self.failing = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn panicking<const N: usize>(mut self, ids: [&str; N]) -> Self {
        self.panicking = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn spans(&self) -> Vec<Span> {
        self.spans.lock().unwrap().clone()
    }
}

impl RuleExecutor for MockExecutor {
    async fn execute(&self, _ctx: &RunContext, rule_id: &str) -> Outcome {
        if self.panicking.contains(rule_id) {
            panic!("simulated executor crash for {rule_id}");
        }

        self.calls.fetch_add(1, Ordering::SeqCst);
        let start = self.clock.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let end = self.clock.fetch_add(1, Ordering::SeqCst);
        self.spans.lock().unwrap().push(Span {
            rule_id: rule_id.to_string(),
            start,
            end,
        });

        if self.failing.contains(rule_id) {
            Outcome::failed(format!("HTTP 500: {rule_id} exploded"))
        } else {
            Outcome::Triggered {
                rule_name: rule_id.to_string(),
                state: "running".into(),
                job_id: Some(format!("job-{rule_id}")),
                job_run_id: None,
            }
        }
    }
}
