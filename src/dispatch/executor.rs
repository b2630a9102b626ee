use std::future::Future;

use tracing::{debug, warn};

use super::outcome::{Outcome, RunContext, UNKNOWN_RULE, UNKNOWN_STATE};
use crate::cpd::CpdClient;
use crate::cpd::client::{body_snippet, error_chain};
use crate::cpd::types::ExecuteResponse;

/// Triggers one rule and reports what happened.
///
/// Implementations must not fail: every error is folded into
/// [`Outcome::Failed`].
pub trait RuleExecutor: Send + Sync {
    fn execute(&self, ctx: &RunContext, rule_id: &str) -> impl Future<Output = Outcome> + Send;
}

/// Executor backed by the CPD data-quality `execute` endpoint.
pub struct HttpRuleExecutor {
    client: CpdClient,
}

impl HttpRuleExecutor {
    pub fn new(client: CpdClient) -> Self {
        Self { client }
    }

    pub fn endpoint(&self, project_id: &str, rule_id: &str) -> String {
        self.client.url(&format!(
            "/data_quality/v3/projects/{project_id}/rules/{rule_id}/execute"
        ))
    }

    async fn trigger(&self, ctx: &RunContext, rule_id: &str) -> Result<Outcome, reqwest::Error> {
        let response = self
            .client
            .http()
            .post(self.endpoint(&ctx.project_id, rule_id))
            .bearer_auth(&ctx.token)
            .header("content-type", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(rule_id, status = status.as_u16(), "rule execution rejected");
            return Ok(Outcome::failed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body_snippet(&body)
            )));
        }

        Ok(match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(parsed) => {
                debug!(rule_id, "rule execution triggered");
                triggered_from(ExecuteResponse::from_value(&parsed))
            }
            Err(e) => {
                warn!(rule_id, error = %e, "unreadable execute response");
                Outcome::failed(format!("failed to parse execute response: {e}"))
            }
        })
    }
}

impl RuleExecutor for HttpRuleExecutor {
    async fn execute(&self, ctx: &RunContext, rule_id: &str) -> Outcome {
        match self.trigger(ctx, rule_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let reason = error_chain(&e);
                warn!(rule_id, error = %reason, "rule execution request failed");
                Outcome::failed(reason)
            }
        }
    }
}

/// Map a successful execute body to a `Triggered` outcome, substituting defaults.
fn triggered_from(resp: ExecuteResponse) -> Outcome {
    Outcome::Triggered {
        rule_name: resp.name.unwrap_or_else(|| UNKNOWN_RULE.to_string()),
        state: resp.state.unwrap_or_else(|| UNKNOWN_STATE.to_string()),
        job_id: resp.job_id,
        job_run_id: resp.job_run_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpd::ClientSettings;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const EXECUTE_PATH: &str = "/data_quality/v3/projects/p1/rules/r1/execute";

    fn executor_for(base_url: String) -> HttpRuleExecutor {
        HttpRuleExecutor::new(CpdClient::with_base_url(base_url, &ClientSettings::default()).unwrap())
    }

    fn ctx() -> RunContext {
        RunContext::new("tok", "p1")
    }

    #[test]
    fn endpoint_is_deterministic() {
        let exec = executor_for("https://cpd.local".into());
        assert_eq!(
            exec.endpoint("proj", "rule"),
            "https://cpd.local/data_quality/v3/projects/proj/rules/rule/execute"
        );
    }

    #[tokio::test]
    async fn success_body_becomes_triggered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EXECUTE_PATH))
            .and(header("authorization", "Bearer tok"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "R1",
                "status": {"state": "completed"},
                "job": {"id": "J1"},
                "job_run": {"id": "JR1"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = executor_for(server.uri()).execute(&ctx(), "r1").await;
        assert_eq!(
            outcome,
            Outcome::Triggered {
                rule_name: "R1".into(),
                state: "completed".into(),
                job_id: Some("J1".into()),
                job_run_id: Some("JR1".into()),
            }
        );
    }

    #[tokio::test]
    async fn missing_fields_use_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EXECUTE_PATH))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({"job": {}})))
            .mount(&server)
            .await;

        let outcome = executor_for(server.uri()).execute(&ctx(), "r1").await;
        assert_eq!(
            outcome,
            Outcome::Triggered {
                rule_name: UNKNOWN_RULE.into(),
                state: UNKNOWN_STATE.into(),
                job_id: None,
                job_run_id: None,
            }
        );
    }

    #[tokio::test]
    async fn server_error_becomes_failed_with_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EXECUTE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("server error"))
            .mount(&server)
            .await;

        match executor_for(server.uri()).execute(&ctx(), "r1").await {
            Outcome::Failed { reason } => {
                assert!(reason.contains("500"), "{reason}");
                assert!(reason.contains("server error"), "{reason}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_success_body_becomes_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EXECUTE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let outcome = executor_for(server.uri()).execute(&ctx(), "r1").await;
        assert!(matches!(outcome, Outcome::Failed { .. }));
    }

    #[tokio::test]
    async fn connection_error_becomes_failed() {
        // Nothing listens on the discard port.
        let outcome = executor_for("http://127.0.0.1:9".into())
            .execute(&ctx(), "r1")
            .await;
        match outcome {
            Outcome::Failed { reason } => {
                assert!(reason.starts_with("error sending request"), "{reason}");
                assert!(reason.to_lowercase().contains("connect"), "{reason}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn scalar_status_still_counts_as_triggered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EXECUTE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "R1",
                "status": "running"
            })))
            .mount(&server)
            .await;

        let outcome = executor_for(server.uri()).execute(&ctx(), "r1").await;
        assert_eq!(
            outcome,
            Outcome::Triggered {
                rule_name: "R1".into(),
                state: UNKNOWN_STATE.into(),
                job_id: None,
                job_run_id: None,
            }
        );
    }

    #[tokio::test]
    async fn numeric_job_ids_are_rendered_as_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(EXECUTE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": {"state": "queued"},
                "job": {"id": 123},
                "job_run": {"id": 456}
            })))
            .mount(&server)
            .await;

        let outcome = executor_for(server.uri()).execute(&ctx(), "r1").await;
        assert_eq!(
            outcome,
            Outcome::Triggered {
                rule_name: UNKNOWN_RULE.into(),
                state: "queued".into(),
                job_id: Some("123".into()),
                job_run_id: Some("456".into()),
            }
        );
    }
}
