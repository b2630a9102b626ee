//! Listagem das regras de qualidade de dados de um projeto.
//!
//! Usa o endpoint de busca de assets com paginação: enquanto a resposta
//! trouxer `next`, ele é reenviado como corpo da requisição seguinte.

use serde_json::json;
use tracing::debug;

use super::client::{CpdClient, body_snippet};
use super::error::CpdError;
use super::types::SearchResponse;
use crate::dispatch::WorkItem;

const RULE_ASSET_TYPE: &str = "data_quality_rule";
const PAGE_SIZE: u32 = 20;

/// List every data-quality rule in `project_id` as work items.
pub async fn list_rules(
    client: &CpdClient,
    token: &str,
    project_id: &str,
) -> Result<Vec<WorkItem>, CpdError> {
    let url = client.url(&format!(
        "/v2/asset_types/{RULE_ASSET_TYPE}/search?project_id={project_id}&hide_deprecated_response_fields=true"
    ));
    let mut payload = json!({ "query": "*:*", "limit": PAGE_SIZE });
    let mut items = Vec::new();
    let mut page = 0u32;

    loop {
        page += 1;
        let response = client
            .http()
            .post(&url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(CpdError::Api {
                status: status.as_u16(),
                message: body_snippet(&text),
            });
        }

        let body: SearchResponse =
            serde_json::from_str(&text).map_err(|e| CpdError::Parse(e.to_string()))?;
        debug!(page, results = body.results.len(), "fetched catalog page");

        items.extend(
            body.results
                .into_iter()
                .map(|entry| WorkItem::new(entry.metadata.asset_id, entry.metadata.name)),
        );

        match body.next {
            Some(next) if !next.is_null() => payload = next,
            _ => break,
        }
    }

    Ok(items)
}

/// Keep only rules whose name contains `pattern`, ignoring case.
pub fn filter_by_name(items: Vec<WorkItem>, pattern: Option<&str>) -> Vec<WorkItem> {
    let Some(pattern) = pattern.filter(|p| !p.is_empty()) else {
        return items;
    };
    let needle = pattern.to_lowercase();
    items
        .into_iter()
        .filter(|item| item.display_name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpd::client::ClientSettings;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SEARCH_PATH: &str = "/v2/asset_types/data_quality_rule/search";

    fn client_for(server: &MockServer) -> CpdClient {
        CpdClient::with_base_url(server.uri(), &ClientSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn follows_pagination() {
        let server = MockServer::start().await;
        let next = json!({"query": "*:*", "limit": 20, "bookmark": "page2"});

        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .and(query_param("project_id", "p1"))
            .and(header("authorization", "Bearer tok"))
            .and(body_json(json!({"query": "*:*", "limit": 20})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"metadata": {"asset_id": "a1", "name": "Null check"}},
                    {"metadata": {"asset_id": "a2", "name": "Range check"}}
                ],
                "next": next
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .and(body_json(json!({"query": "*:*", "limit": 20, "bookmark": "page2"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"metadata": {"asset_id": "a3", "name": "Format check"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let items = list_rules(&client_for(&server), "tok", "p1").await.unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "a3"]);
        assert_eq!(items[2].display_name, "Format check");
    }

    #[tokio::test]
    async fn empty_project_yields_no_items() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_rows": 0, "results": []})))
            .mount(&server)
            .await;

        let items = list_rules(&client_for(&server), "tok", "p1").await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn search_failure_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = list_rules(&client_for(&server), "tok", "p1").await.unwrap_err();
        assert!(matches!(err, CpdError::Api { status: 403, .. }));
    }

    #[tokio::test]
    async fn malformed_page_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = list_rules(&client_for(&server), "tok", "p1").await.unwrap_err();
        assert!(matches!(err, CpdError::Parse(_)));
    }

    #[test]
    fn filter_is_case_insensitive() {
        let items = vec![
            WorkItem::new("1", "Null Check Orders"),
            WorkItem::new("2", "Range check"),
        ];
        let kept = filter_by_name(items.clone(), Some("null"));
        assert_eq!(kept, vec![WorkItem::new("1", "Null Check Orders")]);
        assert_eq!(filter_by_name(items.clone(), None), items);
        assert_eq!(filter_by_name(items.clone(), Some("")), items);
    }
}
