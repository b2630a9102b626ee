//! Tipos de dados das respostas da API do Cloud Pak for Data.
//!
//! Todos os campos das respostas são opcionais ou têm default: o serviço
//! varia a forma do corpo entre versões e a ferramenta precisa tolerar isso.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Campos extraídos do corpo retornado por `POST .../rules/{id}/execute`.
///
/// A extração é feita sobre um [`Value`]: um campo ausente, nulo ou de tipo
/// inesperado vira `None` em vez de invalidar o corpo inteiro.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteResponse {
    /// Nome da regra executada.
    pub name: Option<String>,
    /// Estado inicial da execução (`status.state`).
    pub state: Option<String>,
    /// Job criado para a execução (`job.id`).
    pub job_id: Option<String>,
    /// Execução (run) do job disparada (`job_run.id`).
    pub job_run_id: Option<String>,
}

impl ExecuteResponse {
    pub fn from_value(value: &Value) -> Self {
        Self {
            name: value.get("name").and_then(Value::as_str).map(String::from),
            state: value
                .get("status")
                .and_then(|s| s.get("state"))
                .and_then(Value::as_str)
                .map(String::from),
            job_id: nested_id(value, "job"),
            job_run_id: nested_id(value, "job_run"),
        }
    }
}

// Identificadores numéricos são aceitos e convertidos para texto.
fn nested_id(value: &Value, key: &str) -> Option<String> {
    match value.get(key)?.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Corpo da requisição para `/icp4d-api/v1/authorize`.
///
/// Exatamente um entre `password` e `api_key` é enviado.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizeRequest {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizeResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Uma página do endpoint de busca de assets.
///
/// `next` é repassado literalmente como corpo da próxima requisição.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<AssetEntry>,
    #[serde(default)]
    pub next: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetEntry {
    pub metadata: AssetMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetMetadata {
    pub asset_id: String,
    #[serde(default)]
    pub name: String,
}
