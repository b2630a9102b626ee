//! Tipos de erro para os colaboradores HTTP do Cloud Pak for Data.
//!
//! Estes erros só ocorrem fora do núcleo de disparo (autenticação, catálogo)
//! e são fatais para a execução. Falhas de regras individuais nunca viram
//! [`CpdError`]; elas são registradas como `Outcome::Failed`.

use thiserror::Error;

/// Erros ao interagir com a API do CPD.
#[derive(Debug, Error)]
pub enum CpdError {
    /// O servidor respondeu com status diferente de sucesso.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Falha de rede subjacente (DNS, conexão recusada, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// O corpo da resposta não tem o formato esperado.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// A resposta de autenticação não trouxe um token.
    #[error("authorize response did not contain a token")]
    MissingToken,
}
