use tracing::debug;

use super::client::{CpdClient, body_snippet};
use super::error::CpdError;
use super::types::{AuthorizeRequest, AuthorizeResponse};

const AUTHORIZE_PATH: &str = "/icp4d-api/v1/authorize";

/// How the bearer token for a run is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A token issued elsewhere, used as-is.
    Token(String),
    Password { username: String, password: String },
    ApiKey { username: String, api_key: String },
}

/// Obtain a bearer token, calling the authorize endpoint unless one was supplied.
pub async fn acquire_token(client: &CpdClient, credentials: &Credentials) -> Result<String, CpdError> {
    let req = match credentials {
        Credentials::Token(token) => {
            debug!("using pre-issued bearer token");
            return Ok(token.clone());
        }
        Credentials::Password { username, password } => AuthorizeRequest {
            username: username.clone(),
            password: Some(password.clone()),
            api_key: None,
        },
        Credentials::ApiKey { username, api_key } => AuthorizeRequest {
            username: username.clone(),
            password: None,
            api_key: Some(api_key.clone()),
        },
    };

    debug!(username = %req.username, "requesting bearer token");
    let response = client
        .http()
        .post(client.url(AUTHORIZE_PATH))
        .json(&req)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(CpdError::Api {
            status: status.as_u16(),
            message: body_snippet(&message),
        });
    }

    let body = response.json::<AuthorizeResponse>().await?;
    match body.token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(CpdError::MissingToken),
    }
}
