use std::time::Duration;

use reqwest::Client;

use super::error::CpdError;

/// Max characters of a response body kept in diagnostics.
pub const BODY_SNIPPET_LEN: usize = 2000;

/// Connection settings shared by every CPD call.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// HTTP client bound to one CPD host.
///
/// Certificate verification is disabled: CPD installs are typically served
/// with self-signed or internally issued certificates.
#[derive(Debug, Clone)]
pub struct CpdClient {
    http: Client,
    base_url: String,
}

impl CpdClient {
    /// Create a client for `host`, which may be a bare hostname or a full URL.
    pub fn new(host: &str, settings: &ClientSettings) -> Result<Self, CpdError> {
        Self::with_base_url(base_url_for(host), settings)
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(base_url: String, settings: &ClientSettings) -> Result<Self, CpdError> {
        let http = Client::builder()
            .danger_accept_invalid_certs(true)
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Join an absolute API path (starting with `/`) onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Normalize a configured host into a base URL, defaulting to `https://`.
pub fn base_url_for(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

/// Truncate a response body for diagnostics without splitting a character.
pub fn body_snippet(body: &str) -> String {
    match body.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((idx, _)) => format!("{}... (truncated)", &body[..idx]),
        None => body.to_string(),
    }
}

/// Render an error with its `source()` chain, joined by `": "`.
///
/// reqwest's top-level message ("error sending request for url ...") hides
/// the cause (refused connection, DNS, TLS, timeout) in the chain.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let msg = cause.to_string();
        if !out.contains(&msg) {
            out.push_str(": ");
            out.push_str(&msg);
        }
        source = cause.source();
    }
    out
}
