//! Configuração do dqrun carregada a partir de `dqrun.toml`.
//!
//! A struct [`DqConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! Variáveis de ambiente (`CPD_HOST`, `PROJECT_ID`, `USERNAME`, `PASSWORD`,
//! `API_KEY`, `AUTH_TYPE`, `CPD_TOKEN`) têm precedência sobre o arquivo.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cpd::{ClientSettings, Credentials};
use crate::dispatch::RunConfig;
use crate::error::DqError;
use crate::store::DEFAULT_PREFIX;

/// Arquivo de configuração procurado no diretório atual.
pub const CONFIG_FILE: &str = "dqrun.toml";

/// Forma de autenticação no endpoint `authorize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    #[default]
    #[serde(alias = "PASSWORD", alias = "Password")]
    Password,
    #[serde(alias = "API_KEY", alias = "ApiKey")]
    ApiKey,
}

impl AuthType {
    // Qualquer valor diferente de "password" seleciona autenticação por API key.
    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("password") {
            AuthType::Password
        } else {
            AuthType::ApiKey
        }
    }
}

/// Configuração de nível superior carregada de `dqrun.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DqConfig {
    /// Host do CPD, com ou sem esquema.
    #[serde(default)]
    pub host: Option<String>,

    /// Projeto cujas regras são disparadas.
    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub auth_type: AuthType,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Token bearer já emitido; dispensa o login.
    #[serde(default)]
    pub token: Option<String>,

    /// Tamanho de cada lote e limite de chamadas simultâneas.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Pausa entre lotes, em segundos. Zero desativa o fatiamento.
    #[serde(default = "default_batch_delay_secs")]
    pub batch_delay_secs: f64,

    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

// Valor padrão para o tamanho do lote: 5.
fn default_batch_size() -> usize {
    5
}

// Valor padrão para a pausa entre lotes: 1s.
fn default_batch_delay_secs() -> f64 {
    1.0
}

fn default_output_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for DqConfig {
    fn default() -> Self {
        Self {
            host: None,
            project_id: None,
            auth_type: AuthType::default(),
            username: None,
            password: None,
            api_key: None,
            token: None,
            batch_size: default_batch_size(),
            batch_delay_secs: default_batch_delay_secs(),
            output_prefix: default_output_prefix(),
            output_dir: default_output_dir(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl DqConfig {
    /// Carrega a configuração de `path`, ou de `dqrun.toml` no diretório atual.
    /// Usa valores padrão se o arquivo implícito não existir; um caminho
    /// explícito inexistente é erro.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(CONFIG_FILE).exists() => Self::from_file(Path::new(CONFIG_FILE))?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = toml::from_str::<DqConfig>(&contents)
            .map_err(DqError::from)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Sobrescreve campos com variáveis de ambiente não vazias.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("CPD_HOST") {
            self.host = Some(v);
        }
        if let Some(v) = get("PROJECT_ID") {
            self.project_id = Some(v);
        }
        if let Some(v) = get("USERNAME") {
            self.username = Some(v);
        }
        if let Some(v) = get("PASSWORD") {
            self.password = Some(v);
        }
        if let Some(v) = get("API_KEY") {
            self.api_key = Some(v);
        }
        if let Some(v) = get("AUTH_TYPE") {
            self.auth_type = AuthType::parse(&v);
        }
        if let Some(v) = get("CPD_TOKEN") {
            self.token = Some(v);
        }
    }

    pub fn host(&self) -> Result<&str, DqError> {
        non_empty(&self.host).ok_or_else(|| DqError::Config("CPD host is required (CPD_HOST)".into()))
    }

    pub fn project_id(&self) -> Result<&str, DqError> {
        non_empty(&self.project_id)
            .ok_or_else(|| DqError::Config("project id is required (PROJECT_ID)".into()))
    }

    /// Valida os parâmetros de ritmo antes de chegarem ao controlador de lotes.
    pub fn run_config(&self) -> Result<RunConfig, DqError> {
        let batch_size = NonZeroUsize::new(self.batch_size)
            .ok_or_else(|| DqError::Config("batch_size must be a positive integer".into()))?;
        if !self.batch_delay_secs.is_finite() || self.batch_delay_secs < 0.0 {
            return Err(DqError::Config(format!(
                "batch_delay_secs must be a non-negative number, got {}",
                self.batch_delay_secs
            )));
        }
        Ok(RunConfig {
            batch_size,
            batch_delay: Duration::from_secs_f64(self.batch_delay_secs),
        })
    }

    /// Resolve as credenciais; um token explícito tem prioridade sobre login.
    pub fn credentials(&self) -> Result<Credentials, DqError> {
        if let Some(token) = non_empty(&self.token) {
            return Ok(Credentials::Token(token.to_string()));
        }
        let username = non_empty(&self.username);
        match self.auth_type {
            AuthType::Password => match (username, non_empty(&self.password)) {
                (Some(u), Some(p)) => Ok(Credentials::Password {
                    username: u.to_string(),
                    password: p.to_string(),
                }),
                _ => Err(DqError::Config(
                    "USERNAME and PASSWORD required for password authentication".into(),
                )),
            },
            AuthType::ApiKey => match (username, non_empty(&self.api_key)) {
                (Some(u), Some(k)) => Ok(Credentials::ApiKey {
                    username: u.to_string(),
                    api_key: k.to_string(),
                }),
                _ => Err(DqError::Config(
                    "USERNAME and API_KEY required for API key authentication".into(),
                )),
            },
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
