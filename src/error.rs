use thiserror::Error;

use crate::cpd::CpdError;

#[derive(Debug, Error)]
pub enum DqError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("CPD error: {0}")]
    Cpd(#[from] CpdError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
