//! Persistência do CSV de resultados.
//!
//! O [`ResultStore`] recebe um nome de arquivo e os bytes já serializados.
//! A implementação [`DirectoryStore`] grava em um diretório local, criado
//! sob demanda.

use std::path::PathBuf;

use chrono::{DateTime, TimeZone};
use tracing::info;

/// Prefixo padrão dos arquivos de resultado.
pub const DEFAULT_PREFIX: &str = "dq_run";

/// Destino dos resultados de uma execução.
pub trait ResultStore {
    /// Grava `bytes` sob `filename` e devolve o caminho final.
    fn save(&self, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf>;
}

/// Store que grava arquivos em um diretório local.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ResultStore for DirectoryStore {
    fn save(&self, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "saved results");
        Ok(path)
    }
}

/// Monta `{prefix}_{YYYY-MM-DD-HH-MM-SS}.csv`.
pub fn result_filename<Tz: TimeZone>(prefix: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{prefix}_{}.csv", at.format("%Y-%m-%d-%H-%M-%S"))
}
