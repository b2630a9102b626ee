//! Interface de linha de comando do dqrun baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (run, list)
//! e flags globais (--config, --host, --project-id, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// dqrun — Dispara regras de qualidade de dados do Cloud Pak for Data em lotes.
#[derive(Debug, Parser)]
#[command(name = "dqrun", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração (padrão: ./dqrun.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Host do CPD; sobrescreve CPD_HOST e o arquivo.
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Projeto alvo; sobrescreve PROJECT_ID e o arquivo.
    #[arg(long, global = true)]
    pub project_id: Option<String>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Dispara todas as regras do projeto e exporta os resultados em CSV.
    Run {
        /// Dispara apenas regras cujo nome contém este texto.
        #[arg(long)]
        filter: Option<String>,

        /// Regras por lote e limite de chamadas simultâneas.
        #[arg(long)]
        batch_size: Option<usize>,

        /// Pausa entre lotes, em segundos (0 desativa o fatiamento).
        #[arg(long)]
        delay: Option<f64>,

        /// Prefixo do arquivo CSV gerado.
        #[arg(long)]
        prefix: Option<String>,

        /// Diretório onde o CSV é gravado.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Não grava o CSV; apenas exibe a tabela.
        #[arg(long, default_value_t = false)]
        no_save: bool,
    },

    /// Lista as regras que seriam disparadas.
    List {
        /// Lista apenas regras cujo nome contém este texto.
        #[arg(long)]
        filter: Option<String>,
    },
}
