mod cli;
mod config;
mod cpd;
mod dispatch;
mod error;
mod store;
mod ui;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use config::DqConfig;
use cpd::{CpdClient, acquire_token, catalog};
use dispatch::{HttpRuleExecutor, RunContext, RunSummary, run_paced, to_csv, to_table};
use store::{DirectoryStore, ResultStore, result_filename};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "dqrun=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = DqConfig::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.host = Some(host);
    }
    if let Some(project_id) = cli.project_id {
        config.project_id = Some(project_id);
    }

    match cli.command {
        Command::List { filter } => {
            let (client, ctx) = connect(&config).await?;
            let rules = catalog::list_rules(&client, &ctx.token, &ctx.project_id)
                .await
                .context("failed to list data quality rules")?;
            ui::print_rules(&catalog::filter_by_name(rules, filter.as_deref()));
            Ok(())
        }
        Command::Run {
            filter,
            batch_size,
            delay,
            prefix,
            output_dir,
            no_save,
        } => {
            if let Some(batch_size) = batch_size {
                config.batch_size = batch_size;
            }
            if let Some(delay) = delay {
                config.batch_delay_secs = delay;
            }
            if let Some(prefix) = prefix {
                config.output_prefix = prefix;
            }
            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }
            run_rules(&config, filter.as_deref(), !no_save).await
        }
    }
}

/// Build the HTTP client and resolve the token and project for this run.
async fn connect(config: &DqConfig) -> Result<(CpdClient, RunContext)> {
    let client = CpdClient::new(config.host()?, &config.client_settings())?;
    let project_id = config.project_id()?.to_string();
    let credentials = config.credentials()?;
    let token = acquire_token(&client, &credentials)
        .await
        .context("failed to authenticate with CPD")?;
    Ok((client, RunContext::new(token, project_id)))
}

async fn run_rules(config: &DqConfig, filter: Option<&str>, save: bool) -> Result<()> {
    let run_config = config.run_config()?;
    let (client, ctx) = connect(config).await?;

    let rules = catalog::list_rules(&client, &ctx.token, &ctx.project_id)
        .await
        .context("failed to list data quality rules")?;
    let rules = catalog::filter_by_name(rules, filter);
    if rules.is_empty() {
        println!("No data quality rules found in project {}", ctx.project_id);
        return Ok(());
    }
    info!(
        rules = rules.len(),
        batch_size = run_config.batch_size.get(),
        delay_secs = run_config.batch_delay.as_secs_f64(),
        "triggering rules"
    );

    let started = Instant::now();
    let progress = ui::RunProgress::start(rules.len());
    let executor = Arc::new(HttpRuleExecutor::new(client));
    let results = run_paced(executor, Arc::new(ctx), &rules, run_config, &progress).await;
    progress.finish();
    info!(
        failed = results.iter().filter(|(_, o)| !o.is_triggered()).count(),
        "dispatch finished"
    );

    let rows = to_table(&results);
    ui::print_table(&rows);
    ui::print_summary(&RunSummary::from_rows(&rows), started.elapsed());

    if save {
        let bytes = to_csv(&rows).map_err(error::DqError::from)?;
        let filename = result_filename(&config.output_prefix, &Local::now());
        let path = DirectoryStore::new(config.output_dir.clone())
            .save(&filename, &bytes)
            .with_context(|| format!("failed to save {filename}"))?;
        println!("Results saved to {}", path.display());
    }

    Ok(())
}
