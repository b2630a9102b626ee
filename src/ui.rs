//! Interface de terminal do dqrun — barra de progresso e saída colorida.
//!
//! Usa as crates `indicatif` para a barra de progresso e `console` para
//! estilização com cores. O [`RunProgress`] acompanha visualmente o disparo
//! das regras; as funções `print_*` exibem a tabela final e o resumo.

use std::time::Duration;

use console::{Style, truncate_str};
use indicatif::{ProgressBar, ProgressStyle};

use crate::dispatch::{Outcome, Progress, ResultRow, RunSummary, WorkItem};

/// Largura máxima da coluna de erro na tabela.
const ERROR_WIDTH: usize = 60;

/// Barra de progresso atualizada a cada regra concluída.
pub struct RunProgress {
    pb: ProgressBar,
    red: Style,
}

impl RunProgress {
    pub fn start(total: usize) -> Self {
        let pb = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style.progress_chars("=> "));
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            pb,
            red: Style::new().red().bold(),
        }
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl Progress for RunProgress {
    fn on_outcome(&self, item: &WorkItem, outcome: &Outcome) {
        if let Outcome::Failed { reason } = outcome {
            self.pb.println(format!(
                "  {} {}: {}",
                self.red.apply_to("✗"),
                item.display_name,
                truncate_str(reason, ERROR_WIDTH, "…")
            ));
        }
        self.pb.inc(1);
    }

    fn on_batch(&self, index: usize, total: usize, size: usize) {
        self.pb.set_message(format!("batch {index}/{total} ({size} rules)"));
    }
}

/// Imprime as regras encontradas no catálogo.
pub fn print_rules(items: &[WorkItem]) {
    let dim = Style::new().dim();
    for item in items {
        println!("  {}  {}", dim.apply_to(&item.id), item.display_name);
    }
    println!("{} rule(s)", items.len());
}

/// Imprime a tabela de resultados com sucesso em verde e falha em vermelho.
pub fn print_table(rows: &[ResultRow]) {
    let green = Style::new().green().bold();
    let red = Style::new().red().bold();
    let name_width = rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(9, 40);

    println!(
        "    {:<name_width$}  {:<12}  {:<36}  {}",
        "Rule Name", "Status", "Job Run ID", "Error"
    );
    for row in rows {
        let mark = if row.succeeded {
            green.apply_to("✓")
        } else {
            red.apply_to("✗")
        };
        println!(
            "  {mark} {:<name_width$}  {:<12}  {:<36}  {}",
            truncate_str(&row.name, name_width, "…"),
            row.status,
            row.job_run_id.as_deref().unwrap_or("-"),
            truncate_str(row.error.as_deref().unwrap_or(""), ERROR_WIDTH, "…"),
        );
    }
}

/// Imprime o resumo final da execução.
pub fn print_summary(summary: &RunSummary, elapsed: Duration) {
    let bold = Style::new().bold();
    let green = Style::new().green();
    let red = Style::new().red();
    println!();
    println!("{}", bold.apply_to("─── Run Summary ───"));
    println!("  Rules triggered: {}", summary.total);
    println!("  Succeeded:       {}", green.apply_to(summary.succeeded));
    println!("  Failed:          {}", red.apply_to(summary.failed));
    println!("  Success rate:    {:.1}%", summary.success_rate());
    println!("  Duration:        {:.1}s", elapsed.as_secs_f64());
}
