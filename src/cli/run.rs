use std::fmt::Write as FmtWrite;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use crate::app;
use crate::cli::args::Cli;
use crate::config::DashboardConfig;
use crate::data::model::GroupStatistic;
use crate::state::initialize;

pub fn entry() -> Result<()> {
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load_from_file(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(d) = cli.delimiter {
        config.delimiter = d;
    }
    let delimiter = config.delimiter_byte()?;
    let exam_type_column = config.columns.exam_type.clone();

    let state = initialize(config, &cli.data, delimiter)
        .with_context(|| format!("failed to build dashboard from {}", cli.data.display()))?;

    if cli.summary {
        print!("{}", summary_table(&exam_type_column, &state.statistics)?);
        return Ok(());
    }

    let addr = SocketAddr::new(cli.host, cli.port);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    runtime.block_on(app::serve(Arc::new(state), addr))
}

/// Plain-text rendering of the statistics grid.
fn summary_table(exam_type_column: &str, stats: &[GroupStatistic]) -> Result<String> {
    let width = stats
        .iter()
        .map(|s| s.exam_type.chars().count())
        .chain(std::iter::once(exam_type_column.chars().count()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    writeln!(
        out,
        "{:<width$}  {:>8}  {:>8}  {:>8}",
        exam_type_column, "mean", "median", "std"
    )?;
    for s in stats {
        let std = s
            .std
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| "NaN".to_string());
        writeln!(
            out,
            "{:<width$}  {:>8.2}  {:>8.2}  {:>8}",
            s.exam_type, s.mean, s.median, std
        )?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_shows_nan_for_single_record_groups() {
        let stats = vec![
            GroupStatistic {
                exam_type: "Parcial".to_string(),
                count: 2,
                mean: 7.0,
                median: 7.0,
                std: Some(1.41),
            },
            GroupStatistic {
                exam_type: "Final".to_string(),
                count: 1,
                mean: 9.0,
                median: 9.0,
                std: None,
            },
        ];
        let text = summary_table("Tipo_Examen", &stats).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Tipo_Examen      mean    median       std");
        assert_eq!(lines[1], "Parcial          7.00      7.00      1.41");
        assert_eq!(lines[2], "Final            9.00      9.00       NaN");
    }

    #[test]
    fn args_defaults() {
        let cli = Cli::try_parse_from(["grade-dash"]).unwrap();
        assert_eq!(cli.data, std::path::PathBuf::from("notas_1u.csv"));
        assert_eq!(cli.port, 8050);
        assert_eq!(cli.host.to_string(), "127.0.0.1");
        assert!(!cli.summary);
    }
}
