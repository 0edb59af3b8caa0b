//! Stats command: summarize saved JSON reports.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use quillgate_core::QualityReport;
use quillgate_core::analytics::summarize;

use super::read_input_file;

/// Arguments for the `stats` subcommand.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Report files written by `quillgate score --json`.
    #[arg(required = true)]
    pub reports: Vec<Utf8PathBuf>,
}

/// Load reports and print their summary.
#[instrument(name = "cmd_stats", skip_all, fields(files = args.reports.len()))]
pub fn cmd_stats(
    args: StatsArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(files = args.reports.len(), "executing stats command");

    let reports = args
        .reports
        .iter()
        .map(|path| {
            let text = read_input_file(path, max_input_bytes)?;
            serde_json::from_str::<QualityReport>(&text)
                .with_context(|| format!("{path} is not a quality report"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let summary = summarize(&reports);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}: {}", "Reports".dimmed(), summary.count);
    println!("{}: {:.1}", "Average score".dimmed(), summary.average_score);
    println!(
        "{}: {:.1}",
        "Average readability".dimmed(),
        summary.average_readability_score
    );
    let top = summary.top_feedback();
    if !top.is_empty() {
        println!();
        println!("{}", "Common feedback".bold().underline());
        for (line, count) in top {
            println!("  {:>4}  {line}", count.yellow());
        }
    }
    Ok(())
}
