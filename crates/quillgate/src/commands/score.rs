//! Score command: run every quality check on a post.

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use quillgate_core::config::Config;
use quillgate_core::{ContentEvaluator, QualityReport};

use super::read_input_file;

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// File to score (`-` for stdin).
    pub file: Utf8PathBuf,

    /// Minimum passing score (overrides config).
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Content language (only English rules exist today).
    #[arg(long)]
    pub language: Option<String>,
}

/// Score a file and fail when it is below the pass bar.
#[instrument(name = "cmd_score", skip_all, fields(file = %args.file))]
pub fn cmd_score(
    args: ScoreArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, min_score = ?args.min_score, "executing score command");

    let content = read_input_file(&args.file, max_input_bytes)?;
    let language = args.language.as_deref().unwrap_or_else(|| config.language());
    let pass_score = args.min_score.unwrap_or(config.scoring.pass_score);

    let report = ContentEvaluator::new(config.scoring.clone()).evaluate(&content, language);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&args.file.to_string(), &report, pass_score);
    }

    if !report.passes(pass_score) {
        bail!(
            "{} scores {:.1} (min: {:.0}). Address the feedback above and try again.",
            args.file,
            report.score,
            pass_score,
        );
    }
    Ok(())
}

/// Human-readable rendering shared with `revise`.
pub fn print_report(label: &str, report: &QualityReport, pass_score: f64) {
    let verdict = if report.passes(pass_score) {
        "PASS:".green().to_string()
    } else {
        "FAIL:".red().to_string()
    };
    println!(
        "{verdict} {label} scores {:.1} (min: {pass_score:.0})",
        report.score
    );
    println!(
        "{}: {:.1}",
        "Readability".dimmed(),
        report.readability_score
    );
    println!("{}: {}", "Sentiment".dimmed(), report.sentiment);

    if !report.keyword_density.is_empty() {
        let top: Vec<String> = report
            .keyword_density
            .iter()
            .take(5)
            .map(|(word, density)| format!("{word} ({:.1}%)", density * 100.0))
            .collect();
        println!("{}: {}", "Top keywords".dimmed(), top.join(", "));
    }

    if !report.feedback.is_empty() {
        println!();
        println!("{}", "Feedback".bold().underline());
        for line in &report.feedback {
            println!("  {} {line}", "-".yellow());
        }
    }
    if !report.suggestions.is_empty() {
        println!();
        println!("{}", "Suggestions".bold().underline());
        for line in &report.suggestions {
            println!("  {} {line}", "-".cyan());
        }
    }
}
