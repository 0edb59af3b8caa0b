//! Revise command: score a post and request one rewrite when it fails.

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use quillgate_core::config::Config;
use quillgate_core::{ContentEvaluator, ContentGenerator, GenerationError, test_and_revise};

use super::read_input_file;
use super::score::print_report;

/// Arguments for the `revise` subcommand.
#[derive(Args, Debug)]
pub struct ReviseArgs {
    /// File to score and revise (`-` for stdin).
    pub file: Utf8PathBuf,

    /// Shell command that reads a prompt on stdin and prints content on stdout.
    #[arg(long, short = 'g')]
    pub generator: Option<String>,

    /// Write the revised content here instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<Utf8PathBuf>,

    /// Minimum passing score (overrides config).
    #[arg(long)]
    pub min_score: Option<f64>,
}

/// A generator backed by an external shell command.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    command: String,
}

impl CommandGenerator {
    /// Wrap `command`, run through the platform shell.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn shell(&self) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&self.command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(&self.command);
            cmd
        }
    }
}

impl ContentGenerator for CommandGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        debug!(command = %self.command, prompt_len = prompt.len(), "spawning generator");
        let mut child = self
            .shell()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| GenerationError::Unavailable(format!("{}: {e}", self.command)))?;

        // Feed stdin from a separate thread so a chatty child cannot deadlock us.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| GenerationError::Unavailable("generator stdin closed".to_string()))?;
        let prompt = prompt.to_owned();
        let writer = std::thread::spawn(move || stdin.write_all(prompt.as_bytes()));

        let output = child
            .wait_with_output()
            .map_err(|e| GenerationError::Failed(e.to_string()))?;
        match writer.join() {
            Ok(Ok(())) => {}
            // The child may legitimately exit without reading all of its input.
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(GenerationError::Failed(format!("writing prompt: {e}"))),
            Err(_) => return Err(GenerationError::Failed("prompt writer panicked".to_string())),
        }

        if !output.status.success() {
            return Err(GenerationError::Failed(format!(
                "`{}` exited with {}",
                self.command, output.status
            )));
        }
        String::from_utf8(output.stdout)
            .map_err(|_| GenerationError::Failed("generator output is not UTF-8".to_string()))
    }
}

fn spinner(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})") {
        pb.set_style(style);
    }
    pb.set_message("waiting for generator");
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Run the test-and-revise loop on a file.
#[instrument(name = "cmd_revise", skip_all, fields(file = %args.file))]
pub fn cmd_revise(
    args: ReviseArgs,
    global_json: bool,
    quiet: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let Some(command) = args.generator.clone().or_else(|| config.generator.clone()) else {
        bail!("no generator configured; pass --generator or set `generator` in the config file");
    };
    debug!(file = %args.file, generator = %command, "executing revise command");

    let content = read_input_file(&args.file, max_input_bytes)?;
    let pass_score = args.min_score.unwrap_or(config.scoring.pass_score);
    let evaluator = ContentEvaluator::new(config.scoring.clone());
    let generator = CommandGenerator::new(command);

    let progress = spinner(!global_json && !quiet);
    let outcome = test_and_revise(&evaluator, &generator, &content, config.language(), pass_score);
    progress.finish_and_clear();
    let outcome = outcome.with_context(|| format!("failed to revise {}", args.file))?;

    if let (Some(path), Some(revised)) = (&args.output, &outcome.revised_content) {
        std::fs::write(path.as_std_path(), revised)
            .with_context(|| format!("failed to write {path}"))?;
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_report(&args.file.to_string(), &outcome.original_report, pass_score);
        match (&outcome.revised_content, &outcome.revised_report) {
            (Some(revised), Some(report)) => {
                println!();
                print_report("revision", report, pass_score);
                if let Some(path) = &args.output {
                    println!("{}: {}", "Revised content".dimmed(), path.cyan());
                } else {
                    println!();
                    println!("{}", "Revised content".bold().underline());
                    println!("{revised}");
                }
            }
            _ if outcome.original_report.passes(pass_score) => {
                println!("{}", "No revision needed.".green());
            }
            _ => println!("{}", "Generator returned no content.".yellow()),
        }
    }

    let final_report = outcome.final_report();
    if !final_report.passes(pass_score) {
        bail!(
            "{} still scores {:.1} after revision (min: {:.0})",
            args.file,
            final_report.score,
            pass_score,
        );
    }
    Ok(())
}
