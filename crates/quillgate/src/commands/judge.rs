//! Judge command: turn a model-judge reply into a structured evaluation.

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use quillgate_core::evaluation::{evaluation_prompt, parse_model_evaluation};

use super::read_input_file;

/// Arguments for the `judge` subcommand.
#[derive(Args, Debug)]
pub struct JudgeArgs {
    /// Reply file to parse (`-` for stdin). With `--prompt`, the post to be judged.
    pub file: Utf8PathBuf,

    /// Print the judge prompt for FILE instead of parsing a reply.
    #[arg(long)]
    pub prompt: bool,
}

/// Parse a judge reply, or print the judge prompt.
#[instrument(name = "cmd_judge", skip_all, fields(file = %args.file))]
pub fn cmd_judge(
    args: JudgeArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, prompt = args.prompt, "executing judge command");

    let text = read_input_file(&args.file, max_input_bytes)?;

    if args.prompt {
        println!("{}", evaluation_prompt(&text));
        return Ok(());
    }

    let evaluation = parse_model_evaluation(&text);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        println!("{}: {:.0}", "Judge score".bold(), evaluation.score);
        for line in &evaluation.feedback {
            println!("  {} {line}", "-".yellow());
        }
        for line in &evaluation.suggestions {
            println!("  {} {line}", "+".cyan());
        }
    }

    if evaluation.is_unparsed() {
        bail!("{} does not contain a valid evaluation", args.file);
    }
    Ok(())
}
