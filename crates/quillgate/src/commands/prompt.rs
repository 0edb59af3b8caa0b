//! Prompt command: print a blog-post generation prompt.

use clap::Args;
use serde::Serialize;
use tracing::{debug, instrument};

use quillgate_core::prompt::{PROMPT_VERSION, PromptParams, generate_prompt};

/// Arguments for the `prompt` subcommand.
#[derive(Args, Debug)]
pub struct PromptArgs {
    /// What the post is about.
    #[arg(long)]
    pub topic: String,

    /// Writing style (Persuasive, Narrative, Informative, Descriptive, Expository).
    #[arg(long, default_value = "Informative")]
    pub style: String,

    /// Audience (General Public, Technical/Expert, Academic, Business).
    #[arg(long, default_value = "General Public")]
    pub audience: String,

    /// Formality (Formal, Semi-formal, Informal).
    #[arg(long, default_value = "Semi-formal")]
    pub formality: String,

    /// Length (Short, Medium, Long).
    #[arg(long, default_value = "Medium")]
    pub length: String,

    /// Extra instructions or keywords.
    #[arg(long)]
    pub instructions: Option<String>,
}

impl From<PromptArgs> for PromptParams {
    fn from(args: PromptArgs) -> Self {
        Self {
            topic: args.topic,
            writing_style: args.style,
            audience_type: args.audience,
            formality_level: args.formality,
            length_detail: args.length,
            additional_instructions: args.instructions.unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct PromptOutput<'a> {
    version: &'static str,
    prompt: &'a str,
}

/// Print the prompt for the given parameters.
#[instrument(name = "cmd_prompt", skip_all)]
pub fn cmd_prompt(args: PromptArgs, global_json: bool) -> anyhow::Result<()> {
    debug!(topic = %args.topic, "executing prompt command");

    let params = PromptParams::from(args);
    let prompt = generate_prompt(&params);

    if global_json {
        let output = PromptOutput {
            version: PROMPT_VERSION,
            prompt: &prompt,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{prompt}");
    }
    Ok(())
}
