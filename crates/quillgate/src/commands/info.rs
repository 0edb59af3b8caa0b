//! Info command implementation

use clap::Args;
use owo_colors::OwoColorize;
use quillgate_core::config::{Config, ConfigSources, ScoringConfig};
use quillgate_core::prompt::PROMPT_VERSION;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    prompt_version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            prompt_version: PROMPT_VERSION,
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generator: Option<String>,
    scoring: ScoringConfig,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            language: config.language().to_string(),
            input_limit: config.input_limit(),
            generator: config.generator.clone(),
            scoring: config.scoring.clone(),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information and the effective configuration.
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    let pkg = &full_info.package;
    println!("{} {}", pkg.name.bold(), pkg.version.green());
    if !pkg.description.is_empty() {
        println!("{}", pkg.description);
    }
    println!("{}: {}", "Prompt template".dimmed(), pkg.prompt_version);
    if !pkg.license.is_empty() {
        println!("{}: {}", "License".dimmed(), pkg.license);
    }
    if !pkg.repository.is_empty() {
        println!("{}: {}", "Repository".dimmed(), pkg.repository.cyan());
    }

    let cfg = &full_info.config;
    println!();
    println!("{}", "Configuration".bold().underline());
    match cfg.config_file {
        Some(ref path) => println!("{}: {}", "Config file".dimmed(), path.cyan()),
        None => println!("{}: {}", "Config file".dimmed(), "none loaded".yellow()),
    }
    println!("{}: {}", "Log level".dimmed(), cfg.log_level);
    if let Some(ref dir) = cfg.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }
    println!("{}: {}", "Language".dimmed(), cfg.language);
    match cfg.input_limit {
        Some(limit) => println!("{}: {limit} bytes", "Input limit".dimmed()),
        None => println!("{}: {}", "Input limit".dimmed(), "disabled".yellow()),
    }
    match cfg.generator {
        Some(ref g) => println!("{}: {}", "Generator".dimmed(), g),
        None => println!("{}: {}", "Generator".dimmed(), "(not set)".dimmed()),
    }

    let s = &cfg.scoring;
    println!();
    println!("{}", "Quality Gates".bold().underline());
    println!("{}: {:.0}", "Pass score".dimmed(), s.pass_score);
    println!("{}: {}", "Min characters".dimmed(), s.min_content_chars);
    println!("{}: {}", "Min paragraphs".dimmed(), s.min_paragraphs);
    println!(
        "{}: {:.1}-{:.1} words",
        "Avg sentence length".dimmed(),
        s.min_avg_sentence_words,
        s.max_avg_sentence_words
    );
    println!(
        "{}: {:.1}%",
        "Keyword overuse".dimmed(),
        s.keyword_overuse_density * 100.0
    );

    Ok(())
}
