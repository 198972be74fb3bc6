//! # Docglot CLI (`docglot`)
//!
//! The `docglot` binary translates documents (`.docx`, `.pdf`, `.txt`) into
//! another language using OpenAI chat models, writing the result as a new
//! `.docx` with paragraph styles preserved.
//!
//! ## Usage
//!
//! ```bash
//! docglot --config ./config/docglot.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docglot translate <file> --to <language>` | Translate a document and write a new `.docx` |
//! | `docglot languages` | List supported languages |
//!
//! ## Examples
//!
//! ```bash
//! # Translate a Word document to French
//! docglot translate report.docx --to French
//!
//! # Translate a PDF, auto-detecting the source language
//! docglot translate paper.pdf --to Spanish --output out.docx
//!
//! # Plain text with an explicit source language and terminology hints
//! docglot translate notes.txt --to German --from English --hints "keep product names untranslated"
//!
//! # Show the chunk plan without calling the API
//! docglot translate book.docx --to Japanese --dry-run
//! ```

mod chunk;
mod config;
mod extract;
mod languages;
mod models;
mod pipeline;
mod progress;
mod reassemble;
mod translate;
mod writer;

use anyhow::bail;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Docglot CLI — translate documents with OpenAI chat models.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/docglot.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "docglot",
    about = "Docglot — translate .docx, .pdf, and .txt documents with OpenAI chat models",
    version,
    long_about = "Docglot extracts paragraph text from .docx, .pdf, and .txt files, translates it \
    chunk by chunk through the OpenAI chat completions API, and writes a new .docx that preserves \
    paragraph styles."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/docglot.toml`. When the file does not exist,
    /// built-in defaults are used. Model, chunking, and concurrency
    /// settings are read from this file.
    #[arg(long, global = true, default_value = "./config/docglot.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Translate a document into another language.
    ///
    /// Extracts paragraphs from the input file, packs them into word-budgeted
    /// chunks, translates each chunk, and writes a `.docx` next to the input
    /// (or to `--output`). Requires the `OPENAI_API_KEY` environment variable
    /// unless `--dry-run` is given.
    Translate {
        /// Path to the input document (`.docx`, `.pdf`, or `.txt`).
        input: PathBuf,

        /// Target language (e.g. `French`). Defaults to the configured
        /// default target language.
        #[arg(long)]
        to: Option<String>,

        /// Source language, or `auto` to let the model detect it.
        #[arg(long, default_value = "auto")]
        from: String,

        /// Output path for the translated `.docx`.
        /// Defaults to `translated_<input-stem>.docx` next to the input.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Override the chunk word budget from config.
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Extra instructions for the model (tone, terminology, names to
        /// keep untranslated).
        #[arg(long)]
        hints: Option<String>,

        /// Override the model from config (e.g. `gpt-4.1`).
        #[arg(long)]
        model: Option<String>,

        /// Show the chunk plan without calling the translation API.
        #[arg(long)]
        dry_run: bool,

        /// Progress output: `auto`, `human`, `json`, or `off`.
        #[arg(long, default_value = "auto")]
        progress: String,
    },

    /// List supported target and source languages.
    Languages,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", user_facing_message(&e));
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Languages = &cli.command {
        for language in languages::SUPPORTED_LANGUAGES {
            println!("{}", language);
        }
        return Ok(());
    }

    let mut cfg = if cli.config.exists() {
        config::load_config(&cli.config)?
    } else {
        config::Config::minimal()
    };

    match cli.command {
        Commands::Translate {
            input,
            to,
            from,
            output,
            chunk_size,
            hints,
            model,
            dry_run,
            progress,
        } => {
            if let Some(words) = chunk_size {
                cfg.chunking.max_words = words;
            }
            if let Some(model) = model {
                cfg.translation.model = model;
            }
            config::validate(&cfg)?;

            let target_name =
                to.unwrap_or_else(|| cfg.translation.default_target_language.clone());
            let target = match languages::canonical(&target_name) {
                Some(name) => name,
                None => bail!(
                    "unsupported target language '{}'; run `docglot languages` for the full list",
                    target_name
                ),
            };
            let source = if languages::is_auto(&from) {
                None
            } else {
                match languages::canonical(&from) {
                    Some(name) => Some(name.to_string()),
                    None => bail!(
                        "unsupported source language '{}'; run `docglot languages` for the full list",
                        from
                    ),
                }
            };

            let reporter = progress::ProgressMode::parse(&progress)?.reporter();
            let job = pipeline::TranslateJob {
                input,
                output,
                target_language: target.to_string(),
                source_language: source,
                hints,
                dry_run,
            };
            pipeline::run_translate(&cfg, &job, reporter.as_ref()).await?;
        }
        Commands::Languages => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}

/// Map pipeline errors to messages a user can act on.
fn user_facing_message(err: &anyhow::Error) -> String {
    if let Some(e) = err.downcast_ref::<extract::ExtractError>() {
        return match e {
            extract::ExtractError::Encrypted => {
                "this document is password-protected; unlock it and run the translation again"
                    .to_string()
            }
            extract::ExtractError::UnsupportedFormat(ext) => format!(
                "unsupported document format: {}; supported formats are .docx, .pdf, and .txt",
                ext
            ),
            other => other.to_string(),
        };
    }
    if let Some(e) = err.downcast_ref::<translate::TranslateError>() {
        return format!("translation failed: {}; no output was written", e);
    }
    format!("{:#}", err)
}
