// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jetstream_error::Classifier;
use jetstream_error::config::{load_config, validate_config};
use std::io::Read;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "jserr", version, about = "JetStream error taxonomy inspector")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging.
    #[arg(long, global = true)]
    debug: bool,

    /// Print the error as JSON instead of its rendered message.
    #[arg(long, global = true)]
    json: bool,

    /// TOML file with classifier settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a JSON error body or API reply (`-` reads stdin).
    ClassifyBody {
        /// JSON text.
        input: String,
    },

    /// Classify reply headers. Without --header the reply has no headers.
    ClassifyHeaders {
        /// Header as NAME=VALUE. Can be repeated.
        #[arg(long = "header")]
        headers: Vec<String>,
    },

    /// Render a locally raised error.
    Render {
        /// Kind tag (e.g. `no_keys`) or name (e.g. `NoKeysError`).
        kind: String,

        /// Optional description (the trailing message for `key_not_found`).
        #[arg(long)]
        description: Option<String>,

        /// Stream sequence to restart from (`consumer_sequence_mismatch`).
        #[arg(long)]
        resume: Option<u64>,

        /// Consumer sequence received (`consumer_sequence_mismatch`).
        #[arg(long)]
        current: Option<u64>,

        /// Consumer sequence last delivered (`consumer_sequence_mismatch`).
        #[arg(long)]
        last: Option<u64>,
    },

    /// List every error kind with its capability tags.
    Kinds,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let filter = if cli.debug {
        EnvFilter::new("jetstream=debug")
    } else {
        let level = config.log_level.as_deref().unwrap_or("info");
        EnvFilter::new(format!("jetstream={level}"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    for warning in validate_config(&config)? {
        warn!(target: "jetstream.cli", "{warning}");
    }

    let err = match cli.command {
        Commands::ClassifyBody { input } => {
            let input = if input == "-" {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("failed to read stdin")?;
                buf
            } else {
                input
            };
            commands::classify_body(&input)?
        }
        Commands::ClassifyHeaders { headers } => {
            commands::classify_headers(&Classifier::new(config), &headers)?
        }
        Commands::Render {
            kind,
            description,
            resume,
            current,
            last,
        } => commands::render(
            &kind,
            description,
            commands::Sequences {
                resume,
                current,
                last,
            },
        )?,
        Commands::Kinds => {
            print!("{}", commands::kinds_table());
            return Ok(());
        }
    };

    println!("{}", commands::format_error(&err, cli.json)?);
    Ok(())
}
