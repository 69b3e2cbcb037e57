// SPDX-License-Identifier: MIT OR Apache-2.0
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jetstream_error::{ApiErrorBody, ApiResponse, ClassifierConfig, JetStreamErrorDto};
use schemars::schema_for;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "xtask", version, about = "Repo maintenance tasks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate JSON Schemas for the reply, error body, error DTO and config types.
    Schema {
        /// Output directory.
        #[arg(long, default_value = "contracts/schemas")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Schema { out_dir } => schema(out_dir),
    }
}

fn schema(out_dir: PathBuf) -> Result<()> {
    std::fs::create_dir_all(&out_dir).context("create schema output dir")?;

    write_schema(&out_dir.join("api_error_body.schema.json"), &schema_for!(ApiErrorBody))?;
    write_schema(&out_dir.join("api_response.schema.json"), &schema_for!(ApiResponse))?;
    write_schema(
        &out_dir.join("jetstream_error.schema.json"),
        &schema_for!(JetStreamErrorDto),
    )?;
    write_schema(
        &out_dir.join("classifier_config.schema.json"),
        &schema_for!(ClassifierConfig),
    )?;

    eprintln!("wrote schemas to {}", out_dir.display());
    Ok(())
}

fn write_schema(path: &Path, schema: &schemars::Schema) -> Result<()> {
    let s = serde_json::to_string_pretty(schema)?;
    std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
