use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use placement_similarity::loader::{PdfExtractor, TextExtractor};
use placement_similarity::{EngineConfig, PlacementEngine};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "placement-similarity", version, about = "Score resumes against a gold-standard corpus")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rebuild the model from the corpus directory
    Retrain,
    /// Score a resume (stdin when neither --file nor --text is given)
    Predict {
        /// Resume file; `.pdf` is extracted, anything else is read as text
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        #[arg(long)]
        text: Option<String>,
        /// Also print the best-matching reference row and raw similarity
        #[arg(long)]
        verbose: bool,
    },
    /// Print metadata of the persisted model
    Inspect,
}

fn main() -> Result<()> {
    let config = EngineConfig::from_env();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let engine = PlacementEngine::from_config(&config);
    // retrain rebuilds anyway; training first would fit twice
    if !matches!(cli.command, Command::Retrain) {
        if let Some(report) = engine.ensure_trained() {
            info!(report = %json!(report), "initial training finished");
        }
    }

    match cli.command {
        Command::Retrain => {
            let report = engine.retrain();
            println!("{}", serde_json::to_string(&report)?);
        }
        Command::Predict { file, text, verbose } => {
            let resume = read_resume(file.as_deref(), text)?;
            let score = engine.predict(&resume);
            let mut out = json!({ "database_similarity": score });
            if verbose {
                if let Ok(Some(best)) = engine.scorer().explain(&resume) {
                    out["best_row"] = json!(best.row);
                    out["raw_similarity"] = json!(best.similarity);
                }
            }
            println!("{out}");
        }
        Command::Inspect => {
            let bundle = engine
                .load_bundle()
                .with_context(|| format!("loading model from {}", config.model_path.display()))?;
            let out = json!({
                "path": config.model_path.display().to_string(),
                "doc_count": bundle.doc_count,
                "vocab_size": bundle.model.vocab_size(),
                "nnz": bundle.matrix.nnz(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn read_resume(file: Option<&Path>, text: Option<String>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    match file {
        Some(path) => {
            let is_pdf = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
            if is_pdf {
                Ok(PdfExtractor.extract(path)?)
            } else {
                fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
            }
        }
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading resume from stdin")?;
            Ok(buf)
        }
    }
}
