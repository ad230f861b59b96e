mod config;
mod documents;
mod errors;
mod generation;
mod llm_client;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::documents::{read_markup_document, read_text_document, write_letter};
use crate::generation::generator::CoverLetterGenerator;
use crate::llm_client::LlmClient;

/// Générateur de lettre de motivation
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Chemin vers le CV (format .tex)
    #[arg(short = 'c', long = "cv")]
    cv: PathBuf,

    /// Chemin vers l'offre d'emploi (format .txt)
    #[arg(short = 'j', long = "job-offer", alias = "of")]
    job_offer: PathBuf,

    /// Chemins vers les lettres de motivation existantes (format .txt)
    #[arg(short = 'l', long = "letters", alias = "cl", num_args = 1.., required = true)]
    letters: Vec<PathBuf>,

    /// Chemin du fichier de sortie (par défaut : horodaté)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Identifiant du modèle, remplace OPENAI_MODEL
    #[arg(short, long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Credential check happens before any file is read.
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting covergen v{}", env!("CARGO_PKG_VERSION"));

    let output = args.output.unwrap_or_else(default_output_path);
    let model = args.model.unwrap_or_else(|| config.model.clone());

    let llm = LlmClient::new(config.openai_api_key.clone(), &config.api_base)?;
    let generator = CoverLetterGenerator::new(llm, model);
    info!("LLM client initialized (model: {})", generator.model());

    let cv_content = read_markup_document(&args.cv)?;
    let job_offer = read_text_document(&args.job_offer)?;
    let existing_letters = args
        .letters
        .iter()
        .map(|path| read_text_document(path))
        .collect::<Result<Vec<_>, _>>()?;
    info!(
        "Inputs loaded: cv={} chars, job offer={} chars, {} existing letters",
        cv_content.chars().count(),
        job_offer.chars().count(),
        existing_letters.len()
    );

    let letter = generator
        .generate(&cv_content, &job_offer, &existing_letters)
        .await?;

    write_letter(&output, &letter)?;

    println!(
        "Lettre de motivation générée et sauvegardée dans : {}",
        output.display()
    );

    Ok(())
}

/// `lettre_motivation_generee_<YYYY-MM-DD_HH-MM-SS>.txt` in the working directory, local time.
fn default_output_path() -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    PathBuf::from(format!("lettre_motivation_generee_{timestamp}.txt"))
}
