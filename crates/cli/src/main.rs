use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use examscope_extract::PdfExtractor;
use examscope_guide::{
    ExplanationGenerator, GuideAnalysis, OutputGenerator, TopicAnalyzer, topic_paths,
};
use examscope_indexer::DocumentIndexer;
use examscope_llm::{LlmClient, LlmConfig};
use examscope_retrieval::Retriever;
use examscope_store::{Embedder, EmbeddingConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "examscope")]
#[command(about = "Generate study guides from exam PDFs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze exam PDFs and produce a study guide
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Directory containing exam PDFs
    #[arg(long)]
    exams_dir: PathBuf,

    /// Directory of reference PDFs to index for retrieval context
    #[arg(long)]
    context_dir: Option<PathBuf>,

    /// Output path for the generated guide
    #[arg(long, default_value = "study_guide.pdf")]
    output: PathBuf,

    /// Delete and rebuild the reference index before analyzing
    #[arg(long)]
    rebuild_index: bool,

    /// Directory for the persisted vector index
    #[arg(long, default_value = ".examscope_db")]
    db_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // ORT is extremely noisy at info level
    if !cli.verbose {
        builder.filter_module("ort", log::LevelFilter::Off);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Analyze(args) => run_analyze(args).await,
    }
}

async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let llm_config = LlmConfig::from_env().context("LLM configuration error")?;
    let llm = LlmClient::new(llm_config).context("Failed to build LLM client")?;

    let retriever = match &args.context_dir {
        Some(context_dir) => Some(
            index_context(context_dir, &args.db_dir, args.rebuild_index)
                .await
                .context("Failed to index reference material")?,
        ),
        None => {
            log::info!("No context directory given, skipping retrieval index");
            None
        }
    };

    let extractor = PdfExtractor::new();
    let exam_docs = extractor
        .extract_directory(&args.exams_dir)
        .with_context(|| format!("Failed to extract exams from {}", args.exams_dir.display()))?;
    if exam_docs.is_empty() {
        anyhow::bail!("No exam PDFs found in {}", args.exams_dir.display());
    }
    eprintln!("Extracted {} exam(s)", exam_docs.len());

    let analyzer = TopicAnalyzer::new(&llm);
    let topics = analyzer
        .analyze_exams(&exam_docs)
        .await
        .context("Topic analysis failed")?;

    let generator = ExplanationGenerator::new(&llm, retriever.as_ref());
    let paths = topic_paths(&topics);
    let progress = ProgressBar::new(paths.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("Invalid progress template")?,
    );

    let mut explanations = HashMap::new();
    for (path, topic) in paths {
        progress.set_message(path.clone());
        let explanation = generator
            .generate_explanation(&path, topic, &exam_docs)
            .await
            .with_context(|| format!("Failed to explain '{path}'"))?;
        explanations.insert(path, explanation);
        progress.inc(1);
    }
    progress.finish_with_message("explanations done");

    let analysis = GuideAnalysis {
        topics,
        explanations,
        source_exams: exam_docs.iter().map(|d| d.filename.clone()).collect(),
    };

    let written = OutputGenerator::write_pdf(&analysis, &args.output)
        .await
        .context("Failed to write study guide")?;
    eprintln!("Study guide written to {}", written.display());
    Ok(())
}

/// Index the reference corpus and return a retriever over the same store.
async fn index_context(context_dir: &Path, db_dir: &Path, rebuild: bool) -> Result<Retriever> {
    let embedding_config = EmbeddingConfig::from_env().context("Embedding configuration error")?;
    let embedder = Embedder::new(embedding_config)
        .await
        .context("Failed to initialize embeddings")?;

    let indexer = DocumentIndexer::new(db_dir, embedder.clone())?;
    let stats = indexer.index_documents(context_dir, rebuild).await?;
    if stats.skipped {
        eprintln!("Reference index already populated, skipping (use --rebuild-index to force)");
    } else {
        eprintln!(
            "Indexed {} document(s), {} chunks in {}ms",
            stats.documents, stats.chunks, stats.time_ms
        );
    }

    Ok(Retriever::new(db_dir, embedder))
}
