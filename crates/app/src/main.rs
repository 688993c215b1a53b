use clap::{Parser, Subcommand};
use chrono::Utc;
use paperdex_core::{
    copy_matched_sources, normalize_catalog, ChromaStore, HashedTrigramEmbedder, IngestionOptions,
    Ingestor, LopdfExtractor, Retriever, SearchError, VectorIndex,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter, prelude::*};

#[derive(Parser)]
#[command(name = "paperdex", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Chroma base URL
    #[arg(long, default_value = "http://localhost:8000")]
    chroma_url: String,

    /// Chroma collection holding the chunk index
    #[arg(long, default_value = "papers")]
    collection: String,
}

#[derive(Subcommand)]
enum Command {
    /// Chunk every PDF in a folder and index the chunks.
    Ingest {
        /// Folder that contains PDFs recursively.
        #[arg(long)]
        folder: PathBuf,
        /// Window length in characters for each chunk.
        #[arg(long, default_value = "1000")]
        chunk_chars: usize,
        /// Characters the next window re-reads from the previous one.
        #[arg(long, default_value = "200")]
        overlap_chars: usize,
    },
    /// Ask the indexed library a question.
    Query {
        /// One-shot question; omit it to get an interactive prompt.
        #[arg(long)]
        question: Option<String>,
        /// Number of nearest chunks to retrieve.
        #[arg(long, default_value = "10")]
        top_k: usize,
        /// Drop results scoring below this similarity (0-1).
        #[arg(long)]
        min_score: Option<f64>,
        /// Directory that receives a copy of each matched PDF.
        #[arg(long, default_value = "query_outputs")]
        output_dir: PathBuf,
    },
    /// Normalize a Zotero CSV export into the fixed catalog columns.
    Catalog {
        /// Path to the raw Zotero export.
        #[arg(long, default_value = "zotero_export.csv")]
        input: PathBuf,
        /// Where the normalized catalog is written.
        #[arg(long, default_value = "outputs/paper_catalog.csv")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "paperdex boot"
    );

    match cli.command {
        Command::Ingest {
            folder,
            chunk_chars,
            overlap_chars,
        } => {
            let store = ChromaStore::connect(
                &cli.chroma_url,
                &cli.collection,
                HashedTrigramEmbedder::default(),
            )
            .map_err(|error| anyhow::anyhow!(error.to_string()))?;

            let options = IngestionOptions {
                chunk_chars,
                overlap_chars,
            };
            let ingestor = Ingestor::new(store, LopdfExtractor, options)
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;

            info!(folder = %folder.display(), collection = %cli.collection, "ingesting folder");

            let report = ingestor
                .ingest(&folder)
                .await
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;

            if !report.skipped.is_empty() {
                warn!(
                    "skipped_documents={} for folder={}",
                    report.skipped.len(),
                    folder.display()
                );
                for skipped in &report.skipped {
                    warn!(path = %skipped.path.display(), reason = %skipped.reason, "skipped pdf");
                }
            }

            println!(
                "Indexed {} chunks from {} PDFs at {}",
                report.chunk_count,
                report.document_count,
                report.completed_at.to_rfc3339()
            );
        }
        Command::Query {
            question,
            top_k,
            min_score,
            output_dir,
        } => {
            let store = ChromaStore::connect(
                &cli.chroma_url,
                &cli.collection,
                HashedTrigramEmbedder::default(),
            )
            .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            let retriever = Retriever::new(store);

            match question {
                Some(question) => run_query(&retriever, &question, top_k, min_score, &output_dir)
                    .await
                    .map_err(|error| anyhow::anyhow!(error.to_string()))?,
                None => query_loop(&retriever, &output_dir).await?,
            }
        }
        Command::Catalog { input, output } => {
            let rows = normalize_catalog(&input, &output)
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            println!("Wrote {rows} rows to {}", output.display());
        }
    }

    Ok(())
}

async fn run_query<S>(
    retriever: &Retriever<S>,
    question: &str,
    top_k: usize,
    min_score: Option<f64>,
    output_dir: &Path,
) -> Result<(), SearchError>
where
    S: VectorIndex + Send + Sync,
{
    let results = retriever.retrieve(question, top_k, min_score).await?;

    if results.is_empty() {
        println!("No results above the requested score.");
        return Ok(());
    }

    println!("\nTop results:");
    for result in &results {
        println!(
            "- {} (page {}) score={:.3}",
            result.source, result.page, result.score
        );
    }

    let copied = copy_matched_sources(&results, output_dir);
    println!("\nCopied {copied} PDFs to: {}", output_dir.display());

    Ok(())
}

async fn query_loop<S>(retriever: &Retriever<S>, output_dir: &Path) -> anyhow::Result<()>
where
    S: VectorIndex + Send + Sync,
{
    println!("Interactive search. Type 'exit' or press Ctrl-D to quit.");

    loop {
        let question = match prompt("Research question: ")? {
            Some(value) => value,
            None => break,
        };

        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        let top_k_raw = match prompt("How many results? [10]: ")? {
            Some(value) => value,
            None => break,
        };
        let top_k = if top_k_raw.is_empty() {
            10
        } else {
            match top_k_raw.parse::<usize>() {
                Ok(value) => value,
                Err(_) => {
                    eprintln!("top_k must be a whole number, got '{top_k_raw}'");
                    continue;
                }
            }
        };

        let min_score_raw = match prompt("Minimum score 0-1 (Enter for none): ")? {
            Some(value) => value,
            None => break,
        };
        let min_score = if min_score_raw.is_empty() {
            None
        } else {
            match min_score_raw.parse::<f64>() {
                Ok(value) => Some(value),
                Err(_) => {
                    eprintln!("minimum score must be a number, got '{min_score_raw}'");
                    continue;
                }
            }
        };

        if let Err(error) = run_query(retriever, &question, top_k, min_score, output_dir).await {
            eprintln!("search failed: {error}");
        }
    }

    Ok(())
}

/// Returns None once stdin reaches end of file.
fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }

    Ok(Some(input.trim().to_string()))
}
