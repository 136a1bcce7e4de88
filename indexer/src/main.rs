use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lexis_core::config::parse_boost;
use lexis_core::{Document, IndexConfig, SearchIndex, SearchOptions};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

const DEFAULT_DATA_DIR: &str = "./index";

#[derive(Parser)]
#[command(name = "lexis")]
#[command(about = "Build, query and maintain a boosted TF-IDF search index", long_about = None)]
struct Cli {
    #[command(flatten)]
    index: IndexArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IndexArgs {
    /// Index directory (overrides the config file)
    #[arg(long, global = true, env = "LEXIS_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// JSON config file with field_boosts, default_limit and suggest_limit
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Field boost as field=weight; may be repeated
    #[arg(long = "boost", global = true)]
    boosts: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the index from JSON/JSONL files or a directory of them
    Build {
        #[arg(long)]
        input: PathBuf,
    },
    /// Index additional documents into the existing index
    Add {
        #[arg(long)]
        input: PathBuf,
    },
    /// Remove one document by id
    Remove { id: String },
    /// Run a ranked query
    Search {
        query: String,
        #[arg(long = "type")]
        doc_type: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Autocomplete a term prefix
    Suggest {
        prefix: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print index statistics
    Stats,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let config = resolve_config(&cli.index)?;

    match cli.command {
        Commands::Build { input } => {
            let documents = read_documents(&input)?;
            let mut index = SearchIndex::new(config)?;
            let summary = index.rebuild(documents)?;
            print_json(&summary)
        }
        Commands::Add { input } => {
            let documents = read_documents(&input)?;
            let mut index = SearchIndex::open(config)?;
            let summaries: Vec<_> = documents.into_iter().map(|doc| index.index(doc)).collect();
            index.save()?;
            tracing::info!(added = summaries.len(), "documents indexed");
            print_json(&summaries)
        }
        Commands::Remove { id } => {
            let mut index = SearchIndex::open(config)?;
            let summary = index.remove_document(&id);
            index.save()?;
            print_json(&summary)
        }
        Commands::Search { query, doc_type, limit, offset } => {
            let index = SearchIndex::open(config)?;
            let options = SearchOptions { doc_type, limit, offset };
            print_json(&index.search(&query, &options))
        }
        Commands::Suggest { prefix, limit } => {
            let index = SearchIndex::open(config)?;
            print_json(&index.suggest(&prefix, limit))
        }
        Commands::Stats => {
            let index = SearchIndex::open(config)?;
            print_json(&index.stats())
        }
    }
}

/// Config file first, then command-line overrides.
fn resolve_config(args: &IndexArgs) -> Result<IndexConfig> {
    let mut config = match &args.config {
        Some(path) => IndexConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => IndexConfig::default(),
    };
    for raw in &args.boosts {
        let (field, weight) = parse_boost(raw)?;
        config.field_boosts.insert(field, weight);
    }
    if let Some(dir) = &args.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if config.data_dir.is_none() {
        config.data_dir = Some(PathBuf::from(DEFAULT_DATA_DIR));
    }
    config.validate()?;
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_documents(input: &Path) -> Result<Vec<Document>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        anyhow::bail!("input {} does not exist", input.display());
    }

    let mut documents = Vec::new();
    for file in files {
        let before = documents.len();
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut documents)?;
        } else {
            read_json(&file, &mut documents)?;
        }
        tracing::debug!(file = %file.display(), documents = documents.len() - before, "read input file");
    }
    tracing::info!(documents = documents.len(), "read input documents");
    Ok(documents)
}

fn read_jsonl(file: &Path, documents: &mut Vec<Document>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: Document = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}", file.display(), line_no + 1))?;
        documents.push(doc);
    }
    Ok(())
}

fn read_json(file: &Path, documents: &mut Vec<Document>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                documents.push(serde_json::from_value(v).with_context(|| file.display().to_string())?);
            }
        }
        serde_json::Value::Object(_) => {
            documents.push(serde_json::from_value(json).with_context(|| file.display().to_string())?);
        }
        _ => tracing::warn!(file = %file.display(), "skipping input that is neither an object nor an array"),
    }
    Ok(())
}
