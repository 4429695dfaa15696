use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::info;

use passfield::cache::ResultCache;
use passfield::matching::GeoMatcher;
use passfield::models::{Gazetteer, RecognizedDocument};
use passfield::utils::ExtractionError;
use passfield::DocumentReconciler;

/// Reconcile recognized passport text into a structured identity record.
///
/// MRZ lines and the document's free OCR text are supplied by the
/// recognition collaborators; this tool runs the reconciliation engine on
/// them and prints the record as JSON. With `--cache` and `--document`,
/// results are memoized by the document's content hash.
#[derive(Parser)]
#[command(name = "passfield", version, about)]
struct Args {
    /// First MRZ line (44 characters, shorter input is padded)
    #[arg(long)]
    mrz_line1: String,

    /// Second MRZ line
    #[arg(long)]
    mrz_line2: String,

    /// File holding the document's full OCR text
    #[arg(long)]
    text: PathBuf,

    /// Original document file, hashed for the cache key
    #[arg(long)]
    document: Option<PathBuf>,

    /// SQLite result cache path
    #[arg(long)]
    cache: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    if let Err(err) = run(Args::parse()) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), ExtractionError> {
    let full_text = fs::read_to_string(&args.text)
        .map_err(|e| ExtractionError::Io(format!("{}: {}", args.text.display(), e)))?;

    let cache = args.cache.as_ref().map(ResultCache::new);
    let content_hash = match &args.document {
        Some(path) => {
            let bytes = fs::read(path)
                .map_err(|e| ExtractionError::Io(format!("{}: {}", path.display(), e)))?;
            Some(ResultCache::content_hash(&bytes))
        }
        None => None,
    };

    // Cached result short-circuits the whole pipeline
    if let (Some(cache), Some(hash)) = (&cache, &content_hash) {
        if let Some(entry) = cache.lookup(hash)? {
            info!("cache hit for {}", hash);
            print_record(&entry.record)?;
            return Ok(());
        }
    }

    let reconciler = DocumentReconciler::new(GeoMatcher::new(Gazetteer::india()));
    let doc = RecognizedDocument {
        mrz_lines: Some((args.mrz_line1.clone(), args.mrz_line2.clone())),
        spans: Vec::new(),
        full_text,
    };
    let record = reconciler.reconcile(&doc)?;

    if let (Some(cache), Some(hash)) = (&cache, &content_hash) {
        let file_name = args
            .document
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        cache.upsert(hash, &file_name, &record)?;
    }

    print_record(&record)
}

fn print_record(record: &passfield::models::IdentityRecord) -> Result<(), ExtractionError> {
    let json = serde_json::to_string_pretty(record)
        .map_err(|e| ExtractionError::Io(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
