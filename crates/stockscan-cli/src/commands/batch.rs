//! Batch processing command for multiple bill files.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use stockscan_core::{BillExtractor, Reconciler, TransactionKind};

use super::extract::OutputFormat;
use super::input::{InputKind, OcrSession};
use super::load_config;
use super::process::{format_processed, ProcessedBill};
use crate::ledger_file;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Transaction kind applied to every bill: purchase or sale
    #[arg(short, long)]
    kind: String,

    /// Ledger file (default: from config)
    #[arg(short, long)]
    ledger: Option<PathBuf>,

    /// Output format for each bill
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Overwrite stored unit prices with purchase prices
    #[arg(long)]
    update_prices: bool,

    /// Show the result without saving the ledger
    #[arg(long)]
    dry_run: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let kind: TransactionKind = args.kind.parse()?;

    let mut config = load_config(config_path)?;
    if let Some(model_dir) = &args.model_dir {
        config.ocr.model_dir = model_dir.clone();
    }
    if args.update_prices {
        config.inventory.update_price_on_purchase = true;
    }
    let ledger_path = args
        .ledger
        .clone()
        .unwrap_or_else(|| config.inventory.ledger_path.clone());

    // Expand glob pattern
    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| InputKind::from_path(p).is_some())
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let extractor = BillExtractor::from_config(&config.extraction);
    let reconciler = Reconciler::from_config(&config.inventory);
    let mut session = OcrSession::new(config.ocr.clone());
    let mut ledger = ledger_file::load(&ledger_path)?;
    let mut seen_bills: HashSet<String> = HashSet::new();

    let mut applied = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;

    for path in &files {
        overall_pb.inc(1);

        let spans = match session.read_spans(path) {
            Ok(spans) => spans,
            Err(e) if args.continue_on_error => {
                warn!("Failed to process {}: {}", path.display(), e);
                failed += 1;
                continue;
            }
            Err(e) => {
                error!("Failed to process {}: {}", path.display(), e);
                session.close();
                anyhow::bail!("Processing failed: {}", e);
            }
        };

        let record = extractor.extract(&spans);

        // The same bill applied twice would double its quantities
        if let Some(number) = &record.bill_number {
            if !seen_bills.insert(number.clone()) {
                warn!(
                    "Skipping {}: bill {} already applied in this batch",
                    path.display(),
                    number
                );
                skipped += 1;
                continue;
            }
        }

        let (updated, summary) = reconciler.reconcile(ledger, &record.items, kind);
        ledger = updated;
        applied += 1;

        let processed = ProcessedBill {
            source: path.display().to_string(),
            bill: &record,
            changes: &summary,
        };
        overall_pb.suspend(|| -> anyhow::Result<()> {
            println!("{}", format_processed(&processed, args.format)?);
            Ok(())
        })?;
    }

    session.close();
    overall_pb.finish_and_clear();

    if !args.dry_run && applied > 0 {
        ledger_file::save(&ledger, &ledger_path)?;
    }

    eprintln!();
    eprintln!(
        "{} {} applied, {} duplicates skipped, {} failed in {:.1}s",
        style("✓").green(),
        applied,
        skipped,
        failed,
        start.elapsed().as_secs_f64()
    );
    if args.dry_run {
        eprintln!("{} Dry run, ledger not saved", style("ℹ").blue());
    }

    Ok(())
}
