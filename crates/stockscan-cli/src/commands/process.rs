//! Process command - extract one bill and apply it to the ledger.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info, warn};

use stockscan_core::{BillExtractor, BillRecord, ChangeSummary, Reconciler, TransactionKind};

use super::extract::OutputFormat;
use super::input::OcrSession;
use super::load_config;
use crate::ledger_file;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (span JSON, text, or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Transaction kind: purchase or sale
    #[arg(short, long)]
    kind: String,

    /// Ledger file (default: from config)
    #[arg(short, long)]
    ledger: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

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

/// Bill and the ledger changes it caused.
#[derive(Serialize)]
pub struct ProcessedBill<'a> {
    pub source: String,
    pub bill: &'a BillRecord,
    pub changes: &'a ChangeSummary,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Reject a bad kind before touching the ledger
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

    info!("Processing {} as {}", args.input.display(), kind);

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Reading input...");
    pb.set_position(10);

    let mut session = OcrSession::new(config.ocr.clone());
    let spans = session.read_spans(&args.input);
    session.close();
    let spans = spans?;

    pb.set_message("Extracting bill data...");
    pb.set_position(50);

    let report = BillExtractor::from_config(&config.extraction).extract_with_report(&spans);
    for warning in &report.warnings {
        warn!("{}: {}", args.input.display(), warning);
    }

    pb.set_message("Updating ledger...");
    pb.set_position(70);

    let ledger = ledger_file::load(&ledger_path)?;
    let (ledger, summary) = Reconciler::from_config(&config.inventory).reconcile(
        ledger,
        &report.record.items,
        kind,
    );

    if !args.dry_run {
        ledger_file::save(&ledger, &ledger_path)?;
    }

    pb.finish_and_clear();

    let processed = ProcessedBill {
        source: args.input.display().to_string(),
        bill: &report.record,
        changes: &summary,
    };
    println!("{}", format_processed(&processed, args.format)?);

    if args.dry_run {
        println!("{} Dry run, ledger not saved", style("ℹ").blue());
    } else {
        println!(
            "{} Ledger updated: {}",
            style("✓").green(),
            ledger_path.display()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_processed(processed: &ProcessedBill<'_>, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(processed)?),
        OutputFormat::Csv => format_changes_csv(processed),
        OutputFormat::Text => Ok(format_changes_text(processed)),
    }
}

fn format_changes_csv(processed: &ProcessedBill<'_>) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["source", "kind", "item", "previous", "delta", "quantity"])?;

    let kind = processed.changes.kind.to_string();
    for change in &processed.changes.changes {
        let previous = change
            .previous_quantity
            .map(|q| q.to_string())
            .unwrap_or_default();
        wtr.write_record([
            &processed.source,
            &kind,
            &change.name,
            &previous,
            &change.delta.to_string(),
            &change.new_quantity.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_changes_text(processed: &ProcessedBill<'_>) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} bill {} ({})\n",
        processed.changes.kind,
        processed.bill.bill_number.as_deref().unwrap_or("-"),
        processed.source
    ));

    for change in &processed.changes.changes {
        let before = change
            .previous_quantity
            .map(|q| q.to_string())
            .unwrap_or_else(|| "new".to_string());
        output.push_str(&format!(
            "  {:<32} {:>6} -> {:<6} ({:+})\n",
            change.name, before, change.new_quantity, change.delta
        ));
    }

    output.push_str(&format!(
        "{} created, {} updated",
        processed.changes.created(),
        processed.changes.updated()
    ));

    let overdrawn = processed.changes.overdrawn();
    if !overdrawn.is_empty() {
        output.push_str(&format!(", {} below zero", overdrawn.len()));
    }

    output
}
