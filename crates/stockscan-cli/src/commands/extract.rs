//! Extract command - read bill data from a single input file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use stockscan_core::{BillExtractor, BillRecord};

use super::input::OcrSession;
use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (span JSON, text, or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Show extraction warnings
    #[arg(long)]
    show_warnings: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (one row per line item)
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(model_dir) = &args.model_dir {
        config.ocr.model_dir = model_dir.clone();
    }

    info!("Processing file: {}", args.input.display());

    let mut session = OcrSession::new(config.ocr.clone());
    let spans = session.read_spans(&args.input);
    session.close();
    let spans = spans?;

    let extractor = BillExtractor::from_config(&config.extraction);
    let report = extractor.extract_with_report(&spans);

    let output = format_bill(&report.record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_warnings {
        for warning in &report.warnings {
            eprintln!("{} {}", style("⚠").yellow(), warning);
        }
        if report.spans_dropped > 0 {
            eprintln!(
                "{} {} of {} spans below confidence threshold",
                style("ℹ").blue(),
                report.spans_dropped,
                report.spans_total
            );
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_bill(record: &BillRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &BillRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "bill_number",
        "bill_date",
        "name",
        "quantity",
        "unit_price",
    ])?;

    let bill_number = record.bill_number.clone().unwrap_or_default();
    let bill_date = record.bill_date.map(|d| d.to_string()).unwrap_or_default();

    for item in &record.items {
        wtr.write_record([
            &bill_number,
            &bill_date,
            &item.name,
            &item.quantity.to_string(),
            &item.unit_price.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &BillRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Bill: {}\n",
        record.bill_number.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!(
        "Date: {}\n",
        record
            .bill_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    output.push('\n');

    output.push_str("Items:\n");
    for item in &record.items {
        output.push_str(&format!(
            "  {} x{} @ {}\n",
            item.name, item.quantity, item.unit_price
        ));
    }
    output.push('\n');

    output.push_str(&format!("Total: {}\n", record.total_amount));

    output
}
