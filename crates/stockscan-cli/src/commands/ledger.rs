//! Ledger command - inspect the inventory ledger.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use stockscan_core::InventoryLedger;

use super::extract::OutputFormat;
use super::load_config;
use crate::ledger_file;

/// Arguments for the ledger command.
#[derive(Args)]
pub struct LedgerArgs {
    #[command(subcommand)]
    command: LedgerCommand,
}

#[derive(Subcommand)]
enum LedgerCommand {
    /// Show every ledger entry
    Show {
        /// Ledger file (default: from config)
        #[arg(short, long)]
        ledger: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a single item
    Get {
        /// Item name
        item: String,

        /// Ledger file (default: from config)
        #[arg(short, long)]
        ledger: Option<PathBuf>,
    },
}

pub async fn run(args: LedgerArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let default_path = config.inventory.ledger_path;

    match args.command {
        LedgerCommand::Show { ledger, format } => {
            let ledger = ledger_file::load(&ledger.unwrap_or(default_path))?;
            println!("{}", format_ledger(&ledger, format)?);
        }
        LedgerCommand::Get { item, ledger } => {
            let ledger = ledger_file::load(&ledger.unwrap_or(default_path))?;
            match ledger.get(&item) {
                Some(entry) => println!("{}", serde_json::to_string_pretty(entry)?),
                None => anyhow::bail!("Item not in ledger: {}", item),
            }
        }
    }

    Ok(())
}

pub fn format_ledger(ledger: &InventoryLedger, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(ledger)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["item", "quantity", "price"])?;
            for entry in ledger.iter() {
                wtr.write_record([
                    &entry.name,
                    &entry.quantity.to_string(),
                    &entry.unit_price.to_string(),
                ])?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => Ok(format_table(ledger)),
    }
}

fn format_table(ledger: &InventoryLedger) -> String {
    if ledger.is_empty() {
        return "Ledger is empty".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("{:<32} {:>8} {:>10}\n", "Item", "Qty", "Price"));

    for entry in ledger.iter() {
        let quantity = if entry.quantity < 0 {
            style(entry.quantity).red().to_string()
        } else {
            entry.quantity.to_string()
        };
        output.push_str(&format!(
            "{:<32} {:>8} {:>10}\n",
            entry.name, quantity, entry.unit_price
        ));
    }

    output.push_str(&format!(
        "\n{} items, stock value {}",
        ledger.len(),
        ledger.stock_value()
    ));

    output
}
