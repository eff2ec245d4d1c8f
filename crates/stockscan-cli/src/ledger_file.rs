//! CSV persistence for the inventory ledger.
//!
//! One row per item with the header `item,quantity,price`. Prices are written
//! as exact decimal strings so a save/load cycle loses nothing.

use std::fs;
use std::io::BufWriter;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use stockscan_core::{InventoryEntry, InventoryLedger};

#[derive(Debug, Serialize, Deserialize)]
struct LedgerRow {
    item: String,
    quantity: i64,
    // Read as text: csv would otherwise guess a float and drop trailing zeros
    price: String,
}

/// Load a ledger; a missing file is an empty ledger.
pub fn load(path: &Path) -> anyhow::Result<InventoryLedger> {
    if !path.exists() {
        debug!("No ledger at {}, starting empty", path.display());
        return Ok(InventoryLedger::new());
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open ledger {}", path.display()))?;

    let mut ledger = InventoryLedger::new();
    for (line, row) in reader.deserialize::<LedgerRow>().enumerate() {
        let row = row.with_context(|| format!("Invalid ledger row {}", line + 1))?;
        let price = Decimal::from_str(row.price.trim())
            .with_context(|| format!("Invalid price '{}' for {}", row.price, row.item))?;

        if ledger.insert(InventoryEntry::new(row.item, row.quantity, price)).is_some() {
            anyhow::bail!("Duplicate item in ledger at row {}", line + 1);
        }
    }

    debug!("Loaded {} ledger entries from {}", ledger.len(), path.display());

    Ok(ledger)
}

/// Save a ledger, replacing the file atomically.
pub fn save(ledger: &InventoryLedger, path: &Path) -> anyhow::Result<()> {
    let parent_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = csv::Writer::from_writer(BufWriter::new(&temp_file));
        for entry in ledger.iter() {
            writer.serialize(LedgerRow {
                item: entry.name.clone(),
                quantity: entry.quantity,
                price: entry.unit_price.to_string(),
            })?;
        }
        writer.flush()?;
    }

    if ledger.is_empty() {
        // csv writes the header with the first record; keep the file self-describing
        fs::write(temp_file.path(), "item,quantity,price\n")?;
    }

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to write ledger {}", path.display()))?;

    debug!("Saved {} ledger entries to {}", ledger.len(), path.display());

    Ok(())
}
