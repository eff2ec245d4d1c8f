use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = serde_json::json!({
            "extraction": { "strip_item_names": true },
            "inventory": { "ledger_path": dir.path().join("inventory.csv") },
        });
        fs::write(dir.path().join("config.json"), config.to_string()).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write_spans(&self, name: &str, spans: &[&str]) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, serde_json::to_string(spans).unwrap()).unwrap();
        path
    }

    fn ledger(&self) -> String {
        fs::read_to_string(self.path("inventory.csv")).unwrap()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("stockscan").unwrap();
        cmd.arg("-c").arg(self.path("config.json"));
        cmd
    }
}

fn receipt(number: &str) -> Vec<String> {
    vec![
        format!("Invoice #{number}"),
        "Date: 03/14/2024".to_string(),
        "Pen x3 $2.50".to_string(),
        "Stapler $7.25".to_string(),
    ]
}

fn write_receipt(ws: &Workspace, name: &str, number: &str) -> PathBuf {
    let lines = receipt(number);
    let spans: Vec<&str> = lines.iter().map(String::as_str).collect();
    ws.write_spans(name, &spans)
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn extract_prints_bill_json() {
    let ws = Workspace::new();
    let input = write_receipt(&ws, "bill.json", "1001");

    ws.cmd()
        .args(["extract", arg(&input)])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""bill_number":"1001""#))
        .stdout(predicate::str::contains(r#""bill_date":"2024-03-14""#))
        .stdout(predicate::str::contains(r#""name":"Stapler""#));
}

#[test]
fn extract_reads_plain_text() {
    let ws = Workspace::new();
    let input = ws.path("bill.txt");
    fs::write(&input, "Receipt no. 7\nTotal $3.00\n").unwrap();

    ws.cmd()
        .args(["extract", arg(&input), "-f", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bill: 7"))
        .stdout(predicate::str::contains("Total: 3.00"));
}

#[test]
fn process_purchase_writes_ledger() {
    let ws = Workspace::new();
    let input = write_receipt(&ws, "bill.json", "1001");

    ws.cmd()
        .args(["process", arg(&input), "-k", "purchase"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 created, 0 updated"));

    assert_eq!(
        ws.ledger(),
        "item,quantity,price\nPen,3,2.50\nStapler,1,7.25\n"
    );
}

#[test]
fn process_sale_after_purchase_reduces_stock() {
    let ws = Workspace::new();
    let purchase = write_receipt(&ws, "purchase.json", "1");
    let sale = ws.write_spans("sale.json", &["Pen x5 $2.50"]);

    ws.cmd()
        .args(["process", arg(&purchase), "-k", "purchase"])
        .assert()
        .success();

    ws.cmd()
        .args(["process", arg(&sale), "--kind", "SALE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 below zero"));

    assert!(ws.ledger().contains("Pen,-2,2.50"));
}

#[test]
fn process_sale_of_unknown_item_follows_config() {
    let ws = Workspace::new();
    let sale = ws.write_spans("sale.json", &["Glue x2 $1.50"]);

    ws.cmd()
        .args(["process", arg(&sale), "-k", "sale"])
        .assert()
        .success();
    assert!(ws.ledger().contains("Glue,2,1.50"));

    fs::remove_file(ws.path("inventory.csv")).unwrap();
    ws.cmd()
        .args(["config", "set", "inventory.sale_creates_negative_stock", "true"])
        .assert()
        .success();
    ws.cmd()
        .args(["process", arg(&sale), "-k", "sale"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 below zero"));
    assert!(ws.ledger().contains("Glue,-2,1.50"));
}

#[test]
fn process_rejects_unknown_kind() {
    let ws = Workspace::new();
    let input = write_receipt(&ws, "bill.json", "1001");

    ws.cmd()
        .args(["process", arg(&input), "-k", "refund"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid argument"));

    assert!(!ws.path("inventory.csv").exists());
}

#[test]
fn process_dry_run_leaves_ledger_alone() {
    let ws = Workspace::new();
    let input = write_receipt(&ws, "bill.json", "1001");

    ws.cmd()
        .args(["process", arg(&input), "-k", "purchase", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert!(!ws.path("inventory.csv").exists());
}

#[test]
fn ledger_show_lists_entries() {
    let ws = Workspace::new();
    fs::write(
        ws.path("inventory.csv"),
        "item,quantity,price\nPen,4,2.50\nStapler,1,7.25\n",
    )
    .unwrap();

    ws.cmd()
        .args(["ledger", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 items, stock value 17.25"));

    ws.cmd()
        .args(["ledger", "show", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pen,4,2.50"));
}

#[test]
fn ledger_get_missing_item_fails() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["ledger", "get", "Pen"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Item not in ledger"));
}

#[test]
fn batch_skips_repeated_bill_numbers() {
    let ws = Workspace::new();
    write_receipt(&ws, "bills/a.json", "1");
    write_receipt(&ws, "bills/b.json", "1");
    write_receipt(&ws, "bills/c.json", "2");
    let pattern = ws.path("bills/*.json");

    ws.cmd()
        .args(["batch", arg(&pattern), "-k", "purchase"])
        .assert()
        .success()
        .stderr(predicate::str::contains("2 applied, 1 duplicates skipped"));

    assert_eq!(
        ws.ledger(),
        "item,quantity,price\nPen,6,2.50\nStapler,2,7.25\n"
    );
}

#[test]
fn batch_stops_on_bad_file_unless_asked() {
    let ws = Workspace::new();
    write_receipt(&ws, "bills/a.json", "1");
    fs::write(ws.path("bills/b.json"), "not json").unwrap();
    let pattern = ws.path("bills/*.json");

    ws.cmd()
        .args(["batch", arg(&pattern), "-k", "purchase"])
        .assert()
        .failure();
    assert!(!ws.path("inventory.csv").exists());

    ws.cmd()
        .args(["batch", arg(&pattern), "-k", "purchase", "--continue-on-error"])
        .assert()
        .success()
        .stderr(predicate::str::contains("1 applied, 0 duplicates skipped, 1 failed"));
    assert!(ws.ledger().contains("Pen,3,2.50"));
}

#[test]
fn config_set_and_get() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["config", "set", "inventory.update_price_on_purchase", "true"])
        .assert()
        .success();

    ws.cmd()
        .args(["config", "get", "inventory.update_price_on_purchase"])
        .assert()
        .success()
        .stdout(predicate::str::contains("true"));

    ws.cmd()
        .args(["config", "set", "inventory.no_such_key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}
