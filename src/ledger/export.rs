use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::models::Transaction;

pub(crate) const HEADERS: [&str; 5] = ["Name", "Type", "Category", "Date", "Amount"];

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ExportOutcome {
    /// Nothing matched; no file was written.
    Empty,
    Written { path: PathBuf, count: usize },
}

/// Render records as CSV: a header line, then one line per record.
/// Fields containing commas, quotes or newlines are quoted. Lines are
/// joined with `\n` and the last one has no terminator.
pub(crate) fn build_csv(records: &[Transaction]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(HEADERS)?;
    for txn in records {
        wtr.write_record([
            txn.name.as_str(),
            txn.kind.as_str(),
            txn.category.as_str(),
            txn.short_date().as_str(),
            txn.amount.normalize().to_string().as_str(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))?;
    let mut text = String::from_utf8(bytes).context("CSV output was not valid UTF-8")?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

pub(crate) fn export_file_name(today: NaiveDate) -> String {
    format!("transactions_{}.csv", today.format("%Y-%m-%d"))
}

/// Write the CSV for `records` into `dir`. An empty list writes nothing.
pub(crate) fn export(records: &[Transaction], dir: &Path, today: NaiveDate) -> Result<ExportOutcome> {
    if records.is_empty() {
        return Ok(ExportOutcome::Empty);
    }

    let contents = build_csv(records)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;
    let path = dir.join(export_file_name(today));
    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), count = records.len(), "exported transactions");
    Ok(ExportOutcome::Written {
        path,
        count: records.len(),
    })
}
