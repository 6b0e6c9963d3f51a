mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

/// A transactions row as SQLite hands it back, before validation.
struct StoredRow {
    id: i64,
    name: String,
    kind: String,
    category: String,
    date: String,
    amount: String,
}

impl StoredRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            kind: row.get(2)?,
            category: row.get(3)?,
            date: row.get(4)?,
            amount: row.get(5)?,
        })
    }

    fn into_transaction(self) -> Result<Transaction> {
        let id = self.id;
        Ok(Transaction {
            id,
            name: self.name,
            kind: TxnType::parse(&self.kind)
                .with_context(|| format!("Transaction {id} has a bad type"))?,
            category: self.category,
            date: NaiveDate::parse_from_str(&self.date, ISO_DATE)
                .with_context(|| format!("Transaction {id} has a bad date: {}", self.date))?,
            amount: Decimal::from_str(&self.amount)
                .with_context(|| format!("Transaction {id} has a bad amount: {}", self.amount))?,
        })
    }
}

const SELECT_TRANSACTIONS: &str =
    "SELECT id, name, type, category, date, amount FROM transactions";

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        db.seed_default_categories()?;
        tracing::info!(path = %path.display(), "opened database");
        Ok(db)
    }

    /// Run raw SQL, bypassing the typed writers. Lets tests plant bad rows.
    #[cfg(test)]
    pub(crate) fn execute_raw(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_default_categories()?;
        Ok(db)
    }

    /// Stored schema version, or `None` for a database created just now.
    fn schema_version(&self) -> Result<Option<i32>> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;
        if !has_version_table {
            return Ok(None);
        }
        // An empty version table predates version tracking.
        let version = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);
        Ok(Some(version))
    }

    fn migrate(&mut self) -> Result<()> {
        let Some(current) = self.schema_version()? else {
            // New file: create every table at the latest version in one step.
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            tracing::info!(version = schema::CURRENT_VERSION, "created schema");
            return Ok(());
        };

        if current >= schema::CURRENT_VERSION {
            return Ok(());
        }

        // Step forward from the stored version; each entry upgrades `from` to `from + 1`.
        let tx = self.conn.transaction()?;
        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                tracing::info!(from_version, "applying schema migration");
                tx.execute_batch(sql)?;
            }
        }
        tx.execute("DELETE FROM schema_version", [])?;
        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![schema::CURRENT_VERSION],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn seed_default_categories(&mut self) -> Result<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        let defaults = [
            "Bills & Utilities",
            "Education",
            "Entertainment",
            "Food & Dining",
            "Groceries",
            "Health",
            "Investments",
            "Other",
            "Rent",
            "Salary",
            "Shopping",
            "Transport",
            "Travel",
        ];

        let tx = self.conn.transaction()?;
        for name in &defaults {
            tx.execute(
                "INSERT OR IGNORE INTO categories (name) VALUES (?1)",
                params![name],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    // ── Transactions ──────────────────────────────────────────

    /// Every stored transaction, in key order.
    pub(crate) fn get_all_transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_TRANSACTIONS} ORDER BY id"))?;
        let rows = stmt.query_map([], StoredRow::from_row)?;
        let mut txns = Vec::new();
        for row in rows {
            txns.push(row?.into_transaction()?);
        }
        tracing::debug!(count = txns.len(), "loaded transactions");
        Ok(txns)
    }

    pub(crate) fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let result = self.conn.query_row(
            &format!("{SELECT_TRANSACTIONS} WHERE id = ?1"),
            params![id],
            StoredRow::from_row,
        );
        match result {
            Ok(row) => Ok(Some(row.into_transaction()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_transaction_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    pub(crate) fn insert_transaction(&self, txn: &NewTransaction) -> Result<i64> {
        anyhow::ensure!(
            txn.amount >= Decimal::ZERO,
            "Amount must not be negative: {}",
            txn.amount
        );
        self.conn.execute(
            "INSERT INTO transactions (name, type, category, date, amount)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                txn.name,
                txn.kind.as_str(),
                txn.category,
                txn.date.format(ISO_DATE).to_string(),
                txn.amount.to_string(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, "inserted transaction");
        Ok(id)
    }

    /// Write `txn` under its id, replacing every field of an existing row.
    pub(crate) fn put_transaction(&self, txn: &Transaction) -> Result<()> {
        anyhow::ensure!(
            txn.amount >= Decimal::ZERO,
            "Amount must not be negative: {}",
            txn.amount
        );
        self.conn
            .execute(
                "INSERT INTO transactions (id, name, type, category, date, amount)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    type = excluded.type,
                    category = excluded.category,
                    date = excluded.date,
                    amount = excluded.amount",
                params![
                    txn.id,
                    txn.name,
                    txn.kind.as_str(),
                    txn.category,
                    txn.date.format(ISO_DATE).to_string(),
                    txn.amount.to_string(),
                ],
            )
            .with_context(|| format!("Failed to write transaction {}", txn.id))?;
        tracing::info!(id = txn.id, "stored transaction");
        Ok(())
    }

    /// Delete by key. A missing id is not an error.
    pub(crate) fn delete_transaction(&self, id: i64) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        tracing::info!(id, removed, "deleted transaction");
        Ok(())
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn get_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM categories ORDER BY name")?;
        let rows = stmt.query_map([], |row| Ok(Category::new(row.get::<_, String>(0)?)))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}
