//! SQLite persistence of the summary table. The table is a full-replace
//! target: each run drops and rewrites it, last writer wins.

use crate::error::Result;
use crate::types::SummaryRow;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

/// Fixed name of the persisted summary table.
pub const SUMMARY_TABLE: &str = "vat_summary";

pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    pub fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path)?;
        Ok(Db {
            conn: Mutex::new(conn),
        })
    }

    /// Replace the persisted summary with the given rows in one transaction.
    pub fn replace_summary(&self, rows: &[SummaryRow]) -> Result<()> {
        let mut conn = self
            .conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let tx = conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table};
             CREATE TABLE {table} (
                period TEXT NOT NULL,
                fta_box TEXT NOT NULL,
                description TEXT NOT NULL,
                net_value REAL NOT NULL,
                vat_value REAL NOT NULL,
                net_vat_payable REAL NOT NULL
             );",
            table = SUMMARY_TABLE
        ))?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} (period, fta_box, description, net_value, vat_value, net_vat_payable)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                SUMMARY_TABLE
            ))?;
            for row in rows {
                stmt.execute(params![
                    row.period,
                    row.fta_box,
                    row.description,
                    row.net_value,
                    row.vat_value,
                    row.net_vat_payable,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Read the persisted summary back in insertion order.
    pub fn read_summary(&self) -> Result<Vec<SummaryRow>> {
        let conn = self
            .conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut stmt = conn.prepare(&format!(
            "SELECT period, fta_box, description, net_value, vat_value, net_vat_payable
             FROM {} ORDER BY rowid",
            SUMMARY_TABLE
        ))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SummaryRow {
                    period: row.get(0)?,
                    fta_box: row.get(1)?,
                    description: row.get(2)?,
                    net_value: row.get(3)?,
                    vat_value: row.get(4)?,
                    net_vat_payable: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
