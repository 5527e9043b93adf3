use std::path::Path;

use anyhow::Result;
use rusqlite::Connection;

use crate::corpus::ArticleRow;

/// Table names are the persisted interface; downstream consumers read the
/// corpus by these keys.
const TABLES: [&str; 3] = ["text_df", "train_df", "test_df"];

/// Write the full corpus plus both splits to a single store file. Existing
/// tables of the same names are replaced.
pub fn save_corpus(
    path: &Path,
    text: &[ArticleRow],
    train: &[ArticleRow],
    test: &[ArticleRow],
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)?;
    for (table, rows) in TABLES.iter().zip([text, train, test]) {
        save_table(&conn, table, rows)?;
    }
    Ok(())
}

fn save_table(conn: &Connection, table: &str, rows: &[ArticleRow]) -> Result<()> {
    conn.execute_batch(&format!(
        "DROP TABLE IF EXISTS {table};
         CREATE TABLE {table} (
             id       INTEGER PRIMARY KEY,
             slug     TEXT NOT NULL,
             text     TEXT NOT NULL,
             y        INTEGER NOT NULL,
             y_lexile REAL NOT NULL
         );"
    ))?;

    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {table} (slug, text, y, y_lexile) VALUES (?1, ?2, ?3, ?4)"
        ))?;
        for r in rows {
            stmt.execute(rusqlite::params![r.slug, r.text, r.grade, r.lexile])?;
        }
    }
    tx.commit()?;
    Ok(())
}
