//! Key/value access to the `meta_data` table.

use crate::error::Result;

const SELECT_META_SQL: &str = "SELECT value FROM meta_data WHERE key = ?1 LIMIT 1";
const UPSERT_META_SQL: &str = "INSERT INTO meta_data (key, value) VALUES (?1, ?2) \
     ON CONFLICT (key) DO UPDATE SET value = excluded.value";
const TABLE_EXISTS_SQL: &str =
    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1";

impl super::Database {
    /// Reads a value; `None` if the key was never written.
    pub fn read_meta(&self, key: &str) -> Result<Option<String>> {
        let mut result = self.query(SELECT_META_SQL, [key])?;
        Ok(if result.next() {
            result.get(0).map(String::from)
        } else {
            None
        })
    }

    /// Inserts or replaces a value.
    pub fn write_meta(&self, key: &str, value: &str) -> Result<()> {
        self.update(UPSERT_META_SQL, [key, value])?;
        Ok(())
    }

    pub fn table_exists(&self, table: &str) -> Result<bool> {
        let mut result = self.query(TABLE_EXISTS_SQL, [table])?;
        Ok(result.next() && result.get_i64(0).unwrap_or(0) > 0)
    }
}
