//! `SQLite` schema definitions for fleetlog.
//!
//! The store is a plain key-value table: one row per collection, holding the
//! whole collection as JSON text.

/// SQL statement to create the collections table.
pub const CREATE_COLLECTIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS collections (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_COLLECTIONS_TABLE, CREATE_METADATA_TABLE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_create_collections_table_contains_required_columns() {
        assert!(CREATE_COLLECTIONS_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_COLLECTIONS_TABLE.contains("value TEXT NOT NULL"));
        assert!(CREATE_COLLECTIONS_TABLE.contains("updated_at"));
    }

    #[test]
    fn test_create_metadata_table_structure() {
        assert!(CREATE_METADATA_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_METADATA_TABLE.contains("value TEXT NOT NULL"));
    }
}
