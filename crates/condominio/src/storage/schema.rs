//! `SQLite` schema definitions for the key-value backend.

/// SQL statement to create the entries table.
pub const CREATE_ENTRIES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS entries (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
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
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_ENTRIES_TABLE, CREATE_METADATA_TABLE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.trim().is_empty());
        }
    }

    #[test]
    fn test_create_entries_table_contains_required_columns() {
        assert!(CREATE_ENTRIES_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_ENTRIES_TABLE.contains("value TEXT NOT NULL"));
        assert!(CREATE_ENTRIES_TABLE.contains("updated_at TEXT NOT NULL"));
    }
}
