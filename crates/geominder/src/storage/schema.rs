//! `SQLite` schema definitions for geominder.

/// SQL statement to create the reminders table.
///
/// `seq` records first-insert order so listings stay stable when a reminder
/// is saved again under the same id.
pub const CREATE_REMINDERS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS reminders (
    id TEXT PRIMARY KEY NOT NULL,
    seq INTEGER NOT NULL,
    title TEXT,
    description TEXT,
    location TEXT,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create an index on `seq` for ordered listing.
pub const CREATE_SEQ_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_reminders_seq ON reminders(seq)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_REMINDERS_TABLE,
    CREATE_SEQ_INDEX,
    CREATE_METADATA_TABLE,
];
