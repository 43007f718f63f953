//! SQL schema for the local cache.

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv_entries (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";
