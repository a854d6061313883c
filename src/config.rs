//! Process configuration.
//!
//! Two environment variables, both optional: where the database file
//! lives and where the HTTP server listens.

use std::path::PathBuf;

pub const DB_ENV: &str = "MINICRM_DB";
pub const ADDR_ENV: &str = "MINICRM_ADDR";

const DEFAULT_DB: &str = "minicrm.db";
const DEFAULT_ADDR: &str = "127.0.0.1:8360";

/// Path of the SQLite database file.
pub fn db_path() -> PathBuf {
    std::env::var(DB_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB))
}

/// Bind address for the HTTP server.
pub fn bind_addr() -> String {
    std::env::var(ADDR_ENV).unwrap_or_else(|_| DEFAULT_ADDR.to_string())
}
