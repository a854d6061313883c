//! Shared application state.

use std::path::PathBuf;
use std::sync::Mutex;

use crate::db::CrmDb;

/// One open database behind a lock, injected into every handler.
/// Requests serialize at the mutex; there is no pooling.
pub struct AppState {
    pub db: Mutex<CrmDb>,
    pub db_path: PathBuf,
}

impl AppState {
    pub fn new(db: CrmDb, db_path: PathBuf) -> Self {
        Self {
            db: Mutex::new(db),
            db_path,
        }
    }
}
