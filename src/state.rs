//! Shared handler state
//!
//! The storage handle is built once at startup and handed to every handler
//! through axum's `State` extractor.

use crate::cafe::CafeDb;
use std::sync::Arc;

/// State injected into every route handler
#[derive(Clone)]
pub struct AppState {
    /// Cafe repository
    pub cafes: Arc<CafeDb>,
}

impl AppState {
    /// Wrap an opened repository
    pub fn new(cafes: CafeDb) -> Self {
        Self {
            cafes: Arc::new(cafes),
        }
    }
}
