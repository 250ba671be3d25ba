//! Cafe API Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod cafe;
pub mod config;
pub mod error;
/// Shared handler state
pub mod state;

pub use api::create_router;
pub use state::AppState;
