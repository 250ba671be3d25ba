//! Cafe module
//!
//! The cafe record, its insert payload, and the SQLite-backed repository.

pub mod db;
pub mod error;
pub mod models;

pub use db::{pick_random, CafeDb};
pub use error::StoreError;
pub use models::{Cafe, CafeId, NewCafe};
