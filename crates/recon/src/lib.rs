//! `matchbook-recon` — Two-sided transfer reconciliation engine.
//!
//! Pure engine crate: receives a pre-loaded table, returns every record
//! partitioned into matched / potential / unmatched buckets. No CLI or
//! file IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod similarity;

pub use config::RunConfig;
pub use engine::reconcile;
pub use error::ReconError;
pub use layout::Layout;
pub use model::{Cell, ReconcileResult, Table};
