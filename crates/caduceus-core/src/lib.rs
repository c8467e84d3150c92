//! caduceus-core
//!
//! Pure domain types and the Tantivy schema for source excerpts.
//! No I/O; this is the shared vocabulary of the Caduceus system.

pub mod error;
pub mod language;
pub mod models;
pub mod schema;
