//! caduceus-sources
//!
//! Read-only lookup of approved source excerpts by topic tag.
//! The engine only ever queries an index; it never writes to one.

pub mod error;
pub mod fulltext;
pub mod index;
pub mod load;
pub mod memory;

pub use index::SourceIndex;
