//! caduceus-export
//!
//! Rendering of approved reports to Markdown and JSON.

pub mod error;
pub mod headings;
pub mod render;
