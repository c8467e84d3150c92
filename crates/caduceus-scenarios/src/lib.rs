//! caduceus-scenarios
//!
//! Scenario definitions and the versioned registry that serves them.
//! Pure data and validation. No source lookups and no I/O beyond loading
//! definition files.

pub mod builtin;
pub mod error;
pub mod load;
pub mod phrases;
pub mod registry;
pub mod validate;
