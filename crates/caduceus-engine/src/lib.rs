//! caduceus-engine
//!
//! The reasoning pipeline: normalize an encounter, evaluate red flags, rank
//! differentials, resolve citations, compose the report and gate it through
//! the safety guard.

pub mod citations;
pub mod compose;
pub mod config;
pub mod error;
pub mod guard;
pub mod normalize;
pub mod pipeline;
pub mod ranker;
pub mod redflags;

pub use config::EngineConfig;
pub use guard::ApprovedReport;
pub use pipeline::Engine;
