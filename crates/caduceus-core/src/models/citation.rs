use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::source::SourceExcerpt;

/// A reference to an approved excerpt plus the claim it supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Citation {
    pub excerpt_id: String,
    pub document_id: String,
    pub locator: String,
    pub snippet: String,
    pub claim: String,
}

impl Citation {
    pub fn new(excerpt: &SourceExcerpt, claim: impl Into<String>) -> Self {
        Self {
            excerpt_id: excerpt.id.clone(),
            document_id: excerpt.document_id.clone(),
            locator: excerpt.locator.clone(),
            snippet: excerpt.snippet(),
            claim: claim.into(),
        }
    }

    pub fn label(&self) -> String {
        format!("[{} {}]", self.document_id, self.locator)
    }
}

/// How a citation lookup ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CitationStatus {
    Found,
    NotFound,
    TimedOut,
    Unavailable,
}

/// A claim with its resolved citations. An empty citation list is a
/// first-class outcome; `status` says why it is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Resolution {
    pub claim: String,
    pub citations: Vec<Citation>,
    pub status: CitationStatus,
}

impl Resolution {
    pub fn unsupported(claim: impl Into<String>, status: CitationStatus) -> Self {
        Self {
            claim: claim.into(),
            citations: Vec::new(),
            status,
        }
    }

    pub fn is_supported(&self) -> bool {
        !self.citations.is_empty()
    }
}
