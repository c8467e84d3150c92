use std::collections::HashSet;

use caduceus_core::models::source::{ScoredExcerpt, SourceExcerpt, tag_relevance};

use crate::error::SourceError;
use crate::index::{SourceIndex, sort_scored};

/// A linear-scan index over excerpts held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySourceIndex {
    excerpts: Vec<SourceExcerpt>,
}

impl MemorySourceIndex {
    pub fn new(excerpts: Vec<SourceExcerpt>) -> Result<Self, SourceError> {
        let mut seen = HashSet::new();
        for excerpt in &excerpts {
            if !seen.insert(excerpt.id.as_str()) {
                return Err(SourceError::DuplicateExcerpt(excerpt.id.clone()));
            }
        }
        Ok(Self { excerpts })
    }

    pub fn search_blocking(&self, topic_tags: &[String]) -> Vec<ScoredExcerpt> {
        let mut scored: Vec<ScoredExcerpt> = self
            .excerpts
            .iter()
            .filter_map(|excerpt| {
                let relevance = tag_relevance(topic_tags, excerpt);
                (relevance > 0.0).then(|| ScoredExcerpt {
                    excerpt: excerpt.clone(),
                    relevance,
                })
            })
            .collect();
        sort_scored(&mut scored);
        scored
    }
}

impl SourceIndex for MemorySourceIndex {
    async fn search(&self, topic_tags: &[String]) -> Result<Vec<ScoredExcerpt>, SourceError> {
        Ok(self.search_blocking(topic_tags))
    }

    fn len(&self) -> usize {
        self.excerpts.len()
    }
}
