//! Citation resolution against the source index.
//!
//! Every lookup is bounded by a timeout and retried once on a transient
//! failure. Failures never propagate: they become a [`Resolution`] with no
//! citations and a status saying why.

use std::collections::HashSet;
use std::time::Duration;

use caduceus_core::models::citation::{Citation, CitationStatus, Resolution};
use caduceus_core::models::source::ScoredExcerpt;
use caduceus_sources::SourceIndex;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::config::EngineConfig;

/// A statement that needs source support, with the tags used to find it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRequest {
    pub claim: String,
    pub topic_tags: Vec<String>,
}

impl ClaimRequest {
    pub fn new(claim: impl Into<String>, topic_tags: &[String]) -> Self {
        Self {
            claim: claim.into(),
            topic_tags: topic_tags.to_vec(),
        }
    }
}

pub struct CitationResolver<'a, S> {
    index: &'a S,
    relevance_threshold: f32,
    max_citations: usize,
    timeout: Duration,
}

impl<'a, S: SourceIndex> CitationResolver<'a, S> {
    pub fn new(index: &'a S, config: &EngineConfig) -> Self {
        Self {
            index,
            relevance_threshold: config.relevance_threshold,
            max_citations: config.max_citations_per_claim,
            timeout: config.source_timeout(),
        }
    }

    pub async fn resolve(&self, claim: &str, topic_tags: &[String]) -> Resolution {
        let mut retried = false;
        loop {
            match tokio::time::timeout(self.timeout, self.index.search(topic_tags)).await {
                Err(_) => {
                    warn!(
                        claim,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "source lookup timed out"
                    );
                    return Resolution::unsupported(claim, CitationStatus::TimedOut);
                }
                Ok(Ok(hits)) => return self.select(claim, hits),
                Ok(Err(e)) if e.is_transient() && !retried => {
                    warn!(claim, error = %e, "transient source failure, retrying once");
                    retried = true;
                }
                Ok(Err(e)) => {
                    warn!(claim, error = %e, "source lookup failed");
                    return Resolution::unsupported(claim, CitationStatus::Unavailable);
                }
            }
        }
    }

    /// Resolve every claim concurrently. Results keep the input order.
    pub async fn resolve_all(&self, claims: &[ClaimRequest]) -> Vec<Resolution> {
        let resolutions = join_all(
            claims
                .iter()
                .map(|c| self.resolve(&c.claim, &c.topic_tags)),
        )
        .await;

        debug!(
            claims = claims.len(),
            supported = resolutions.iter().filter(|r| r.is_supported()).count(),
            "citations resolved"
        );
        resolutions
    }

    fn select(&self, claim: &str, mut hits: Vec<ScoredExcerpt>) -> Resolution {
        hits.retain(|h| h.relevance >= self.relevance_threshold);
        hits.sort_by(|a, b| {
            b.relevance
                .total_cmp(&a.relevance)
                .then_with(|| a.excerpt.id.cmp(&b.excerpt.id))
        });

        let mut seen = HashSet::new();
        let citations: Vec<Citation> = hits
            .iter()
            .filter(|h| seen.insert(h.excerpt.id.clone()))
            .take(self.max_citations)
            .map(|h| Citation::new(&h.excerpt, claim))
            .collect();

        let status = if citations.is_empty() {
            CitationStatus::NotFound
        } else {
            CitationStatus::Found
        };
        Resolution {
            claim: claim.to_string(),
            citations,
            status,
        }
    }
}
