use std::future::Future;

use caduceus_core::models::source::ScoredExcerpt;

use crate::error::SourceError;

/// Query interface over approved source excerpts.
///
/// `search` returns every excerpt sharing at least one tag with the query,
/// scored by tag relevance in `[0, 1]` and ordered by relevance, then by
/// excerpt id. Thresholding is the caller's concern.
pub trait SourceIndex: Send + Sync {
    fn search(
        &self,
        topic_tags: &[String],
    ) -> impl Future<Output = Result<Vec<ScoredExcerpt>, SourceError>> + Send;

    /// Number of excerpts held by the index.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Order scored excerpts by descending relevance, ties by excerpt id.
pub(crate) fn sort_scored(scored: &mut [ScoredExcerpt]) {
    scored.sort_by(|a, b| {
        b.relevance
            .total_cmp(&a.relevance)
            .then_with(|| a.excerpt.id.cmp(&b.excerpt.id))
    });
}
