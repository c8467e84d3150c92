//! Tantivy-backed source index.
//!
//! Excerpts are written once into an in-RAM index at construction. Topic
//! tags are stored in normalized form and matched as exact terms. Lookups
//! run on the blocking pool so callers can bound them with a timeout.

use std::collections::HashSet;

use caduceus_core::models::source::{ScoredExcerpt, SourceExcerpt, normalize_tag, tag_relevance};
use caduceus_core::schema::{build_schema, field, get_field};
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Occur, Query, TermQuery};
use tantivy::schema::{IndexRecordOption, Value};
use tantivy::{Index, IndexReader, IndexWriter, TantivyDocument, Term};
use tracing::{debug, info};

use crate::error::SourceError;
use crate::index::{SourceIndex, sort_scored};

const WRITER_MEMORY_BYTES: usize = 50_000_000;

#[derive(Clone)]
pub struct TantivySourceIndex {
    index: Index,
    reader: IndexReader,
    len: usize,
}

impl TantivySourceIndex {
    /// Index the given excerpts. Excerpt ids must be unique.
    pub fn build(excerpts: &[SourceExcerpt]) -> Result<Self, SourceError> {
        let schema = build_schema();
        let index = Index::create_in_ram(schema.clone());

        let id_field = get_field(&schema, field::ID);
        let document_field = get_field(&schema, field::DOCUMENT_ID);
        let locator_field = get_field(&schema, field::LOCATOR);
        let text_field = get_field(&schema, field::TEXT);
        let tags_field = get_field(&schema, field::TOPIC_TAGS);

        let mut writer: IndexWriter = index.writer_with_num_threads(1, WRITER_MEMORY_BYTES)?;
        let mut seen = HashSet::new();
        for excerpt in excerpts {
            if !seen.insert(excerpt.id.as_str()) {
                return Err(SourceError::DuplicateExcerpt(excerpt.id.clone()));
            }

            let mut doc = TantivyDocument::new();
            doc.add_text(id_field, &excerpt.id);
            doc.add_text(document_field, &excerpt.document_id);
            doc.add_text(locator_field, &excerpt.locator);
            doc.add_text(text_field, &excerpt.text);
            for tag in &excerpt.topic_tags {
                let tag = normalize_tag(tag);
                if !tag.is_empty() {
                    doc.add_text(tags_field, &tag);
                }
            }
            writer.add_document(doc)?;
        }
        writer.commit()?;

        let reader = index.reader()?;
        info!(excerpts = excerpts.len(), "source index built");

        Ok(Self {
            index,
            reader,
            len: excerpts.len(),
        })
    }

    /// Synchronous tag lookup backing [`SourceIndex::search`].
    pub fn search_blocking(&self, topic_tags: &[String]) -> Result<Vec<ScoredExcerpt>, SourceError> {
        let mut tags: Vec<String> = topic_tags
            .iter()
            .map(|t| normalize_tag(t))
            .filter(|t| !t.is_empty())
            .collect();
        tags.sort();
        tags.dedup();
        if tags.is_empty() || self.len == 0 {
            return Ok(Vec::new());
        }

        let schema = self.index.schema();
        let tags_field = get_field(&schema, field::TOPIC_TAGS);

        let clauses: Vec<(Occur, Box<dyn Query>)> = tags
            .iter()
            .map(|tag| {
                let query: Box<dyn Query> = Box::new(TermQuery::new(
                    Term::from_field_text(tags_field, tag),
                    IndexRecordOption::Basic,
                ));
                (Occur::Should, query)
            })
            .collect();
        let query = BooleanQuery::new(clauses);

        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&query, &TopDocs::with_limit(self.len))?;

        let mut scored = Vec::with_capacity(top_docs.len());
        for (_score, address) in top_docs {
            let doc = searcher.doc::<TantivyDocument>(address)?;
            let excerpt = self.excerpt_from_doc(&doc);
            let relevance = tag_relevance(&tags, &excerpt);
            if relevance > 0.0 {
                scored.push(ScoredExcerpt { excerpt, relevance });
            }
        }
        sort_scored(&mut scored);

        debug!(tags = ?tags, hits = scored.len(), "source lookup");
        Ok(scored)
    }

    fn excerpt_from_doc(&self, doc: &TantivyDocument) -> SourceExcerpt {
        let schema = self.index.schema();
        let text_of = |name: &str| {
            doc.get_first(get_field(&schema, name))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };

        SourceExcerpt {
            id: text_of(field::ID),
            document_id: text_of(field::DOCUMENT_ID),
            locator: text_of(field::LOCATOR),
            text: text_of(field::TEXT),
            topic_tags: doc
                .get_all(get_field(&schema, field::TOPIC_TAGS))
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl SourceIndex for TantivySourceIndex {
    async fn search(&self, topic_tags: &[String]) -> Result<Vec<ScoredExcerpt>, SourceError> {
        let index = self.clone();
        let topic_tags = topic_tags.to_vec();
        tokio::task::spawn_blocking(move || index.search_blocking(&topic_tags))
            .await
            .map_err(|e| SourceError::Unavailable(format!("search task failed: {e}")))?
    }

    fn len(&self) -> usize {
        self.len
    }
}
