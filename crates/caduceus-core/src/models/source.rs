use serde::{Deserialize, Serialize};

/// Maximum characters of excerpt text quoted into a citation.
pub const SNIPPET_CHARS: usize = 400;

/// An approved passage from a source document, already parsed to text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceExcerpt {
    pub id: String,
    pub document_id: String,
    /// Section or page locator within the document, e.g. `p.12`.
    pub locator: String,
    pub text: String,
    #[serde(default)]
    pub topic_tags: Vec<String>,
}

impl SourceExcerpt {
    /// Short bracketed reference, e.g. `[esc-guidelines.pdf p.12]`.
    pub fn label(&self) -> String {
        format!("[{} {}]", self.document_id, self.locator)
    }

    /// Excerpt text with whitespace collapsed, cut to [`SNIPPET_CHARS`].
    pub fn snippet(&self) -> String {
        let collapsed = self.text.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.chars().count() <= SNIPPET_CHARS {
            return collapsed;
        }
        let cut: String = collapsed.chars().take(SNIPPET_CHARS).collect();
        format!("{}...", cut.trim_end())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = normalize_tag(tag);
        self.topic_tags.iter().any(|t| normalize_tag(t) == tag)
    }
}

/// An excerpt returned by a source index with its relevance in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredExcerpt {
    pub excerpt: SourceExcerpt,
    pub relevance: f32,
}

/// Canonical form of a topic tag: trimmed, lowercase, inner whitespace
/// and hyphens folded to `_`.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Fraction of the distinct query tags carried by the excerpt.
pub fn tag_relevance(query_tags: &[String], excerpt: &SourceExcerpt) -> f32 {
    let mut wanted: Vec<String> = query_tags.iter().map(|t| normalize_tag(t)).collect();
    wanted.sort();
    wanted.dedup();
    wanted.retain(|t| !t.is_empty());
    if wanted.is_empty() {
        return 0.0;
    }
    let matched = wanted.iter().filter(|t| excerpt.has_tag(t)).count();
    matched as f32 / wanted.len() as f32
}
