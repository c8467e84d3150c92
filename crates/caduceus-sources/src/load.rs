use std::path::Path;

use caduceus_core::models::source::SourceExcerpt;
use tracing::info;

use crate::error::SourceError;

/// Load a JSON array of already-parsed source excerpts.
pub fn load_excerpts(path: &Path) -> Result<Vec<SourceExcerpt>, SourceError> {
    let json = std::fs::read_to_string(path)?;
    let excerpts: Vec<SourceExcerpt> = serde_json::from_str(&json)?;
    info!(path = %path.display(), count = excerpts.len(), "loaded source excerpts");
    Ok(excerpts)
}
