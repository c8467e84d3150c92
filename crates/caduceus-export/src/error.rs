use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("report template is invalid: {0}")]
    TemplateParse(String),

    #[error("failed to render report: {0}")]
    TemplateRender(String),

    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<tera::Error> for ExportError {
    fn from(e: tera::Error) -> Self {
        ExportError::TemplateRender(e.to_string())
    }
}
