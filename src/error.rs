use thiserror::Error;

/// Failures surfaced to the visitor. `Display` is the bare message so it can
/// be shown as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GalleryError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Upload(String),
    #[error("{0}")]
    Insert(String),
    #[error("{0}")]
    Query(String),
}

impl GalleryError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Upload(_) => "upload",
            Self::Insert(_) => "insert",
            Self::Query(_) => "query",
        }
    }

    pub fn is_remote(&self) -> bool {
        !matches!(self, Self::Validation(_))
    }
}
