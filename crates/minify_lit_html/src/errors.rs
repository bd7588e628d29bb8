//! Error definitions of the loader

use minify_lit_html_transform::TransformError;
use swc_core::common::{Spanned, DUMMY_SP};

#[derive(Debug)]
pub enum LoaderError {
    /// The file could not be parsed, minified or printed.
    Transform(TransformError),

    /// The freshly generated source map is not valid JSON.
    /// This is reported before any merging takes place.
    OutputMap(serde_json::Error),
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::Transform(e) => write!(f, "{e}"),
            LoaderError::OutputMap(e) => write!(f, "generated source map is invalid: {e}"),
        }
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoaderError::Transform(_) => None,
            LoaderError::OutputMap(e) => Some(e),
        }
    }
}

impl From<TransformError> for LoaderError {
    fn from(value: TransformError) -> Self {
        Self::Transform(value)
    }
}

impl Spanned for LoaderError {
    fn span(&self) -> swc_core::common::Span {
        match self {
            LoaderError::Transform(e) => e.span(),
            LoaderError::OutputMap(_) => DUMMY_SP,
        }
    }
}
