//! Known output widths of fixed-dimension embedding models.

use crate::error::{EmbeddingError, Result};

/// Model identifier to embedding width.
pub const DIMENSIONALITY: &[(&str, usize)] = &[
    ("embed-english-v3.0", 1024),
    ("embed-multilingual-v3.0", 1024),
    ("embed-english-light-v3.0", 384),
    ("embed-multilingual-light-v3.0", 384),
    ("voyage-large-2", 1536),
    ("voyage-law-2", 1024),
    ("voyage-code-2", 1536),
];

/// Look up the fixed width of a known model.
pub fn known_dimension(model: &str) -> Option<usize> {
    DIMENSIONALITY
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, dimension)| *dimension)
}

/// Reject a zero output width.
pub fn require_positive(dimension: usize) -> Result<usize> {
    if dimension == 0 {
        return Err(EmbeddingError::Config(
            "dimension must be a positive integer, got 0".to_string(),
        ));
    }
    Ok(dimension)
}

/// Use `explicit` when given, else the table width for `model`.
///
/// An explicit dimension must be positive but is never checked against the
/// table.
pub fn resolve_dimension(model: &str, explicit: Option<usize>) -> Result<usize> {
    match explicit {
        Some(dimension) => require_positive(dimension),
        None => known_dimension(model).ok_or_else(|| EmbeddingError::UnknownModel {
            model: model.to_string(),
        }),
    }
}
