//! Error types for restyle operations.

use thiserror::Error;

/// Errors that can occur while resolving or merging style definitions.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid value description: {0}")]
    Validation(String),

    #[error("unknown {kind} '{id}'")]
    NotFound { kind: &'static str, id: String },

    #[error("unknown element type '{0}'")]
    UnknownType(String),

    #[error("no resolvable value type for '{0}'")]
    UnresolvedValueType(String),

    #[error("style inheritance cycle: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },
}

impl Error {
    /// Strict-lookup failure for a style source identifier.
    pub(crate) fn style_not_found(id: &str) -> Self {
        Error::NotFound {
            kind: "style source",
            id: id.to_string(),
        }
    }

    /// Strict-lookup failure for a value source identifier.
    pub(crate) fn value_not_found(id: &str) -> Self {
        Error::NotFound {
            kind: "value source",
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_display_joins_path() {
        let err = Error::Cycle {
            path: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(err.to_string(), "style inheritance cycle: a -> b -> a");
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::style_not_found("nordTheme");
        assert_eq!(err.to_string(), "unknown style source 'nordTheme'");
    }
}
