//! Error types for the Verso wire contract

use thiserror::Error;

/// Errors from filter validation and query-string decoding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown query parameter: {name}")]
    UnknownParameter { name: String },

    #[error("Duplicate query parameter: {name}")]
    DuplicateParameter { name: String },

    #[error("Malformed query key: {key}")]
    MalformedKey { key: String },
}

/// Result type alias for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_error_display_invalid_value() {
        let err = FilterError::InvalidValue {
            field: "l".to_string(),
            value: "0".to_string(),
            reason: "must be positive".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("l"));
        assert!(msg.contains("0"));
        assert!(msg.contains("must be positive"));
    }

    #[test]
    fn test_filter_error_display_unknown_parameter() {
        let err = FilterError::UnknownParameter {
            name: "limit".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Unknown query parameter"));
        assert!(msg.contains("limit"));
    }

    #[test]
    fn test_filter_error_display_duplicate_parameter() {
        let err = FilterError::DuplicateParameter {
            name: "qs".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Duplicate query parameter"));
        assert!(msg.contains("qs"));
    }

    #[test]
    fn test_filter_error_display_malformed_key() {
        let err = FilterError::MalformedKey {
            key: "q[".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Malformed query key"));
        assert!(msg.contains("q["));
    }
}
