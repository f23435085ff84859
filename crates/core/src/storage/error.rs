use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} {field} is already taken: {value}")]
    Duplicate {
        entity_type: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("{entity_type} was modified concurrently: {id}")]
    Conflict {
        entity_type: &'static str,
        id: String,
    },
    #[error("Schema mismatch on {field}: expected {expected}, found {found}")]
    SchemaMismatch {
        field: &'static str,
        expected: &'static str,
        found: String,
    },
    /// The store did not confirm the outcome; the write may or may not have been applied.
    #[error("Outcome unknown: {0}")]
    Indeterminate(String),
    #[error("Storage operation failed: {0}")]
    Unknown(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_not_found_display() {
        let error = RepositoryError::NotFound {
            entity_type: "Circle",
            id: "c1".to_string(),
        };
        assert_eq!(error.to_string(), "Circle not found: c1");
    }

    #[test]
    fn test_repository_error_duplicate_display() {
        let error = RepositoryError::Duplicate {
            entity_type: "Circle",
            field: "circleName",
            value: "Foo".to_string(),
        };
        assert_eq!(error.to_string(), "Circle circleName is already taken: Foo");
    }

    #[test]
    fn test_repository_error_schema_mismatch_display() {
        let error = RepositoryError::SchemaMismatch {
            field: "memberIds",
            expected: "L",
            found: "S".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Schema mismatch on memberIds: expected L, found S"
        );
    }

    #[test]
    fn test_repository_error_indeterminate_display() {
        let error = RepositoryError::Indeterminate("request timed out".to_string());
        assert_eq!(error.to_string(), "Outcome unknown: request timed out");
    }
}
