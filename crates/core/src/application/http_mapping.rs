//! Pure functions for mapping application errors to HTTP status codes.

use super::{ApplicationError, ErrorKind};

/// Maps an [`ErrorKind`] to an HTTP status code.
pub fn error_kind_to_status_code(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::Argument => 400,
        ErrorKind::NotFound => 404,
        ErrorKind::Duplicate => 409,
        ErrorKind::Conflict => 409,
        ErrorKind::Indeterminate => 504,
        ErrorKind::Unknown => 500,
    }
}

/// Maps an [`ApplicationError`] to an HTTP status code.
///
/// # Examples
///
/// ```
/// use circles_core::application::{ApplicationError, application_error_to_status_code};
///
/// let error = ApplicationError::Argument("limit must be a number".to_string());
/// assert_eq!(application_error_to_status_code(&error), 400);
/// ```
pub fn application_error_to_status_code(error: &ApplicationError) -> u16 {
    error_kind_to_status_code(error.kind())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RepositoryError;

    #[test]
    fn test_kinds_map_to_statuses() {
        assert_eq!(error_kind_to_status_code(ErrorKind::Argument), 400);
        assert_eq!(error_kind_to_status_code(ErrorKind::NotFound), 404);
        assert_eq!(error_kind_to_status_code(ErrorKind::Duplicate), 409);
        assert_eq!(error_kind_to_status_code(ErrorKind::Conflict), 409);
        assert_eq!(error_kind_to_status_code(ErrorKind::Indeterminate), 504);
        assert_eq!(error_kind_to_status_code(ErrorKind::Unknown), 500);
    }

    #[test]
    fn test_missing_owner_is_bad_request() {
        let error = ApplicationError::OwnerNotFound {
            owner_id: "u1".to_string(),
        };
        assert_eq!(application_error_to_status_code(&error), 400);
    }

    #[test]
    fn test_missing_circle_is_not_found() {
        let error = ApplicationError::CircleNotFound {
            identifier: "id c1".to_string(),
            source: RepositoryError::NotFound {
                entity_type: "Circle",
                id: "c1".to_string(),
            },
        };
        assert_eq!(application_error_to_status_code(&error), 404);
    }
}
