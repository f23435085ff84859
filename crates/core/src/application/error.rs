use thiserror::Error;

use crate::domain::DomainError;
use crate::storage::RepositoryError;

/// Coarse classification of an [`ApplicationError`], used by transports to
/// pick a response status without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Argument,
    NotFound,
    Duplicate,
    Conflict,
    /// A write may or may not have been applied.
    Indeterminate,
    Unknown,
}

/// Errors returned by application services.
///
/// Display messages are safe to show to API callers. Storage causes are kept
/// as the error source for logging.
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("{0}")]
    Argument(String),
    #[error("Circle not found: {identifier}")]
    CircleNotFound {
        identifier: String,
        #[source]
        source: RepositoryError,
    },
    #[error("User not found: {identifier}")]
    UserNotFound {
        identifier: String,
        #[source]
        source: RepositoryError,
    },
    #[error("Owner not found: {owner_id}")]
    OwnerNotFound { owner_id: String },
    #[error("Members not found: {}", .member_ids.join(", "))]
    MembersNotFound { member_ids: Vec<String> },
    #[error("Circle name is already taken: {circle_name}")]
    CircleDuplicate {
        circle_name: String,
        #[source]
        source: RepositoryError,
    },
    #[error("Mail address is already taken: {mail_address}")]
    UserDuplicate {
        mail_address: String,
        #[source]
        source: RepositoryError,
    },
    #[error("The resource was modified concurrently, please retry")]
    Conflict {
        #[source]
        source: RepositoryError,
    },
    #[error("The outcome of the request is unknown, check the resource before retrying")]
    Indeterminate {
        #[source]
        source: RepositoryError,
    },
    #[error("Unexpected storage failure")]
    Unknown {
        #[source]
        source: RepositoryError,
    },
}

impl ApplicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Argument(_) | Self::OwnerNotFound { .. } | Self::MembersNotFound { .. } => {
                ErrorKind::Argument
            }
            Self::CircleNotFound { .. } | Self::UserNotFound { .. } => ErrorKind::NotFound,
            Self::CircleDuplicate { .. } | Self::UserDuplicate { .. } => ErrorKind::Duplicate,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Indeterminate { .. } => ErrorKind::Indeterminate,
            Self::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /// Wraps a repository failure that has no service-specific meaning.
    pub(crate) fn from_repository(source: RepositoryError) -> Self {
        match source {
            RepositoryError::Conflict { .. } => Self::Conflict { source },
            RepositoryError::Indeterminate(_) => Self::Indeterminate { source },
            source => Self::Unknown { source },
        }
    }
}

impl From<DomainError> for ApplicationError {
    fn from(error: DomainError) -> Self {
        Self::Argument(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_domain_errors_become_arguments() {
        let error = ApplicationError::from(DomainError::InvalidMailAddress("nope".to_string()));
        assert_eq!(error.kind(), ErrorKind::Argument);
        assert_eq!(error.to_string(), "Invalid mail address: nope");
    }

    #[test]
    fn test_reference_errors_are_arguments() {
        let owner = ApplicationError::OwnerNotFound {
            owner_id: "u9".to_string(),
        };
        let members = ApplicationError::MembersNotFound {
            member_ids: vec!["u8".to_string(), "u9".to_string()],
        };

        assert_eq!(owner.kind(), ErrorKind::Argument);
        assert_eq!(members.kind(), ErrorKind::Argument);
        assert_eq!(members.to_string(), "Members not found: u8, u9");
    }

    #[test]
    fn test_from_repository_keeps_conflicts_distinct() {
        let conflict = ApplicationError::from_repository(RepositoryError::Conflict {
            entity_type: "Circle",
            id: "c1".to_string(),
        });
        let unknown = ApplicationError::from_repository(RepositoryError::SchemaMismatch {
            field: "ownerId",
            expected: "S",
            found: "missing".to_string(),
        });

        assert_eq!(conflict.kind(), ErrorKind::Conflict);
        assert_eq!(unknown.kind(), ErrorKind::Unknown);
        assert!(unknown.source().is_some());
        assert_eq!(unknown.to_string(), "Unexpected storage failure");
    }

    #[test]
    fn test_timed_out_write_is_not_reported_as_failure() {
        let error =
            ApplicationError::from_repository(RepositoryError::Indeterminate("timeout".into()));

        assert_eq!(error.kind(), ErrorKind::Indeterminate);
        assert!(error.source().is_some());
        assert!(error.to_string().contains("unknown"));
    }
}
