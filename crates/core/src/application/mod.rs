//! Application services.
//!
//! Each service validates a command into domain values, enforces the
//! cross-entity invariants (owners and members must exist) and delegates
//! persistence to the storage ports.

mod circle;
mod commands;
mod data;
mod error;
mod http_mapping;
mod user;

#[cfg(test)]
mod testing;

pub use circle::{CircleDeleteService, CircleGetService, CircleRegisterService, CircleUpdateService};
pub use commands::{
    CircleDeleteCommand, CircleGetCommand, CircleRegisterCommand, CircleUpdateCommand,
    UserDeleteCommand, UserGetCommand, UserListCommand, UserRegisterCommand, UserUpdateCommand,
};
pub use data::{CircleData, UserData};
pub use error::{ApplicationError, ErrorKind};
pub use http_mapping::{application_error_to_status_code, error_kind_to_status_code};
pub use user::{
    UserDeleteService, UserGetService, UserListService, UserRegisterService, UserUpdateService,
    DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT,
};

use crate::domain::UserId;
use crate::storage::{RepositoryError, UserIdentifier, UserRepository};

/// Returns the ids among `user_ids` that do not refer to a stored user, in input order.
async fn find_missing_users<'a>(
    user_repository: &dyn UserRepository,
    user_ids: impl IntoIterator<Item = &'a UserId>,
) -> Result<Vec<UserId>, ApplicationError> {
    let mut missing = Vec::new();
    for user_id in user_ids {
        match user_repository.get(&UserIdentifier::Id(user_id.clone())).await {
            Ok(_) => {}
            Err(RepositoryError::NotFound { .. }) => missing.push(user_id.clone()),
            Err(err) => return Err(ApplicationError::from_repository(err)),
        }
    }
    Ok(missing)
}
