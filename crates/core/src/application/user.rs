//! Application services for users.

use std::sync::Arc;

use crate::domain::{MailAddress, User, UserId, UserName};
use crate::storage::{RepositoryError, UserIdentifier, UserRepository};

use super::{
    ApplicationError, UserData, UserDeleteCommand, UserGetCommand, UserListCommand,
    UserRegisterCommand, UserUpdateCommand,
};

/// Number of users returned by a list request without an explicit limit.
pub const DEFAULT_LIST_LIMIT: usize = 20;

/// Largest page a list request may ask for.
pub const MAX_LIST_LIMIT: usize = 100;

fn user_not_found(identifier: &UserIdentifier, source: RepositoryError) -> ApplicationError {
    ApplicationError::UserNotFound {
        identifier: identifier.to_string(),
        source,
    }
}

fn user_duplicate(user: &User, source: RepositoryError) -> ApplicationError {
    ApplicationError::UserDuplicate {
        mail_address: user.mail_address().to_string(),
        source,
    }
}

/// Registers a new user with a generated id.
pub struct UserRegisterService {
    user_repository: Arc<dyn UserRepository>,
}

impl UserRegisterService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn handle(&self, command: UserRegisterCommand) -> Result<UserData, ApplicationError> {
        let user_name = UserName::new(command.user_name)?;
        let mail_address = MailAddress::new(command.mail_address)?;

        let user = User::new(UserId::generate(), user_name, mail_address);
        self.user_repository
            .create(&user)
            .await
            .map_err(|err| match err {
                RepositoryError::Duplicate { .. } => user_duplicate(&user, err),
                err => ApplicationError::from_repository(err),
            })?;

        tracing::info!(user_id = %user.id(), "Registered user");
        Ok(UserData::from(&user))
    }
}

/// Changes the name and/or mail address of an existing user.
pub struct UserUpdateService {
    user_repository: Arc<dyn UserRepository>,
}

impl UserUpdateService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn handle(&self, command: UserUpdateCommand) -> Result<UserData, ApplicationError> {
        if command.is_empty() {
            return Err(ApplicationError::Argument(
                "At least one of user_name or mail_address is required".to_string(),
            ));
        }

        let user_id = UserId::new(command.user_id)?;
        let user_name = command.user_name.map(UserName::new).transpose()?;
        let mail_address = command.mail_address.map(MailAddress::new).transpose()?;

        let identifier = UserIdentifier::Id(user_id);
        let mut user = self
            .user_repository
            .get(&identifier)
            .await
            .map_err(|err| match err {
                RepositoryError::NotFound { .. } => user_not_found(&identifier, err),
                err => ApplicationError::from_repository(err),
            })?;

        if let Some(user_name) = user_name {
            user.rename(user_name);
        }
        if let Some(mail_address) = mail_address {
            user.change_mail_address(mail_address);
        }

        self.user_repository
            .update(&user)
            .await
            .map_err(|err| match err {
                RepositoryError::Duplicate { .. } => user_duplicate(&user, err),
                RepositoryError::NotFound { .. } => user_not_found(&identifier, err),
                err => ApplicationError::from_repository(err),
            })?;

        tracing::info!(user_id = %user.id(), "Updated user");
        Ok(UserData::from(&user))
    }
}

/// Looks up a user by id or by mail address.
pub struct UserGetService {
    user_repository: Arc<dyn UserRepository>,
}

impl UserGetService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn handle(&self, command: UserGetCommand) -> Result<UserData, ApplicationError> {
        let identifier = match (command.user_id, command.mail_address) {
            (Some(id), None) => UserIdentifier::Id(UserId::new(id)?),
            (None, Some(mail_address)) => {
                UserIdentifier::MailAddress(MailAddress::new(mail_address)?)
            }
            _ => {
                return Err(ApplicationError::Argument(
                    "Exactly one of user_id or mail_address is required".to_string(),
                ))
            }
        };

        let user = self
            .user_repository
            .get(&identifier)
            .await
            .map_err(|err| match err {
                RepositoryError::NotFound { .. } => user_not_found(&identifier, err),
                err => ApplicationError::from_repository(err),
            })?;

        Ok(UserData::from(&user))
    }
}

/// Deletes a user. Deleting a user that does not exist succeeds.
pub struct UserDeleteService {
    user_repository: Arc<dyn UserRepository>,
}

impl UserDeleteService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn handle(&self, command: UserDeleteCommand) -> Result<(), ApplicationError> {
        let user_id = UserId::new(command.user_id)?;

        let user = match self
            .user_repository
            .get(&UserIdentifier::Id(user_id.clone()))
            .await
        {
            Ok(user) => user,
            Err(RepositoryError::NotFound { .. }) => {
                tracing::warn!(user_id = %user_id, "User to delete was not found");
                return Ok(());
            }
            Err(err) => return Err(ApplicationError::from_repository(err)),
        };

        self.user_repository
            .delete(&user)
            .await
            .map_err(ApplicationError::from_repository)?;

        tracing::info!(user_id = %user_id, "Deleted user");
        Ok(())
    }
}

/// Lists users, [`DEFAULT_LIST_LIMIT`] at a time unless asked otherwise.
pub struct UserListService {
    user_repository: Arc<dyn UserRepository>,
}

impl UserListService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn handle(
        &self,
        command: UserListCommand,
    ) -> Result<Vec<UserData>, ApplicationError> {
        let limit = command.limit.unwrap_or(DEFAULT_LIST_LIMIT);
        if limit == 0 {
            return Err(ApplicationError::Argument(
                "Limit must be at least 1".to_string(),
            ));
        }
        if limit > MAX_LIST_LIMIT {
            return Err(ApplicationError::Argument(format!(
                "Cannot get users more than {MAX_LIST_LIMIT}"
            )));
        }

        let users = self
            .user_repository
            .list(limit)
            .await
            .map_err(ApplicationError::from_repository)?;

        Ok(users.iter().map(UserData::from).collect())
    }
}
