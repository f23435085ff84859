//! Application services for circles.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::{Circle, CircleId, CircleName, UserId};
use crate::storage::{CircleIdentifier, CircleRepository, RepositoryError, UserRepository};

use super::{
    find_missing_users, ApplicationError, CircleData, CircleDeleteCommand, CircleGetCommand,
    CircleRegisterCommand, CircleUpdateCommand,
};

fn circle_not_found(identifier: &CircleIdentifier, source: RepositoryError) -> ApplicationError {
    ApplicationError::CircleNotFound {
        identifier: identifier.to_string(),
        source,
    }
}

fn circle_duplicate(circle: &Circle, source: RepositoryError) -> ApplicationError {
    ApplicationError::CircleDuplicate {
        circle_name: circle.name().to_string(),
        source,
    }
}

async fn ensure_owner_exists(
    user_repository: &dyn UserRepository,
    owner_id: &UserId,
) -> Result<(), ApplicationError> {
    let missing = find_missing_users(user_repository, [owner_id]).await?;
    if !missing.is_empty() {
        return Err(ApplicationError::OwnerNotFound {
            owner_id: owner_id.to_string(),
        });
    }
    Ok(())
}

/// Registers a new circle with a generated id and no members.
pub struct CircleRegisterService {
    circle_repository: Arc<dyn CircleRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl CircleRegisterService {
    pub fn new(
        circle_repository: Arc<dyn CircleRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            circle_repository,
            user_repository,
        }
    }

    pub async fn handle(
        &self,
        command: CircleRegisterCommand,
    ) -> Result<CircleData, ApplicationError> {
        let owner_id = UserId::new(command.owner_id)?;
        let circle_name = CircleName::new(command.circle_name)?;

        ensure_owner_exists(self.user_repository.as_ref(), &owner_id).await?;

        let circle = Circle::new(CircleId::generate(), circle_name, owner_id, []);
        self.circle_repository
            .create(&circle)
            .await
            .map_err(|err| match err {
                RepositoryError::Duplicate { .. } => circle_duplicate(&circle, err),
                err => ApplicationError::from_repository(err),
            })?;

        tracing::info!(circle_id = %circle.id(), circle_name = %circle.name(), "Registered circle");
        Ok(CircleData::from(&circle))
    }
}

/// Changes the name, owner or members of an existing circle.
pub struct CircleUpdateService {
    circle_repository: Arc<dyn CircleRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl CircleUpdateService {
    pub fn new(
        circle_repository: Arc<dyn CircleRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            circle_repository,
            user_repository,
        }
    }

    pub async fn handle(
        &self,
        command: CircleUpdateCommand,
    ) -> Result<CircleData, ApplicationError> {
        if command.is_empty() {
            return Err(ApplicationError::Argument(
                "At least one of circle_name, owner_id or member_ids is required".to_string(),
            ));
        }

        let circle_id = CircleId::new(command.circle_id)?;
        let circle_name = command.circle_name.map(CircleName::new).transpose()?;
        let owner_id = command.owner_id.map(UserId::new).transpose()?;
        let member_ids = command
            .member_ids
            .map(|ids| {
                ids.into_iter()
                    .map(UserId::new)
                    .collect::<Result<BTreeSet<_>, _>>()
            })
            .transpose()?;

        let identifier = CircleIdentifier::Id(circle_id);
        let mut circle = self
            .circle_repository
            .get(&identifier)
            .await
            .map_err(|err| match err {
                RepositoryError::NotFound { .. } => circle_not_found(&identifier, err),
                err => ApplicationError::from_repository(err),
            })?;

        if let Some(owner_id) = owner_id {
            ensure_owner_exists(self.user_repository.as_ref(), &owner_id).await?;
            circle.change_owner(owner_id);
        }

        if let Some(member_ids) = member_ids {
            let missing = find_missing_users(self.user_repository.as_ref(), &member_ids).await?;
            if !missing.is_empty() {
                return Err(ApplicationError::MembersNotFound {
                    member_ids: missing.iter().map(UserId::to_string).collect(),
                });
            }
            circle.replace_members(member_ids);
        }

        if let Some(circle_name) = circle_name {
            circle.rename(circle_name);
        }

        self.circle_repository
            .update(&circle)
            .await
            .map_err(|err| match err {
                RepositoryError::Duplicate { .. } => circle_duplicate(&circle, err),
                RepositoryError::NotFound { .. } => circle_not_found(&identifier, err),
                err => ApplicationError::from_repository(err),
            })?;

        tracing::info!(circle_id = %circle.id(), "Updated circle");
        Ok(CircleData::from(&circle))
    }
}

/// Looks up a circle by id or by name.
pub struct CircleGetService {
    circle_repository: Arc<dyn CircleRepository>,
}

impl CircleGetService {
    pub fn new(circle_repository: Arc<dyn CircleRepository>) -> Self {
        Self { circle_repository }
    }

    pub async fn handle(&self, command: CircleGetCommand) -> Result<CircleData, ApplicationError> {
        let identifier = match (command.circle_id, command.circle_name) {
            (Some(id), None) => CircleIdentifier::Id(CircleId::new(id)?),
            (None, Some(name)) => CircleIdentifier::Name(CircleName::new(name)?),
            _ => {
                return Err(ApplicationError::Argument(
                    "Exactly one of circle_id or circle_name is required".to_string(),
                ))
            }
        };

        let circle = self
            .circle_repository
            .get(&identifier)
            .await
            .map_err(|err| match err {
                RepositoryError::NotFound { .. } => circle_not_found(&identifier, err),
                err => ApplicationError::from_repository(err),
            })?;

        Ok(CircleData::from(&circle))
    }
}

/// Deletes a circle. Deleting a circle that does not exist succeeds.
pub struct CircleDeleteService {
    circle_repository: Arc<dyn CircleRepository>,
}

impl CircleDeleteService {
    pub fn new(circle_repository: Arc<dyn CircleRepository>) -> Self {
        Self { circle_repository }
    }

    pub async fn handle(&self, command: CircleDeleteCommand) -> Result<(), ApplicationError> {
        let circle_id = CircleId::new(command.circle_id)?;

        let circle = match self
            .circle_repository
            .get(&CircleIdentifier::Id(circle_id.clone()))
            .await
        {
            Ok(circle) => circle,
            Err(RepositoryError::NotFound { .. }) => {
                tracing::warn!(circle_id = %circle_id, "Circle to delete was not found");
                return Ok(());
            }
            Err(err) => return Err(ApplicationError::from_repository(err)),
        };

        self.circle_repository
            .delete(&circle)
            .await
            .map_err(ApplicationError::from_repository)?;

        tracing::info!(circle_id = %circle_id, "Deleted circle");
        Ok(())
    }
}
