use async_trait::async_trait;

use crate::domain::{Circle, User};

use super::{CircleIdentifier, Result, UserIdentifier};

/// Repository for circle operations.
///
/// Implementations guarantee that no two stored circles share a name.
#[async_trait]
pub trait CircleRepository: Send + Sync {
    /// Creates a new circle, failing with `Duplicate` when the name is taken.
    async fn create(&self, circle: &Circle) -> Result<()>;

    /// Replaces the stored state of an existing circle.
    async fn update(&self, circle: &Circle) -> Result<()>;

    /// Gets a circle by id or by name.
    async fn get(&self, identifier: &CircleIdentifier) -> Result<Circle>;

    /// Deletes a circle. Deleting an absent circle is not an error.
    async fn delete(&self, circle: &Circle) -> Result<()>;
}

/// Repository for user operations.
///
/// Implementations guarantee that no two stored users share a mail address.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a new user, failing with `Duplicate` when the mail address is taken.
    async fn create(&self, user: &User) -> Result<()>;

    /// Replaces the stored state of an existing user.
    async fn update(&self, user: &User) -> Result<()>;

    /// Gets a user by id or by mail address.
    async fn get(&self, identifier: &UserIdentifier) -> Result<User>;

    /// Deletes a user. Deleting an absent user is not an error.
    async fn delete(&self, user: &User) -> Result<()>;

    /// Lists up to `limit` users in no particular order.
    async fn list(&self, limit: usize) -> Result<Vec<User>>;
}
