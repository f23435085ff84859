//! Hand-written repository stubs for service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{Circle, CircleId, CircleName, MailAddress, User, UserId, UserName};
use crate::storage::{
    CircleIdentifier, CircleRepository, RepositoryError, Result, UserIdentifier, UserRepository,
};

pub(crate) fn user(id: &str, name: &str, mail_address: &str) -> User {
    User::new(
        UserId::new(id).unwrap(),
        UserName::new(name).unwrap(),
        MailAddress::new(mail_address).unwrap(),
    )
}

pub(crate) fn circle(id: &str, name: &str, owner_id: &str, member_ids: &[&str]) -> Circle {
    Circle::new(
        CircleId::new(id).unwrap(),
        CircleName::new(name).unwrap(),
        UserId::new(owner_id).unwrap(),
        member_ids.iter().map(|id| UserId::new(*id).unwrap()),
    )
}

#[derive(Default)]
pub(crate) struct StubUserRepository {
    users: Mutex<HashMap<String, User>>,
    failure: Mutex<Option<RepositoryError>>,
}

impl StubUserRepository {
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let repository = Self::default();
        repository.users.lock().unwrap().extend(
            users
                .into_iter()
                .map(|user| (user.id().to_string(), user)),
        );
        repository
    }

    /// Makes the next call fail with `error`.
    pub fn fail_next(&self, error: RepositoryError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn stored(&self, id: &str) -> Option<User> {
        self.users.lock().unwrap().get(id).cloned()
    }

    fn take_failure(&self) -> Result<()> {
        match self.failure.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn ensure_unique(users: &HashMap<String, User>, user: &User) -> Result<()> {
        let taken = users
            .values()
            .any(|other| other.id() != user.id() && other.mail_address() == user.mail_address());
        if taken {
            return Err(RepositoryError::Duplicate {
                entity_type: "User",
                field: "mailAddress",
                value: user.mail_address().to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for StubUserRepository {
    async fn create(&self, user: &User) -> Result<()> {
        self.take_failure()?;
        let mut users = self.users.lock().unwrap();
        Self::ensure_unique(&users, user)?;
        users.insert(user.id().to_string(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<()> {
        self.take_failure()?;
        let mut users = self.users.lock().unwrap();
        if !users.contains_key(user.id().as_str()) {
            return Err(RepositoryError::NotFound {
                entity_type: "User",
                id: user.id().to_string(),
            });
        }
        Self::ensure_unique(&users, user)?;
        users.insert(user.id().to_string(), user.clone());
        Ok(())
    }

    async fn get(&self, identifier: &UserIdentifier) -> Result<User> {
        self.take_failure()?;
        let users = self.users.lock().unwrap();
        let found = match identifier {
            UserIdentifier::Id(id) => users.get(id.as_str()).cloned(),
            UserIdentifier::MailAddress(mail_address) => users
                .values()
                .find(|user| user.mail_address() == mail_address)
                .cloned(),
        };
        found.ok_or_else(|| RepositoryError::NotFound {
            entity_type: "User",
            id: identifier.to_string(),
        })
    }

    async fn delete(&self, user: &User) -> Result<()> {
        self.take_failure()?;
        self.users.lock().unwrap().remove(user.id().as_str());
        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<User>> {
        self.take_failure()?;
        let users = self.users.lock().unwrap();
        let mut listed: Vec<User> = users.values().cloned().collect();
        listed.sort_by(|a, b| a.id().cmp(b.id()));
        listed.truncate(limit);
        Ok(listed)
    }
}

#[derive(Default)]
pub(crate) struct StubCircleRepository {
    circles: Mutex<HashMap<String, Circle>>,
    failure: Mutex<Option<RepositoryError>>,
}

impl StubCircleRepository {
    pub fn with_circles(circles: impl IntoIterator<Item = Circle>) -> Self {
        let repository = Self::default();
        repository.circles.lock().unwrap().extend(
            circles
                .into_iter()
                .map(|circle| (circle.id().to_string(), circle)),
        );
        repository
    }

    /// Makes the next call fail with `error`.
    pub fn fail_next(&self, error: RepositoryError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn stored(&self, id: &str) -> Option<Circle> {
        self.circles.lock().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.circles.lock().unwrap().len()
    }

    fn take_failure(&self) -> Result<()> {
        match self.failure.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn ensure_unique(circles: &HashMap<String, Circle>, circle: &Circle) -> Result<()> {
        let taken = circles
            .values()
            .any(|other| other.id() != circle.id() && other.name() == circle.name());
        if taken {
            return Err(RepositoryError::Duplicate {
                entity_type: "Circle",
                field: "circleName",
                value: circle.name().to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CircleRepository for StubCircleRepository {
    async fn create(&self, circle: &Circle) -> Result<()> {
        self.take_failure()?;
        let mut circles = self.circles.lock().unwrap();
        Self::ensure_unique(&circles, circle)?;
        circles.insert(circle.id().to_string(), circle.clone());
        Ok(())
    }

    async fn update(&self, circle: &Circle) -> Result<()> {
        self.take_failure()?;
        let mut circles = self.circles.lock().unwrap();
        if !circles.contains_key(circle.id().as_str()) {
            return Err(RepositoryError::NotFound {
                entity_type: "Circle",
                id: circle.id().to_string(),
            });
        }
        Self::ensure_unique(&circles, circle)?;
        circles.insert(circle.id().to_string(), circle.clone());
        Ok(())
    }

    async fn get(&self, identifier: &CircleIdentifier) -> Result<Circle> {
        self.take_failure()?;
        let circles = self.circles.lock().unwrap();
        let found = match identifier {
            CircleIdentifier::Id(id) => circles.get(id.as_str()).cloned(),
            CircleIdentifier::Name(name) => circles
                .values()
                .find(|circle| circle.name() == name)
                .cloned(),
        };
        found.ok_or_else(|| RepositoryError::NotFound {
            entity_type: "Circle",
            id: identifier.to_string(),
        })
    }

    async fn delete(&self, circle: &Circle) -> Result<()> {
        self.take_failure()?;
        self.circles.lock().unwrap().remove(circle.id().as_str());
        Ok(())
    }
}
