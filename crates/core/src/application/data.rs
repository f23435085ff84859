//! Response views returned by the application services.

use serde::{Deserialize, Serialize};

use crate::domain::{Circle, User, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleData {
    pub circle_id: String,
    pub circle_name: String,
    pub owner_id: String,
    /// Sorted in ascending order.
    pub member_ids: Vec<String>,
}

impl From<&Circle> for CircleData {
    fn from(circle: &Circle) -> Self {
        Self {
            circle_id: circle.id().to_string(),
            circle_name: circle.name().to_string(),
            owner_id: circle.owner_id().to_string(),
            member_ids: circle
                .member_ids()
                .iter()
                .map(UserId::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub user_id: String,
    pub user_name: String,
    pub mail_address: String,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id().to_string(),
            user_name: user.name().to_string(),
            mail_address: user.mail_address().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CircleId, CircleName};

    #[test]
    fn test_circle_data_sorts_members() {
        let circle = Circle::new(
            CircleId::new("c1").unwrap(),
            CircleName::new("Foo").unwrap(),
            UserId::new("u1").unwrap(),
            [UserId::new("u3").unwrap(), UserId::new("u2").unwrap()],
        );

        let data = CircleData::from(&circle);

        assert_eq!(data.circle_name, "Foo");
        assert_eq!(data.member_ids, vec!["u2", "u3"]);
    }

    #[test]
    fn test_user_data_serializes_snake_case() {
        let data = UserData {
            user_id: "u1".to_string(),
            user_name: "alice".to_string(),
            mail_address: "alice@example.com".to_string(),
        };

        let json = serde_json::to_value(&data).unwrap();

        assert_eq!(json["user_name"], "alice");
        assert_eq!(json["mail_address"], "alice@example.com");
    }
}
