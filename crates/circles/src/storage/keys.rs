//! DynamoDB key generation functions.
//!
//! Pure functions for generating partition keys following the single-table design.
//! Entity records live under their own id; each unique attribute value is
//! reserved by a separate record under a prefixed key.

use circles_core::domain::{CircleId, UserId};

// ============================================================================
// Attribute names
// ============================================================================

pub const PK: &str = "pk";
pub const GSI1_PK: &str = "gsi1pk";
pub const GSI2_PK: &str = "gsi2pk";
pub const ENTITY_TYPE: &str = "entityType";

// ============================================================================
// Key prefixes
// ============================================================================

pub const CIRCLE_NAME_PREFIX: &str = "circleName#";
pub const MAIL_ADDRESS_PREFIX: &str = "mailAddress#";

// ============================================================================
// Circle keys
// ============================================================================

/// Generate primary key for a Circle.
///
/// Pattern: `<circle_id>`
pub fn circle_pk(circle_id: &CircleId) -> String {
    circle_id.to_string()
}

/// Generate the key of the record reserving a circle name.
///
/// Pattern: `circleName#<circle_name>`
pub fn circle_name_reservation_pk(circle_name: &str) -> String {
    format!("{CIRCLE_NAME_PREFIX}{circle_name}")
}

// ============================================================================
// User keys
// ============================================================================

/// Generate primary key for a User.
///
/// Pattern: `<user_id>`
pub fn user_pk(user_id: &UserId) -> String {
    user_id.to_string()
}

/// Generate the key of the record reserving a mail address.
///
/// Pattern: `mailAddress#<mail_address>`
pub fn mail_address_reservation_pk(mail_address: &str) -> String {
    format!("{MAIL_ADDRESS_PREFIX}{mail_address}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_keys() {
        let id = CircleId::new("c1").unwrap();

        assert_eq!(circle_pk(&id), "c1");
        assert_eq!(circle_name_reservation_pk("Foo"), "circleName#Foo");
    }

    #[test]
    fn test_user_keys() {
        let id = UserId::new("u1").unwrap();

        assert_eq!(user_pk(&id), "u1");
        assert_eq!(
            mail_address_reservation_pk("alice@example.com"),
            "mailAddress#alice@example.com"
        );
    }

    #[test]
    fn test_reservation_keys_never_collide_with_entity_keys() {
        // Ids reject the separator, so a reservation key cannot be a valid id.
        let reservation = circle_name_reservation_pk("Foo");

        assert!(CircleId::new(reservation.clone()).is_err());
        assert!(UserId::new(reservation).is_err());
    }
}
