//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB items and domain entities.
//! Decoding is strict: a missing attribute, an attribute of the wrong kind or a
//! value that fails domain validation is reported as
//! [`RepositoryError::SchemaMismatch`] naming the field. Nothing is coerced
//! or defaulted.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use circles_core::domain::{
    Circle, CircleId, CircleName, DomainError, MailAddress, User, UserId, UserName,
};
use circles_core::storage::RepositoryError;

use super::keys;
use super::table::{Item, SecondaryIndex};

// ============================================================================
// Entity type constants
// ============================================================================

pub const ENTITY_TYPE_CIRCLE: &str = "CIRCLE";
pub const ENTITY_TYPE_USER: &str = "USER";

// ============================================================================
// Attribute names
// ============================================================================

pub const OWNER_ID: &str = "ownerId";
pub const MEMBER_IDS: &str = "memberIds";
pub const USER_NAME: &str = "userName";

// ============================================================================
// Record mapping
// ============================================================================

/// An entity stored as a primary record plus a reservation of its unique attribute.
pub trait Record: Sized {
    /// Entity label used in repository errors and logs.
    const ENTITY_LABEL: &'static str;
    /// Value of the `entityType` attribute on primary records.
    const ENTITY_TYPE: &'static str;
    /// Index that resolves the unique attribute to the primary record.
    const INDEX: SecondaryIndex;
    /// Field name of the unique attribute, as reported in `Duplicate` errors.
    const UNIQUE_FIELD: &'static str;

    fn primary_key(&self) -> String;

    fn unique_value(&self) -> &str;

    /// Key of the record reserving `unique_value`.
    fn reservation_key(unique_value: &str) -> String;

    /// Full primary record, including keys, index key and entity type.
    fn to_item(&self) -> Item;

    /// Attributes rewritten by an update, excluding keys and the index key.
    fn mutable_attributes(&self) -> Item;

    fn from_item(item: &Item) -> Result<Self, RepositoryError>;
}

/// Reservation records carry nothing but their key.
pub fn reservation_item(key: String) -> Item {
    HashMap::from([(keys::PK.to_string(), AttributeValue::S(key))])
}

// ============================================================================
// Circle conversions
// ============================================================================

impl Record for Circle {
    const ENTITY_LABEL: &'static str = "Circle";
    const ENTITY_TYPE: &'static str = ENTITY_TYPE_CIRCLE;
    const INDEX: SecondaryIndex = SecondaryIndex::Gsi1;
    const UNIQUE_FIELD: &'static str = "circleName";

    fn primary_key(&self) -> String {
        keys::circle_pk(self.id())
    }

    fn unique_value(&self) -> &str {
        self.name().as_str()
    }

    fn reservation_key(unique_value: &str) -> String {
        keys::circle_name_reservation_pk(unique_value)
    }

    fn to_item(&self) -> Item {
        let mut item = self.mutable_attributes();

        // Keys
        item.insert(keys::PK.to_string(), AttributeValue::S(self.primary_key()));
        item.insert(
            keys::GSI1_PK.to_string(),
            AttributeValue::S(self.name().to_string()),
        );

        // Entity type
        item.insert(
            keys::ENTITY_TYPE.to_string(),
            AttributeValue::S(ENTITY_TYPE_CIRCLE.to_string()),
        );

        item
    }

    fn mutable_attributes(&self) -> Item {
        let mut item = HashMap::new();
        item.insert(
            OWNER_ID.to_string(),
            AttributeValue::S(self.owner_id().to_string()),
        );
        item.insert(
            MEMBER_IDS.to_string(),
            AttributeValue::L(
                self.member_ids()
                    .iter()
                    .map(|id| AttributeValue::S(id.to_string()))
                    .collect(),
            ),
        );
        item
    }

    fn from_item(item: &Item) -> Result<Self, RepositoryError> {
        expect_entity_type(item, ENTITY_TYPE_CIRCLE)?;

        let id = get_string(item, keys::PK, "circleId")?;
        let name = get_string(item, keys::GSI1_PK, "circleName")?;
        let owner_id = get_string(item, OWNER_ID, "ownerId")?;
        let member_ids = get_string_list(item, MEMBER_IDS, "memberIds")?;

        Ok(Circle::new(
            CircleId::new(id).map_err(|err| invalid_value("circleId", err))?,
            CircleName::new(name).map_err(|err| invalid_value("circleName", err))?,
            UserId::new(owner_id).map_err(|err| invalid_value("ownerId", err))?,
            member_ids
                .into_iter()
                .map(UserId::new)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| invalid_value("memberIds", err))?,
        ))
    }
}

// ============================================================================
// User conversions
// ============================================================================

impl Record for User {
    const ENTITY_LABEL: &'static str = "User";
    const ENTITY_TYPE: &'static str = ENTITY_TYPE_USER;
    const INDEX: SecondaryIndex = SecondaryIndex::Gsi2;
    const UNIQUE_FIELD: &'static str = "mailAddress";

    fn primary_key(&self) -> String {
        keys::user_pk(self.id())
    }

    fn unique_value(&self) -> &str {
        self.mail_address().as_str()
    }

    fn reservation_key(unique_value: &str) -> String {
        keys::mail_address_reservation_pk(unique_value)
    }

    fn to_item(&self) -> Item {
        let mut item = self.mutable_attributes();

        // Keys
        item.insert(keys::PK.to_string(), AttributeValue::S(self.primary_key()));
        item.insert(
            keys::GSI2_PK.to_string(),
            AttributeValue::S(self.mail_address().to_string()),
        );

        // Entity type
        item.insert(
            keys::ENTITY_TYPE.to_string(),
            AttributeValue::S(ENTITY_TYPE_USER.to_string()),
        );

        item
    }

    fn mutable_attributes(&self) -> Item {
        HashMap::from([(
            USER_NAME.to_string(),
            AttributeValue::S(self.name().to_string()),
        )])
    }

    fn from_item(item: &Item) -> Result<Self, RepositoryError> {
        expect_entity_type(item, ENTITY_TYPE_USER)?;

        let id = get_string(item, keys::PK, "userId")?;
        let mail_address = get_string(item, keys::GSI2_PK, "mailAddress")?;
        let name = get_string(item, USER_NAME, "userName")?;

        Ok(User::new(
            UserId::new(id).map_err(|err| invalid_value("userId", err))?,
            UserName::new(name).map_err(|err| invalid_value("userName", err))?,
            MailAddress::new(mail_address).map_err(|err| invalid_value("mailAddress", err))?,
        ))
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Name of the kind of an attribute value, as DynamoDB spells its type descriptors.
pub fn attribute_kind(value: &AttributeValue) -> &'static str {
    match value {
        AttributeValue::S(_) => "S",
        AttributeValue::N(_) => "N",
        AttributeValue::B(_) => "B",
        AttributeValue::Bool(_) => "BOOL",
        AttributeValue::L(_) => "L",
        AttributeValue::M(_) => "M",
        AttributeValue::Null(_) => "NULL",
        AttributeValue::Ss(_) => "SS",
        AttributeValue::Ns(_) => "NS",
        AttributeValue::Bs(_) => "BS",
        _ => "unknown",
    }
}

fn schema_mismatch(
    field: &'static str,
    expected: &'static str,
    found: impl Into<String>,
) -> RepositoryError {
    RepositoryError::SchemaMismatch {
        field,
        expected,
        found: found.into(),
    }
}

fn invalid_value(field: &'static str, err: DomainError) -> RepositoryError {
    schema_mismatch(field, "a valid value", format!("invalid value ({err})"))
}

fn get_string(
    item: &Item,
    attribute: &str,
    field: &'static str,
) -> Result<String, RepositoryError> {
    match item.get(attribute) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(other) => Err(schema_mismatch(field, "S", attribute_kind(other))),
        None => Err(schema_mismatch(field, "S", "missing")),
    }
}

fn get_string_list(
    item: &Item,
    attribute: &str,
    field: &'static str,
) -> Result<Vec<String>, RepositoryError> {
    let values = match item.get(attribute) {
        Some(AttributeValue::L(values)) => values,
        Some(other) => return Err(schema_mismatch(field, "L", attribute_kind(other))),
        None => return Err(schema_mismatch(field, "L", "missing")),
    };

    values
        .iter()
        .map(|value| match value {
            AttributeValue::S(value) => Ok(value.clone()),
            other => Err(schema_mismatch(
                field,
                "L of S",
                format!("L containing {}", attribute_kind(other)),
            )),
        })
        .collect()
}

fn expect_entity_type(item: &Item, expected: &'static str) -> Result<(), RepositoryError> {
    let entity_type = get_string(item, keys::ENTITY_TYPE, "entityType")?;
    if entity_type != expected {
        return Err(schema_mismatch("entityType", expected, entity_type));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_circle() -> Circle {
        Circle::new(
            CircleId::new("c1").unwrap(),
            CircleName::new("Foo").unwrap(),
            UserId::new("u1").unwrap(),
            [UserId::new("u3").unwrap(), UserId::new("u2").unwrap()],
        )
    }

    fn sample_user() -> User {
        User::new(
            UserId::new("u1").unwrap(),
            UserName::new("alice").unwrap(),
            MailAddress::new("alice@example.com").unwrap(),
        )
    }

    #[test]
    fn test_circle_round_trip() {
        let circle = sample_circle();

        let item = circle.to_item();
        let decoded = Circle::from_item(&item).unwrap();

        assert_eq!(circle, decoded);
    }

    #[test]
    fn test_circle_item_layout() {
        let item = sample_circle().to_item();

        assert_eq!(item.get("pk"), Some(&AttributeValue::S("c1".to_string())));
        assert_eq!(item.get("gsi1pk"), Some(&AttributeValue::S("Foo".to_string())));
        assert_eq!(
            item.get("entityType"),
            Some(&AttributeValue::S("CIRCLE".to_string()))
        );
        assert_eq!(
            item.get("memberIds"),
            Some(&AttributeValue::L(vec![
                AttributeValue::S("u2".to_string()),
                AttributeValue::S("u3".to_string()),
            ]))
        );
        assert_eq!(item.len(), 5);
    }

    #[test]
    fn test_user_round_trip() {
        let user = sample_user();

        let decoded = User::from_item(&user.to_item()).unwrap();

        assert_eq!(user, decoded);
    }

    #[test]
    fn test_mutable_attributes_exclude_keys() {
        let attributes = sample_circle().mutable_attributes();

        assert!(attributes.contains_key("ownerId"));
        assert!(attributes.contains_key("memberIds"));
        assert!(!attributes.contains_key("pk"));
        assert!(!attributes.contains_key("gsi1pk"));
    }

    #[test]
    fn test_reservation_item_has_only_key() {
        let item = reservation_item(Circle::reservation_key("Foo"));

        assert_eq!(item.len(), 1);
        assert_eq!(
            item.get("pk"),
            Some(&AttributeValue::S("circleName#Foo".to_string()))
        );
    }

    #[test]
    fn test_wrong_kind_names_field() {
        let mut item = sample_circle().to_item();
        item.insert("ownerId".to_string(), AttributeValue::N("42".to_string()));

        let err = Circle::from_item(&item).unwrap_err();

        assert_eq!(
            err,
            RepositoryError::SchemaMismatch {
                field: "ownerId",
                expected: "S",
                found: "N".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_attribute_names_field() {
        let mut item = sample_user().to_item();
        item.remove("userName");

        let err = User::from_item(&item).unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::SchemaMismatch {
                field: "userName",
                ref found,
                ..
            } if found == "missing"
        ));
    }

    #[test]
    fn test_member_list_must_hold_strings() {
        let mut item = sample_circle().to_item();
        item.insert(
            "memberIds".to_string(),
            AttributeValue::L(vec![AttributeValue::Bool(true)]),
        );

        let err = Circle::from_item(&item).unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::SchemaMismatch { field: "memberIds", expected: "L of S", .. }
        ));
    }

    #[test]
    fn test_domain_invalid_value_is_schema_mismatch() {
        let mut item = sample_circle().to_item();
        item.insert("gsi1pk".to_string(), AttributeValue::S("ab".to_string()));

        let err = Circle::from_item(&item).unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::SchemaMismatch { field: "circleName", .. }
        ));
    }

    #[test]
    fn test_entity_type_must_match() {
        let item = sample_user().to_item();

        let err = Circle::from_item(&item).unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::SchemaMismatch { field: "entityType", expected: "CIRCLE", .. }
        ));
    }
}
