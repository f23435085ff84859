//! Validated identifier and attribute values.
//!
//! Every value is an immutable newtype over `String` that can only be built
//! through a validating constructor, so holding one proves it is well formed.

use std::fmt;

use uuid::Uuid;

use super::DomainError;

/// Character that separates a reservation prefix from its value in storage keys.
///
/// Ids may never contain it, which keeps entity keys and reservation keys disjoint.
pub const KEY_SEPARATOR: char = '#';

const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 20;

fn validate_id(kind: &'static str, value: String) -> Result<String, DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::EmptyId { kind });
    }
    if value.contains(KEY_SEPARATOR) {
        return Err(DomainError::ReservedCharacter { kind, value });
    }
    Ok(value)
}

fn validate_name(kind: &'static str, value: String) -> Result<String, DomainError> {
    let chars = value.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&chars) {
        return Err(DomainError::InvalidLength {
            kind,
            min: NAME_MIN_CHARS,
            max: NAME_MAX_CHARS,
            value,
        });
    }
    Ok(value)
}

fn is_valid_mail_address(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

macro_rules! string_value {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Returns the underlying string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_value!(
    /// Identifier of a user.
    UserId
);
string_value!(
    /// Identifier of a circle.
    CircleId
);
string_value!(
    /// Display name of a user.
    UserName
);
string_value!(
    /// Name of a circle, unique across all circles.
    CircleName
);
string_value!(
    /// Mail address of a user, unique across all users.
    MailAddress
);

impl UserId {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        validate_id("UserId", value.into()).map(Self)
    }

    /// Creates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl CircleId {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        validate_id("CircleId", value.into()).map(Self)
    }

    /// Creates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl UserName {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        validate_name("UserName", value.into()).map(Self)
    }
}

impl CircleName {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        validate_name("CircleName", value.into()).map(Self)
    }
}

impl MailAddress {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if !is_valid_mail_address(&value) {
            return Err(DomainError::InvalidMailAddress(value));
        }
        Ok(Self(value))
    }
}
