use std::fmt;

use crate::domain::{CircleId, CircleName, MailAddress, UserId};

/// Selects a circle either by its id or by its unique name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CircleIdentifier {
    Id(CircleId),
    Name(CircleName),
}

/// Selects a user either by their id or by their unique mail address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdentifier {
    Id(UserId),
    MailAddress(MailAddress),
}

impl fmt::Display for CircleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Name(name) => write!(f, "name {name}"),
        }
    }
}

impl fmt::Display for UserIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::MailAddress(mail_address) => write!(f, "mail address {mail_address}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_display() {
        let by_name = CircleIdentifier::Name(CircleName::new("Foo").unwrap());
        let by_mail = UserIdentifier::MailAddress(MailAddress::new("a@b.io").unwrap());

        assert_eq!(by_name.to_string(), "name Foo");
        assert_eq!(by_mail.to_string(), "mail address a@b.io");
    }
}
