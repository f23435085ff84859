//! Input types for the application services.
//!
//! Commands carry raw strings as received from a transport. Services validate
//! them into domain values before touching storage.

/// Registers a new circle owned by an existing user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircleRegisterCommand {
    pub owner_id: String,
    pub circle_name: String,
}

impl CircleRegisterCommand {
    pub fn new(owner_id: impl Into<String>, circle_name: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            circle_name: circle_name.into(),
        }
    }
}

/// Changes some attributes of an existing circle. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircleUpdateCommand {
    pub circle_id: String,
    pub circle_name: Option<String>,
    pub owner_id: Option<String>,
    pub member_ids: Option<Vec<String>>,
}

impl CircleUpdateCommand {
    pub fn new(circle_id: impl Into<String>) -> Self {
        Self {
            circle_id: circle_id.into(),
            ..Self::default()
        }
    }

    pub fn with_circle_name(mut self, circle_name: impl Into<String>) -> Self {
        self.circle_name = Some(circle_name.into());
        self
    }

    pub fn with_owner_id(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    pub fn with_member_ids<I, S>(mut self, member_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.member_ids = Some(member_ids.into_iter().map(Into::into).collect());
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.circle_name.is_none() && self.owner_id.is_none() && self.member_ids.is_none()
    }
}

/// Looks up a circle by exactly one of its id or its name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircleGetCommand {
    pub circle_id: Option<String>,
    pub circle_name: Option<String>,
}

impl CircleGetCommand {
    pub fn by_id(circle_id: impl Into<String>) -> Self {
        Self {
            circle_id: Some(circle_id.into()),
            circle_name: None,
        }
    }

    pub fn by_name(circle_name: impl Into<String>) -> Self {
        Self {
            circle_id: None,
            circle_name: Some(circle_name.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircleDeleteCommand {
    pub circle_id: String,
}

impl CircleDeleteCommand {
    pub fn new(circle_id: impl Into<String>) -> Self {
        Self {
            circle_id: circle_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegisterCommand {
    pub user_name: String,
    pub mail_address: String,
}

impl UserRegisterCommand {
    pub fn new(user_name: impl Into<String>, mail_address: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            mail_address: mail_address.into(),
        }
    }
}

/// Changes the name and/or the mail address of an existing user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdateCommand {
    pub user_id: String,
    pub user_name: Option<String>,
    pub mail_address: Option<String>,
}

impl UserUpdateCommand {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    pub fn with_mail_address(mut self, mail_address: impl Into<String>) -> Self {
        self.mail_address = Some(mail_address.into());
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.user_name.is_none() && self.mail_address.is_none()
    }
}

/// Looks up a user by exactly one of their id or their mail address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserGetCommand {
    pub user_id: Option<String>,
    pub mail_address: Option<String>,
}

impl UserGetCommand {
    pub fn by_id(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            mail_address: None,
        }
    }

    pub fn by_mail_address(mail_address: impl Into<String>) -> Self {
        Self {
            user_id: None,
            mail_address: Some(mail_address.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDeleteCommand {
    pub user_id: String,
}

impl UserDeleteCommand {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserListCommand {
    pub limit: Option<usize>,
}

impl UserListCommand {
    pub fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }
}
