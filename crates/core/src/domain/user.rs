use super::{MailAddress, UserId, UserName};

/// A registered user. The mail address is unique across all users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: UserName,
    mail_address: MailAddress,
}

impl User {
    pub fn new(id: UserId, name: UserName, mail_address: MailAddress) -> Self {
        Self {
            id,
            name,
            mail_address,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn mail_address(&self) -> &MailAddress {
        &self.mail_address
    }

    pub fn rename(&mut self, name: UserName) {
        self.name = name;
    }

    pub fn change_mail_address(&mut self, mail_address: MailAddress) {
        self.mail_address = mail_address;
    }
}
