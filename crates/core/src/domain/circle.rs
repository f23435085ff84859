use std::collections::BTreeSet;

use super::{CircleId, CircleName, UserId};

/// A named group with an owner and a set of members.
///
/// The name is unique across all circles. Members have set semantics, so
/// ordering and duplicates in the input are irrelevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circle {
    id: CircleId,
    name: CircleName,
    owner_id: UserId,
    member_ids: BTreeSet<UserId>,
}

impl Circle {
    pub fn new(
        id: CircleId,
        name: CircleName,
        owner_id: UserId,
        member_ids: impl IntoIterator<Item = UserId>,
    ) -> Self {
        Self {
            id,
            name,
            owner_id,
            member_ids: member_ids.into_iter().collect(),
        }
    }

    pub fn id(&self) -> &CircleId {
        &self.id
    }

    pub fn name(&self) -> &CircleName {
        &self.name
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn member_ids(&self) -> &BTreeSet<UserId> {
        &self.member_ids
    }

    pub fn rename(&mut self, name: CircleName) {
        self.name = name;
    }

    pub fn change_owner(&mut self, owner_id: UserId) {
        self.owner_id = owner_id;
    }

    pub fn replace_members(&mut self, member_ids: impl IntoIterator<Item = UserId>) {
        self.member_ids = member_ids.into_iter().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn test_members_have_set_semantics() {
        let a = Circle::new(
            CircleId::new("c1").unwrap(),
            CircleName::new("Foo").unwrap(),
            user("u1"),
            [user("u3"), user("u2"), user("u3")],
        );
        let b = Circle::new(
            CircleId::new("c1").unwrap(),
            CircleName::new("Foo").unwrap(),
            user("u1"),
            [user("u2"), user("u3")],
        );

        assert_eq!(a, b);
        assert_eq!(a.member_ids().len(), 2);
    }

    #[test]
    fn test_replace_members_discards_previous_set() {
        let mut circle = Circle::new(
            CircleId::new("c1").unwrap(),
            CircleName::new("Foo").unwrap(),
            user("u1"),
            [user("u2")],
        );

        circle.replace_members([user("u4")]);

        assert_eq!(
            circle.member_ids().iter().map(UserId::as_str).collect::<Vec<_>>(),
            vec!["u4"]
        );
    }
}
