//! # Authority Set
//!
//! Fixed allow-list of identities permitted to mutate governance-controlled
//! parameters. Passed to each keeper at construction.

use crate::address::{encode_address, Address};
use crate::errors::AuthorityError;
use std::collections::BTreeSet;

/// Explicit set of privileged addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthoritySet {
    members: BTreeSet<Address>,
}

impl AuthoritySet {
    /// Build from any iterator of addresses.
    pub fn new(members: impl IntoIterator<Item = Address>) -> Self {
        Self {
            members: members.into_iter().collect(),
        }
    }

    /// Check membership.
    pub fn contains(&self, caller: &Address) -> bool {
        self.members.contains(caller)
    }

    /// Fail with `AuthorityError` unless `caller` is a member.
    pub fn ensure(&self, caller: &Address) -> Result<(), AuthorityError> {
        if self.contains(caller) {
            Ok(())
        } else {
            Err(AuthorityError {
                caller: encode_address(caller),
            })
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if no authority is configured.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::module_address;

    #[test]
    fn test_membership() {
        let gov = module_address("gov");
        let set = AuthoritySet::new([gov]);
        assert!(set.contains(&gov));
        assert!(set.ensure(&gov).is_ok());
    }

    #[test]
    fn test_non_member_rejected() {
        let set = AuthoritySet::new([module_address("gov")]);
        let stranger = [0xAB; 20];
        let err = set.ensure(&stranger).unwrap_err();
        assert!(err.to_string().contains("unauthorized"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let gov = module_address("gov");
        let set = AuthoritySet::new([gov, gov]);
        assert_eq!(set.len(), 1);
    }
}
