//! Pairings: the durable record of a mutual accept.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PairingId, Timestamp, UserId};

/// Canonical identifier for an unordered user pair.
///
/// Member ids are stored sorted ascending, so `{A,B}` and `{B,A}` produce
/// the same key. The storage layer enforces uniqueness on this key, which
/// is what makes concurrent mutual accepts collapse into one pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    first: UserId,
    second: UserId,
}

impl PairKey {
    /// Builds the canonical key for an unordered pair.
    ///
    /// Returns `None` for a self-pair, which is never a valid pairing.
    pub fn new(a: UserId, b: UserId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { first: a, second: b }),
            std::cmp::Ordering::Greater => Some(Self { first: b, second: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The lexicographically smaller member.
    pub fn first(&self) -> UserId {
        self.first
    }

    /// The lexicographically larger member.
    pub fn second(&self) -> UserId {
        self.second
    }
}

/// A durable pairing of two mutually-accepting users.
///
/// Immutable after creation; there is no unmatch operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub id: PairingId,
    pub key: PairKey,
    pub created_at: Timestamp,
}

impl Pairing {
    pub fn new(id: PairingId, key: PairKey, created_at: Timestamp) -> Self {
        Self { id, key, created_at }
    }

    pub fn members(&self) -> [UserId; 2] {
        [self.key.first(), self.key.second()]
    }

    pub fn has_member(&self, user: &UserId) -> bool {
        self.key.first() == *user || self.key.second() == *user
    }

    /// The other member, if `user` is a member at all.
    pub fn counterpart_of(&self, user: &UserId) -> Option<UserId> {
        if self.key.first() == *user {
            Some(self.key.second())
        } else if self.key.second() == *user {
            Some(self.key.first())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn uid(n: u128) -> UserId {
        UserId::from_uuid(Uuid::from_u128(n))
    }

    #[test]
    fn pair_key_is_order_independent() {
        let (a, b) = (uid(1), uid(2));
        assert_eq!(PairKey::new(a, b), PairKey::new(b, a));
    }

    #[test]
    fn pair_key_rejects_self_pair() {
        let a = uid(7);
        assert!(PairKey::new(a, a).is_none());
    }

    #[test]
    fn counterpart_resolves_for_both_members() {
        let (a, b) = (uid(1), uid(2));
        let pairing = Pairing::new(PairingId::new(), PairKey::new(a, b).unwrap(), Timestamp::now());
        assert_eq!(pairing.counterpart_of(&a), Some(b));
        assert_eq!(pairing.counterpart_of(&b), Some(a));
        assert_eq!(pairing.counterpart_of(&uid(3)), None);
    }
}
