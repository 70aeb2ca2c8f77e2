//! Pairing listing with counterpart display info.

use std::sync::Arc;

use crate::domain::foundation::{PairingId, Timestamp, UserId};
use crate::domain::matching::MatchingError;
use crate::ports::{CounterpartInfo, PairingStore, ProfileStore};

/// One pairing as seen by a specific member.
#[derive(Debug, Clone)]
pub struct PairingView {
    pub pairing_id: PairingId,
    pub counterpart: CounterpartInfo,
    pub counterpart_city: Option<String>,
    pub created_at: Timestamp,
}

/// Query handler: all pairings a user is a member of.
pub struct ListPairingsHandler {
    pairings: Arc<dyn PairingStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl ListPairingsHandler {
    pub fn new(pairings: Arc<dyn PairingStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { pairings, profiles }
    }

    /// Pairings for `user`, newest first, each with the counterpart's
    /// basic display info. Pairings whose counterpart profile is gone
    /// fall back to an empty name rather than disappearing.
    pub async fn handle(&self, user: UserId) -> Result<Vec<PairingView>, MatchingError> {
        let pairings = self
            .pairings
            .list_for_member(&user)
            .await
            .map_err(|e| MatchingError::Store(e.to_string()))?;

        let mut views = Vec::with_capacity(pairings.len());
        for pairing in pairings {
            let counterpart_id = match pairing.counterpart_of(&user) {
                Some(id) => id,
                None => continue,
            };

            let profile = self
                .profiles
                .fetch(&counterpart_id)
                .await
                .map_err(|e| MatchingError::Store(e.to_string()))?;

            let (name, photo, city) = match profile {
                Some(p) => (p.name, p.photo, p.city),
                None => (String::new(), None, None),
            };

            views.push(PairingView {
                pairing_id: pairing.id,
                counterpart: CounterpartInfo {
                    id: counterpart_id,
                    name,
                    photo,
                },
                counterpart_city: city,
                created_at: pairing.created_at,
            });
        }

        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryPairingStore, InMemoryProfileStore};
    use crate::domain::matching::{PairKey, Pairing};
    use crate::domain::profile::Profile;
    use uuid::Uuid;

    fn uid(n: u128) -> UserId {
        UserId::from_uuid(Uuid::from_u128(n))
    }

    #[tokio::test]
    async fn lists_only_own_pairings_with_counterpart_info() {
        let pairings = Arc::new(InMemoryPairingStore::new());
        let profiles = Arc::new(InMemoryProfileStore::new());

        profiles.insert(Profile::bare(uid(1), "Alice")).await;
        profiles.insert(Profile::bare(uid(2), "Bob")).await;
        profiles.insert(Profile::bare(uid(3), "Cara")).await;

        let ab = Pairing::new(PairingId::new(), PairKey::new(uid(1), uid(2)).unwrap(), Timestamp::now());
        let bc = Pairing::new(PairingId::new(), PairKey::new(uid(2), uid(3)).unwrap(), Timestamp::now());
        pairings.insert_if_absent(ab.clone()).await.unwrap();
        pairings.insert_if_absent(bc).await.unwrap();

        let handler = ListPairingsHandler::new(pairings, profiles);
        let views = handler.handle(uid(1)).await.unwrap();

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].pairing_id, ab.id);
        assert_eq!(views[0].counterpart.id, uid(2));
        assert_eq!(views[0].counterpart.name, "Bob");
    }

    #[tokio::test]
    async fn missing_counterpart_profile_degrades_to_empty_name() {
        let pairings = Arc::new(InMemoryPairingStore::new());
        let profiles = Arc::new(InMemoryProfileStore::new());

        profiles.insert(Profile::bare(uid(1), "Alice")).await;
        let ab = Pairing::new(PairingId::new(), PairKey::new(uid(1), uid(2)).unwrap(), Timestamp::now());
        pairings.insert_if_absent(ab).await.unwrap();

        let handler = ListPairingsHandler::new(pairings, profiles);
        let views = handler.handle(uid(1)).await.unwrap();

        assert_eq!(views.len(), 1);
        assert!(views[0].counterpart.name.is_empty());
    }
}
