//! In-memory profile store.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::UserId;
use crate::domain::profile::Profile;
use crate::ports::{ProfileStore, StoreError};

/// Profile snapshots held in a BTreeMap so candidate queries come back in
/// candidate-id order, matching the Postgres adapter's ORDER BY.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<BTreeMap<UserId, Profile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace a profile snapshot.
    pub async fn insert(&self, profile: Profile) {
        self.profiles.write().await.insert(profile.user_id, profile);
    }

    pub async fn profile_count(&self) -> usize {
        self.profiles.read().await.len()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn fetch(&self, id: &UserId) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.read().await.get(id).cloned())
    }

    async fn candidates(
        &self,
        city: Option<&str>,
        exclude: &HashSet<UserId>,
        limit: u32,
    ) -> Result<Vec<Profile>, StoreError> {
        let profiles = self.profiles.read().await;
        Ok(profiles
            .values()
            .filter(|p| !exclude.contains(&p.user_id))
            .filter(|p| match city {
                Some(city) => p
                    .city
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(city)),
                None => true,
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
