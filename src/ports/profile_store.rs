//! Profile store port (read side).
//!
//! The Profile Store is an external collaborator; the engine only reads
//! snapshots by id or queries candidates for the recommendation feed.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::foundation::UserId;
use crate::domain::profile::Profile;

use super::StoreError;

/// Read-only access to profile snapshots.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a single profile. Returns `None` if unknown.
    async fn fetch(&self, id: &UserId) -> Result<Option<Profile>, StoreError>;

    /// Fetch candidate profiles for the recommendation feed.
    ///
    /// When `city` is set, only profiles with a case-insensitive exact city
    /// match are returned. Profiles in `exclude` are filtered out. At most
    /// `limit` candidates are returned, in candidate-id order.
    async fn candidates(
        &self,
        city: Option<&str>,
        exclude: &HashSet<UserId>,
        limit: u32,
    ) -> Result<Vec<Profile>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn ProfileStore) {}
    }
}
