//! RecommendationFeed - ranked compatibility candidates for one user.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::matching::{scorer, MatchingError};
use crate::domain::profile::Profile;
use crate::ports::{DecisionLedger, ProfileStore};

/// Candidate fetch bound; the feed never ranks more than one page.
pub const CANDIDATE_PAGE_SIZE: u32 = 50;

/// A candidate profile with its compatibility score.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub profile: Profile,
    pub score: u8,
}

/// Read-only handler producing the recommendation feed.
pub struct RecommendationHandler {
    profiles: Arc<dyn ProfileStore>,
    ledger: Arc<dyn DecisionLedger>,
}

impl RecommendationHandler {
    pub fn new(profiles: Arc<dyn ProfileStore>, ledger: Arc<dyn DecisionLedger>) -> Self {
        Self { profiles, ledger }
    }

    /// Ranked candidates for `requester`, best match first.
    ///
    /// Excludes the requester and anyone the requester has already decided
    /// about. When the requester has a city, candidates are restricted to
    /// a case-insensitive exact city match. Ties order by candidate id
    /// ascending so the feed is deterministic.
    pub async fn handle(&self, requester: UserId) -> Result<Vec<ScoredCandidate>, MatchingError> {
        let requester_profile = self
            .profiles
            .fetch(&requester)
            .await
            .map_err(|e| MatchingError::Store(e.to_string()))?
            .ok_or(MatchingError::ProfileNotFound(requester))?;

        let mut exclude = self
            .ledger
            .decided_targets(&requester)
            .await
            .map_err(|e| MatchingError::Store(e.to_string()))?;
        exclude.insert(requester);

        let candidates = self
            .profiles
            .candidates(
                requester_profile.city.as_deref(),
                &exclude,
                CANDIDATE_PAGE_SIZE,
            )
            .await
            .map_err(|e| MatchingError::Store(e.to_string()))?;

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|profile| {
                let score = scorer::score(&requester_profile, &profile);
                ScoredCandidate { profile, score }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.profile.user_id.cmp(&b.profile.user_id))
        });

        Ok(scored)
    }
}
