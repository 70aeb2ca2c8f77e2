//! Data transfer objects for matching HTTP endpoints.

use serde::{Deserialize, Serialize};

use crate::application::{PairingView, ScoredCandidate};
use crate::domain::foundation::{PairingId, UserId};

// ═══════════════════════════════════════════════════════════════════════════
// Request DTOs
// ═══════════════════════════════════════════════════════════════════════════

/// Request to record a decision about a candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecideRequest {
    /// The candidate the decision is about.
    pub target_id: UserId,
    /// "accept" or "reject".
    pub decision: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// Response DTOs
// ═══════════════════════════════════════════════════════════════════════════

/// One entry of the recommendation feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRecord {
    pub user_id: UserId,
    pub name: String,
    pub photo: Option<String>,
    pub city: Option<String>,
    /// Compatibility score in [0, 100].
    pub score: u8,
}

impl From<&ScoredCandidate> for RecommendationRecord {
    fn from(c: &ScoredCandidate) -> Self {
        Self {
            user_id: c.profile.user_id,
            name: c.profile.name.clone(),
            photo: c.profile.photo.clone(),
            city: c.profile.city.clone(),
            score: c.score,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResponse {
    pub recommendations: Vec<RecommendationRecord>,
}

/// Outcome of a recorded decision.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecideResponse {
    pub accepted: bool,
    /// Whether a pairing exists for this pair after the call.
    pub paired: bool,
    pub pairing_id: Option<PairingId>,
}

/// The counterpart's display info inside a pairing record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterpartRecord {
    pub user_id: UserId,
    pub name: String,
    pub photo: Option<String>,
    pub city: Option<String>,
}

/// One pairing the authenticated user is a member of.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingRecord {
    pub pairing_id: PairingId,
    pub counterpart: CounterpartRecord,
    pub created_at: String,
}

impl From<&PairingView> for PairingRecord {
    fn from(v: &PairingView) -> Self {
        Self {
            pairing_id: v.pairing_id,
            counterpart: CounterpartRecord {
                user_id: v.counterpart.id,
                name: v.counterpart.name.clone(),
                photo: v.counterpart.photo.clone(),
                city: v.counterpart_city.clone(),
            },
            created_at: v.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingsResponse {
    pub pairings: Vec<PairingRecord>,
}

/// Error payload shared by the matching endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
