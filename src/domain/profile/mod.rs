//! Profile snapshot consumed by the scoring engine.
//!
//! Profiles are owned by the external Profile Store; the engine only reads
//! snapshots of the attributes the compatibility algorithm consumes, plus
//! the minimal display fields surfaced in pairing notifications.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;

/// Self-reported training experience, an ordered scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl FitnessLevel {
    /// Position on the ordered scale, used for adjacency checks.
    pub fn rank(&self) -> i8 {
        match self {
            FitnessLevel::Beginner => 0,
            FitnessLevel::Intermediate => 1,
            FitnessLevel::Advanced => 2,
        }
    }
}

/// How a user behaves in the gym.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GymPersonality {
    Motivator,
    SilentGrinder,
    Planner,
    Learner,
    Social,
}

/// Training commitment, an ordered scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Commitment {
    Casual,
    Consistent,
    Hardcore,
}

impl Commitment {
    /// Position on the ordered scale, used for adjacency checks.
    pub fn rank(&self) -> i8 {
        match self {
            Commitment::Casual => 0,
            Commitment::Consistent => 1,
            Commitment::Hardcore => 2,
        }
    }
}

/// Geographic point, WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

/// Read-only profile snapshot.
///
/// Every scoring attribute is optional or defaultable; a sparse profile
/// degrades to neutral sub-scores rather than failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub name: String,
    pub photo: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    pub goals: BTreeSet<String>,
    #[serde(default)]
    pub availability: BTreeSet<String>,
    pub fitness_level: Option<FitnessLevel>,
    pub gym_type: Option<String>,
    pub gym_personality: Option<GymPersonality>,
    pub commitment: Option<Commitment>,
    pub location: Option<Location>,
}

impl Profile {
    /// Minimal profile with only identity and display name set.
    pub fn bare(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            photo: None,
            city: None,
            goals: BTreeSet::new(),
            availability: BTreeSet::new(),
            fitness_level: None,
            gym_type: None,
            gym_personality: None,
            commitment: None,
            location: None,
        }
    }
}
