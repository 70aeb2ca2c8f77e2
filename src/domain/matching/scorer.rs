//! Compatibility scoring: two profiles in, an integer score in [0,100] out.
//!
//! Weighted sum of seven normalized sub-scores. Every sub-metric is
//! symmetric in its arguments, so the final score is symmetric too. Pure
//! and infallible: missing attributes contribute a neutral or zero term.

use std::collections::BTreeSet;

use crate::domain::profile::{Commitment, FitnessLevel, GymPersonality, Location, Profile};

const GOALS_WEIGHT: f64 = 0.25;
const SCHEDULE_WEIGHT: f64 = 0.20;
const LEVEL_WEIGHT: f64 = 0.15;
const GYM_TYPE_WEIGHT: f64 = 0.10;
const PERSONALITY_WEIGHT: f64 = 0.10;
const COMMITMENT_WEIGHT: f64 = 0.10;
const LOCATION_WEIGHT: f64 = 0.10;

/// Compute the compatibility score between two profiles.
///
/// Each term is bounded by its weight and the weights sum to 1.0, so the
/// rounded result is always in [0,100] by construction.
pub fn score(a: &Profile, b: &Profile) -> u8 {
    let total = GOALS_WEIGHT * jaccard(&a.goals, &b.goals)
        + SCHEDULE_WEIGHT * jaccard(&a.availability, &b.availability)
        + LEVEL_WEIGHT * level_similarity(a.fitness_level, b.fitness_level)
        + GYM_TYPE_WEIGHT * gym_type_similarity(a.gym_type.as_deref(), b.gym_type.as_deref())
        + PERSONALITY_WEIGHT * personality_score(a.gym_personality, b.gym_personality)
        + COMMITMENT_WEIGHT * commitment_score(a.commitment, b.commitment)
        + LOCATION_WEIGHT * location_score(a.location.as_ref(), b.location.as_ref());

    (total * 100.0).round() as u8
}

/// Jaccard similarity of two string sets: |A∩B| / |A∪B|.
///
/// Zero when either set is empty, avoiding a 0/0 division.
fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// 1.0 equal, 0.5 adjacent on the Beginner/Intermediate/Advanced scale.
fn level_similarity(a: Option<FitnessLevel>, b: Option<FitnessLevel>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if a == b => 1.0,
        (Some(a), Some(b)) if (a.rank() - b.rank()).abs() == 1 => 0.5,
        _ => 0.0,
    }
}

/// Commercial gyms are broadly compatible with everything else.
fn gym_type_similarity(a: Option<&str>, b: Option<&str>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if a == b => 1.0,
        (Some(a), Some(b)) if a == "Commercial" || b == "Commercial" => 0.5,
        (Some(_), Some(_)) => 0.0,
        _ => 0.0,
    }
}

/// Matching energies score 1.0; a few complementary pairs also score 1.0,
/// remaining distinct pairs score 0.3. Unknown personality is neutral.
fn personality_score(a: Option<GymPersonality>, b: Option<GymPersonality>) -> f64 {
    use GymPersonality::{Learner, Motivator, Social};

    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return 0.5,
    };

    if a == b {
        return 1.0;
    }

    let compatible = [(Motivator, Learner), (Motivator, Social), (Social, Learner)];
    if compatible
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    {
        1.0
    } else {
        0.3
    }
}

/// 1.0 equal, 0.5 adjacent on the Casual/Consistent/Hardcore scale.
/// Casual vs Hardcore scores zero.
fn commitment_score(a: Option<Commitment>, b: Option<Commitment>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if a == b => 1.0,
        (Some(a), Some(b)) if (a.rank() - b.rank()).abs() == 1 => 0.5,
        _ => 0.0,
    }
}

/// Banded great-circle distance score.
fn location_score(a: Option<&Location>, b: Option<&Location>) -> f64 {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return 0.0,
    };

    let d = haversine_km(a, b);
    if d <= 5.0 {
        1.0
    } else if d <= 15.0 {
        0.8
    } else if d <= 30.0 {
        0.5
    } else {
        0.1
    }
}

/// Great-circle distance in kilometers.
fn haversine_km(a: &Location, b: &Location) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}
