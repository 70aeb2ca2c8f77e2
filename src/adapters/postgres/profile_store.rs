//! PostgreSQL implementation of ProfileStore.
//!
//! The profiles table is owned by the profile service; this adapter only
//! reads the scoring and display columns.

use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::UserId;
use crate::domain::profile::{Commitment, FitnessLevel, GymPersonality, Location, Profile};
use crate::ports::{ProfileStore, StoreError};

use super::store_err;

const PROFILE_COLUMNS: &str = "user_id, name, photo, city, goals, availability, \
     fitness_level, gym_type, gym_personality, commitment, lat, lon";

#[derive(Clone)]
pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PostgresProfileStore {
    async fn fetch(&self, id: &UserId) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("failed to fetch profile", e))?;

        row.map(|r| profile_from_row(&r)).transpose()
    }

    async fn candidates(
        &self,
        city: Option<&str>,
        exclude: &HashSet<UserId>,
        limit: u32,
    ) -> Result<Vec<Profile>, StoreError> {
        let excluded: Vec<Uuid> = exclude.iter().map(|id| *id.as_uuid()).collect();

        let rows = sqlx::query(&format!(
            r#"
            SELECT {PROFILE_COLUMNS} FROM profiles
            WHERE NOT (user_id = ANY($1))
              AND ($2::text IS NULL OR lower(city) = lower($2))
            ORDER BY user_id
            LIMIT $3
            "#
        ))
        .bind(&excluded)
        .bind(city)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_err("failed to query candidates", e))?;

        rows.iter().map(profile_from_row).collect()
    }
}

fn profile_from_row(row: &PgRow) -> Result<Profile, StoreError> {
    let goals: Vec<String> = row
        .try_get("goals")
        .map_err(|e| store_err("bad goals column", e))?;
    let availability: Vec<String> = row
        .try_get("availability")
        .map_err(|e| store_err("bad availability column", e))?;
    let lat: Option<f64> = row
        .try_get("lat")
        .map_err(|e| store_err("bad lat column", e))?;
    let lon: Option<f64> = row
        .try_get("lon")
        .map_err(|e| store_err("bad lon column", e))?;

    Ok(Profile {
        user_id: UserId::from_uuid(
            row.try_get("user_id")
                .map_err(|e| store_err("bad user_id column", e))?,
        ),
        name: row
            .try_get("name")
            .map_err(|e| store_err("bad name column", e))?,
        photo: row
            .try_get("photo")
            .map_err(|e| store_err("bad photo column", e))?,
        city: row
            .try_get("city")
            .map_err(|e| store_err("bad city column", e))?,
        goals: goals.into_iter().collect::<BTreeSet<_>>(),
        availability: availability.into_iter().collect::<BTreeSet<_>>(),
        fitness_level: row
            .try_get::<Option<String>, _>("fitness_level")
            .map_err(|e| store_err("bad fitness_level column", e))?
            .as_deref()
            .and_then(fitness_level_from_str),
        gym_type: row
            .try_get("gym_type")
            .map_err(|e| store_err("bad gym_type column", e))?,
        gym_personality: row
            .try_get::<Option<String>, _>("gym_personality")
            .map_err(|e| store_err("bad gym_personality column", e))?
            .as_deref()
            .and_then(personality_from_str),
        commitment: row
            .try_get::<Option<String>, _>("commitment")
            .map_err(|e| store_err("bad commitment column", e))?
            .as_deref()
            .and_then(commitment_from_str),
        location: match (lat, lon) {
            (Some(lat), Some(lon)) => Some(Location { lat, lon }),
            _ => None,
        },
    })
}

// Unknown enum values degrade to None rather than failing the whole row;
// scoring treats them the same as missing.

fn fitness_level_from_str(s: &str) -> Option<FitnessLevel> {
    match s {
        "Beginner" => Some(FitnessLevel::Beginner),
        "Intermediate" => Some(FitnessLevel::Intermediate),
        "Advanced" => Some(FitnessLevel::Advanced),
        _ => None,
    }
}

fn personality_from_str(s: &str) -> Option<GymPersonality> {
    match s {
        "Motivator" => Some(GymPersonality::Motivator),
        "Silent grinder" => Some(GymPersonality::SilentGrinder),
        "Planner" => Some(GymPersonality::Planner),
        "Learner" => Some(GymPersonality::Learner),
        "Social" => Some(GymPersonality::Social),
        _ => None,
    }
}

fn commitment_from_str(s: &str) -> Option<Commitment> {
    match s {
        "Casual" => Some(Commitment::Casual),
        "Consistent" => Some(Commitment::Consistent),
        "Hardcore" => Some(Commitment::Hardcore),
        _ => None,
    }
}
