//! Candidate matching and scoring.
//!
//! `find_matches` pre-filters the directory by role, activity and experience,
//! then scores every candidate:
//!
//! - skill score: `min(100, 100 * |shared| / max(1, |seeker skills|))`, with
//!   skills compared case-insensitively
//! - experience score: 100 within 5 years, 70 within 10, otherwise 50
//! - match score: `round(0.6 * skill + 0.4 * experience)`
//!
//! Results are sorted by match score, highest first. The sort is stable, so
//! equal scores keep the pool's order (user creation time, then id).

use crate::error::Error;
use entity::matching_preferences::{
    self, DEFAULT_MAX_EXPERIENCE, DEFAULT_MEETING_FREQUENCY, DEFAULT_MIN_EXPERIENCE,
};
use entity::roles::Role;
use entity::{profiles, users, UserId};
use entity_api::profile::ExperienceBound;
use log::*;
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;

const SKILL_WEIGHT: f64 = 0.6;
const EXPERIENCE_WEIGHT: f64 = 0.4;
const MEETING_FREQUENCIES: [&str; 3] = ["weekly", "biweekly", "monthly"];

/// The scoring-relevant projection of a user's profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileSummary {
    pub user_id: UserId,
    pub years_experience: i32,
    pub industry: Option<String>,
    /// Lowercased, so membership is case-insensitive.
    pub skill_set: BTreeSet<String>,
}

impl From<&profiles::Model> for ProfileSummary {
    fn from(profile: &profiles::Model) -> Self {
        Self {
            user_id: profile.user_id.clone(),
            years_experience: profile.years_experience,
            industry: profile.industry.clone(),
            skill_set: normalize_skills(profile.skills.iter()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct MatchCandidate {
    pub candidate_id: UserId,
    pub full_name: String,
    pub role: Role,
    pub industry: Option<String>,
    pub years_experience: i32,
    pub skills: Vec<String>,
    /// Always within `0..=100`.
    pub match_score: u8,
    pub skill_score: u8,
    pub experience_score: u8,
    /// Lowercased skills held by both users, in alphabetical order.
    pub shared_skills: Vec<String>,
}

/// Ranked candidates. Users with role `both` get one list per side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum Matches {
    Single(Vec<MatchCandidate>),
    Dual {
        /// People who could mentor the seeker.
        as_mentee: Vec<MatchCandidate>,
        /// People the seeker could mentor.
        as_mentor: Vec<MatchCandidate>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Seeking {
    Mentor,
    Mentee,
}

/// Finds and ranks candidates for `user_id`, returning at most `limit` per list.
pub async fn find_matches(
    db: &impl ConnectionTrait,
    user_id: &str,
    limit: usize,
) -> Result<Matches, Error> {
    let user = entity_api::user::find_by_id(db, user_id)
        .await
        .map_err(not_found_as("user"))?;
    let profile = entity_api::profile::find_by_user_id(db, user_id)
        .await
        .map_err(not_found_as("profile"))?;
    let seeker = ProfileSummary::from(&profile);

    let matches = match user.role {
        Role::Mentee => Matches::Single(search(db, &seeker, Seeking::Mentor, limit).await?),
        Role::Mentor => Matches::Single(search(db, &seeker, Seeking::Mentee, limit).await?),
        Role::Both => Matches::Dual {
            as_mentee: search(db, &seeker, Seeking::Mentor, limit).await?,
            as_mentor: search(db, &seeker, Seeking::Mentee, limit).await?,
        },
    };

    Ok(matches)
}

async fn search(
    db: &impl ConnectionTrait,
    seeker: &ProfileSummary,
    seeking: Seeking,
    limit: usize,
) -> Result<Vec<MatchCandidate>, Error> {
    let (roles, bound) = match seeking {
        Seeking::Mentor => (
            [Role::Mentor, Role::Both],
            ExperienceBound::Above(seeker.years_experience),
        ),
        Seeking::Mentee => (
            [Role::Mentee, Role::Both],
            ExperienceBound::Below(seeker.years_experience),
        ),
    };

    let pool = entity_api::profile::find_candidates(db, &seeker.user_id, &roles, bound).await?;
    let ranked = rank(seeker, pool, limit);

    debug!(
        "Ranked {} {seeking:?} candidate(s) for {}",
        ranked.len(),
        seeker.user_id
    );

    Ok(ranked)
}

/// Scores, sorts and truncates a candidate pool.
pub fn rank(
    seeker: &ProfileSummary,
    pool: Vec<(users::Model, profiles::Model)>,
    limit: usize,
) -> Vec<MatchCandidate> {
    let mut candidates: Vec<MatchCandidate> = pool
        .into_iter()
        .map(|(user, profile)| score_candidate(seeker, user, profile))
        .collect();

    // `sort_by` is stable, so ties keep pool order.
    candidates.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    candidates.truncate(limit);
    candidates
}

fn score_candidate(
    seeker: &ProfileSummary,
    user: users::Model,
    profile: profiles::Model,
) -> MatchCandidate {
    let candidate_skills = normalize_skills(profile.skills.iter());
    let shared_skills: Vec<String> = seeker
        .skill_set
        .intersection(&candidate_skills)
        .cloned()
        .collect();

    let skill = skill_score(shared_skills.len(), seeker.skill_set.len());
    let experience = experience_score(seeker.years_experience, profile.years_experience);

    MatchCandidate {
        candidate_id: user.id,
        full_name: profile.full_name,
        role: user.role,
        industry: profile.industry,
        years_experience: profile.years_experience,
        skills: profile.skills.0,
        match_score: match_score(skill, experience),
        skill_score: skill.round() as u8,
        experience_score: experience,
        shared_skills,
    }
}

/// Percentage of the seeker's skills the candidate shares, capped at 100.
pub fn skill_score(shared: usize, seeker_skill_count: usize) -> f64 {
    (100.0 * shared as f64 / seeker_skill_count.max(1) as f64).min(100.0)
}

pub fn experience_score(seeker_years: i32, candidate_years: i32) -> u8 {
    match (candidate_years - seeker_years).abs() {
        0..=5 => 100,
        6..=10 => 70,
        _ => 50,
    }
}

pub fn match_score(skill_score: f64, experience_score: u8) -> u8 {
    let total = SKILL_WEIGHT * skill_score + EXPERIENCE_WEIGHT * f64::from(experience_score);
    total.round().clamp(0.0, 100.0) as u8
}

fn normalize_skills<'a>(skills: impl Iterator<Item = &'a String>) -> BTreeSet<String> {
    skills
        .map(|skill| skill.trim().to_lowercase())
        .filter(|skill| !skill.is_empty())
        .collect()
}

fn not_found_as(what: &'static str) -> impl Fn(entity_api::error::Error) -> Error {
    move |err| match err.error_kind {
        entity_api::error::EntityApiErrorKind::RecordNotFound => Error::not_found(what),
        _ => err.into(),
    }
}

/// Changes to a user's matching preferences. Absent fields take defaults.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct PreferencesUpdate {
    #[serde(default)]
    pub preferred_industries: Vec<String>,
    #[serde(default = "default_min_experience")]
    pub min_experience: i32,
    #[serde(default = "default_max_experience")]
    pub max_experience: i32,
    #[serde(default = "default_meeting_frequency")]
    pub preferred_meeting_frequency: String,
}

fn default_min_experience() -> i32 {
    DEFAULT_MIN_EXPERIENCE
}

fn default_max_experience() -> i32 {
    DEFAULT_MAX_EXPERIENCE
}

fn default_meeting_frequency() -> String {
    DEFAULT_MEETING_FREQUENCY.to_string()
}

/// The user's saved preferences, or the defaults if none were saved.
pub async fn get_preferences(
    db: &impl ConnectionTrait,
    user_id: &str,
) -> Result<matching_preferences::Model, Error> {
    match entity_api::matching_preference::find_by_user_id(db, user_id).await? {
        Some(preferences) => Ok(preferences),
        None => {
            let now = chrono::Utc::now().into();
            Ok(matching_preferences::Model {
                user_id: user_id.to_owned(),
                preferred_industries: Default::default(),
                min_experience: DEFAULT_MIN_EXPERIENCE,
                max_experience: DEFAULT_MAX_EXPERIENCE,
                preferred_meeting_frequency: DEFAULT_MEETING_FREQUENCY.to_string(),
                created_at: now,
                updated_at: now,
            })
        }
    }
}

pub async fn update_preferences(
    db: &impl ConnectionTrait,
    user_id: &str,
    update: PreferencesUpdate,
) -> Result<matching_preferences::Model, Error> {
    if update.min_experience < 0 || update.max_experience < 0 {
        return Err(Error::invalid("experience bounds must not be negative"));
    }
    if update.min_experience > update.max_experience {
        return Err(Error::invalid(
            "min_experience must not exceed max_experience",
        ));
    }
    if !MEETING_FREQUENCIES.contains(&update.preferred_meeting_frequency.as_str()) {
        return Err(Error::invalid(format!(
            "preferred_meeting_frequency must be one of {}",
            MEETING_FREQUENCIES.join(", ")
        )));
    }

    let now = chrono::Utc::now().into();
    Ok(entity_api::matching_preference::upsert(
        db,
        matching_preferences::Model {
            user_id: user_id.to_owned(),
            preferred_industries: update.preferred_industries.into(),
            min_experience: update.min_experience,
            max_experience: update.max_experience,
            preferred_meeting_frequency: update.preferred_meeting_frequency,
            created_at: now,
            updated_at: now,
        },
    )
    .await?)
}
