use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::bootcamp::BootcampSummary;

/// Skill level a course expects from applicants.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MinimumSkill {
    Beginner,
    Intermediate,
    Advanced,
}

impl Display for MinimumSkill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MinimumSkill::Beginner => write!(f, "beginner"),
            MinimumSkill::Intermediate => write!(f, "intermediate"),
            MinimumSkill::Advanced => write!(f, "advanced"),
        }
    }
}

impl From<&str> for MinimumSkill {
    fn from(s: &str) -> Self {
        match s {
            "intermediate" => MinimumSkill::Intermediate,
            "advanced" => MinimumSkill::Advanced,
            _ => MinimumSkill::Beginner,
        }
    }
}

impl From<String> for MinimumSkill {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

/// A course offered by a bootcamp. `bootcamp` carries the owning bootcamp's
/// summary when the caller asked for it to be included.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i32,
    pub bootcamp_id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub weeks: String,
    pub tuition: f64,
    pub minimum_skill: MinimumSkill,
    pub scholarship_available: bool,
    pub created_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bootcamp: Option<BootcampSummary>,
}

#[derive(Clone, Debug)]
pub struct NewCourse {
    pub bootcamp_id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub weeks: String,
    pub tuition: f64,
    pub minimum_skill: MinimumSkill,
    pub scholarship_available: bool,
    pub created_at: NaiveDateTime,
}

impl NewCourse {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bootcamp_id: i32,
        user_id: i32,
        title: &str,
        description: &str,
        weeks: &str,
        tuition: f64,
        minimum_skill: MinimumSkill,
        scholarship_available: bool,
    ) -> Self {
        Self {
            bootcamp_id,
            user_id,
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            weeks: weeks.trim().to_string(),
            tuition,
            minimum_skill,
            scholarship_available,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Partial update; `None` fields keep their current values.
#[derive(Clone, Debug, Default)]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub weeks: Option<String>,
    pub tuition: Option<f64>,
    pub minimum_skill: Option<MinimumSkill>,
    pub scholarship_available: Option<bool>,
}

impl UpdateCourse {
    /// True when the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.weeks.is_none()
            && self.tuition.is_none()
            && self.minimum_skill.is_none()
            && self.scholarship_available.is_none()
    }
}
