use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::bootcamp::BootcampSummary;

/// A rating a user left for a bootcamp, one per user and bootcamp.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i32,
    pub bootcamp_id: i32,
    pub user_id: i32,
    pub title: String,
    pub text: String,
    /// 1 through 10 inclusive.
    pub rating: f64,
    pub created_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bootcamp: Option<BootcampSummary>,
}

#[derive(Clone, Debug)]
pub struct NewReview {
    pub bootcamp_id: i32,
    pub user_id: i32,
    pub title: String,
    pub text: String,
    pub rating: f64,
    pub created_at: NaiveDateTime,
}

impl NewReview {
    #[must_use]
    pub fn new(bootcamp_id: i32, user_id: i32, title: &str, text: &str, rating: f64) -> Self {
        Self {
            bootcamp_id,
            user_id,
            title: title.trim().to_string(),
            text: text.trim().to_string(),
            rating,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Partial update; `None` fields keep their current values.
#[derive(Clone, Debug, Default)]
pub struct UpdateReview {
    pub title: Option<String>,
    pub text: Option<String>,
    pub rating: Option<f64>,
}

impl UpdateReview {
    /// True when the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.text.is_none() && self.rating.is_none()
    }
}
