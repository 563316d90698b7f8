//! Request bodies accepted by the course endpoints.

use serde::Deserialize;
use validator::Validate;

use crate::domain::course::{MinimumSkill, NewCourse, UpdateCourse};

/// Body for `POST /api/v1/bootcamps/{bootcamp_id}/courses`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseForm {
    #[validate(length(min = 1, message = "Please add a course title"))]
    pub title: String,
    #[validate(length(min = 1, message = "Please add a description"))]
    pub description: String,
    #[validate(length(min = 1, message = "Please add number of weeks"))]
    pub weeks: String,
    #[validate(range(min = 0.0, message = "Please add a tuition cost"))]
    pub tuition: f64,
    pub minimum_skill: MinimumSkill,
    #[serde(default)]
    pub scholarship_available: bool,
}

impl CreateCourseForm {
    /// Builds the domain record for the given bootcamp and author.
    #[must_use]
    pub fn into_domain(&self, bootcamp_id: i32, user_id: i32) -> NewCourse {
        NewCourse::new(
            bootcamp_id,
            user_id,
            &self.title,
            &self.description,
            &self.weeks,
            self.tuition,
            self.minimum_skill,
            self.scholarship_available,
        )
    }
}

/// Body for `PUT /api/v1/courses/{id}`. Absent fields stay untouched.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseForm {
    #[validate(length(min = 1, message = "Please add a course title"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Please add a description"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Please add number of weeks"))]
    pub weeks: Option<String>,
    #[validate(range(min = 0.0, message = "Please add a tuition cost"))]
    pub tuition: Option<f64>,
    pub minimum_skill: Option<MinimumSkill>,
    pub scholarship_available: Option<bool>,
}

impl From<&UpdateCourseForm> for UpdateCourse {
    fn from(form: &UpdateCourseForm) -> Self {
        UpdateCourse {
            title: form.title.as_deref().map(|s| s.trim().to_string()),
            description: form.description.as_deref().map(|s| s.trim().to_string()),
            weeks: form.weeks.as_deref().map(|s| s.trim().to_string()),
            tuition: form.tuition,
            minimum_skill: form.minimum_skill,
            scholarship_available: form.scholarship_available,
        }
    }
}
