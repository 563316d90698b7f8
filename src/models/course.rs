//! Diesel models for course records.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::course::{
    Course as DomainCourse, NewCourse as DomainNewCourse, UpdateCourse as DomainUpdateCourse,
};
use crate::models::bootcamp::Bootcamp;

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Bootcamp, foreign_key = bootcamp_id))]
#[diesel(table_name = crate::schema::courses)]
/// Diesel model for [`crate::domain::course::Course`].
pub struct Course {
    pub id: i32,
    pub bootcamp_id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub weeks: String,
    pub tuition: f64,
    pub minimum_skill: String,
    pub scholarship_available: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::courses)]
/// Insertable form of [`Course`].
pub struct NewCourse {
    pub bootcamp_id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub weeks: String,
    pub tuition: f64,
    pub minimum_skill: String,
    pub scholarship_available: bool,
    pub created_at: NaiveDateTime,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::courses)]
/// Data used when updating a [`Course`] record.
pub struct UpdateCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub weeks: Option<String>,
    pub tuition: Option<f64>,
    pub minimum_skill: Option<String>,
    pub scholarship_available: Option<bool>,
}

impl From<Course> for DomainCourse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            bootcamp_id: course.bootcamp_id,
            user_id: course.user_id,
            title: course.title,
            description: course.description,
            weeks: course.weeks,
            tuition: course.tuition,
            minimum_skill: course.minimum_skill.as_str().into(),
            scholarship_available: course.scholarship_available,
            created_at: course.created_at,
            bootcamp: None,
        }
    }
}

impl From<&DomainNewCourse> for NewCourse {
    fn from(course: &DomainNewCourse) -> Self {
        Self {
            bootcamp_id: course.bootcamp_id,
            user_id: course.user_id,
            title: course.title.clone(),
            description: course.description.clone(),
            weeks: course.weeks.clone(),
            tuition: course.tuition,
            minimum_skill: course.minimum_skill.to_string(),
            scholarship_available: course.scholarship_available,
            created_at: course.created_at,
        }
    }
}

impl From<&DomainUpdateCourse> for UpdateCourse {
    fn from(update: &DomainUpdateCourse) -> Self {
        Self {
            title: update.title.clone(),
            description: update.description.clone(),
            weeks: update.weeks.clone(),
            tuition: update.tuition,
            minimum_skill: update.minimum_skill.map(|s| s.to_string()),
            scholarship_available: update.scholarship_available,
        }
    }
}
