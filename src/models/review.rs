//! Diesel models for review records.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::review::{
    NewReview as DomainNewReview, Review as DomainReview, UpdateReview as DomainUpdateReview,
};
use crate::models::bootcamp::Bootcamp;
use crate::models::user::User;

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Bootcamp, foreign_key = bootcamp_id))]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(table_name = crate::schema::reviews)]
/// Diesel model for [`crate::domain::review::Review`].
pub struct Review {
    pub id: i32,
    pub bootcamp_id: i32,
    pub user_id: i32,
    pub title: String,
    pub text: String,
    pub rating: f64,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::reviews)]
/// Insertable form of [`Review`].
pub struct NewReview {
    pub bootcamp_id: i32,
    pub user_id: i32,
    pub title: String,
    pub text: String,
    pub rating: f64,
    pub created_at: NaiveDateTime,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::reviews)]
/// Data used when updating a [`Review`] record.
pub struct UpdateReview {
    pub title: Option<String>,
    pub text: Option<String>,
    pub rating: Option<f64>,
}

impl From<Review> for DomainReview {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            bootcamp_id: review.bootcamp_id,
            user_id: review.user_id,
            title: review.title,
            text: review.text,
            rating: review.rating,
            created_at: review.created_at,
            bootcamp: None,
        }
    }
}

impl From<&DomainNewReview> for NewReview {
    fn from(review: &DomainNewReview) -> Self {
        Self {
            bootcamp_id: review.bootcamp_id,
            user_id: review.user_id,
            title: review.title.clone(),
            text: review.text.clone(),
            rating: review.rating,
            created_at: review.created_at,
        }
    }
}

impl From<&DomainUpdateReview> for UpdateReview {
    fn from(update: &DomainUpdateReview) -> Self {
        Self {
            title: update.title.clone(),
            text: update.text.clone(),
            rating: update.rating,
        }
    }
}
