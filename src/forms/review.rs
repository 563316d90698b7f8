//! Request bodies accepted by the review endpoints.

use serde::Deserialize;
use validator::Validate;

use crate::domain::review::{NewReview, UpdateReview};

/// Body for `POST /api/v1/bootcamps/{bootcamp_id}/reviews`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewForm {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Please add a title of 100 characters or less"
    ))]
    pub title: String,
    #[validate(length(min = 1, message = "Please add some text"))]
    pub text: String,
    #[validate(range(min = 1.0, max = 10.0, message = "Please add a rating between 1 and 10"))]
    pub rating: f64,
}

impl CreateReviewForm {
    /// Builds the domain record for the given bootcamp and author.
    #[must_use]
    pub fn into_domain(&self, bootcamp_id: i32, user_id: i32) -> NewReview {
        NewReview::new(bootcamp_id, user_id, &self.title, &self.text, self.rating)
    }
}

/// Body for `PUT /api/v1/reviews/{id}`. Absent fields stay untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateReviewForm {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Please add a title of 100 characters or less"
    ))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Please add some text"))]
    pub text: Option<String>,
    #[validate(range(min = 1.0, max = 10.0, message = "Please add a rating between 1 and 10"))]
    pub rating: Option<f64>,
}

impl From<&UpdateReviewForm> for UpdateReview {
    fn from(form: &UpdateReviewForm) -> Self {
        UpdateReview {
            title: form.title.as_deref().map(|s| s.trim().to_string()),
            text: form.text.as_deref().map(|s| s.trim().to_string()),
            rating: form.rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_outside_one_to_ten_is_rejected() {
        let mut form = CreateReviewForm {
            title: "Learned a ton".into(),
            text: "Great instructors".into(),
            rating: 11.0,
        };
        assert!(form.validate().is_err());

        form.rating = 10.0;
        assert!(form.validate().is_ok());

        form.rating = 0.5;
        assert!(form.validate().is_err());
    }

    #[test]
    fn partial_update_maps_only_given_fields() {
        let form = UpdateReviewForm {
            rating: Some(7.0),
            ..UpdateReviewForm::default()
        };
        let updates = UpdateReview::from(&form);

        assert_eq!(updates.rating, Some(7.0));
        assert!(updates.title.is_none());
        assert!(!updates.is_empty());
    }
}
