//! Review CRUD nested under bootcamps.

use validator::Validate;

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::review::{Review, UpdateReview};
use crate::domain::user::UserRole;
use crate::forms::review::{CreateReviewForm, UpdateReviewForm};
use crate::listing::{ListParams, Page};
use crate::repository::{BootcampReader, ReviewListQuery, ReviewReader, ReviewWriter};
use crate::services::{ServiceError, ServiceResult, current_user_id, is_owner_or_admin};

/// One page of reviews, each with its bootcamp summary. With `bootcamp_id`
/// the listing is scoped to that bootcamp.
pub fn list_reviews<R>(
    repo: &R,
    params: ListParams,
    bootcamp_id: Option<i32>,
) -> ServiceResult<Page<Review>>
where
    R: ReviewReader + ?Sized,
{
    let mut query = ReviewListQuery::new(params.clone()).with_bootcamp();
    if let Some(id) = bootcamp_id {
        query = query.bootcamp(id);
    }

    let (total, items) = repo.list_reviews(query)?;

    Ok(Page::new(items, total, params))
}

pub fn get_review<R>(repo: &R, review_id: i32) -> ServiceResult<Review>
where
    R: ReviewReader + ?Sized,
{
    repo.get_review_by_id(review_id)?
        .ok_or_else(|| not_found(review_id))
}

/// Adds the caller's review to the bootcamp. One review per user and
/// bootcamp; publishers do not review at all.
pub fn create_review<R>(
    repo: &R,
    user: &AuthenticatedUser,
    bootcamp_id: i32,
    form: CreateReviewForm,
) -> ServiceResult<Review>
where
    R: BootcampReader + ReviewReader + ReviewWriter + ?Sized,
{
    ensure_role(user, &[UserRole::User, UserRole::Admin])?;
    form.validate()?;
    let user_id = current_user_id(user)?;

    if repo.get_bootcamp_by_id(bootcamp_id)?.is_none() {
        return Err(ServiceError::NotFound(format!(
            "No bootcamp with the id of {bootcamp_id}"
        )));
    }

    let new_review = form.into_domain(bootcamp_id, user_id);
    repo.create_review(&new_review).map_err(ServiceError::from)
}

pub fn update_review<R>(
    repo: &R,
    user: &AuthenticatedUser,
    review_id: i32,
    form: UpdateReviewForm,
) -> ServiceResult<Review>
where
    R: ReviewReader + ReviewWriter + ?Sized,
{
    form.validate()?;

    let review = repo
        .get_review_by_id(review_id)?
        .ok_or_else(|| not_found(review_id))?;

    if !is_owner_or_admin(user, review.user_id) {
        return Err(ServiceError::Unauthorized(
            "Not authorized to update review".into(),
        ));
    }

    let updates = UpdateReview::from(&form);
    repo.update_review(review_id, &updates)
        .map_err(ServiceError::from)
}

pub fn delete_review<R>(repo: &R, user: &AuthenticatedUser, review_id: i32) -> ServiceResult<()>
where
    R: ReviewReader + ReviewWriter + ?Sized,
{
    let review = repo
        .get_review_by_id(review_id)?
        .ok_or_else(|| not_found(review_id))?;

    if !is_owner_or_admin(user, review.user_id) {
        return Err(ServiceError::Unauthorized(
            "Not authorized to delete review".into(),
        ));
    }

    repo.delete_review(review_id).map_err(ServiceError::from)
}

fn not_found(review_id: i32) -> ServiceError {
    ServiceError::NotFound(format!("No review found with the id of {review_id}"))
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::Utc;
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::bootcamp::Bootcamp;
    use crate::domain::user::User;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn claims(id: i32, role: UserRole) -> AuthenticatedUser {
        let user = User {
            id,
            name: "Mary".into(),
            email: "mary@example.com".into(),
            role,
            password_hash: String::new(),
            reset_password_token: None,
            reset_password_expire: None,
            created_at: Utc::now().naive_utc(),
        };
        AuthenticatedUser::new(&user, 30)
    }

    fn stored_bootcamp(id: i32) -> Bootcamp {
        Bootcamp {
            id,
            user_id: 7,
            name: "Devworks".into(),
            description: "MERN and more".into(),
            website: None,
            phone: None,
            email: None,
            address: "233 Bay State Rd".into(),
            latitude: None,
            longitude: None,
            careers: Vec::new(),
            housing: false,
            job_assistance: false,
            job_guarantee: false,
            accept_gi: false,
            photo: None,
            average_cost: None,
            average_rating: None,
            created_at: Utc::now().naive_utc(),
            courses: None,
        }
    }

    fn stored_review(id: i32, author: i32) -> Review {
        Review {
            id,
            bootcamp_id: 1,
            user_id: author,
            title: "Learned a ton".into(),
            text: "Great instructors".into(),
            rating: 8.0,
            created_at: Utc::now().naive_utc(),
            bootcamp: None,
        }
    }

    fn create_form() -> CreateReviewForm {
        CreateReviewForm {
            title: "Learned a ton".into(),
            text: "Great instructors".into(),
            rating: 8.0,
        }
    }

    #[test]
    fn publishers_cannot_review() {
        let repo = MockRepository::new();

        let err = create_review(&repo, &claims(7, UserRole::Publisher), 1, create_form())
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::Forbidden(
                "User role publisher is not authorized to access this route".into()
            )
        );
    }

    #[test]
    fn create_requires_an_existing_bootcamp() {
        let mut repo = MockRepository::new();
        repo.expect_get_bootcamp_by_id()
            .with(eq(42))
            .returning(|_| Ok(None));
        repo.expect_create_review().times(0);

        let err = create_review(&repo, &claims(3, UserRole::User), 42, create_form()).unwrap_err();
        assert_eq!(
            err,
            ServiceError::NotFound("No bootcamp with the id of 42".into())
        );
    }

    #[test]
    fn missing_review_is_reported_with_its_id() {
        let mut repo = MockRepository::new();
        repo.expect_get_review_by_id()
            .with(eq(8))
            .returning(|_| Ok(None));

        let err = get_review(&repo, 8).unwrap_err();
        assert_eq!(
            err,
            ServiceError::NotFound("No review found with the id of 8".into())
        );
    }

    #[test]
    fn second_review_for_same_bootcamp_is_a_duplicate() {
        let mut repo = MockRepository::new();
        repo.expect_get_bootcamp_by_id()
            .returning(|id| Ok(Some(stored_bootcamp(id))));
        repo.expect_create_review().returning(|_| {
            Err(RepositoryError::ConstraintViolation(
                "UNIQUE constraint failed: reviews.bootcamp_id, reviews.user_id".into(),
            ))
        });

        let err = create_review(&repo, &claims(3, UserRole::User), 1, create_form()).unwrap_err();
        assert_eq!(
            err,
            ServiceError::Conflict("Duplicate field value entered".into())
        );
    }

    #[test]
    fn review_author_may_update_others_may_not() {
        let mut repo = MockRepository::new();
        repo.expect_get_review_by_id()
            .returning(|id| Ok(Some(stored_review(id, 3))));
        repo.expect_update_review()
            .with(eq(9), mockall::predicate::always())
            .returning(|id, _| Ok(stored_review(id, 3)));

        let form = UpdateReviewForm {
            rating: Some(9.0),
            ..UpdateReviewForm::default()
        };

        assert!(update_review(&repo, &claims(3, UserRole::User), 9, form).is_ok());

        let err = update_review(
            &repo,
            &claims(4, UserRole::User),
            9,
            UpdateReviewForm::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ServiceError::Unauthorized("Not authorized to update review".into())
        );
    }

    #[test]
    fn admin_may_delete_any_review() {
        let mut repo = MockRepository::new();
        repo.expect_get_review_by_id()
            .returning(|id| Ok(Some(stored_review(id, 3))));
        repo.expect_delete_review()
            .with(eq(9))
            .times(1)
            .returning(|_| Ok(()));

        assert!(delete_review(&repo, &claims(99, UserRole::Admin), 9).is_ok());
    }

    #[test]
    fn scoped_listing_targets_the_bootcamp() {
        let mut repo = MockRepository::new();
        repo.expect_list_reviews()
            .withf(|query| query.bootcamp_id == Some(2) && query.with_bootcamp)
            .returning(|_| Ok((1, vec![stored_review(9, 3)])));

        let page = list_reviews(&repo, ListParams::default(), Some(2)).unwrap();
        assert_eq!(page.total, 1);
    }
}
