//! Persistence layer: repository traits plus their Diesel implementation.
//!
//! Services depend on the reader/writer traits, never on Diesel directly.
//! Every list operation takes one of the `*ListQuery` builders, which wrap
//! the parsed [`ListParams`] and any endpoint-specific scoping, and returns
//! the filtered total together with one page of entities.

use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool};
use crate::domain::bootcamp::{Bootcamp, NewBootcamp, UpdateBootcamp};
use crate::domain::course::{Course, NewCourse, UpdateCourse};
use crate::domain::review::{NewReview, Review, UpdateReview};
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::geocode::GeoPoint;
use crate::listing::ListParams;
use crate::repository::errors::RepositoryResult;

pub mod bootcamp;
pub mod course;
pub mod errors;
mod filters;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod review;
pub mod user;

/// Repository over the shared connection pool. Cloning shares the pool.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BootcampListQuery {
    pub params: ListParams,
    /// Attach each bootcamp's courses to the result.
    pub with_courses: bool,
}

impl BootcampListQuery {
    #[must_use]
    pub fn new(params: ListParams) -> Self {
        Self {
            params,
            with_courses: false,
        }
    }

    #[must_use]
    pub fn with_courses(mut self) -> Self {
        self.with_courses = true;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub params: ListParams,
    /// Restrict to a single bootcamp's courses.
    pub bootcamp_id: Option<i32>,
    /// Attach the owning bootcamp's summary to each course.
    pub with_bootcamp: bool,
}

impl CourseListQuery {
    #[must_use]
    pub fn new(params: ListParams) -> Self {
        Self {
            params,
            bootcamp_id: None,
            with_bootcamp: false,
        }
    }

    #[must_use]
    pub fn bootcamp(mut self, bootcamp_id: i32) -> Self {
        self.bootcamp_id = Some(bootcamp_id);
        self
    }

    #[must_use]
    pub fn with_bootcamp(mut self) -> Self {
        self.with_bootcamp = true;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReviewListQuery {
    pub params: ListParams,
    /// Restrict to reviews of a single bootcamp.
    pub bootcamp_id: Option<i32>,
    /// Attach the reviewed bootcamp's summary to each review.
    pub with_bootcamp: bool,
}

impl ReviewListQuery {
    #[must_use]
    pub fn new(params: ListParams) -> Self {
        Self {
            params,
            bootcamp_id: None,
            with_bootcamp: false,
        }
    }

    #[must_use]
    pub fn bootcamp(mut self, bootcamp_id: i32) -> Self {
        self.bootcamp_id = Some(bootcamp_id);
        self
    }

    #[must_use]
    pub fn with_bootcamp(mut self) -> Self {
        self.with_bootcamp = true;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub params: ListParams,
}

impl UserListQuery {
    #[must_use]
    pub fn new(params: ListParams) -> Self {
        Self { params }
    }
}

pub trait BootcampReader {
    fn get_bootcamp_by_id(&self, id: i32) -> RepositoryResult<Option<Bootcamp>>;
    fn get_bootcamp_by_user(&self, user_id: i32) -> RepositoryResult<Option<Bootcamp>>;
    fn list_bootcamps(&self, query: BootcampListQuery) -> RepositoryResult<(usize, Vec<Bootcamp>)>;
    /// Bootcamps within `radius_miles` of `center`, unpaginated.
    fn list_bootcamps_within(
        &self,
        center: GeoPoint,
        radius_miles: f64,
    ) -> RepositoryResult<Vec<Bootcamp>>;
}

pub trait BootcampWriter {
    fn create_bootcamp(&self, new_bootcamp: &NewBootcamp) -> RepositoryResult<Bootcamp>;
    fn update_bootcamp(
        &self,
        bootcamp_id: i32,
        updates: &UpdateBootcamp,
    ) -> RepositoryResult<Bootcamp>;
    /// Removes the bootcamp together with its courses and reviews.
    fn delete_bootcamp(&self, bootcamp_id: i32) -> RepositoryResult<()>;
    fn set_bootcamp_photo(&self, bootcamp_id: i32, file_name: &str) -> RepositoryResult<Bootcamp>;
}

pub trait CourseReader {
    /// The course with its bootcamp summary attached.
    fn get_course_by_id(&self, id: i32) -> RepositoryResult<Option<Course>>;
    fn list_courses(&self, query: CourseListQuery) -> RepositoryResult<(usize, Vec<Course>)>;
}

pub trait CourseWriter {
    fn create_course(&self, new_course: &NewCourse) -> RepositoryResult<Course>;
    fn update_course(&self, course_id: i32, updates: &UpdateCourse) -> RepositoryResult<Course>;
    fn delete_course(&self, course_id: i32) -> RepositoryResult<()>;
}

pub trait ReviewReader {
    /// The review with its bootcamp summary attached.
    fn get_review_by_id(&self, id: i32) -> RepositoryResult<Option<Review>>;
    fn list_reviews(&self, query: ReviewListQuery) -> RepositoryResult<(usize, Vec<Review>)>;
}

pub trait ReviewWriter {
    fn create_review(&self, new_review: &NewReview) -> RepositoryResult<Review>;
    fn update_review(&self, review_id: i32, updates: &UpdateReview) -> RepositoryResult<Review>;
    fn delete_review(&self, review_id: i32) -> RepositoryResult<()>;
}

pub trait UserReader {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    /// Looks up by hashed reset token, skipping tokens expired at `now`.
    fn get_user_by_reset_token(
        &self,
        token_hash: &str,
        now: NaiveDateTime,
    ) -> RepositoryResult<Option<User>>;
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
}

pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn update_user(&self, user_id: i32, updates: &UpdateUser) -> RepositoryResult<User>;
    /// Replaces the password hash and clears any pending reset token.
    fn set_user_password(&self, user_id: i32, password_hash: &str) -> RepositoryResult<User>;
    fn set_reset_token(
        &self,
        user_id: i32,
        token_hash: &str,
        expires: NaiveDateTime,
    ) -> RepositoryResult<()>;
    fn clear_reset_token(&self, user_id: i32) -> RepositoryResult<()>;
    fn delete_user(&self, user_id: i32) -> RepositoryResult<()>;
}
