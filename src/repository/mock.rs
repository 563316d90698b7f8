//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDateTime;
use mockall::mock;

use crate::domain::bootcamp::{Bootcamp, NewBootcamp, UpdateBootcamp};
use crate::domain::course::{Course, NewCourse, UpdateCourse};
use crate::domain::review::{NewReview, Review, UpdateReview};
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::geocode::GeoPoint;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    BootcampListQuery, BootcampReader, BootcampWriter, CourseListQuery, CourseReader,
    CourseWriter, ReviewListQuery, ReviewReader, ReviewWriter, UserListQuery, UserReader,
    UserWriter,
};

mock! {
    pub Repository {}

    impl BootcampReader for Repository {
        fn get_bootcamp_by_id(&self, id: i32) -> RepositoryResult<Option<Bootcamp>>;
        fn get_bootcamp_by_user(&self, user_id: i32) -> RepositoryResult<Option<Bootcamp>>;
        fn list_bootcamps(&self, query: BootcampListQuery) -> RepositoryResult<(usize, Vec<Bootcamp>)>;
        fn list_bootcamps_within(
            &self,
            center: GeoPoint,
            radius_miles: f64,
        ) -> RepositoryResult<Vec<Bootcamp>>;
    }

    impl BootcampWriter for Repository {
        fn create_bootcamp(&self, new_bootcamp: &NewBootcamp) -> RepositoryResult<Bootcamp>;
        fn update_bootcamp(
            &self,
            bootcamp_id: i32,
            updates: &UpdateBootcamp,
        ) -> RepositoryResult<Bootcamp>;
        fn delete_bootcamp(&self, bootcamp_id: i32) -> RepositoryResult<()>;
        fn set_bootcamp_photo(&self, bootcamp_id: i32, file_name: &str) -> RepositoryResult<Bootcamp>;
    }

    impl CourseReader for Repository {
        fn get_course_by_id(&self, id: i32) -> RepositoryResult<Option<Course>>;
        fn list_courses(&self, query: CourseListQuery) -> RepositoryResult<(usize, Vec<Course>)>;
    }

    impl CourseWriter for Repository {
        fn create_course(&self, new_course: &NewCourse) -> RepositoryResult<Course>;
        fn update_course(&self, course_id: i32, updates: &UpdateCourse) -> RepositoryResult<Course>;
        fn delete_course(&self, course_id: i32) -> RepositoryResult<()>;
    }

    impl ReviewReader for Repository {
        fn get_review_by_id(&self, id: i32) -> RepositoryResult<Option<Review>>;
        fn list_reviews(&self, query: ReviewListQuery) -> RepositoryResult<(usize, Vec<Review>)>;
    }

    impl ReviewWriter for Repository {
        fn create_review(&self, new_review: &NewReview) -> RepositoryResult<Review>;
        fn update_review(&self, review_id: i32, updates: &UpdateReview) -> RepositoryResult<Review>;
        fn delete_review(&self, review_id: i32) -> RepositoryResult<()>;
    }

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
        fn get_user_by_reset_token(
            &self,
            token_hash: &str,
            now: NaiveDateTime,
        ) -> RepositoryResult<Option<User>>;
        fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn update_user(&self, user_id: i32, updates: &UpdateUser) -> RepositoryResult<User>;
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
}
