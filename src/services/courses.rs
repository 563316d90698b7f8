//! Course CRUD nested under bootcamps.

use validator::Validate;

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::course::{Course, UpdateCourse};
use crate::domain::user::UserRole;
use crate::forms::course::{CreateCourseForm, UpdateCourseForm};
use crate::listing::{ListParams, Page};
use crate::repository::{BootcampReader, CourseListQuery, CourseReader, CourseWriter};
use crate::services::{ServiceError, ServiceResult, current_user_id, is_owner_or_admin};

/// One page of courses, each with its bootcamp summary. With `bootcamp_id`
/// the listing is scoped to that bootcamp; an unknown id just yields an
/// empty page.
pub fn list_courses<R>(
    repo: &R,
    params: ListParams,
    bootcamp_id: Option<i32>,
) -> ServiceResult<Page<Course>>
where
    R: CourseReader + ?Sized,
{
    let mut query = CourseListQuery::new(params.clone()).with_bootcamp();
    if let Some(id) = bootcamp_id {
        query = query.bootcamp(id);
    }

    let (total, items) = repo.list_courses(query)?;

    Ok(Page::new(items, total, params))
}

pub fn get_course<R>(repo: &R, course_id: i32) -> ServiceResult<Course>
where
    R: CourseReader + ?Sized,
{
    repo.get_course_by_id(course_id)?
        .ok_or_else(|| not_found(course_id))
}

/// Adds a course to the bootcamp, which must belong to the caller.
pub fn create_course<R>(
    repo: &R,
    user: &AuthenticatedUser,
    bootcamp_id: i32,
    form: CreateCourseForm,
) -> ServiceResult<Course>
where
    R: BootcampReader + CourseReader + CourseWriter + ?Sized,
{
    ensure_role(user, &[UserRole::Publisher, UserRole::Admin])?;
    form.validate()?;
    let user_id = current_user_id(user)?;

    let bootcamp = repo.get_bootcamp_by_id(bootcamp_id)?.ok_or_else(|| {
        ServiceError::NotFound(format!("No bootcamp with the id of {bootcamp_id}"))
    })?;

    if !is_owner_or_admin(user, bootcamp.user_id) {
        return Err(ServiceError::Unauthorized(format!(
            "User {} is not authorized to add a course to bootcamp {bootcamp_id}",
            user.sub
        )));
    }

    let new_course = form.into_domain(bootcamp_id, user_id);
    repo.create_course(&new_course).map_err(ServiceError::from)
}

pub fn update_course<R>(
    repo: &R,
    user: &AuthenticatedUser,
    course_id: i32,
    form: UpdateCourseForm,
) -> ServiceResult<Course>
where
    R: CourseReader + CourseWriter + ?Sized,
{
    form.validate()?;

    let course = repo
        .get_course_by_id(course_id)?
        .ok_or_else(|| not_found(course_id))?;

    if !is_owner_or_admin(user, course.user_id) {
        return Err(ServiceError::Unauthorized(format!(
            "User {} is not authorized to update course {course_id}",
            user.sub
        )));
    }

    let updates = UpdateCourse::from(&form);
    repo.update_course(course_id, &updates)
        .map_err(ServiceError::from)
}

pub fn delete_course<R>(repo: &R, user: &AuthenticatedUser, course_id: i32) -> ServiceResult<()>
where
    R: CourseReader + CourseWriter + ?Sized,
{
    let course = repo
        .get_course_by_id(course_id)?
        .ok_or_else(|| not_found(course_id))?;

    if !is_owner_or_admin(user, course.user_id) {
        return Err(ServiceError::Unauthorized(format!(
            "User {} is not authorized to delete course {course_id}",
            user.sub
        )));
    }

    repo.delete_course(course_id).map_err(ServiceError::from)
}

fn not_found(course_id: i32) -> ServiceError {
    ServiceError::NotFound(format!("No course with the id of {course_id}"))
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::Utc;
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::bootcamp::Bootcamp;
    use crate::domain::course::MinimumSkill;
    use crate::domain::user::User;
    use crate::repository::mock::MockRepository;

    fn claims(id: i32, role: UserRole) -> AuthenticatedUser {
        let user = User {
            id,
            name: "John".into(),
            email: "john@example.com".into(),
            role,
            password_hash: String::new(),
            reset_password_token: None,
            reset_password_expire: None,
            created_at: Utc::now().naive_utc(),
        };
        AuthenticatedUser::new(&user, 30)
    }

    fn stored_bootcamp(id: i32, owner: i32) -> Bootcamp {
        Bootcamp {
            id,
            user_id: owner,
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

    fn stored_course(id: i32, owner: i32) -> Course {
        Course {
            id,
            bootcamp_id: 1,
            user_id: owner,
            title: "Front End Web Development".into(),
            description: "HTML, CSS, JavaScript".into(),
            weeks: "8".into(),
            tuition: 8000.0,
            minimum_skill: MinimumSkill::Beginner,
            scholarship_available: false,
            created_at: Utc::now().naive_utc(),
            bootcamp: None,
        }
    }

    fn create_form() -> CreateCourseForm {
        CreateCourseForm {
            title: "Front End Web Development".into(),
            description: "HTML, CSS, JavaScript".into(),
            weeks: "8".into(),
            tuition: 8000.0,
            minimum_skill: MinimumSkill::Beginner,
            scholarship_available: false,
        }
    }

    #[test]
    fn create_rejects_courses_on_missing_bootcamp() {
        let mut repo = MockRepository::new();
        repo.expect_get_bootcamp_by_id()
            .with(eq(42))
            .returning(|_| Ok(None));
        repo.expect_create_course().times(0);

        let err = create_course(&repo, &claims(7, UserRole::Publisher), 42, create_form())
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::NotFound("No bootcamp with the id of 42".into())
        );
    }

    #[test]
    fn create_requires_owning_the_bootcamp() {
        let mut repo = MockRepository::new();
        repo.expect_get_bootcamp_by_id()
            .returning(|id| Ok(Some(stored_bootcamp(id, 7))));
        repo.expect_create_course().times(0);

        let err = create_course(&repo, &claims(8, UserRole::Publisher), 1, create_form())
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::Unauthorized(
                "User 8 is not authorized to add a course to bootcamp 1".into()
            )
        );
    }

    #[test]
    fn admin_may_add_courses_to_any_bootcamp() {
        let mut repo = MockRepository::new();
        repo.expect_get_bootcamp_by_id()
            .returning(|id| Ok(Some(stored_bootcamp(id, 7))));
        repo.expect_create_course()
            .withf(|new_course| new_course.bootcamp_id == 1 && new_course.user_id == 99)
            .returning(|new_course| {
                let mut course = stored_course(5, new_course.user_id);
                course.bootcamp_id = new_course.bootcamp_id;
                Ok(course)
            });

        let course = create_course(&repo, &claims(99, UserRole::Admin), 1, create_form()).unwrap();
        assert_eq!(course.id, 5);
    }

    #[test]
    fn update_is_scoped_to_the_course_author() {
        let mut repo = MockRepository::new();
        repo.expect_get_course_by_id()
            .returning(|id| Ok(Some(stored_course(id, 7))));
        repo.expect_update_course().times(0);

        let err = update_course(
            &repo,
            &claims(8, UserRole::Publisher),
            5,
            UpdateCourseForm::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ServiceError::Unauthorized("User 8 is not authorized to update course 5".into())
        );
    }

    #[test]
    fn scoped_listing_targets_the_bootcamp() {
        let mut repo = MockRepository::new();
        repo.expect_list_courses()
            .withf(|query| query.bootcamp_id == Some(3) && query.with_bootcamp)
            .returning(|_| Ok((0, Vec::new())));

        let page = list_courses(&repo, ListParams::default(), Some(3)).unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.count(), 0);
    }

    #[test]
    fn missing_course_is_a_404_with_its_id() {
        let mut repo = MockRepository::new();
        repo.expect_get_course_by_id().returning(|_| Ok(None));

        let err = get_course(&repo, 12).unwrap_err();
        assert_eq!(
            err,
            ServiceError::NotFound("No course with the id of 12".into())
        );
    }
}
