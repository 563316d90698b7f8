use bootcamper::domain::bootcamp::{NewBootcamp, UpdateBootcamp};
use bootcamper::domain::course::{MinimumSkill, NewCourse, UpdateCourse};
use bootcamper::domain::review::{NewReview, UpdateReview};
use bootcamper::domain::user::{NewUser, UpdateUser, User, UserRole};
use bootcamper::geocode::GeoPoint;
use bootcamper::listing::ListParams;
use bootcamper::repository::errors::RepositoryError;
use bootcamper::repository::{
    BootcampListQuery, BootcampReader, BootcampWriter, CourseListQuery, CourseReader, CourseWriter,
    DieselRepository, ReviewListQuery, ReviewReader, ReviewWriter, UserListQuery, UserReader,
    UserWriter,
};
use chrono::{Duration, Utc};

mod common;

fn params(raw: &[(&str, &str)]) -> ListParams {
    ListParams::from_pairs(
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>(),
    )
}

fn create_user(repo: &DieselRepository, name: &str, email: &str, role: UserRole) -> User {
    repo.create_user(&NewUser::new(name, email, role, "hash".into()))
        .unwrap()
}

fn bootcamp_named(user_id: i32, name: &str) -> NewBootcamp {
    NewBootcamp::new(
        user_id,
        name,
        "Learn to code",
        None,
        None,
        None,
        "1 Main St Boston MA",
        Vec::new(),
        false,
        false,
        false,
        false,
    )
}

fn course_priced(bootcamp_id: i32, user_id: i32, title: &str, tuition: f64) -> NewCourse {
    NewCourse::new(
        bootcamp_id,
        user_id,
        title,
        "Twelve weeks of project work",
        "12",
        tuition,
        MinimumSkill::Beginner,
        false,
    )
}

#[test]
fn test_bootcamp_repository_crud() {
    let test_db = common::TestDb::new("test_bootcamp_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = create_user(&repo, "Owner", "owner@example.com", UserRole::Publisher);

    let created = repo
        .create_bootcamp(&bootcamp_named(owner.id, "Devworks"))
        .unwrap();
    assert_eq!(created.name, "Devworks");
    assert_eq!(created.average_cost, None);
    assert_eq!(created.average_rating, None);

    let fetched = repo.get_bootcamp_by_id(created.id).unwrap().unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.name, "Devworks");

    let by_owner = repo.get_bootcamp_by_user(owner.id).unwrap().unwrap();
    assert_eq!(by_owner.id, created.id);

    let updated = repo
        .update_bootcamp(
            created.id,
            &UpdateBootcamp {
                name: Some("Devworks Bootcamp".into()),
                housing: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.name, "Devworks Bootcamp");
    assert!(updated.housing);
    assert_eq!(updated.description, "Learn to code");

    let with_photo = repo
        .set_bootcamp_photo(created.id, "photo_1.jpg")
        .unwrap();
    assert_eq!(with_photo.photo.as_deref(), Some("photo_1.jpg"));

    repo.delete_bootcamp(created.id).unwrap();
    assert!(repo.get_bootcamp_by_id(created.id).unwrap().is_none());
}

#[test]
fn test_bootcamp_delete_removes_courses_and_reviews() {
    let test_db = common::TestDb::new("test_bootcamp_delete_removes_children.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = create_user(&repo, "Owner", "owner@example.com", UserRole::Publisher);
    let reviewer = create_user(&repo, "Reviewer", "reviewer@example.com", UserRole::User);

    let bootcamp = repo
        .create_bootcamp(&bootcamp_named(owner.id, "Devworks"))
        .unwrap();
    let course = repo
        .create_course(&course_priced(bootcamp.id, owner.id, "Front End", 8000.0))
        .unwrap();
    let review = repo
        .create_review(&NewReview::new(
            bootcamp.id,
            reviewer.id,
            "Great",
            "Learned a lot",
            9.0,
        ))
        .unwrap();

    repo.delete_bootcamp(bootcamp.id).unwrap();

    assert!(repo.get_bootcamp_by_id(bootcamp.id).unwrap().is_none());
    assert!(repo.get_course_by_id(course.id).unwrap().is_none());
    assert!(repo.get_review_by_id(review.id).unwrap().is_none());
}

#[test]
fn test_bootcamp_listing_windows_and_sorts() {
    let test_db = common::TestDb::new("test_bootcamp_listing_windows.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = create_user(&repo, "Owner", "owner@example.com", UserRole::Publisher);

    // Zero padded names so lexicographic sort equals numeric order.
    for i in 1..=30 {
        repo.create_bootcamp(&bootcamp_named(owner.id, &format!("Bootcamp {i:02}")))
            .unwrap();
    }

    let (total, items) = repo
        .list_bootcamps(BootcampListQuery::new(params(&[
            ("sort", "name"),
            ("page", "2"),
            ("limit", "10"),
        ])))
        .unwrap();
    assert_eq!(total, 30);
    assert_eq!(items.len(), 10);
    assert_eq!(items[0].name, "Bootcamp 11");
    assert_eq!(items[9].name, "Bootcamp 20");

    // Defaults: newest first, 25 per page.
    let (total, items) = repo
        .list_bootcamps(BootcampListQuery::new(ListParams::default()))
        .unwrap();
    assert_eq!(total, 30);
    assert_eq!(items.len(), 25);
    assert_eq!(items[0].name, "Bootcamp 30");

    let (_, items) = repo
        .list_bootcamps(BootcampListQuery::new(params(&[
            ("sort", "-name"),
            ("limit", "3"),
        ])))
        .unwrap();
    assert_eq!(items[0].name, "Bootcamp 30");
    assert_eq!(items[2].name, "Bootcamp 28");
}

#[test]
fn test_bootcamp_filters() {
    let test_db = common::TestDb::new("test_bootcamp_filters.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = create_user(&repo, "Owner", "owner@example.com", UserRole::Publisher);

    let mut devworks = bootcamp_named(owner.id, "Devworks");
    devworks.careers = vec!["Web Development".into(), "UI/UX".into()];
    devworks.housing = true;
    let devworks = repo.create_bootcamp(&devworks).unwrap();

    let mut moderntech = bootcamp_named(owner.id, "ModernTech");
    moderntech.careers = vec!["Business".into()];
    let moderntech = repo.create_bootcamp(&moderntech).unwrap();

    let mut codemasters = bootcamp_named(owner.id, "Codemasters");
    codemasters.careers = vec!["Data Science".into()];
    repo.create_bootcamp(&codemasters).unwrap();

    let (total, items) = repo
        .list_bootcamps(BootcampListQuery::new(params(&[("housing", "true")])))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].name, "Devworks");

    let (total, mut items) = repo
        .list_bootcamps(BootcampListQuery::new(params(&[(
            "careers[in]",
            "Business,UI/UX",
        )])))
        .unwrap();
    assert_eq!(total, 2);
    items.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(items[0].name, "Devworks");
    assert_eq!(items[1].name, "ModernTech");

    let (total, items) = repo
        .list_bootcamps(BootcampListQuery::new(params(&[(
            "careers",
            "Data Science",
        )])))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].name, "Codemasters");

    // Aggregate filters only match bootcamps with courses.
    repo.create_course(&course_priced(devworks.id, owner.id, "Full Stack", 12000.0))
        .unwrap();
    repo.create_course(&course_priced(moderntech.id, owner.id, "UI/UX", 5000.0))
        .unwrap();

    let (total, items) = repo
        .list_bootcamps(BootcampListQuery::new(params(&[(
            "averageCost[gte]",
            "10000",
        )])))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].name, "Devworks");

    let (_, items) = repo
        .list_bootcamps(BootcampListQuery::new(params(&[("name", "Devworks")])).with_courses())
        .unwrap();
    let courses = items[0].courses.as_ref().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].title, "Full Stack");

    let err = repo
        .list_bootcamps(BootcampListQuery::new(params(&[("flavor", "spicy")])))
        .unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::ValidationError(ref msg) if msg.contains("flavor")
    ));
}

#[test]
fn test_course_writes_maintain_average_cost() {
    let test_db = common::TestDb::new("test_course_average_cost.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = create_user(&repo, "Owner", "owner@example.com", UserRole::Publisher);
    let bootcamp = repo
        .create_bootcamp(&bootcamp_named(owner.id, "Devworks"))
        .unwrap();

    let front_end = repo
        .create_course(&course_priced(bootcamp.id, owner.id, "Front End", 8000.0))
        .unwrap();
    let full_stack = repo
        .create_course(&course_priced(bootcamp.id, owner.id, "Full Stack", 10000.0))
        .unwrap();

    let average = |repo: &DieselRepository| {
        repo.get_bootcamp_by_id(bootcamp.id)
            .unwrap()
            .unwrap()
            .average_cost
    };
    assert_eq!(average(&repo), Some(9000.0));

    repo.update_course(
        full_stack.id,
        &UpdateCourse {
            tuition: Some(12000.0),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(average(&repo), Some(10000.0));

    repo.delete_course(full_stack.id).unwrap();
    assert_eq!(average(&repo), Some(8000.0));

    repo.delete_course(front_end.id).unwrap();
    assert_eq!(average(&repo), None);
}

#[test]
fn test_course_listing_scopes_and_expands() {
    let test_db = common::TestDb::new("test_course_listing.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = create_user(&repo, "Owner", "owner@example.com", UserRole::Publisher);
    let other = create_user(&repo, "Other", "other@example.com", UserRole::Publisher);

    let devworks = repo
        .create_bootcamp(&bootcamp_named(owner.id, "Devworks"))
        .unwrap();
    let moderntech = repo
        .create_bootcamp(&bootcamp_named(other.id, "ModernTech"))
        .unwrap();

    repo.create_course(&course_priced(devworks.id, owner.id, "Front End", 8000.0))
        .unwrap();
    repo.create_course(&course_priced(devworks.id, owner.id, "Full Stack", 10000.0))
        .unwrap();
    repo.create_course(&course_priced(moderntech.id, other.id, "UI/UX", 12000.0))
        .unwrap();

    let (total, items) = repo
        .list_courses(
            CourseListQuery::new(ListParams::default())
                .bootcamp(devworks.id)
                .with_bootcamp(),
        )
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(items.len(), 2);
    for course in &items {
        assert_eq!(course.bootcamp_id, devworks.id);
        assert_eq!(course.bootcamp.as_ref().unwrap().name, "Devworks");
    }

    let (total, items) = repo
        .list_courses(CourseListQuery::new(params(&[("tuition[gte]", "9000")])))
        .unwrap();
    assert_eq!(total, 2);
    assert!(items.iter().all(|c| c.tuition >= 9000.0));

    let fetched = repo.get_course_by_id(items[0].id).unwrap().unwrap();
    assert!(fetched.bootcamp.is_some());

    let err = repo
        .list_courses(CourseListQuery::new(params(&[("housing", "true")])))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError(_)));
}

#[test]
fn test_review_writes_maintain_average_rating() {
    let test_db = common::TestDb::new("test_review_average_rating.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = create_user(&repo, "Owner", "owner@example.com", UserRole::Publisher);
    let mary = create_user(&repo, "Mary", "mary@example.com", UserRole::User);
    let dennis = create_user(&repo, "Dennis", "dennis@example.com", UserRole::User);
    let bootcamp = repo
        .create_bootcamp(&bootcamp_named(owner.id, "Devworks"))
        .unwrap();

    let first = repo
        .create_review(&NewReview::new(bootcamp.id, mary.id, "Good", "Solid", 8.0))
        .unwrap();
    let second = repo
        .create_review(&NewReview::new(
            bootcamp.id,
            dennis.id,
            "Great",
            "Loved it",
            10.0,
        ))
        .unwrap();

    let average = |repo: &DieselRepository| {
        repo.get_bootcamp_by_id(bootcamp.id)
            .unwrap()
            .unwrap()
            .average_rating
    };
    assert_eq!(average(&repo), Some(9.0));

    // One review per user and bootcamp.
    let err = repo
        .create_review(&NewReview::new(bootcamp.id, mary.id, "Again", "Twice", 5.0))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ConstraintViolation(_)));

    repo.update_review(
        first.id,
        &UpdateReview {
            rating: Some(6.0),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(average(&repo), Some(8.0));

    repo.delete_review(second.id).unwrap();
    assert_eq!(average(&repo), Some(6.0));

    repo.delete_review(first.id).unwrap();
    assert_eq!(average(&repo), None);
}

#[test]
fn test_review_listing_scoped_to_a_bootcamp() {
    let test_db = common::TestDb::new("test_review_listing.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = create_user(&repo, "Owner", "owner@example.com", UserRole::Publisher);
    let mary = create_user(&repo, "Mary", "mary@example.com", UserRole::User);

    let devworks = repo
        .create_bootcamp(&bootcamp_named(owner.id, "Devworks"))
        .unwrap();
    let moderntech = repo
        .create_bootcamp(&bootcamp_named(owner.id, "ModernTech"))
        .unwrap();

    repo.create_review(&NewReview::new(devworks.id, mary.id, "Good", "Solid", 8.0))
        .unwrap();
    repo.create_review(&NewReview::new(moderntech.id, mary.id, "Fine", "Okay", 6.0))
        .unwrap();

    let (total, items) = repo
        .list_reviews(
            ReviewListQuery::new(ListParams::default())
                .bootcamp(devworks.id)
                .with_bootcamp(),
        )
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].bootcamp_id, devworks.id);
    assert_eq!(items[0].bootcamp.as_ref().unwrap().name, "Devworks");

    let (total, _) = repo
        .list_reviews(ReviewListQuery::new(params(&[("rating[gte]", "7")])))
        .unwrap();
    assert_eq!(total, 1);
}

#[test]
fn test_radius_search_uses_stored_coordinates() {
    let test_db = common::TestDb::new("test_radius_search.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = create_user(&repo, "Owner", "owner@example.com", UserRole::Publisher);

    let mut devworks = bootcamp_named(owner.id, "Devworks");
    devworks.latitude = Some(42.3496);
    devworks.longitude = Some(-71.1021);
    repo.create_bootcamp(&devworks).unwrap();

    let mut moderntech = bootcamp_named(owner.id, "ModernTech");
    moderntech.latitude = Some(42.6504);
    moderntech.longitude = Some(-71.3316);
    repo.create_bootcamp(&moderntech).unwrap();

    let mut codemasters = bootcamp_named(owner.id, "Codemasters");
    codemasters.latitude = Some(44.4763);
    codemasters.longitude = Some(-73.1953);
    repo.create_bootcamp(&codemasters).unwrap();

    // Never geocoded, so never part of a radius result.
    repo.create_bootcamp(&bootcamp_named(owner.id, "Unlocated"))
        .unwrap();

    let boston = GeoPoint {
        latitude: 42.3601,
        longitude: -71.0589,
    };

    let mut names: Vec<String> = repo
        .list_bootcamps_within(boston, 30.0)
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    names.sort();
    assert_eq!(names, ["Devworks", "ModernTech"]);

    let names: Vec<String> = repo
        .list_bootcamps_within(boston, 5.0)
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(names, ["Devworks"]);
}

#[test]
fn test_user_repository_crud() {
    let test_db = common::TestDb::new("test_user_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let mary = create_user(&repo, "Mary", "Mary@Example.COM", UserRole::User);
    assert_eq!(mary.email, "mary@example.com");

    let by_email = repo
        .get_user_by_email(" MARY@example.com ")
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, mary.id);

    let updated = repo
        .update_user(
            mary.id,
            &UpdateUser::new(Some("Mary Williams".into()), None, Some(UserRole::Publisher)),
        )
        .unwrap();
    assert_eq!(updated.name, "Mary Williams");
    assert_eq!(updated.role, UserRole::Publisher);
    assert_eq!(updated.email, "mary@example.com");

    create_user(&repo, "Dennis", "dennis@example.com", UserRole::User);
    let (total, items) = repo
        .list_users(UserListQuery::new(params(&[("role", "publisher")])))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, mary.id);

    repo.delete_user(mary.id).unwrap();
    assert!(repo.get_user_by_id(mary.id).unwrap().is_none());
    assert!(matches!(
        repo.delete_user(mary.id),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_reset_tokens_expire_and_clear() {
    let test_db = common::TestDb::new("test_reset_tokens.db");
    let repo = DieselRepository::new(test_db.pool());
    let mary = create_user(&repo, "Mary", "mary@example.com", UserRole::User);

    let now = Utc::now().naive_utc();
    let expires = now + Duration::minutes(10);
    repo.set_reset_token(mary.id, "tokenhash", expires).unwrap();

    let found = repo
        .get_user_by_reset_token("tokenhash", now)
        .unwrap()
        .unwrap();
    assert_eq!(found.id, mary.id);

    // Expired tokens and wrong hashes miss.
    assert!(
        repo.get_user_by_reset_token("tokenhash", now + Duration::minutes(20))
            .unwrap()
            .is_none()
    );
    assert!(
        repo.get_user_by_reset_token("otherhash", now)
            .unwrap()
            .is_none()
    );

    let updated = repo.set_user_password(mary.id, "newhash").unwrap();
    assert_eq!(updated.password_hash, "newhash");
    assert!(
        repo.get_user_by_reset_token("tokenhash", now)
            .unwrap()
            .is_none()
    );

    repo.set_reset_token(mary.id, "tokenhash", expires).unwrap();
    repo.clear_reset_token(mary.id).unwrap();
    assert!(
        repo.get_user_by_reset_token("tokenhash", now)
            .unwrap()
            .is_none()
    );

    assert!(matches!(
        repo.set_reset_token(999, "tokenhash", expires),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_unique_constraints_surface_as_violations() {
    let test_db = common::TestDb::new("test_unique_constraints.db");
    let repo = DieselRepository::new(test_db.pool());

    create_user(&repo, "Mary", "mary@example.com", UserRole::User);
    let err = repo
        .create_user(&NewUser::new(
            "Imposter",
            "mary@example.com",
            UserRole::User,
            "hash".into(),
        ))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ConstraintViolation(_)));

    let owner = create_user(&repo, "Owner", "owner@example.com", UserRole::Publisher);
    repo.create_bootcamp(&bootcamp_named(owner.id, "Devworks"))
        .unwrap();
    let err = repo
        .create_bootcamp(&bootcamp_named(owner.id, "Devworks"))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ConstraintViolation(_)));

    // Foreign keys are on, so orphan rows are refused too.
    let err = repo
        .create_bootcamp(&bootcamp_named(4242, "Orphan"))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ConstraintViolation(_)));
}
