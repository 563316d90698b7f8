//! Admin-only account management.
//!
//! Every operation here requires the admin role. Regular accounts manage
//! themselves through [`crate::services::auth`] instead.

use validator::Validate;

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::user::{NewUser, UpdateUser, User, UserRole};
use crate::forms::user::{CreateUserForm, UpdateUserForm};
use crate::listing::{ListParams, Page};
use crate::repository::{UserListQuery, UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

pub fn list_users<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: ListParams,
) -> ServiceResult<Page<User>>
where
    R: UserReader + ?Sized,
{
    ensure_role(user, &[UserRole::Admin])?;

    let (total, items) = repo.list_users(UserListQuery::new(params.clone()))?;

    Ok(Page::new(items, total, params))
}

pub fn get_user<R>(repo: &R, user: &AuthenticatedUser, user_id: i32) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    ensure_role(user, &[UserRole::Admin])?;

    repo.get_user_by_id(user_id)?
        .ok_or_else(|| not_found(user_id))
}

pub fn create_user<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CreateUserForm,
) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    ensure_role(user, &[UserRole::Admin])?;
    form.validate()?;

    let role = form.role.as_deref().map_or(UserRole::User, UserRole::from);
    let password_hash = crate::auth::hash_password(&form.password)
        .map_err(|err| ServiceError::Internal(format!("failed to hash password: {err}")))?;
    let new_user = NewUser::new(&form.name, &form.email, role, password_hash);

    repo.create_user(&new_user).map_err(ServiceError::from)
}

pub fn update_user<R>(
    repo: &R,
    user: &AuthenticatedUser,
    user_id: i32,
    form: UpdateUserForm,
) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    ensure_role(user, &[UserRole::Admin])?;
    form.validate()?;

    let current = repo
        .get_user_by_id(user_id)?
        .ok_or_else(|| not_found(user_id))?;

    let updates = UpdateUser::from(&form);
    if updates.is_empty() {
        return Ok(current);
    }

    repo.update_user(user_id, &updates)
        .map_err(ServiceError::from)
}

pub fn delete_user<R>(repo: &R, user: &AuthenticatedUser, user_id: i32) -> ServiceResult<()>
where
    R: UserReader + UserWriter + ?Sized,
{
    ensure_role(user, &[UserRole::Admin])?;

    if repo.get_user_by_id(user_id)?.is_none() {
        return Err(not_found(user_id));
    }

    repo.delete_user(user_id).map_err(ServiceError::from)
}

fn not_found(user_id: i32) -> ServiceError {
    ServiceError::NotFound(format!("User not found with id of {user_id}"))
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::Utc;
    use mockall::predicate::eq;

    use super::*;
    use crate::repository::mock::MockRepository;

    fn claims(id: i32, role: UserRole) -> AuthenticatedUser {
        let user = User {
            id,
            name: "Root".into(),
            email: "root@example.com".into(),
            role,
            password_hash: String::new(),
            reset_password_token: None,
            reset_password_expire: None,
            created_at: Utc::now().naive_utc(),
        };
        AuthenticatedUser::new(&user, 30)
    }

    fn stored_user(id: i32) -> User {
        User {
            id,
            name: "Mary".into(),
            email: "mary@example.com".into(),
            role: UserRole::User,
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".into(),
            reset_password_token: None,
            reset_password_expire: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn non_admins_are_rejected_before_any_query() {
        let mut repo = MockRepository::new();
        repo.expect_list_users().times(0);
        repo.expect_get_user_by_id().times(0);

        for role in [UserRole::User, UserRole::Publisher] {
            let err = list_users(&repo, &claims(1, role), ListParams::default()).unwrap_err();
            assert_eq!(
                err,
                ServiceError::Forbidden(format!(
                    "User role {role} is not authorized to access this route"
                ))
            );
        }
    }

    #[test]
    fn missing_user_is_reported_with_its_id() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .with(eq(55))
            .returning(|_| Ok(None));

        let err = get_user(&repo, &claims(1, UserRole::Admin), 55).unwrap_err();
        assert_eq!(
            err,
            ServiceError::NotFound("User not found with id of 55".into())
        );
    }

    #[test]
    fn create_stores_a_hash_not_the_password() {
        let mut repo = MockRepository::new();
        repo.expect_create_user()
            .withf(|new_user| {
                new_user.password_hash.starts_with("$2") && new_user.role == UserRole::Publisher
            })
            .returning(|new_user| {
                let mut user = stored_user(9);
                user.role = new_user.role;
                Ok(user)
            });

        let form = CreateUserForm {
            name: "Mary".into(),
            email: "mary@example.com".into(),
            password: "123456".into(),
            role: Some("publisher".into()),
        };
        let created = create_user(&repo, &claims(1, UserRole::Admin), form).unwrap();
        assert_eq!(created.role, UserRole::Publisher);
    }

    #[test]
    fn empty_update_returns_current_record_untouched() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .with(eq(9))
            .returning(|id| Ok(Some(stored_user(id))));
        repo.expect_update_user().times(0);

        let user = update_user(
            &repo,
            &claims(1, UserRole::Admin),
            9,
            UpdateUserForm::default(),
        )
        .unwrap();
        assert_eq!(user.name, "Mary");
    }

    #[test]
    fn delete_checks_existence_first() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .with(eq(3))
            .returning(|_| Ok(None));
        repo.expect_delete_user().times(0);

        let err = delete_user(&repo, &claims(1, UserRole::Admin), 3).unwrap_err();
        assert_eq!(
            err,
            ServiceError::NotFound("User not found with id of 3".into())
        );
    }
}
