//! Registration, login and the password lifecycle.

use chrono::{Duration, Utc};
use validator::Validate;

use crate::auth::{
    self, AuthenticatedUser, RESET_TOKEN_TTL_MINUTES, generate_reset_token, hash_reset_token,
};
use crate::domain::user::{NewUser, UpdateUser, User, UserRole};
use crate::forms::auth::{
    ForgotPasswordForm, LoginForm, RegisterForm, ResetPasswordForm, UpdateDetailsForm,
    UpdatePasswordForm,
};
use crate::mailer::Mailer;
use crate::models::config::ServerConfig;
use crate::repository::{UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult, current_user_id};

/// Creates the account and signs its first token.
pub fn register<R>(repo: &R, config: &ServerConfig, form: RegisterForm) -> ServiceResult<String>
where
    R: UserWriter + ?Sized,
{
    form.validate()?;

    let role = form.role.as_deref().map_or(UserRole::User, UserRole::from);
    let password_hash = hash_password(&form.password)?;
    let new_user = NewUser::new(&form.name, &form.email, role, password_hash);

    let user = repo.create_user(&new_user)?;

    issue_token(&user, config)
}

/// Checks the credentials and signs a token.
pub fn login<R>(repo: &R, config: &ServerConfig, form: LoginForm) -> ServiceResult<String>
where
    R: UserReader + ?Sized,
{
    let email = form.email.trim().to_lowercase();
    if email.is_empty() || form.password.is_empty() {
        return Err(ServiceError::Validation(
            "Please provide an email and password".into(),
        ));
    }

    let Some(user) = repo.get_user_by_email(&email)? else {
        return Err(invalid_credentials());
    };

    if !verify_password(&form.password, &user.password_hash)? {
        return Err(invalid_credentials());
    }

    issue_token(&user, config)
}

/// The account behind the presented token.
pub fn me<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    let id = current_user_id(user)?;

    repo.get_user_by_id(id)?
        .ok_or_else(|| ServiceError::NotFound(format!("User not found with id of {id}")))
}

/// Updates name and email on the caller's own account.
pub fn update_details<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: UpdateDetailsForm,
) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    form.validate()?;
    let id = current_user_id(user)?;

    let updates = UpdateUser::new(form.name, form.email, None);
    if updates.is_empty() {
        return me(repo, user);
    }

    repo.update_user(id, &updates).map_err(ServiceError::from)
}

/// Rotates the caller's password after checking the current one, then signs
/// a fresh token.
pub fn update_password<R>(
    repo: &R,
    config: &ServerConfig,
    user: &AuthenticatedUser,
    form: UpdatePasswordForm,
) -> ServiceResult<String>
where
    R: UserReader + UserWriter + ?Sized,
{
    form.validate()?;
    let id = current_user_id(user)?;

    let Some(account) = repo.get_user_by_id(id)? else {
        return Err(invalid_credentials());
    };

    if !verify_password(&form.current_password, &account.password_hash)? {
        return Err(ServiceError::Unauthorized("Password is incorrect".into()));
    }

    let password_hash = hash_password(&form.new_password)?;
    let account = repo.set_user_password(id, &password_hash)?;

    issue_token(&account, config)
}

/// Stores a hashed reset token on the account and mails the plain one.
///
/// The message returned is the body of the success response. When the mail
/// cannot be delivered the token is cleared again so the account is not left
/// with a secret nobody received.
pub fn forgot_password<R>(
    repo: &R,
    mailer: &dyn Mailer,
    config: &ServerConfig,
    form: ForgotPasswordForm,
) -> ServiceResult<&'static str>
where
    R: UserReader + UserWriter + ?Sized,
{
    form.validate()?;
    let email = form.email.trim().to_lowercase();

    let Some(user) = repo.get_user_by_email(&email)? else {
        return Err(ServiceError::NotFound(
            "There is no user with that email".into(),
        ));
    };

    let (token, token_hash) = generate_reset_token();
    let expires = Utc::now().naive_utc() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
    repo.set_reset_token(user.id, &token_hash, expires)?;

    let reset_url = format!(
        "{}/api/v1/auth/resetpassword/{token}",
        config.public_url.trim_end_matches('/')
    );
    let body = format!(
        "You are receiving this email because you (or someone else) has requested \
         the reset of a password. Please make a PUT request to:\n\n{reset_url}"
    );

    if let Err(err) = mailer.send(&user.email, "Password reset token", &body) {
        log::error!("reset mail to {} failed: {err}", user.email);
        repo.clear_reset_token(user.id)?;
        return Err(ServiceError::BadGateway("Email could not be sent".into()));
    }

    Ok("Email sent")
}

/// Redeems a reset token for a new password and signs a fresh token.
pub fn reset_password<R>(
    repo: &R,
    config: &ServerConfig,
    token: &str,
    form: ResetPasswordForm,
) -> ServiceResult<String>
where
    R: UserReader + UserWriter + ?Sized,
{
    form.validate()?;

    let token_hash = hash_reset_token(token.trim());
    let Some(user) = repo.get_user_by_reset_token(&token_hash, Utc::now().naive_utc())? else {
        return Err(ServiceError::Validation("Invalid token".into()));
    };

    let password_hash = hash_password(&form.password)?;
    let user = repo.set_user_password(user.id, &password_hash)?;

    issue_token(&user, config)
}

fn issue_token(user: &User, config: &ServerConfig) -> ServiceResult<String> {
    AuthenticatedUser::new(user, config.jwt_expires_in_days)
        .to_jwt(&config.secret)
        .map_err(|err| ServiceError::Internal(format!("failed to sign token: {err}")))
}

fn hash_password(password: &str) -> ServiceResult<String> {
    auth::hash_password(password)
        .map_err(|err| ServiceError::Internal(format!("failed to hash password: {err}")))
}

fn verify_password(password: &str, hash: &str) -> ServiceResult<bool> {
    auth::verify_password(password, hash)
        .map_err(|err| ServiceError::Internal(format!("failed to verify password: {err}")))
}

fn invalid_credentials() -> ServiceError {
    ServiceError::Unauthorized("Invalid credentials".into())
}
