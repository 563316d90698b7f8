use actix_web::{HttpResponse, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::dto::api::ItemResponse;
use crate::dto::auth::TokenResponse;
use crate::forms::auth::{
    ForgotPasswordForm, LoginForm, RegisterForm, ResetPasswordForm, UpdateDetailsForm,
    UpdatePasswordForm,
};
use crate::mailer::Mailer;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::services::{ServiceResult, auth as auth_service};

#[post("/auth/register")]
pub async fn register(
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    web::Json(form): web::Json<RegisterForm>,
) -> ServiceResult<HttpResponse> {
    let token = auth_service::register(repo.get_ref(), &config, form)?;
    Ok(HttpResponse::Created().json(TokenResponse::new(token)))
}

#[post("/auth/login")]
pub async fn login(
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    web::Json(form): web::Json<LoginForm>,
) -> ServiceResult<HttpResponse> {
    let token = auth_service::login(repo.get_ref(), &config, form)?;
    Ok(HttpResponse::Ok().json(TokenResponse::new(token)))
}

#[get("/auth/me")]
pub async fn me(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ServiceResult<HttpResponse> {
    let current = auth_service::me(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(ItemResponse::new(current)))
}

#[put("/auth/updatedetails")]
pub async fn update_details(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateDetailsForm>,
) -> ServiceResult<HttpResponse> {
    let updated = auth_service::update_details(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Ok().json(ItemResponse::new(updated)))
}

#[put("/auth/updatepassword")]
pub async fn update_password(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    web::Json(form): web::Json<UpdatePasswordForm>,
) -> ServiceResult<HttpResponse> {
    let token = auth_service::update_password(repo.get_ref(), &config, &user, form)?;
    Ok(HttpResponse::Ok().json(TokenResponse::new(token)))
}

#[post("/auth/forgotpassword")]
pub async fn forgot_password(
    repo: web::Data<DieselRepository>,
    mailer: web::Data<dyn Mailer>,
    config: web::Data<ServerConfig>,
    web::Json(form): web::Json<ForgotPasswordForm>,
) -> ServiceResult<HttpResponse> {
    let outcome = auth_service::forgot_password(repo.get_ref(), mailer.get_ref(), &config, form)?;
    Ok(HttpResponse::Ok().json(ItemResponse::new(outcome)))
}

#[put("/auth/resetpassword/{token}")]
pub async fn reset_password(
    token: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    web::Json(form): web::Json<ResetPasswordForm>,
) -> ServiceResult<HttpResponse> {
    let token = auth_service::reset_password(repo.get_ref(), &config, &token, form)?;
    Ok(HttpResponse::Ok().json(TokenResponse::new(token)))
}
