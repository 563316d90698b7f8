use std::collections::HashMap;

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::dto::api::{ItemResponse, ListResponse};
use crate::forms::user::{CreateUserForm, UpdateUserForm};
use crate::listing::ListParams;
use crate::repository::DieselRepository;
use crate::services::{ServiceResult, users as users_service};

#[get("/users")]
pub async fn list_users(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    query: web::Query<HashMap<String, String>>,
) -> ServiceResult<HttpResponse> {
    let params = ListParams::from_pairs(query.into_inner());
    let page = users_service::list_users(repo.get_ref(), &user, params)?;
    Ok(HttpResponse::Ok().json(ListResponse::new(&page)))
}

#[get("/users/{id}")]
pub async fn get_user(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ServiceResult<HttpResponse> {
    let found = users_service::get_user(repo.get_ref(), &user, id.into_inner())?;
    Ok(HttpResponse::Ok().json(ItemResponse::new(found)))
}

#[post("/users")]
pub async fn create_user(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateUserForm>,
) -> ServiceResult<HttpResponse> {
    let created = users_service::create_user(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(ItemResponse::new(created)))
}

#[put("/users/{id}")]
pub async fn update_user(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateUserForm>,
) -> ServiceResult<HttpResponse> {
    let updated = users_service::update_user(repo.get_ref(), &user, id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(ItemResponse::new(updated)))
}

#[delete("/users/{id}")]
pub async fn delete_user(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ServiceResult<HttpResponse> {
    users_service::delete_user(repo.get_ref(), &user, id.into_inner())?;
    Ok(HttpResponse::Ok().json(ItemResponse::deleted()))
}
