use std::collections::HashMap;

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::dto::api::{ItemResponse, ListResponse};
use crate::forms::review::{CreateReviewForm, UpdateReviewForm};
use crate::listing::ListParams;
use crate::repository::DieselRepository;
use crate::services::{ServiceResult, reviews as reviews_service};

#[get("/reviews")]
pub async fn list_reviews(
    repo: web::Data<DieselRepository>,
    query: web::Query<HashMap<String, String>>,
) -> ServiceResult<HttpResponse> {
    let params = ListParams::from_pairs(query.into_inner());
    let page = reviews_service::list_reviews(repo.get_ref(), params, None)?;
    Ok(HttpResponse::Ok().json(ListResponse::new(&page)))
}

#[get("/bootcamps/{bootcamp_id}/reviews")]
pub async fn list_bootcamp_reviews(
    bootcamp_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    query: web::Query<HashMap<String, String>>,
) -> ServiceResult<HttpResponse> {
    let params = ListParams::from_pairs(query.into_inner());
    let page = reviews_service::list_reviews(repo.get_ref(), params, Some(bootcamp_id.into_inner()))?;
    Ok(HttpResponse::Ok().json(ListResponse::new(&page)))
}

#[get("/reviews/{id}")]
pub async fn get_review(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> ServiceResult<HttpResponse> {
    let review = reviews_service::get_review(repo.get_ref(), id.into_inner())?;
    Ok(HttpResponse::Ok().json(ItemResponse::new(review)))
}

#[post("/bootcamps/{bootcamp_id}/reviews")]
pub async fn create_review(
    bootcamp_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateReviewForm>,
) -> ServiceResult<HttpResponse> {
    let review =
        reviews_service::create_review(repo.get_ref(), &user, bootcamp_id.into_inner(), form)?;
    Ok(HttpResponse::Created().json(ItemResponse::new(review)))
}

#[put("/reviews/{id}")]
pub async fn update_review(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateReviewForm>,
) -> ServiceResult<HttpResponse> {
    let review = reviews_service::update_review(repo.get_ref(), &user, id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(ItemResponse::new(review)))
}

#[delete("/reviews/{id}")]
pub async fn delete_review(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ServiceResult<HttpResponse> {
    reviews_service::delete_review(repo.get_ref(), &user, id.into_inner())?;
    Ok(HttpResponse::Ok().json(ItemResponse::deleted()))
}
