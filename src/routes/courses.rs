use std::collections::HashMap;

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::dto::api::{ItemResponse, ListResponse};
use crate::forms::course::{CreateCourseForm, UpdateCourseForm};
use crate::listing::ListParams;
use crate::repository::DieselRepository;
use crate::services::{ServiceResult, courses as courses_service};

#[get("/courses")]
pub async fn list_courses(
    repo: web::Data<DieselRepository>,
    query: web::Query<HashMap<String, String>>,
) -> ServiceResult<HttpResponse> {
    let params = ListParams::from_pairs(query.into_inner());
    let page = courses_service::list_courses(repo.get_ref(), params, None)?;
    Ok(HttpResponse::Ok().json(ListResponse::new(&page)))
}

#[get("/bootcamps/{bootcamp_id}/courses")]
pub async fn list_bootcamp_courses(
    bootcamp_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    query: web::Query<HashMap<String, String>>,
) -> ServiceResult<HttpResponse> {
    let params = ListParams::from_pairs(query.into_inner());
    let page = courses_service::list_courses(repo.get_ref(), params, Some(bootcamp_id.into_inner()))?;
    Ok(HttpResponse::Ok().json(ListResponse::new(&page)))
}

#[get("/courses/{id}")]
pub async fn get_course(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> ServiceResult<HttpResponse> {
    let course = courses_service::get_course(repo.get_ref(), id.into_inner())?;
    Ok(HttpResponse::Ok().json(ItemResponse::new(course)))
}

#[post("/bootcamps/{bootcamp_id}/courses")]
pub async fn create_course(
    bootcamp_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateCourseForm>,
) -> ServiceResult<HttpResponse> {
    let course =
        courses_service::create_course(repo.get_ref(), &user, bootcamp_id.into_inner(), form)?;
    Ok(HttpResponse::Created().json(ItemResponse::new(course)))
}

#[put("/courses/{id}")]
pub async fn update_course(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateCourseForm>,
) -> ServiceResult<HttpResponse> {
    let course = courses_service::update_course(repo.get_ref(), &user, id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(ItemResponse::new(course)))
}

#[delete("/courses/{id}")]
pub async fn delete_course(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ServiceResult<HttpResponse> {
    courses_service::delete_course(repo.get_ref(), &user, id.into_inner())?;
    Ok(HttpResponse::Ok().json(ItemResponse::deleted()))
}
