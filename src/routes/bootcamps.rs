use std::collections::HashMap;

use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::dto::api::{CollectionResponse, ItemResponse, ListResponse};
use crate::forms::bootcamp::{CreateBootcampForm, PhotoUploadForm, UpdateBootcampForm};
use crate::geocode::GeocodeProvider;
use crate::listing::ListParams;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::services::{ServiceResult, bootcamps as bootcamps_service};

#[get("/bootcamps")]
pub async fn list_bootcamps(
    repo: web::Data<DieselRepository>,
    query: web::Query<HashMap<String, String>>,
) -> ServiceResult<HttpResponse> {
    let params = ListParams::from_pairs(query.into_inner());
    let page = bootcamps_service::list_bootcamps(repo.get_ref(), params)?;
    Ok(HttpResponse::Ok().json(ListResponse::new(&page)))
}

#[get("/bootcamps/{id}")]
pub async fn get_bootcamp(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> ServiceResult<HttpResponse> {
    let bootcamp = bootcamps_service::get_bootcamp(repo.get_ref(), id.into_inner())?;
    Ok(HttpResponse::Ok().json(ItemResponse::new(bootcamp)))
}

#[post("/bootcamps")]
pub async fn create_bootcamp(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    geocoder: web::Data<dyn GeocodeProvider>,
    web::Json(form): web::Json<CreateBootcampForm>,
) -> ServiceResult<HttpResponse> {
    let bootcamp =
        bootcamps_service::create_bootcamp(repo.get_ref(), geocoder.get_ref(), &user, form).await?;
    Ok(HttpResponse::Created().json(ItemResponse::new(bootcamp)))
}

#[put("/bootcamps/{id}")]
pub async fn update_bootcamp(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    geocoder: web::Data<dyn GeocodeProvider>,
    web::Json(form): web::Json<UpdateBootcampForm>,
) -> ServiceResult<HttpResponse> {
    let bootcamp = bootcamps_service::update_bootcamp(
        repo.get_ref(),
        geocoder.get_ref(),
        &user,
        id.into_inner(),
        form,
    )
    .await?;
    Ok(HttpResponse::Ok().json(ItemResponse::new(bootcamp)))
}

#[delete("/bootcamps/{id}")]
pub async fn delete_bootcamp(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ServiceResult<HttpResponse> {
    bootcamps_service::delete_bootcamp(repo.get_ref(), &user, id.into_inner())?;
    Ok(HttpResponse::Ok().json(ItemResponse::deleted()))
}

#[get("/bootcamps/radius/{zipcode}/{distance}")]
pub async fn bootcamps_in_radius(
    path: web::Path<(String, f64)>,
    repo: web::Data<DieselRepository>,
    geocoder: web::Data<dyn GeocodeProvider>,
) -> ServiceResult<HttpResponse> {
    let (zipcode, distance) = path.into_inner();
    let bootcamps =
        bootcamps_service::bootcamps_in_radius(repo.get_ref(), geocoder.get_ref(), &zipcode, distance)
            .await?;
    Ok(HttpResponse::Ok().json(CollectionResponse::new(bootcamps)))
}

#[put("/bootcamps/{id}/photo")]
pub async fn upload_bootcamp_photo(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<PhotoUploadForm>,
) -> ServiceResult<HttpResponse> {
    let bootcamp =
        bootcamps_service::upload_photo(repo.get_ref(), &config, &user, id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(ItemResponse::new(bootcamp)))
}
