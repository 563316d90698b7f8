use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};

use crate::db::establish_connection_pool;
use crate::geocode::{GeocodeProvider, NominatimGeocoder};
use crate::mailer::{LogMailer, Mailer};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::auth::{
    forgot_password, login, me, register, reset_password, update_details, update_password,
};
use crate::routes::bootcamps::{
    bootcamps_in_radius, create_bootcamp, delete_bootcamp, get_bootcamp, list_bootcamps,
    update_bootcamp, upload_bootcamp_photo,
};
use crate::routes::courses::{
    create_course, delete_course, get_course, list_bootcamp_courses, list_courses, update_course,
};
use crate::routes::reviews::{
    create_review, delete_review, get_review, list_bootcamp_reviews, list_reviews, update_review,
};
use crate::routes::users::{create_user, delete_user, get_user, list_users, update_user};
use crate::services::ServiceError;

pub mod auth;
pub mod db;
pub mod domain;
pub mod dto;
pub mod forms;
pub mod geocode;
pub mod listing;
pub mod mailer;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

/// Registers every API route under the `/api/v1` prefix.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(register)
            .service(login)
            .service(me)
            .service(update_details)
            .service(update_password)
            .service(forgot_password)
            .service(reset_password)
            .service(list_bootcamps)
            .service(bootcamps_in_radius)
            .service(create_bootcamp)
            .service(upload_bootcamp_photo)
            .service(get_bootcamp)
            .service(update_bootcamp)
            .service(delete_bootcamp)
            .service(list_courses)
            .service(list_bootcamp_courses)
            .service(get_course)
            .service(create_course)
            .service(update_course)
            .service(delete_course)
            .service(list_reviews)
            .service(list_bootcamp_reviews)
            .service(get_review)
            .service(create_review)
            .service(update_review)
            .service(delete_review)
            .service(list_users)
            .service(get_user)
            .service(create_user)
            .service(update_user)
            .service(delete_user),
    );
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    std::fs::create_dir_all(&server_config.uploads_dir)?;

    let geocoder: web::Data<dyn GeocodeProvider> = web::Data::from(
        Arc::new(NominatimGeocoder::new(&server_config.geocoder_url)) as Arc<dyn GeocodeProvider>,
    );
    let mailer: web::Data<dyn Mailer> = web::Data::from(Arc::new(LogMailer) as Arc<dyn Mailer>);

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        // Body and path extraction failures answer in the API's error shape.
        let json_config = web::JsonConfig::default()
            .error_handler(|err, _req| ServiceError::Validation(err.to_string()).into());
        let path_config = web::PathConfig::default()
            .error_handler(|_err, _req| ServiceError::NotFound("Resource not found".into()).into());

        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .app_data(json_config)
            .app_data(path_config)
            .service(Files::new("/uploads", server_config.uploads_dir.clone()))
            .configure(configure_api)
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(geocoder.clone())
            .app_data(mailer.clone())
    })
    .bind(bind_address)?
    .run()
    .await
}
