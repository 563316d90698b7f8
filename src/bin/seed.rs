//! Seeds the database from the JSON fixtures in `_data/`.
//!
//! `seed -i` imports users, bootcamps, courses and reviews in that order,
//! `seed -d` destroys every row. Fixture records reference each other by
//! 1-based position, a bootcamp's `user: 2` is the second entry of
//! `users.json`. The database must already be migrated.

use std::env;
use std::fs;

use config::Config;
use diesel::prelude::*;
use dotenvy::dotenv;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use bootcamper::auth::hash_password;
use bootcamper::db::{DbPool, establish_connection_pool};
use bootcamper::domain::bootcamp::NewBootcamp;
use bootcamper::domain::course::{MinimumSkill, NewCourse};
use bootcamper::domain::review::NewReview;
use bootcamper::domain::user::{NewUser, UserRole};
use bootcamper::models::config::ServerConfig;
use bootcamper::repository::errors::{RepositoryError, RepositoryResult};
use bootcamper::repository::{
    BootcampWriter, CourseWriter, DieselRepository, ReviewWriter, UserWriter,
};
use bootcamper::schema;

#[derive(Deserialize)]
struct SeedUser {
    name: String,
    email: String,
    password: String,
    role: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedBootcamp {
    user: usize,
    name: String,
    description: String,
    website: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: String,
    // The seeder does not call the geocoder, coordinates come from the
    // fixture when the radius search should work on seeded data.
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    careers: Vec<String>,
    #[serde(default)]
    housing: bool,
    #[serde(default)]
    job_assistance: bool,
    #[serde(default)]
    job_guarantee: bool,
    #[serde(default)]
    accept_gi: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedCourse {
    bootcamp: usize,
    user: usize,
    title: String,
    description: String,
    weeks: String,
    tuition: f64,
    minimum_skill: MinimumSkill,
    #[serde(default)]
    scholarship_available: bool,
}

#[derive(Deserialize)]
struct SeedReview {
    bootcamp: usize,
    user: usize,
    title: String,
    text: String,
    rating: f64,
}

fn load_fixture<T: DeserializeOwned>(name: &str) -> RepositoryResult<Vec<T>> {
    let path = format!("_data/{name}.json");
    let raw = fs::read_to_string(&path)
        .map_err(|e| RepositoryError::Unexpected(format!("cannot read {path}: {e}")))?;
    serde_json::from_str(&raw)
        .map_err(|e| RepositoryError::Unexpected(format!("cannot parse {path}: {e}")))
}

/// Resolves a 1-based fixture reference to a created row id.
fn linked(ids: &[i32], index: usize, what: &str) -> RepositoryResult<i32> {
    index
        .checked_sub(1)
        .and_then(|i| ids.get(i).copied())
        .ok_or_else(|| RepositoryError::Unexpected(format!("fixture references unknown {what} {index}")))
}

fn import_data<R>(repo: &R) -> RepositoryResult<()>
where
    R: UserWriter + BootcampWriter + CourseWriter + ReviewWriter,
{
    let users: Vec<SeedUser> = load_fixture("users")?;
    let bootcamps: Vec<SeedBootcamp> = load_fixture("bootcamps")?;
    let courses: Vec<SeedCourse> = load_fixture("courses")?;
    let reviews: Vec<SeedReview> = load_fixture("reviews")?;

    let mut user_ids = Vec::with_capacity(users.len());
    for seed in users {
        let role = seed.role.as_deref().map_or(UserRole::User, UserRole::from);
        let password_hash = hash_password(&seed.password)
            .map_err(|e| RepositoryError::Unexpected(format!("cannot hash password: {e}")))?;
        let user = repo.create_user(&NewUser::new(&seed.name, &seed.email, role, password_hash))?;
        user_ids.push(user.id);
    }
    log::info!("Imported {} users", user_ids.len());

    let mut bootcamp_ids = Vec::with_capacity(bootcamps.len());
    for seed in bootcamps {
        let user_id = linked(&user_ids, seed.user, "user")?;
        let mut new_bootcamp = NewBootcamp::new(
            user_id,
            &seed.name,
            &seed.description,
            seed.website,
            seed.phone,
            seed.email,
            &seed.address,
            seed.careers,
            seed.housing,
            seed.job_assistance,
            seed.job_guarantee,
            seed.accept_gi,
        );
        new_bootcamp.latitude = seed.latitude;
        new_bootcamp.longitude = seed.longitude;
        let bootcamp = repo.create_bootcamp(&new_bootcamp)?;
        bootcamp_ids.push(bootcamp.id);
    }
    log::info!("Imported {} bootcamps", bootcamp_ids.len());

    let mut count = 0;
    for seed in courses {
        let bootcamp_id = linked(&bootcamp_ids, seed.bootcamp, "bootcamp")?;
        let user_id = linked(&user_ids, seed.user, "user")?;
        repo.create_course(&NewCourse::new(
            bootcamp_id,
            user_id,
            &seed.title,
            &seed.description,
            &seed.weeks,
            seed.tuition,
            seed.minimum_skill,
            seed.scholarship_available,
        ))?;
        count += 1;
    }
    log::info!("Imported {count} courses");

    let mut count = 0;
    for seed in reviews {
        let bootcamp_id = linked(&bootcamp_ids, seed.bootcamp, "bootcamp")?;
        let user_id = linked(&user_ids, seed.user, "user")?;
        repo.create_review(&NewReview::new(
            bootcamp_id,
            user_id,
            &seed.title,
            &seed.text,
            seed.rating,
        ))?;
        count += 1;
    }
    log::info!("Imported {count} reviews");

    Ok(())
}

fn destroy_data(pool: &DbPool) -> RepositoryResult<()> {
    let mut conn = pool.get()?;

    // Children first so the wipe also works without cascading foreign keys.
    diesel::delete(schema::reviews::table).execute(&mut conn)?;
    diesel::delete(schema::courses::table).execute(&mut conn)?;
    diesel::delete(schema::bootcamps::table).execute(&mut conn)?;
    diesel::delete(schema::users::table).execute(&mut conn)?;

    log::info!("Data destroyed");
    Ok(())
}

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let Some(flag) = env::args().nth(1) else {
        log::error!("Usage: seed -i | -d");
        std::process::exit(1);
    };

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {}", err);
            std::process::exit(1);
        }
    };

    let server_config = match settings.try_deserialize::<ServerConfig>() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {}", err);
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let outcome = match flag.as_str() {
        "-i" => {
            let repo = DieselRepository::new(pool);
            import_data(&repo).inspect(|()| log::info!("Data imported"))
        }
        "-d" => destroy_data(&pool),
        other => {
            log::error!("Unknown flag {other}, use -i or -d");
            std::process::exit(1);
        }
    };

    if let Err(e) = outcome {
        log::error!("Seeding failed: {e}");
        std::process::exit(1);
    }
}
