//! Bootcamp CRUD, the radius search and photo uploads.

use std::fs;
use std::path::{Path, PathBuf};

use actix_multipart::form::tempfile::TempFile;
use validator::Validate;

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::bootcamp::{Bootcamp, UpdateBootcamp};
use crate::domain::user::UserRole;
use crate::forms::bootcamp::{CreateBootcampForm, PhotoUploadForm, UpdateBootcampForm};
use crate::geocode::GeocodeProvider;
use crate::listing::{ListParams, Page};
use crate::models::config::ServerConfig;
use crate::repository::{BootcampListQuery, BootcampReader, BootcampWriter};
use crate::services::{ServiceError, ServiceResult, current_user_id, is_owner_or_admin};

/// One page of bootcamps, every row with its courses attached.
pub fn list_bootcamps<R>(repo: &R, params: ListParams) -> ServiceResult<Page<Bootcamp>>
where
    R: BootcampReader + ?Sized,
{
    let query = BootcampListQuery::new(params.clone()).with_courses();
    let (total, items) = repo.list_bootcamps(query)?;

    Ok(Page::new(items, total, params))
}

pub fn get_bootcamp<R>(repo: &R, bootcamp_id: i32) -> ServiceResult<Bootcamp>
where
    R: BootcampReader + ?Sized,
{
    repo.get_bootcamp_by_id(bootcamp_id)?
        .ok_or_else(|| not_found(bootcamp_id))
}

/// Creates a bootcamp owned by the caller, geocoding its address first.
///
/// Publishers get one bootcamp each; only admins may add more.
pub async fn create_bootcamp<R>(
    repo: &R,
    geocoder: &dyn GeocodeProvider,
    user: &AuthenticatedUser,
    form: CreateBootcampForm,
) -> ServiceResult<Bootcamp>
where
    R: BootcampReader + BootcampWriter + ?Sized,
{
    ensure_role(user, &[UserRole::Publisher, UserRole::Admin])?;
    form.validate()?;
    let user_id = current_user_id(user)?;

    if user.role != UserRole::Admin && repo.get_bootcamp_by_user(user_id)?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "The user with ID {user_id} has already published a bootcamp"
        )));
    }

    let mut new_bootcamp = form.into_domain(user_id);
    let point = geocoder.geocode(&new_bootcamp.address).await?;
    new_bootcamp.latitude = Some(point.latitude);
    new_bootcamp.longitude = Some(point.longitude);

    repo.create_bootcamp(&new_bootcamp)
        .map_err(ServiceError::from)
}

/// Applies the update, re-geocoding when the address changed.
pub async fn update_bootcamp<R>(
    repo: &R,
    geocoder: &dyn GeocodeProvider,
    user: &AuthenticatedUser,
    bootcamp_id: i32,
    form: UpdateBootcampForm,
) -> ServiceResult<Bootcamp>
where
    R: BootcampReader + BootcampWriter + ?Sized,
{
    form.validate()?;

    let bootcamp = repo
        .get_bootcamp_by_id(bootcamp_id)?
        .ok_or_else(|| not_found(bootcamp_id))?;

    if !is_owner_or_admin(user, bootcamp.user_id) {
        return Err(ServiceError::Unauthorized(format!(
            "User {} is not authorized to update this bootcamp",
            user.sub
        )));
    }

    let mut updates = UpdateBootcamp::from(&form);
    if let Some(address) = &updates.address {
        let point = geocoder.geocode(address).await?;
        updates.latitude = Some(point.latitude);
        updates.longitude = Some(point.longitude);
    }

    repo.update_bootcamp(bootcamp_id, &updates)
        .map_err(ServiceError::from)
}

/// Removes the bootcamp with its courses and reviews.
pub fn delete_bootcamp<R>(
    repo: &R,
    user: &AuthenticatedUser,
    bootcamp_id: i32,
) -> ServiceResult<()>
where
    R: BootcampReader + BootcampWriter + ?Sized,
{
    let bootcamp = repo
        .get_bootcamp_by_id(bootcamp_id)?
        .ok_or_else(|| not_found(bootcamp_id))?;

    if !is_owner_or_admin(user, bootcamp.user_id) {
        return Err(ServiceError::Unauthorized(format!(
            "User {} is not authorized to delete this bootcamp",
            user.sub
        )));
    }

    repo.delete_bootcamp(bootcamp_id).map_err(ServiceError::from)
}

/// Bootcamps within `distance_miles` of the zipcode's location.
pub async fn bootcamps_in_radius<R>(
    repo: &R,
    geocoder: &dyn GeocodeProvider,
    zipcode: &str,
    distance_miles: f64,
) -> ServiceResult<Vec<Bootcamp>>
where
    R: BootcampReader + ?Sized,
{
    let center = geocoder.geocode(zipcode).await?;

    repo.list_bootcamps_within(center, distance_miles)
        .map_err(ServiceError::from)
}

/// Stores an uploaded photo under the uploads directory and records its file
/// name on the bootcamp.
pub fn upload_photo<R>(
    repo: &R,
    config: &ServerConfig,
    user: &AuthenticatedUser,
    bootcamp_id: i32,
    form: PhotoUploadForm,
) -> ServiceResult<Bootcamp>
where
    R: BootcampReader + BootcampWriter + ?Sized,
{
    let bootcamp = repo
        .get_bootcamp_by_id(bootcamp_id)?
        .ok_or_else(|| not_found(bootcamp_id))?;

    if !is_owner_or_admin(user, bootcamp.user_id) {
        return Err(ServiceError::Unauthorized(format!(
            "User {} is not authorized to update this bootcamp",
            user.sub
        )));
    }

    check_photo_limits(&form.file, config.max_file_upload)?;
    let file_name = photo_file_name(bootcamp_id, &form.file)?;

    let destination = PathBuf::from(&config.uploads_dir).join(&file_name);
    fs::copy(form.file.file.path(), &destination)
        .map_err(|err| ServiceError::Internal(format!("failed to store photo: {err}")))?;

    repo.set_bootcamp_photo(bootcamp_id, &file_name)
        .map_err(ServiceError::from)
}

fn check_photo_limits(file: &TempFile, max_bytes: u64) -> ServiceResult<()> {
    let is_image = file
        .content_type
        .as_ref()
        .is_some_and(|mime| mime.essence_str().starts_with("image/"));
    if !is_image {
        return Err(ServiceError::Validation("Please upload an image file".into()));
    }

    if file.size as u64 > max_bytes {
        return Err(ServiceError::Validation(format!(
            "Please upload an image less than {max_bytes}"
        )));
    }

    Ok(())
}

/// `photo_{id}.{ext}`, the extension taken from the uploaded file's name.
fn photo_file_name(bootcamp_id: i32, file: &TempFile) -> ServiceResult<String> {
    let extension = file
        .file_name
        .as_deref()
        .map(Path::new)
        .and_then(Path::extension)
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| ServiceError::Validation("Please upload an image file".into()))?;

    Ok(format!("photo_{bootcamp_id}.{}", extension.to_lowercase()))
}

fn not_found(bootcamp_id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Bootcamp not found with id of {bootcamp_id}"))
}
