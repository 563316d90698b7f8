//! Request bodies accepted by the bootcamp endpoints.

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::bootcamp::{NewBootcamp, UpdateBootcamp};

/// Career tracks a bootcamp may advertise.
pub const ALLOWED_CAREERS: [&str; 6] = [
    "Web Development",
    "Mobile Development",
    "UI/UX",
    "Data Science",
    "Business",
    "Other",
];

/// Body for `POST /api/v1/bootcamps`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBootcampForm {
    #[validate(length(min = 1, max = 50, message = "Please add a name of 50 characters or less"))]
    pub name: String,
    #[validate(length(
        min = 1,
        max = 500,
        message = "Please add a description of 500 characters or less"
    ))]
    pub description: String,
    #[validate(url(message = "Please use a valid URL with HTTP or HTTPS"))]
    pub website: Option<String>,
    #[validate(length(max = 20, message = "Phone number can not be longer than 20 characters"))]
    pub phone: Option<String>,
    #[validate(email(message = "Please add a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Please add an address"))]
    pub address: String,
    #[serde(default)]
    #[validate(custom(function = "validate_careers"))]
    pub careers: Vec<String>,
    #[serde(default)]
    pub housing: bool,
    #[serde(default)]
    pub job_assistance: bool,
    #[serde(default)]
    pub job_guarantee: bool,
    #[serde(default)]
    pub accept_gi: bool,
}

impl CreateBootcampForm {
    /// Builds the domain record owned by the authenticated publisher.
    #[must_use]
    pub fn into_domain(&self, user_id: i32) -> NewBootcamp {
        NewBootcamp::new(
            user_id,
            &self.name,
            &self.description,
            self.website.clone(),
            self.phone.clone(),
            self.email.clone(),
            &self.address,
            self.careers.clone(),
            self.housing,
            self.job_assistance,
            self.job_guarantee,
            self.accept_gi,
        )
    }
}

/// Body for `PUT /api/v1/bootcamps/{id}`. Absent fields stay untouched.
///
/// Coordinates are intentionally not accepted here, the service recomputes
/// them whenever the address changes.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBootcampForm {
    #[validate(length(min = 1, max = 50, message = "Please add a name of 50 characters or less"))]
    pub name: Option<String>,
    #[validate(length(
        min = 1,
        max = 500,
        message = "Please add a description of 500 characters or less"
    ))]
    pub description: Option<String>,
    #[validate(url(message = "Please use a valid URL with HTTP or HTTPS"))]
    pub website: Option<String>,
    #[validate(length(max = 20, message = "Phone number can not be longer than 20 characters"))]
    pub phone: Option<String>,
    #[validate(email(message = "Please add a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Please add an address"))]
    pub address: Option<String>,
    #[validate(custom(function = "validate_careers"))]
    pub careers: Option<Vec<String>>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

impl From<&UpdateBootcampForm> for UpdateBootcamp {
    fn from(form: &UpdateBootcampForm) -> Self {
        UpdateBootcamp {
            name: form.name.clone(),
            description: form.description.clone(),
            website: form.website.clone(),
            phone: form.phone.clone(),
            email: form.email.clone(),
            address: form.address.clone(),
            latitude: None,
            longitude: None,
            careers: form.careers.clone(),
            housing: form.housing,
            job_assistance: form.job_assistance,
            job_guarantee: form.job_guarantee,
            accept_gi: form.accept_gi,
        }
        .normalized()
    }
}

/// Upload for `PUT /api/v1/bootcamps/{id}/photo`.
#[derive(MultipartForm)]
pub struct PhotoUploadForm {
    #[multipart(limit = "10MB")]
    pub file: TempFile,
}

fn validate_careers(careers: &[String]) -> Result<(), ValidationError> {
    if careers
        .iter()
        .all(|career| ALLOWED_CAREERS.contains(&career.as_str()))
    {
        Ok(())
    } else {
        let mut error = ValidationError::new("careers");
        error.message = Some("Careers must be from the supported list".into());
        Err(error)
    }
}
