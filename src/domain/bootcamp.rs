use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::course::Course;

/// A published bootcamp with its derived aggregates.
///
/// `average_cost` and `average_rating` are maintained by the course and
/// review repositories whenever tuition or ratings change. `courses` is only
/// populated on listings that ask for the expansion.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bootcamp {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub careers: Vec<String>,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub photo: Option<String>,
    pub average_cost: Option<f64>,
    pub average_rating: Option<f64>,
    pub created_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub courses: Option<Vec<Course>>,
}

/// The short form other resources embed instead of the whole record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BootcampSummary {
    pub id: i32,
    pub name: String,
    pub description: String,
}

impl From<&Bootcamp> for BootcampSummary {
    fn from(bootcamp: &Bootcamp) -> Self {
        Self {
            id: bootcamp.id,
            name: bootcamp.name.clone(),
            description: bootcamp.description.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NewBootcamp {
    pub user_id: i32,
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    /// Filled in by the service once the address has been geocoded.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub careers: Vec<String>,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub created_at: NaiveDateTime,
}

impl NewBootcamp {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: i32,
        name: &str,
        description: &str,
        website: Option<String>,
        phone: Option<String>,
        email: Option<String>,
        address: &str,
        careers: Vec<String>,
        housing: bool,
        job_assistance: bool,
        job_guarantee: bool,
        accept_gi: bool,
    ) -> Self {
        Self {
            user_id,
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            website: website.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            phone: phone.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            email: email
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
            address: address.trim().to_string(),
            latitude: None,
            longitude: None,
            careers: normalize_careers(careers),
            housing,
            job_assistance,
            job_guarantee,
            accept_gi,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Partial update; `None` fields keep their current values.
#[derive(Clone, Debug, Default)]
pub struct UpdateBootcamp {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub careers: Option<Vec<String>>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

impl UpdateBootcamp {
    /// True when the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.website.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.careers.is_none()
            && self.housing.is_none()
            && self.job_assistance.is_none()
            && self.job_guarantee.is_none()
            && self.accept_gi.is_none()
    }

    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.name = self.name.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        self.description = self
            .description
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self.email = self
            .email
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        self.address = self
            .address
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self.careers = self.careers.map(normalize_careers);
        self
    }
}

fn normalize_careers(careers: Vec<String>) -> Vec<String> {
    careers
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}
