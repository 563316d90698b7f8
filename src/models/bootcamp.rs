//! Diesel models for bootcamp records.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::bootcamp::{
    Bootcamp as DomainBootcamp, NewBootcamp as DomainNewBootcamp,
    UpdateBootcamp as DomainUpdateBootcamp,
};
use crate::models::user::User;

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(table_name = crate::schema::bootcamps)]
/// Diesel model for [`crate::domain::bootcamp::Bootcamp`].
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
    pub careers: String, // JSON array stored as text
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub photo: Option<String>,
    pub average_cost: Option<f64>,
    pub average_rating: Option<f64>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::bootcamps)]
/// Insertable form of [`Bootcamp`].
pub struct NewBootcamp {
    pub user_id: i32,
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub careers: String,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub created_at: NaiveDateTime,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::bootcamps)]
/// Data used when updating a [`Bootcamp`] record.
pub struct UpdateBootcamp {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub careers: Option<String>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

impl From<Bootcamp> for DomainBootcamp {
    fn from(bootcamp: Bootcamp) -> Self {
        let careers = serde_json::from_str(&bootcamp.careers).unwrap_or_default();

        Self {
            id: bootcamp.id,
            user_id: bootcamp.user_id,
            name: bootcamp.name,
            description: bootcamp.description,
            website: bootcamp.website,
            phone: bootcamp.phone,
            email: bootcamp.email,
            address: bootcamp.address,
            latitude: bootcamp.latitude,
            longitude: bootcamp.longitude,
            careers,
            housing: bootcamp.housing,
            job_assistance: bootcamp.job_assistance,
            job_guarantee: bootcamp.job_guarantee,
            accept_gi: bootcamp.accept_gi,
            photo: bootcamp.photo,
            average_cost: bootcamp.average_cost,
            average_rating: bootcamp.average_rating,
            created_at: bootcamp.created_at,
            courses: None,
        }
    }
}

impl From<&DomainNewBootcamp> for NewBootcamp {
    fn from(bootcamp: &DomainNewBootcamp) -> Self {
        Self {
            user_id: bootcamp.user_id,
            name: bootcamp.name.clone(),
            description: bootcamp.description.clone(),
            website: bootcamp.website.clone(),
            phone: bootcamp.phone.clone(),
            email: bootcamp.email.clone(),
            address: bootcamp.address.clone(),
            latitude: bootcamp.latitude,
            longitude: bootcamp.longitude,
            careers: encode_careers(&bootcamp.careers),
            housing: bootcamp.housing,
            job_assistance: bootcamp.job_assistance,
            job_guarantee: bootcamp.job_guarantee,
            accept_gi: bootcamp.accept_gi,
            created_at: bootcamp.created_at,
        }
    }
}

impl From<&DomainUpdateBootcamp> for UpdateBootcamp {
    fn from(update: &DomainUpdateBootcamp) -> Self {
        Self {
            name: update.name.clone(),
            description: update.description.clone(),
            website: update.website.clone(),
            phone: update.phone.clone(),
            email: update.email.clone(),
            address: update.address.clone(),
            latitude: update.latitude,
            longitude: update.longitude,
            careers: update.careers.as_deref().map(encode_careers),
            housing: update.housing,
            job_assistance: update.job_assistance,
            job_guarantee: update.job_guarantee,
            accept_gi: update.accept_gi,
        }
    }
}

fn encode_careers(careers: &[String]) -> String {
    serde_json::to_string(careers).unwrap_or_else(|_| String::from("[]"))
}
