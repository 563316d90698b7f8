//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Settings shared across handlers and binaries.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Public base URL used when composing links sent by email.
    pub public_url: String,
    /// HMAC secret for signing access tokens.
    pub secret: String,
    /// Days until an issued token expires.
    pub jwt_expires_in_days: i64,
    /// Base URL of the geocoding service.
    pub geocoder_url: String,
    /// Directory where uploaded bootcamp photos are stored and served from.
    pub uploads_dir: String,
    /// Largest accepted photo upload, in bytes.
    pub max_file_upload: u64,
}
