//! Address geocoding and distance math.
//!
//! Bootcamp addresses are geocoded on create and on address change, and the
//! stored coordinates back the radius search. The provider sits behind a
//! trait so tests can swap the HTTP client out for a canned responder.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const EARTH_RADIUS_MILES: f64 = 3963.2;
const MILES_PER_LATITUDE_DEGREE: f64 = 69.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Latitude/longitude rectangle used to prefilter rows before the exact
/// distance check. SQLite has no trig functions, so the repository compares
/// against this box in SQL and finishes with [`haversine_miles`] in memory.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl GeoBounds {
    /// Smallest box containing every point within `radius_miles` of `center`.
    #[must_use]
    pub fn around(center: GeoPoint, radius_miles: f64) -> Self {
        let lat_span = radius_miles / MILES_PER_LATITUDE_DEGREE;
        let cos_lat = center.latitude.to_radians().cos().abs();
        let lon_span = if cos_lat < 1e-6 {
            // Close enough to a pole that every longitude qualifies.
            180.0
        } else {
            (radius_miles / (MILES_PER_LATITUDE_DEGREE * cos_lat)).min(180.0)
        };

        Self {
            min_latitude: center.latitude - lat_span,
            max_latitude: center.latitude + lat_span,
            min_longitude: center.longitude - lon_span,
            max_longitude: center.longitude + lon_span,
        }
    }
}

/// Great-circle distance between two points.
#[must_use]
pub fn haversine_miles(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let half_dlat = (b.latitude - a.latitude).to_radians() / 2.0;
    let half_dlon = (b.longitude - a.longitude).to_radians() / 2.0;

    let h = half_dlat.sin().powi(2) + lat_a.cos() * lat_b.cos() * half_dlon.sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no location found for `{0}`")]
    NoMatch(String),
    #[error("geocoder returned an unreadable location")]
    Malformed,
}

/// Resolves a free-form location query, a street address or a zipcode, to
/// coordinates.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<GeoPoint, GeocodeError>;
}

/// [`GeocodeProvider`] backed by a Nominatim-compatible HTTP endpoint.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .user_agent(concat!("bootcamper/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

#[async_trait]
impl GeocodeProvider for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<GeoPoint, GeocodeError> {
        let hits: Vec<NominatimHit> = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let hit = hits
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NoMatch(query.to_string()))?;

        let latitude = hit.lat.parse().map_err(|_| GeocodeError::Malformed)?;
        let longitude = hit.lon.parse().map_err(|_| GeocodeError::Malformed)?;

        Ok(GeoPoint {
            latitude,
            longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOSTON: GeoPoint = GeoPoint {
        latitude: 42.3601,
        longitude: -71.0589,
    };
    const NEW_YORK: GeoPoint = GeoPoint {
        latitude: 40.7128,
        longitude: -74.0060,
    };

    #[test]
    fn haversine_matches_known_distance() {
        let miles = haversine_miles(BOSTON, NEW_YORK);
        assert!((180.0..200.0).contains(&miles), "got {miles}");
        assert_eq!(haversine_miles(BOSTON, BOSTON), 0.0);
    }

    #[test]
    fn bounds_contain_the_radius() {
        let bounds = GeoBounds::around(BOSTON, 50.0);
        assert!(bounds.min_latitude < BOSTON.latitude);
        assert!(bounds.max_latitude > BOSTON.latitude);

        // Any point inside the radius must be inside the box.
        let nearby = GeoPoint {
            latitude: BOSTON.latitude + 0.5,
            longitude: BOSTON.longitude - 0.5,
        };
        assert!(haversine_miles(BOSTON, nearby) < 50.0);
        assert!(nearby.latitude <= bounds.max_latitude);
        assert!(nearby.longitude >= bounds.min_longitude);
    }

    #[test]
    fn bounds_near_a_pole_span_all_longitudes() {
        let pole = GeoPoint {
            latitude: 90.0,
            longitude: 0.0,
        };
        let bounds = GeoBounds::around(pole, 10.0);
        assert!(bounds.min_longitude <= -179.0);
        assert!(bounds.max_longitude >= 179.0);
    }
}
