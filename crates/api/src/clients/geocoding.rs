//! Nominatim geocoding client.
//!
//! Upstream responses are reshaped into small, stable structs by pure
//! functions so the handlers never pass Nominatim's raw JSON through.

use serde::{Deserialize, Serialize};

use crate::config::optional_env;

/// Zoom level used when detecting the region around a point.
pub const DETECT_ZOOM: u8 = 10;

/// Maximum forward-search results requested upstream.
pub const SEARCH_RESULT_LIMIT: u8 = 10;

/// Nominatim endpoint configuration.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying user agent.
    pub user_agent: String,
}

impl GeocoderConfig {
    /// | Env Var               | Default                                 |
    /// |-----------------------|-----------------------------------------|
    /// | `NOMINATIM_URL`       | `https://nominatim.openstreetmap.org`   |
    /// | `GEOCODER_USER_AGENT` | `cragmap/<crate version>`               |
    pub fn from_env() -> Self {
        Self {
            base_url: optional_env("NOMINATIM_URL")
                .unwrap_or_else(|| "https://nominatim.openstreetmap.org".into())
                .trim_end_matches('/')
                .to_string(),
            user_agent: optional_env("GEOCODER_USER_AGENT")
                .unwrap_or_else(|| format!("cragmap/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

/// Errors from the geocoding layer.
#[derive(Debug, thiserror::Error)]
pub enum GeocodingError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Nominatim returned a non-2xx status code.
    #[error("Geocoder error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// The upstream payload did not contain usable coordinates.
    #[error("Malformed geocoder response: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Upstream payloads
// ---------------------------------------------------------------------------

/// Address details as returned by Nominatim with `addressdetails=1`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
    pub region: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}

/// A single Nominatim place. Coordinates arrive as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "type")]
    pub place_type: Option<String>,
    #[serde(default)]
    pub address: NominatimAddress,
}

// ---------------------------------------------------------------------------
// Reshaped results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressSummary {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeResult {
    pub lat: f64,
    pub lng: f64,
    pub name: Option<String>,
    pub display_name: Option<String>,
    #[serde(rename = "type")]
    pub place_type: Option<String>,
    pub address: AddressSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReverseGeocode {
    pub lat: f64,
    pub lng: f64,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub address: AddressSummary,
}

/// Country, region and town around a point, for prefilling forms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub region: Option<String>,
    pub town: Option<String>,
    pub display_name: Option<String>,
}

fn first_of(candidates: [&Option<String>; 4]) -> Option<String> {
    candidates.into_iter().flatten().next().cloned()
}

pub fn summarize_address(address: &NominatimAddress) -> AddressSummary {
    AddressSummary {
        city: first_of([&address.city, &address.town, &address.village, &None]),
        state: address.state.clone(),
        country: address.country.clone(),
        country_code: address.country_code.clone(),
    }
}

fn parse_coord(raw: &str, field: &str) -> Result<f64, GeocodingError> {
    raw.trim()
        .parse()
        .map_err(|_| GeocodingError::Malformed(format!("invalid {field} '{raw}'")))
}

pub fn to_search_result(place: &NominatimPlace) -> Result<GeocodeResult, GeocodingError> {
    Ok(GeocodeResult {
        lat: parse_coord(&place.lat, "lat")?,
        lng: parse_coord(&place.lon, "lon")?,
        name: place.name.clone(),
        display_name: place.display_name.clone(),
        place_type: place.place_type.clone(),
        address: summarize_address(&place.address),
    })
}

/// Reshape a reverse lookup. The queried coordinates are echoed back.
pub fn to_reverse(place: &NominatimPlace, lat: f64, lng: f64) -> ReverseGeocode {
    ReverseGeocode {
        lat,
        lng,
        name: place.name.clone(),
        display_name: place.display_name.clone(),
        address: summarize_address(&place.address),
    }
}

pub fn to_detected(place: &NominatimPlace, latitude: f64, longitude: f64) -> DetectedLocation {
    let a = &place.address;
    DetectedLocation {
        latitude,
        longitude,
        country: a.country.clone(),
        country_code: a.country_code.as_deref().map(str::to_uppercase),
        region: first_of([&a.county, &a.region, &a.state, &None]),
        town: first_of([&a.town, &a.city, &a.village, &a.municipality]),
        display_name: place.display_name.clone(),
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for a Nominatim instance.
pub struct GeocodingClient {
    client: reqwest::Client,
    config: GeocoderConfig,
}

impl GeocodingClient {
    pub fn new(client: reqwest::Client, config: GeocoderConfig) -> Self {
        Self { client, config }
    }

    /// Forward geocode free text. Places with unparseable coordinates are skipped.
    pub async fn search(&self, query: &str) -> Result<Vec<GeocodeResult>, GeocodingError> {
        let limit = SEARCH_RESULT_LIMIT.to_string();
        let response = self
            .client
            .get(format!("{}/search", self.config.base_url))
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .query(&[
                ("format", "json"),
                ("limit", limit.as_str()),
                ("addressdetails", "1"),
                ("q", query),
            ])
            .send()
            .await?;

        let places: Vec<NominatimPlace> = Self::parse(response).await?;
        Ok(places
            .iter()
            .filter_map(|p| to_search_result(p).ok())
            .collect())
    }

    pub async fn reverse(&self, lat: f64, lng: f64) -> Result<ReverseGeocode, GeocodingError> {
        let place = self.reverse_place(lat, lng, None).await?;
        Ok(to_reverse(&place, lat, lng))
    }

    pub async fn detect(&self, lat: f64, lng: f64) -> Result<DetectedLocation, GeocodingError> {
        let place = self.reverse_place(lat, lng, Some(DETECT_ZOOM)).await?;
        Ok(to_detected(&place, lat, lng))
    }

    async fn reverse_place(
        &self,
        lat: f64,
        lng: f64,
        zoom: Option<u8>,
    ) -> Result<NominatimPlace, GeocodingError> {
        let mut query = vec![
            ("format", "json".to_string()),
            ("lat", lat.to_string()),
            ("lon", lng.to_string()),
            ("addressdetails", "1".to_string()),
        ];
        if let Some(zoom) = zoom {
            query.push(("zoom", zoom.to_string()));
        }

        let response = self
            .client
            .get(format!("{}/reverse", self.config.base_url))
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .query(&query)
            .send()
            .await?;

        Self::parse(response).await
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GeocodingError> {
        let response = super::ensure_success(response, |status, body| GeocodingError::ApiError {
            status,
            body,
        })
        .await?;
        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(json: serde_json::Value) -> NominatimPlace {
        serde_json::from_value(json).expect("valid place")
    }

    #[test]
    fn search_result_parses_string_coordinates() {
        let p = place(serde_json::json!({
            "lat": "48.404",
            "lon": "2.701",
            "name": "Fontainebleau",
            "display_name": "Fontainebleau, Seine-et-Marne, France",
            "type": "town",
            "address": { "town": "Fontainebleau", "state": "Île-de-France", "country": "France", "country_code": "fr" }
        }));
        let r = to_search_result(&p).unwrap();
        assert!((r.lat - 48.404).abs() < 1e-9);
        assert_eq!(r.place_type.as_deref(), Some("town"));
        assert_eq!(r.address.city.as_deref(), Some("Fontainebleau"));
        assert_eq!(r.address.country_code.as_deref(), Some("fr"));
    }

    #[test]
    fn bad_coordinates_are_malformed() {
        let p = place(serde_json::json!({ "lat": "north", "lon": "2.7" }));
        assert!(matches!(to_search_result(&p), Err(GeocodingError::Malformed(_))));
    }

    #[test]
    fn detect_prefers_county_and_town() {
        let p = place(serde_json::json!({
            "lat": "0", "lon": "0",
            "display_name": "Somewhere",
            "address": {
                "city": "Big City", "town": "Small Town",
                "county": "Shire", "state": "State",
                "country": "United Kingdom", "country_code": "gb"
            }
        }));
        let d = to_detected(&p, 51.5, -0.1);
        assert_eq!(d.country_code.as_deref(), Some("GB"));
        assert_eq!(d.region.as_deref(), Some("Shire"));
        assert_eq!(d.town.as_deref(), Some("Small Town"));
        assert_eq!(d.latitude, 51.5);
    }

    #[test]
    fn detect_falls_back_through_address_levels() {
        let p = place(serde_json::json!({
            "lat": "0", "lon": "0",
            "address": { "village": "Hamlet", "state": "Valais" }
        }));
        let d = to_detected(&p, 46.0, 7.0);
        assert_eq!(d.region.as_deref(), Some("Valais"));
        assert_eq!(d.town.as_deref(), Some("Hamlet"));
        assert_eq!(d.country_code, None);
    }

    #[test]
    fn reverse_echoes_query_coordinates() {
        let p = place(serde_json::json!({ "lat": "1.0", "lon": "1.0", "name": "Crag" }));
        let r = to_reverse(&p, 45.0, 6.0);
        assert_eq!((r.lat, r.lng), (45.0, 6.0));
        assert_eq!(r.name.as_deref(), Some("Crag"));
    }
}
