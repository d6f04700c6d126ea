//! Shared Record Shapes
//!
//! Pagination envelope, GeoJSON geometry and small embedded references.

use serde::{Deserialize, Deserializer, Serialize};

/// A collection response: either a bare array or a DRF pagination envelope
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Page {
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        results: Vec<T>,
    },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Page { results, .. } => results,
            Listing::Bare(items) => items,
        }
    }
}

/// Map coordinate in Leaflet order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// GeoJSON Point; coordinates are `[lon, lat]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type", default = "point_type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

fn point_type() -> String {
    "Point".to_string()
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { kind: point_type(), coordinates: [lon, lat] }
    }

    pub fn lon(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn lat(&self) -> f64 {
        self.coordinates[1]
    }

    pub fn to_lat_lng(&self) -> LatLng {
        LatLng::new(self.lat(), self.lon())
    }
}

/// GeoJSON LineString; each coordinate is `[lon, lat]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLine {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Vec<Vec<f64>>,
}

impl GeoLine {
    /// Points in map order, skipping malformed coordinates
    pub fn to_lat_lngs(&self) -> Vec<LatLng> {
        self.coordinates
            .iter()
            .filter(|c| c.len() >= 2)
            .map(|c| LatLng::new(c[1], c[0]))
            .collect()
    }
}

/// Embedded user reference (reporter, assignee, driver)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonRef {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl PersonRef {
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.email.as_deref())
            .unwrap_or("—")
    }
}

/// `{"estado": ...}` body for status PATCHes
#[derive(Debug, Clone, Serialize)]
pub struct StatusPatch<S: Serialize> {
    pub estado: S,
}

/// Accept a JSON string or number as a String
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}
