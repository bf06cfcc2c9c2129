use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A single (longitude, latitude) vertex
pub type Coordinate = [f64; 2];

/// An ordered ring of vertices, closed or open
pub type Ring = Vec<Coordinate>;

/// Product footprint geometry (GeoJSON subset)
///
/// Only polygons appear in SearchAPI results; the first ring is the outer
/// boundary and the only one used for centroid math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Ring> },
}

impl Geometry {
    /// The outer ring of the footprint, empty if the polygon has no rings
    pub fn outer_ring(&self) -> &[Coordinate] {
        match self {
            Geometry::Polygon { coordinates } => coordinates
                .first()
                .map(|ring| ring.as_slice())
                .unwrap_or(&[]),
        }
    }
}

/// One search result record: a property mapping plus a footprint
///
/// Products are immutable after construction and owned by the caller. The
/// property names mirror the SearchAPI GeoJSON output (`sceneName`,
/// `startTime`, `platform`, `url`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

impl Product {
    pub fn new(properties: Map<String, Value>, geometry: Geometry) -> Self {
        Product { properties, geometry }
    }

    /// Build a product from a GeoJSON Feature value
    pub fn from_feature(feature: Value) -> StackResult<Self> {
        Ok(serde_json::from_value(feature)?)
    }

    /// Generate a GeoJSON Feature snippet describing the product
    pub fn geojson(&self) -> Value {
        json!({
            "type": "Feature",
            "geometry": self.geometry,
            "properties": self.properties,
        })
    }

    /// String-valued property lookup
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Unique product identifier (`sceneName`, falling back to `fileID`)
    pub fn id(&self) -> Option<&str> {
        self.property_str("sceneName")
            .or_else(|| self.property_str("fileID"))
    }

    /// Identifier for log and error messages, never fails
    pub fn display_id(&self) -> String {
        self.id().unwrap_or("<unknown>").to_string()
    }

    /// Acquisition start timestamp, parsed from the `startTime` property
    pub fn start_time(&self) -> StackResult<DateTime<Utc>> {
        let raw = self
            .property_str("startTime")
            .ok_or_else(|| StackError::MissingTemporalField {
                product_id: self.display_id(),
                field: "startTime".to_string(),
            })?;

        parse_timestamp(raw).ok_or_else(|| StackError::MissingTemporalField {
            product_id: self.display_id(),
            field: "startTime".to_string(),
        })
    }

    /// Download URL for the product data file
    pub fn url(&self) -> Option<&str> {
        self.property_str("url")
    }

    /// Original filename of the product data file
    pub fn file_name(&self) -> Option<&str> {
        self.property_str("fileName")
    }

    /// Centroid of the product footprint (averaging centroid)
    pub fn centroid(&self) -> StackResult<Coordinate> {
        crate::core::geometry::centroid(self.geometry.outer_ring())
    }
}

/// Parse the timestamp layouts SearchAPI emits
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.ffffff]`, and bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(DateTime::from_naive_utc_and_offset(
            date.and_hms_opt(0, 0, 0)?,
            Utc,
        ));
    }
    None
}

/// Relative baseline of one candidate against the stack reference
///
/// The temporal baseline is a signed whole-day offset (negative = candidate
/// precedes the reference, reference = 0). The perpendicular baseline is
/// filled only when a caller supplies a strategy for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineAnnotation {
    pub temporal_days: i64,
    pub perpendicular: Option<f64>,
}

impl BaselineAnnotation {
    pub fn temporal(days: i64) -> Self {
        BaselineAnnotation {
            temporal_days: days,
            perpendicular: None,
        }
    }
}

/// One annotated element of an assembled stack
#[derive(Debug, Clone)]
pub struct StackEntry {
    pub product: Product,
    pub baseline: BaselineAnnotation,
}

/// An ordered baseline stack
///
/// Entries are non-decreasing in temporal baseline; ties are broken by
/// acquisition timestamp so repeated assembly of identical inputs yields
/// identical output.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    entries: Vec<StackEntry>,
}

impl Stack {
    pub(crate) fn from_entries(entries: Vec<StackEntry>) -> Self {
        Stack { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StackEntry> {
        self.entries.iter()
    }

    /// The products in stack order, without their annotations
    pub fn products(&self) -> Vec<Product> {
        self.entries.iter().map(|e| e.product.clone()).collect()
    }

    /// Generate a GeoJSON FeatureCollection over the whole stack
    pub fn geojson(&self) -> Value {
        let features: Vec<Value> = self.entries.iter().map(|e| e.product.geojson()).collect();
        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}

impl std::ops::Index<usize> for Stack {
    type Output = StackEntry;

    fn index(&self, index: usize) -> &StackEntry {
        &self.entries[index]
    }
}

impl<'a> IntoIterator for &'a Stack {
    type Item = &'a StackEntry;
    type IntoIter = std::slice::Iter<'a, StackEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Error types for search and stacking operations
#[derive(Debug, thiserror::Error)]
pub enum StackError {
    #[error("Invalid reference {product_id}: missing required field '{field}'")]
    InvalidReference { product_id: String, field: String },

    #[error("Product {product_id}: missing or unparseable temporal field '{field}'")]
    MissingTemporalField { product_id: String, field: String },

    #[error("Reference {product_id} cannot anchor a baseline stack and no alternate reference strategy was given")]
    UnresolvableReference { product_id: String },

    #[error("Neighbor depth must be a positive integer, got {0}")]
    InvalidDepth(usize),

    #[error("Cannot compute the centroid of an empty ring")]
    EmptyGeometry,

    #[error("Search request failed: {0}")]
    Search(String),

    #[error("Download failed for {product_id}: {reason}")]
    Download { product_id: String, reason: String },

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for search and stacking operations
pub type StackResult<T> = Result<T, StackError>;
