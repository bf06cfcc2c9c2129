use serde_json::Value;

use crate::core::geometry;
use crate::types::{Product, StackError, StackResult};

/// Search constraints derived from a reference product
///
/// Covers the two query shapes SearchAPI understands: a legacy stack lookup
/// keyed on `insarStackId`, and a geometric lookup constraining platform,
/// beam/orbit context, and a centroid point intersection. Built once per
/// stack request and discarded after the search call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackQuerySpec {
    pub platform: Option<String>,
    pub beam_mode: Option<String>,
    pub flight_direction: Option<String>,
    pub polarization: Vec<String>,
    pub relative_orbit: Option<i64>,
    pub processing_level: Vec<String>,
    pub intersects_with: Option<String>,
    pub insar_stack_id: Option<String>,
    pub provider: Option<String>,
}

impl StackQuerySpec {
    /// Render the spec as SearchAPI query parameters
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        // A stack id fully determines the stack; no other filters apply
        if let Some(stack_id) = &self.insar_stack_id {
            params.push(("insarStackId".to_string(), stack_id.clone()));
            return params;
        }

        if let Some(platform) = &self.platform {
            params.push(("platform".to_string(), platform.clone()));
        }
        if let Some(beam_mode) = &self.beam_mode {
            params.push(("beamMode".to_string(), beam_mode.clone()));
        }
        if let Some(direction) = &self.flight_direction {
            params.push(("flightDirection".to_string(), direction.clone()));
        }
        if !self.polarization.is_empty() {
            params.push(("polarization".to_string(), self.polarization.join(",")));
        }
        if let Some(orbit) = self.relative_orbit {
            params.push(("relativeOrbit".to_string(), orbit.to_string()));
        }
        if !self.processing_level.is_empty() {
            params.push(("processingLevel".to_string(), self.processing_level.join(",")));
        }
        if let Some(wkt) = &self.intersects_with {
            params.push(("intersectsWith".to_string(), wkt.clone()));
        }

        params
    }
}

/// Derives stack search constraints from a reference product
pub struct StackParamBuilder;

impl StackParamBuilder {
    /// Build the search constraints for the stack containing `reference`
    ///
    /// Pure function: no I/O, no side effects. Fails with `InvalidReference`
    /// when the reference lacks a platform, footprint, or acquisition date.
    pub fn build(reference: &Product) -> StackResult<StackQuerySpec> {
        // Required regardless of which query shape applies
        reference
            .start_time()
            .map_err(|_| Self::invalid(reference, "startTime"))?;

        // Legacy platforms carry a precomputed stack id
        if let Some(stack_id) = reference.property_str("insarStackId") {
            if !stack_id.is_empty() && stack_id != "0" {
                log::debug!(
                    "Reference {} has insarStackId {}, using stack id lookup",
                    reference.display_id(),
                    stack_id
                );
                return Ok(StackQuerySpec {
                    insar_stack_id: Some(stack_id.to_string()),
                    ..Default::default()
                });
            }
        }

        let platform = reference
            .property_str("platform")
            .ok_or_else(|| Self::invalid(reference, "platform"))?;

        let ring = reference.geometry.outer_ring();
        if ring.is_empty() {
            return Err(Self::invalid(reference, "geometry"));
        }
        let centroid = geometry::centroid(ring)?;

        let processing_level = reference
            .property_str("processingLevel")
            .unwrap_or("SLC")
            .to_string();

        Ok(StackQuerySpec {
            platform: Some(platform_family(platform)),
            beam_mode: reference.property_str("beamModeType").map(str::to_string),
            flight_direction: reference
                .property_str("flightDirection")
                .map(str::to_string),
            polarization: reference
                .property_str("polarization")
                .map(polarization_family)
                .unwrap_or_default(),
            relative_orbit: reference.properties.get("pathNumber").and_then(Value::as_i64),
            processing_level: vec![processing_level],
            intersects_with: Some(geometry::wkt_point(centroid)),
            insar_stack_id: None,
            provider: None,
        })
    }

    fn invalid(reference: &Product, field: &str) -> StackError {
        StackError::InvalidReference {
            product_id: reference.display_id(),
            field: field.to_string(),
        }
    }
}

/// Collapse per-satellite platform names into their searchable family
///
/// A Sentinel-1A reference must stack against Sentinel-1B acquisitions of the
/// same track, so the constraint is the constellation, not the satellite.
fn platform_family(platform: &str) -> String {
    let upper = platform.to_uppercase();
    if upper.starts_with("SENTINEL-1") {
        "SENTINEL-1".to_string()
    } else {
        platform.to_string()
    }
}

/// Widen a polarization to its interferometrically compatible family
fn polarization_family(polarization: &str) -> Vec<String> {
    match polarization.to_uppercase().as_str() {
        "VV" | "VV+VH" => vec!["VV".to_string(), "VV+VH".to_string()],
        "HH" | "HH+HV" => vec!["HH".to_string(), "HH+HV".to_string()],
        other => vec![other.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Geometry;
    use serde_json::json;

    fn sentinel_reference() -> Product {
        Product::from_feature(json!({
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-151.6, 61.2], [-143.9, 61.2], [-143.9, 63.7], [-151.6, 63.7], [-151.6, 61.2]]]
            },
            "properties": {
                "sceneName": "S1B_IW_SLC__1SDV_20210416T101049",
                "platform": "Sentinel-1B",
                "processingLevel": "SLC",
                "beamModeType": "IW",
                "flightDirection": "DESCENDING",
                "polarization": "VV+VH",
                "pathNumber": 94,
                "startTime": "2021-04-16T10:10:49.000000"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_build_sentinel_params() {
        let spec = StackParamBuilder::build(&sentinel_reference()).unwrap();

        assert_eq!(spec.platform.as_deref(), Some("SENTINEL-1"));
        assert_eq!(spec.beam_mode.as_deref(), Some("IW"));
        assert_eq!(spec.flight_direction.as_deref(), Some("DESCENDING"));
        assert_eq!(spec.relative_orbit, Some(94));
        assert_eq!(spec.processing_level, vec!["SLC".to_string()]);
        assert_eq!(
            spec.polarization,
            vec!["VV".to_string(), "VV+VH".to_string()]
        );
        // Centroid of the closed ring, point-intersection filter
        assert!(spec.intersects_with.as_deref().unwrap().starts_with("POINT("));
        assert!(spec.insar_stack_id.is_none());
    }

    #[test]
    fn test_build_prefers_stack_id() {
        let reference = Product::from_feature(json!({
            "type": "Feature",
            "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0]]] },
            "properties": {
                "sceneName": "ALPSRP279071390",
                "platform": "ALOS",
                "insarStackId": "2006681",
                "startTime": "2011-02-23T03:14:48.000000"
            }
        }))
        .unwrap();

        let spec = StackParamBuilder::build(&reference).unwrap();
        assert_eq!(spec.insar_stack_id.as_deref(), Some("2006681"));

        let params = spec.to_params();
        assert_eq!(params, vec![("insarStackId".to_string(), "2006681".to_string())]);
    }

    #[test]
    fn test_build_missing_platform() {
        let reference = Product::from_feature(json!({
            "type": "Feature",
            "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0]]] },
            "properties": { "sceneName": "X1", "startTime": "2021-04-16T00:00:00" }
        }))
        .unwrap();

        match StackParamBuilder::build(&reference) {
            Err(StackError::InvalidReference { product_id, field }) => {
                assert_eq!(product_id, "X1");
                assert_eq!(field, "platform");
            }
            other => panic!("expected InvalidReference, got {:?}", other),
        }
    }

    #[test]
    fn test_build_missing_date() {
        let reference = Product::new(
            serde_json::Map::new(),
            Geometry::Polygon {
                coordinates: vec![vec![[0.0, 0.0]]],
            },
        );

        assert!(matches!(
            StackParamBuilder::build(&reference),
            Err(StackError::InvalidReference { .. })
        ));
    }
}
