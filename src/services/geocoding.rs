// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Boundary resolver backed by a Nominatim-compatible geocoder.
//!
//! Turns a free-text place name into a center point and, when the geocoder
//! has one, the outer ring of the place's administrative boundary.

use crate::config::Config;
use crate::error::ResolveError;
use crate::models::{BoundaryGeometry, GeocodeResult, LatLng};
use geo::{MultiPolygon, Polygon};
use serde::Deserialize;

/// One search hit as returned by `GET /search?format=json`.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    /// Latitude as a decimal string
    pub lat: String,
    /// Longitude as a decimal string
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Present when `polygon_geojson=1` was requested and the place has one
    #[serde(default)]
    pub geojson: Option<geojson::Geometry>,
}

/// Resolves place names to boundaries. Stateless; every call is independent.
#[derive(Clone)]
pub struct BoundaryResolver {
    http: reqwest::Client,
    base_url: String,
}

impl BoundaryResolver {
    /// Create a resolver for the geocoder configured in `config`.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            http,
            base_url: config.geocoder_base_url.clone(),
        })
    }

    /// Resolve `name`, collapsing every failure into `None`.
    ///
    /// Callers cannot tell "no such place" from "geocoder unavailable" here;
    /// use [`Self::resolve`] when the distinction matters.
    pub async fn resolve_city(&self, name: &str) -> Option<GeocodeResult> {
        match self.resolve(name).await {
            Ok(result) => Some(result),
            Err(ResolveError::NotFound) => {
                tracing::info!(query = %name, "Location not found");
                None
            }
            Err(e) => {
                tracing::error!(query = %name, error = %e, "Geocoding failed");
                None
            }
        }
    }

    /// Resolve `name` to the best-ranked place.
    ///
    /// `name` should already be trimmed and non-empty.
    pub async fn resolve(&self, name: &str) -> Result<GeocodeResult, ResolveError> {
        let places = self.search(name).await?;

        // limit=1: trust the geocoder's ranking
        let place = places.into_iter().next().ok_or(ResolveError::NotFound)?;
        let result = normalize_place(place)?;

        tracing::debug!(
            query = %name,
            has_boundary = result.has_boundary,
            points = result.coordinates.len(),
            "Location resolved"
        );
        Ok(result)
    }

    async fn search(&self, name: &str) -> Result<Vec<NominatimPlace>, ResolveError> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", name),
                ("format", "json"),
                ("polygon_geojson", "1"),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(|e| ResolveError::ServiceUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ResolveError::ServiceUnavailable(format!("HTTP {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| ResolveError::MalformedResponse(format!("JSON parse error: {}", e)))
    }
}

/// Build a [`GeocodeResult`] from one search hit.
pub fn normalize_place(place: NominatimPlace) -> Result<GeocodeResult, ResolveError> {
    let center = LatLng::new(
        parse_coordinate("lat", &place.lat)?,
        parse_coordinate("lon", &place.lon)?,
    );

    let geometry = match place.geojson {
        Some(geometry) => convert_geometry(display_geometry(geometry.value))?,
        None => None,
    };

    let result = match geometry.as_ref().and_then(BoundaryGeometry::outer_ring) {
        Some(ring) => GeocodeResult::with_outline(center, ring, place.display_name),
        None => GeocodeResult::center_only(center, place.display_name),
    };
    Ok(result)
}

/// Parse a decimal-string coordinate. NaN and infinities are rejected.
fn parse_coordinate(field: &str, raw: &str) -> Result<f64, ResolveError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ResolveError::MalformedResponse(format!("invalid {}: {:?}", field, raw)))
}

/// Trim geometry down to the part that is displayed.
///
/// Only the first polygon of a multi-polygon is drawn, so the rest is dropped
/// before conversion.
fn display_geometry(value: geojson::Value) -> geojson::Value {
    match value {
        geojson::Value::MultiPolygon(polygons) => {
            geojson::Value::MultiPolygon(polygons.into_iter().take(1).collect())
        }
        other => other,
    }
}

/// Convert GeoJSON geometry to our internal format.
///
/// Returns `Ok(None)` for geometry that cannot carry a boundary (points,
/// lines, collections).
pub fn convert_geometry(value: geojson::Value) -> Result<Option<BoundaryGeometry>, ResolveError> {
    match value {
        geojson::Value::Polygon(_) => {
            let poly: Polygon<f64> = value.try_into().map_err(malformed_geometry)?;
            Ok(Some(BoundaryGeometry::Polygon(poly)))
        }
        geojson::Value::MultiPolygon(_) => {
            let multi: MultiPolygon<f64> = value.try_into().map_err(malformed_geometry)?;
            Ok(Some(BoundaryGeometry::MultiPolygon(multi)))
        }
        geojson::Value::Point(_) | geojson::Value::MultiPoint(_) => {
            tracing::debug!("Point geometry has no boundary");
            Ok(None)
        }
        geojson::Value::LineString(_) | geojson::Value::MultiLineString(_) => {
            tracing::debug!("Line geometry has no boundary");
            Ok(None)
        }
        geojson::Value::GeometryCollection(_) => {
            tracing::debug!("Geometry collections are not searched for boundaries");
            Ok(None)
        }
    }
}

fn malformed_geometry(e: geojson::Error) -> ResolveError {
    ResolveError::MalformedResponse(format!("geometry conversion failed: {}", e))
}
