// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Resolved places and their boundary geometry.

use geo::{LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A point in map order (latitude first).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<geo::Coord<f64>> for LatLng {
    /// GeoJSON coordinates are (x = longitude, y = latitude).
    fn from(c: geo::Coord<f64>) -> Self {
        Self {
            latitude: c.y,
            longitude: c.x,
        }
    }
}

/// Boundary geometry as returned by the geocoder.
///
/// Coordinates keep the source (longitude, latitude) order.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl BoundaryGeometry {
    /// Outer ring used for display.
    ///
    /// For multi-polygons only the first polygon is used, not the largest or a
    /// union. Islands and exclaves are dropped.
    pub fn outer_ring(&self) -> Option<&LineString<f64>> {
        match self {
            BoundaryGeometry::Polygon(poly) => Some(poly.exterior()),
            BoundaryGeometry::MultiPolygon(multi) => multi.0.first().map(|p| p.exterior()),
        }
    }
}

/// A place resolved by the geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
pub struct GeocodeResult {
    pub center: LatLng,
    /// Outline in (latitude, longitude) order; empty without a boundary
    pub coordinates: Vec<LatLng>,
    pub has_boundary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl GeocodeResult {
    /// Result with only a center point.
    pub fn center_only(center: LatLng, display_name: Option<String>) -> Self {
        Self {
            center,
            coordinates: Vec::new(),
            has_boundary: false,
            display_name,
        }
    }

    /// Result with an outline taken from `ring`.
    ///
    /// A closed ring needs four positions (three distinct corners) to enclose
    /// an area; anything shorter falls back to a center-only result.
    pub fn with_outline(
        center: LatLng,
        ring: &LineString<f64>,
        display_name: Option<String>,
    ) -> Self {
        if ring.0.len() < 4 {
            return Self::center_only(center, display_name);
        }

        Self {
            center,
            coordinates: ring.coords().copied().map(LatLng::from).collect(),
            has_boundary: true,
            display_name,
        }
    }
}
