// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map screen logic: what the map should show after a search.
//!
//! The map widget itself is an external collaborator. This module only
//! decides which region to show, which outline to draw and how to style it.

use crate::error::ResolveError;
use crate::models::{GeocodeResult, LatLng};
use crate::services::BoundaryResolver;
use geo::{BoundingRect, LineString};

/// Shown when a search finds nothing or the geocoder fails.
pub const NOT_FOUND_MESSAGE: &str = "Location not found or an error occurred.";
/// Shown when a place was found but has no boundary.
pub const NO_BOUNDARY_MESSAGE: &str = "Boundary data not found, showing center point.";

/// Fallback map center when the device location is unavailable (Istanbul).
pub const FALLBACK_CENTER: LatLng = LatLng {
    latitude: 41.015137,
    longitude: 28.979530,
};

const INITIAL_LATITUDE_DELTA: f64 = 0.0922;
const INITIAL_LONGITUDE_DELTA: f64 = 0.0421;
/// Span used when only a center point is known.
const CENTER_ONLY_DELTA: f64 = 0.5;
const ANIMATION_MS: u32 = 1000;
const BOUNDARY_FILL_ALPHA: f64 = 0.4;
const BOUNDARY_STROKE_WIDTH: u32 = 3;

/// A visible map area: a center and its latitude/longitude spans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Region {
    pub fn around(center: LatLng, latitude_delta: f64, longitude_delta: f64) -> Self {
        Self {
            latitude: center.latitude,
            longitude: center.longitude,
            latitude_delta,
            longitude_delta,
        }
    }

    /// Smallest region containing every point, or `None` for no points.
    pub fn enclosing(points: &[LatLng]) -> Option<Self> {
        let line: LineString<f64> = points
            .iter()
            .map(|p| (p.longitude, p.latitude))
            .collect::<Vec<_>>()
            .into();
        let rect = line.bounding_rect()?;
        let center = rect.center();

        Some(Self {
            latitude: center.y,
            longitude: center.x,
            latitude_delta: rect.height(),
            longitude_delta: rect.width(),
        })
    }
}

/// Region to show before any search: the user's position, or the fallback
/// city when location access was denied or failed.
pub fn initial_region(user_location: Option<LatLng>) -> Region {
    Region::around(
        user_location.unwrap_or(FALLBACK_CENTER),
        INITIAL_LATITUDE_DELTA,
        INITIAL_LONGITUDE_DELTA,
    )
}

/// Screen-space padding kept around a fitted outline, in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgePadding {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

/// Leaves room for the search bar at the top.
pub const SEARCH_EDGE_PADDING: EdgePadding = EdgePadding {
    top: 150,
    right: 50,
    bottom: 50,
    left: 50,
};

/// How the map camera should move.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraMove {
    /// Fit the outline into view.
    FitToCoordinates {
        bounds: Region,
        edge_padding: EdgePadding,
    },
    /// Animate to a region around a lone center point.
    AnimateToRegion { region: Region, duration_ms: u32 },
}

/// Stroke and fill for the boundary overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonStyle {
    pub stroke_color: String,
    pub fill_color: String,
    pub stroke_width: u32,
}

impl PolygonStyle {
    /// Style derived from the session theme color.
    ///
    /// Returns `None` when `theme_color` is not a `#RRGGBB` hex color.
    pub fn from_theme(theme_color: &str) -> Option<Self> {
        Some(Self {
            stroke_color: theme_color.to_string(),
            fill_color: hex_to_rgba(theme_color, BOUNDARY_FILL_ALPHA)?,
            stroke_width: BOUNDARY_STROKE_WIDTH,
        })
    }
}

/// Convert `#RRGGBB` to a CSS `rgba(...)` string.
pub fn hex_to_rgba(hex: &str, alpha: f64) -> Option<String> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(format!(
        "rgba({}, {}, {}, {})",
        channel(0)?,
        channel(2)?,
        channel(4)?,
        alpha
    ))
}

/// Everything the map needs to redraw after a search.
#[derive(Debug, Clone, PartialEq)]
pub struct MapUpdate {
    pub camera: Option<CameraMove>,
    /// Outline to draw; empty clears any previous overlay
    pub polygon: Vec<LatLng>,
    pub message: Option<&'static str>,
}

impl MapUpdate {
    /// Update for a search that produced no usable result.
    pub fn not_found() -> Self {
        Self {
            camera: None,
            polygon: Vec::new(),
            message: Some(NOT_FOUND_MESSAGE),
        }
    }

    /// Update for a resolved place.
    pub fn for_result(result: &GeocodeResult) -> Self {
        if result.has_boundary {
            if let Some(bounds) = Region::enclosing(&result.coordinates) {
                return Self {
                    camera: Some(CameraMove::FitToCoordinates {
                        bounds,
                        edge_padding: SEARCH_EDGE_PADDING,
                    }),
                    polygon: result.coordinates.clone(),
                    message: None,
                };
            }
        }

        Self {
            camera: Some(CameraMove::AnimateToRegion {
                region: Region::around(result.center, CENTER_ONLY_DELTA, CENTER_ONLY_DELTA),
                duration_ms: ANIMATION_MS,
            }),
            polygon: Vec::new(),
            message: Some(NO_BOUNDARY_MESSAGE),
        }
    }
}

/// Trim a search box entry; `None` when there is nothing to search for.
pub fn normalize_query(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Run a search from the map screen.
///
/// Blank input is ignored (`None`). Any resolver failure becomes the generic
/// not-found update; the typed reason is logged.
pub async fn search(resolver: &BoundaryResolver, input: &str) -> Option<MapUpdate> {
    let query = normalize_query(input)?;

    let update = match resolver.resolve(query).await {
        Ok(result) => MapUpdate::for_result(&result),
        Err(ResolveError::NotFound) => {
            tracing::info!(query, "Location not found");
            MapUpdate::not_found()
        }
        Err(e) => {
            tracing::warn!(query, error = %e, "Search failed");
            MapUpdate::not_found()
        }
    };
    Some(update)
}
