// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the client core.

pub mod place;
pub mod session;

pub use place::{BoundaryGeometry, GeocodeResult, LatLng};
pub use session::{AuthStatus, Session, DEFAULT_THEME_COLOR};
