// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session consumers: screen selection and map-screen logic.

pub mod map;

use crate::models::{AuthStatus, Session};

/// Top-level screen for a session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Restoration has not finished yet
    Loading,
    Login,
    /// Map and profile tabs
    MainApp,
}

impl Screen {
    pub fn for_session(session: &Session) -> Self {
        match session.authenticated {
            AuthStatus::Pending => Screen::Loading,
            AuthStatus::Authenticated => Screen::MainApp,
            AuthStatus::Unauthenticated => Screen::Login,
        }
    }
}
