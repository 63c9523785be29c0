// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Session model shared between the session manager and its consumers.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Theme color used until the user picks another one.
pub const DEFAULT_THEME_COLOR: &str = "#2E7D32";

/// Whether the user is signed in.
///
/// `Pending` is a distinct loading state: it must never be treated as
/// signed-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
pub enum AuthStatus {
    #[default]
    Pending,
    Authenticated,
    Unauthenticated,
}

impl AuthStatus {
    /// Tri-state view: `None` while restoration has not finished.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            AuthStatus::Pending => None,
            AuthStatus::Authenticated => Some(true),
            AuthStatus::Unauthenticated => Some(false),
        }
    }
}

/// Snapshot of the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
pub struct Session {
    /// Bearer credential (absent when signed out)
    pub token: Option<String>,
    pub authenticated: AuthStatus,
    /// Display preference, independent of authentication
    pub theme_color: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            token: None,
            authenticated: AuthStatus::Pending,
            theme_color: DEFAULT_THEME_COLOR.to_string(),
        }
    }
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.authenticated == AuthStatus::Authenticated
    }

    /// Signed-in state for `token`, keeping the theme.
    pub(crate) fn signed_in(&self, token: String) -> Self {
        Self {
            token: Some(token),
            authenticated: AuthStatus::Authenticated,
            theme_color: self.theme_color.clone(),
        }
    }

    /// Signed-out state, keeping the theme.
    pub(crate) fn signed_out(&self) -> Self {
        Self {
            token: None,
            authenticated: AuthStatus::Unauthenticated,
            theme_color: self.theme_color.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_pending() {
        let session = Session::default();
        assert_eq!(session.authenticated, AuthStatus::Pending);
        assert_eq!(session.authenticated.as_bool(), None);
        assert!(session.token.is_none());
        assert_eq!(session.theme_color, DEFAULT_THEME_COLOR);
    }

    #[test]
    fn test_transitions_keep_theme() {
        let mut session = Session::default();
        session.theme_color = "#123456".to_string();

        let signed_in = session.signed_in("abc".to_string());
        assert!(signed_in.is_authenticated());
        assert_eq!(signed_in.theme_color, "#123456");

        let signed_out = signed_in.signed_out();
        assert_eq!(signed_out.authenticated.as_bool(), Some(false));
        assert!(signed_out.token.is_none());
        assert_eq!(signed_out.theme_color, "#123456");
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(Session::default()).unwrap();
        assert_eq!(json["authenticated"], "pending");
        assert_eq!(json["themeColor"], DEFAULT_THEME_COLOR);
    }
}
