//! Application routes.

use crate::error::{ProfileError, Result};

/// Where the app is pointed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// No entity selected yet
    Home,
    /// `/profile/<entity-id>`
    Profile(String),
}

impl Route {
    pub fn profile(id: impl Into<String>) -> Self {
        Route::Profile(id.into())
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Profile(id) => format!("/profile/{}", id),
        }
    }

    pub fn parse(path: &str) -> Result<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(Route::Home);
        }
        match trimmed.strip_prefix("/profile/") {
            Some(id) if !id.is_empty() && !id.contains('/') => Ok(Route::profile(id)),
            _ => Err(ProfileError::InvalidRoute(path.to_string())),
        }
    }

    pub fn entity_id(&self) -> Option<&str> {
        match self {
            Route::Home => None,
            Route::Profile(id) => Some(id),
        }
    }
}
