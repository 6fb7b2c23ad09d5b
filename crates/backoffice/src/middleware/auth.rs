//! Authentication extractors for the backoffice.
//!
//! The session stores the resolution computed at sign-in; extractors read
//! it back and turn its absence into the right rejection. Capability checks
//! for specific modules happen inside handlers via [`require_capability`],
//! which distinguishes "not signed in" from "signed in, wrong section".

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use loanmitra_core::AccessTier;

use crate::error::AppError;
use crate::models::{CurrentStaff, session_keys};

/// Extractor that requires a signed-in, authorized staff member.
///
/// If nobody is signed in, returns a redirect to the login page for HTML
/// requests, or 401 Unauthorized for API requests.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireStaff(staff): RequireStaff,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", staff.email)
/// }
/// ```
pub struct RequireStaff(pub CurrentStaff);

/// Error returned when staff authentication is required but missing.
pub enum StaffAuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for StaffAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = StaffAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(StaffAuthRejection::Unauthorized)?;

        let staff: CurrentStaff = session
            .get(session_keys::CURRENT_STAFF)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                let is_api = parts.uri.path().starts_with("/api/");
                if is_api {
                    StaffAuthRejection::Unauthorized
                } else {
                    StaffAuthRejection::RedirectToLogin
                }
            })?;

        Ok(Self(staff))
    }
}

/// Extractor that requires superuser tier.
///
/// If nobody is signed in, behaves like [`RequireStaff`]. A signed-in
/// staff member below Superuser gets 403 Forbidden.
pub struct RequireSuperuser(pub CurrentStaff);

/// Error returned when superuser authentication is required.
pub enum SuperuserRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Forbidden - staff member is not a superuser.
    Forbidden,
}

impl IntoResponse for SuperuserRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "Only superusers can access this resource",
            )
                .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireSuperuser
where
    S: Send + Sync,
{
    type Rejection = SuperuserRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(SuperuserRejection::Unauthorized)?;

        let staff: CurrentStaff = session
            .get(session_keys::CURRENT_STAFF)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                let is_api = parts.uri.path().starts_with("/api/");
                if is_api {
                    SuperuserRejection::Unauthorized
                } else {
                    SuperuserRejection::RedirectToLogin
                }
            })?;

        if staff.tier < AccessTier::Superuser {
            return Err(SuperuserRejection::Forbidden);
        }

        Ok(Self(staff))
    }
}

/// Enforce a module capability inside a handler.
///
/// Emits the audit event naming the denied capability and the caller
/// before returning `Forbidden`.
///
/// # Errors
///
/// Returns [`AppError::Forbidden`] when the staff member lacks the
/// capability and does not bypass checks.
pub fn require_capability(staff: &CurrentStaff, capability: &str) -> Result<(), AppError> {
    if staff.can_access(capability) {
        return Ok(());
    }
    tracing::warn!(
        capability,
        email = %staff.email,
        tier = %staff.tier,
        "capability denied"
    );
    Err(AppError::Forbidden(format!(
        "missing capability: {capability}"
    )))
}
