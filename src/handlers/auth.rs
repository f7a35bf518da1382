use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies};
use tower_cookies::cookie::time::Duration;
use uuid::Uuid;

use crate::{
    crypto::token::{AdminClaims, SESSION_COOKIE},
    error::Result,
    services::auth as auth_service,
    state::AppState,
    validation::auth::*,
};

/// The request payload for admin registration.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// The request payload for admin login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The response payload for authentication-related requests.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

/// The response payload for `GET /api/admin/me`.
#[derive(Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
}

/// Builds the `admin_token` session cookie: HttpOnly, SameSite=Lax, Secure
/// in production, Max-Age matching the token's own expiry.
fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    if state.config.production {
        cookie.set_secure(true);
    }
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::seconds(state.signer.ttl_seconds()));
    cookie.set_path("/");
    cookie
}

/// One-time staff registration. Closed once any admin exists.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    let admin = auth_service::register_admin(&state.db, &payload.email, &payload.password).await?;

    let token = state.signer.issue(admin.id, &admin.email).map_err(|_| {
        crate::error::AppError::Internal("Token issuance failed".to_string())
    })?;
    cookies.add(session_cookie(&state, token));

    let response = AuthResponse {
        success: true,
        message: "Registration successful".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Admin login. Any failure, including an unknown email, yields the same
/// generic 401; email shape is deliberately not validated here so the
/// response carries no hint about which part of the credentials was wrong.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    tracing::debug!("Login attempt for {}", payload.email);

    let admin = auth_service::authenticate_admin(&state.db, &payload.email, &payload.password).await?;

    let token = state.signer.issue(admin.id, &admin.email).map_err(|_| {
        crate::error::AppError::Internal("Token issuance failed".to_string())
    })?;
    cookies.add(session_cookie(&state, token));

    let response = AuthResponse {
        success: true,
        message: "Login successful".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Logout clears the client cookie and nothing else. Tokens are stateless,
/// so the old token stays valid until it expires; accepted limitation of
/// the design.
#[axum::debug_handler]
pub async fn logout(cookies: Cookies) -> Result<Response> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_max_age(Duration::seconds(0));
    cookie.set_path("/");
    cookies.remove(cookie);

    let response = AuthResponse {
        success: true,
        message: "Logout successful".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Returns the authenticated admin's identity straight from the verified
/// claims; no database round-trip.
#[axum::debug_handler]
pub async fn me(Extension(claims): Extension<AdminClaims>) -> Result<Json<MeResponse>> {
    Ok(Json(MeResponse {
        id: claims.sub,
        email: claims.email,
    }))
}
