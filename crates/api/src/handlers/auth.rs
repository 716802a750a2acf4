//! Handlers for the `/auth` resource (register, login, profile).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bitchore_core::error::CoreError;
use bitchore_core::roles::Role;
use bitchore_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use bitchore_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::handlers::validate_input;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    pub password: String,
    pub profile_image_url: Option<String>,
    pub admin_invite_token: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `PUT /auth/profile`. Absent or blank fields are kept.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    #[validate(email(message = "A valid email is required"))]
    pub email: Option<String>,
    pub password: Option<String>,
}

/// The user record plus a bearer token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// The account is `admin` only when `adminInviteToken` matches the
/// configured invite token.
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let input = RegisterRequest {
        name: input.name.trim().to_string(),
        email: input.email.trim().to_string(),
        ..input
    };
    validate_input(&input)?;
    validate_password_strength(&input.password)?;

    if UserRepo::find_by_email(&state.pool, &input.email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "User already exists".into(),
        )));
    }

    let role = resolve_signup_role(
        state.config.admin_invite_token.as_deref(),
        input.admin_invite_token.as_deref(),
    );

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name,
            email: input.email,
            password_hash,
            role,
            profile_image_url: input.profile_image_url,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = %role, "User registered");

    Ok((StatusCode::CREATED, Json(auth_response(&state, &user, role)?)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    let role = user_role(&user)?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(auth_response(&state, &user, role)?))
}

/// GET /api/auth/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = find_user(&state, &auth).await?;
    Ok(Json(user.to_response()))
}

/// PUT /api/auth/profile
///
/// Returns the updated record with a freshly issued token.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<AuthResponse>> {
    let input = UpdateProfileRequest {
        name: non_blank(input.name),
        email: non_blank(input.email),
        password: input.password.filter(|p| !p.is_empty()),
    };
    validate_input(&input)?;

    let password_hash = match &input.password {
        Some(password) => {
            validate_password_strength(password)?;
            Some(hash_password(password).map_err(|e| {
                AppError::InternalError(format!("Password hashing error: {e}"))
            })?)
        }
        None => None,
    };

    let update = UpdateUser {
        name: input.name,
        email: input.email,
        password_hash,
        profile_image_url: None,
    };
    let user = UserRepo::update(&state.pool, auth.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    tracing::info!(user_id = user.id, "Profile updated");

    Ok(Json(auth_response(&state, &user, auth.role)?))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `Admin` only when an invite token is configured and `offered` equals it.
pub fn resolve_signup_role(configured: Option<&str>, offered: Option<&str>) -> Role {
    match (configured, offered) {
        (Some(expected), Some(offered)) if !expected.is_empty() && expected == offered => {
            Role::Admin
        }
        _ => Role::Member,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn user_role(user: &User) -> AppResult<Role> {
    user.role().map_err(|e| {
        AppError::InternalError(format!("User {} has an unreadable role: {e}", user.id))
    })
}

async fn find_user(state: &AppState, auth: &AuthUser) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))
}

fn auth_response(state: &AppState, user: &User, role: Role) -> AppResult<AuthResponse> {
    let token = generate_access_token(user.id, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        user: user.to_response(),
        token,
        expires_in: state.config.jwt.expires_in_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invite_token_must_match_exactly() {
        assert_eq!(resolve_signup_role(Some("let-me-in"), Some("let-me-in")), Role::Admin);
        assert_eq!(resolve_signup_role(Some("let-me-in"), Some("Let-me-in")), Role::Member);
        assert_eq!(resolve_signup_role(Some("let-me-in"), None), Role::Member);
    }

    #[test]
    fn no_configured_token_means_no_admin_signup() {
        assert_eq!(resolve_signup_role(None, Some("anything")), Role::Member);
        assert_eq!(resolve_signup_role(Some(""), Some("")), Role::Member);
    }

    #[test]
    fn register_request_rejects_bad_email() {
        let input = RegisterRequest {
            name: "Ana".into(),
            email: "not-an-email".into(),
            password: "long-enough".into(),
            profile_image_url: None,
            admin_invite_token: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn profile_update_validates_only_present_email() {
        assert!(UpdateProfileRequest::default().validate().is_ok());
        let bad = UpdateProfileRequest {
            email: Some("nope".into()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
