//! Handlers for the `/auth` resource (login, current user, own password and
//! profile).

use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use zeladoria_core::error::CoreError;
use zeladoria_core::storage::CATEGORY_PROFILE_PICTURES;
use zeladoria_core::types::DbId;
use zeladoria_db::models::user::User;
use zeladoria_db::repositories::{RoleRepo, UserRepo};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::handlers::admin::MIN_PASSWORD_LENGTH;
use crate::handlers::photo::MEDIA_URL_PREFIX;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Longest accepted profile display name, in characters.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 150;

/// Multipart field carrying the display name.
const FIELD_NAME: &str = "nome";
/// Multipart field carrying the picture bytes.
const FIELD_PICTURE: &str = "profile_picture";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`] and returned by `/auth/me`.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub profile: ProfileInfo,
}

/// A user's profile: display name and picture URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileInfo {
    pub nome: String,
    /// `/media/profile_pics/<uuid>.<ext>`, or `None` without a picture.
    pub profile_picture: Option<String>,
}

impl From<&User> for ProfileInfo {
    fn from(user: &User) -> Self {
        Self {
            nome: user.display_name.clone(),
            profile_picture: user
                .profile_picture_path
                .as_ref()
                .map(|path| format!("{MEDIA_URL_PREFIX}/{path}")),
        }
    }
}

/// Plain confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}

fn user_info(user: User, role: String) -> UserInfo {
    let profile = ProfileInfo::from(&user);
    UserInfo {
        id: user.id,
        username: user.username,
        email: user.email,
        role,
        profile,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Returns a bearer access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Failed login attempt");
        return Err(invalid_credentials());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;

    let access_token = generate_access_token(user.id, &role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, role = %role, "User logged in");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: user_info(user, role),
    }))
}

/// GET /api/v1/auth/me
///
/// Return the authenticated user's account and profile.
pub async fn me(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<Json<UserInfo>> {
    let user = load_active_user(&state, &auth_user).await?;
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(Json(user_info(user, role)))
}

/// POST /api/v1/auth/change-password
///
/// Change the caller's own password. The current password must be supplied
/// and the new one confirmed.
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    check_new_password(&input)?;

    let user = load_active_user(&state, &auth_user).await?;

    let old_valid = verify_password(&input.old_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !old_valid {
        tracing::info!(user_id = user.id, "Password change with wrong old password");
        return Err(AppError::Core(CoreError::Validation(
            "A senha antiga está incorreta.".into(),
        )));
    }

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &hashed).await?;

    tracing::info!(user_id = user.id, "Password changed");
    Ok(Json(MessageResponse {
        message: "Senha alterada com sucesso.".into(),
    }))
}

/// GET /api/v1/auth/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<ProfileInfo>> {
    let user = load_active_user(&state, &auth_user).await?;
    Ok(Json(ProfileInfo::from(&user)))
}

/// PUT /api/v1/auth/profile
///
/// Multipart replace of the caller's profile. `nome` is optional and keeps
/// the current name when absent. A `profile_picture` replaces the stored
/// picture; leaving it out removes the picture. Replaced files are deleted.
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ProfileInfo>> {
    let mut name: Option<String> = None;
    let mut picture: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            FIELD_NAME => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                name = Some(text);
            }
            FIELD_PICTURE => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // An empty file input means "no picture".
                picture = (!data.is_empty()).then(|| data.to_vec());
            }
            _ => {}
        }
    }

    if let Some(name) = &name {
        validate_display_name(name)?;
    }

    let user = load_active_user(&state, &auth_user).await?;
    let display_name = name
        .map(|n| n.trim().to_string())
        .unwrap_or_else(|| user.display_name.clone());

    let stored_path = match &picture {
        Some(data) => Some(
            state
                .image_store
                .store(CATEGORY_PROFILE_PICTURES, data)
                .await?
                .path,
        ),
        None => None,
    };

    let updated =
        match UserRepo::update_profile(&state.pool, user.id, &display_name, stored_path.as_deref())
            .await
        {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                remove_picture(&state, stored_path.as_deref()).await;
                return Err(user_gone());
            }
            Err(e) => {
                remove_picture(&state, stored_path.as_deref()).await;
                return Err(e.into());
            }
        };

    if user.profile_picture_path != updated.profile_picture_path {
        remove_picture(&state, user.profile_picture_path.as_deref()).await;
    }

    tracing::info!(
        user_id = updated.id,
        has_picture = updated.profile_picture_path.is_some(),
        "Profile updated"
    );
    Ok(Json(ProfileInfo::from(&updated)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn user_gone() -> AppError {
    AppError::Core(CoreError::Unauthorized("User no longer exists".into()))
}

/// Load the caller's row, treating deactivated users as gone.
async fn load_active_user(state: &AppState, auth_user: &AuthUser) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(user_gone)
}

/// Remove a stored picture, logging instead of failing.
async fn remove_picture(state: &AppState, path: Option<&str>) {
    let Some(path) = path else {
        return;
    };
    if let Err(e) = state.image_store.remove(path).await {
        tracing::warn!(path, error = %e, "Failed to remove profile picture");
    }
}

/// New and confirmed passwords must match and meet the minimum length.
fn check_new_password(input: &ChangePasswordRequest) -> AppResult<()> {
    if input.new_password != input.confirm_new_password {
        return Err(AppError::Core(CoreError::Validation(
            "As novas senhas não coincidem.".into(),
        )));
    }
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))
}

fn validate_display_name(name: &str) -> AppResult<()> {
    if name.trim().chars().count() > MAX_DISPLAY_NAME_LENGTH {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Name must be at most {MAX_DISPLAY_NAME_LENGTH} characters"
        ))));
    }
    Ok(())
}
