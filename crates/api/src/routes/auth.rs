//! Registration, login, and profile routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use fintrack_core::auth::{
    Registration, hash_password, normalize_email, validate_new_password, verify_password,
};
use fintrack_db::{CreateUserInput, UserRepository, entities::users};
use fintrack_shared::auth::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
    UserInfo,
};
use serde_json::json;
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
};

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Auth routes that need a valid token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me))
        .route("/auth/profile", put(update_profile))
        .route("/auth/change-password", put(change_password))
}

fn user_info(user: users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        name: user.name,
        email: user.email,
        currency: user.currency,
    }
}

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid credentials")
}

/// POST /auth/register - Create an account and return a token.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let registration = Registration::new(
        &payload.name,
        &payload.email,
        &payload.password,
        payload.currency.as_deref(),
    )
    .map_err(ApiError::validation)?;

    let password_hash = hash_password(&registration.password)?;
    let user = UserRepository::new((*state.db).clone())
        .create(CreateUserInput {
            name: registration.name,
            email: registration.email,
            password_hash,
            currency: registration.currency,
        })
        .await?;

    let token = state.jwt_service.generate_token(user.id)?;
    info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new(
            token,
            state.jwt_service.token_expires_in(),
            user_info(user),
        )),
    ))
}

/// POST /auth/login - Exchange credentials for a token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Please provide email and password"));
    }

    let email = normalize_email(&payload.email);
    let Some(user) = UserRepository::new((*state.db).clone())
        .find_by_email(&email)
        .await?
    else {
        info!("Login attempt for unknown email");
        return Err(invalid_credentials());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt");
        return Err(invalid_credentials());
    }

    let token = state.jwt_service.generate_token(user.id)?;
    info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse::new(
        token,
        state.jwt_service.token_expires_in(),
        user_info(user),
    )))
}

/// GET /auth/me - The current user.
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    let user = UserRepository::new((*state.db).clone())
        .find_by_id(auth.user_id())
        .await?;

    Ok(Json(json!({ "success": true, "user": user_info(user) })))
}

/// PUT /auth/profile - Change name and/or display currency.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    let name = payload
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    let currency = payload
        .currency
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty());

    let user = UserRepository::new((*state.db).clone())
        .update_profile(auth.user_id(), name, currency)
        .await?;

    Ok(Json(json!({ "success": true, "user": user_info(user) })))
}

/// PUT /auth/change-password - Replace the password after checking the current one.
async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.current_password.is_empty() || payload.new_password.is_empty() {
        return Err(ApiError::validation(
            "Please provide current and new password",
        ));
    }
    validate_new_password(&payload.new_password)?;

    let users = UserRepository::new((*state.db).clone());
    let user = users.find_by_id(auth.user_id()).await?;
    if !verify_password(&payload.current_password, &user.password_hash)? {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    users
        .update_password(auth.user_id(), hash_password(&payload.new_password)?)
        .await?;
    info!(user_id = %user.id, "Password changed");

    Ok(Json(json!({
        "success": true,
        "message": "Password updated successfully"
    })))
}
