use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::auth::{hash_password, issue_token, verify_password};
use crate::db::{self, models::NewUser, queries};
use crate::error::AppError;
use crate::handlers::AppJson;
use crate::validation::{validate_birthdate, validate_email};

#[derive(Debug, Deserialize)]
pub struct SignUpPayload {
    pub name: Option<String>,
    pub birthdate: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn sign_up(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignUpPayload>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload.name.as_deref().unwrap_or("").trim().to_string();
    // birthdate is not trimmed; padding fails the shape check.
    let birthdate_raw = payload.birthdate.as_deref().unwrap_or("");
    let address = payload.address.as_deref().unwrap_or("").trim().to_string();
    let email = payload.email.as_deref().unwrap_or("").trim().to_string();
    let password = payload.password.as_deref().unwrap_or("").trim().to_string();

    if name.is_empty()
        || birthdate_raw.is_empty()
        || address.is_empty()
        || email.is_empty()
        || password.is_empty()
    {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    validate_email(&email)?;
    let birthdate = validate_birthdate(birthdate_raw)?;

    if queries::get_user_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&password)?;

    // The pre-check above races with concurrent signups; the UNIQUE index
    // on email is the source of truth.
    let user = queries::insert_user(
        &state.db,
        &NewUser::new(name, birthdate, address, email, password_hash),
    )
    .await
    .map_err(|e| {
        if db::is_unique_violation(&e) {
            AppError::Conflict("User with this email already exists".to_string())
        } else {
            AppError::Database(e)
        }
    })?;

    tracing::info!(user_id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "data": user,
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload.email.as_deref().unwrap_or("").trim().to_string();
    let password = payload.password.as_deref().unwrap_or("").trim().to_string();

    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let user = queries::get_user_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    verify_password(&password, &user.password_hash)?;

    let token = issue_token(user.id, &user.email, &state.config.jwt_secret)?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "data": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
        },
    })))
}
