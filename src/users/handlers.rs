use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tracing::{error, info, instrument, warn};

use crate::error::{ApiError, ApiResult};
use crate::response::Envelope;
use crate::state::AppState;

use super::dto::{PublicUser, UserPayload};
use super::repo::is_unique_violation;
use super::repo_types::User;

// --- routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/validate", get(validate_credentials))
        .route("/users", get(list_users))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/users/:id", put(update_user).delete(delete_user))
}

// --- handlers ---

/// GET /validate — exact-match credential check against the stored record.
/// The full row, password included, goes back to the caller; that is the
/// contract this service preserves.
#[instrument(skip(state, headers))]
pub async fn validate_credentials(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Envelope<User>> {
    let username = header_value(&headers, "Username");
    let password = header_value(&headers, "Password");
    let (Some(username), Some(password)) = (username, password) else {
        return Err(ApiError::bad_request(
            "Username and Password headers are required",
        ));
    };

    match User::find_by_credentials(&state.db, username, password).await {
        Ok(Some(user)) => Ok(Envelope::data(StatusCode::OK, user)),
        Ok(None) => {
            warn!(username = %username, "credential check failed");
            Err(ApiError::unauthorized("Invalid credentials"))
        }
        Err(e) => {
            // Lookup errors are indistinguishable from a failed match at the
            // HTTP surface; the detail stays in the log.
            error!(error = %e, "credential lookup failed");
            Err(ApiError::unauthorized("Invalid credentials"))
        }
    }
}

/// GET /users — every account, minus passwords.
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Envelope<Vec<PublicUser>>> {
    let users = User::list_all(&state.db)
        .await
        .map_err(|e| internal(e, "Error fetching users"))?;

    let users = users.into_iter().map(PublicUser::from).collect();
    Ok(Envelope::data(StatusCode::OK, users))
}

/// POST /register — field validation, duplicate pre-check, insert. The
/// store's unique constraints back the pre-check up, so losing the race
/// still answers 409.
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> ApiResult<Envelope> {
    let new_user = match payload {
        Ok(Json(p)) => p,
        Err(rejection) => {
            warn!(error = %rejection, "rejected register body");
            return Err(ApiError::bad_request("Invalid input data"));
        }
    };
    new_user.validate().map_err(ApiError::bad_request)?;

    let exists =
        User::exists_by_username_or_email(&state.db, &new_user.username, &new_user.email)
            .await
            .map_err(|e| internal(e, "Error checking user existence"))?;
    if exists {
        return Err(ApiError::conflict("Username or Email already exists"));
    }

    match User::insert(&state.db, &new_user).await {
        Ok(()) => {
            info!(username = %new_user.username, "user registered");
            Ok(Envelope::message(
                StatusCode::CREATED,
                "User registered successfully",
            ))
        }
        Err(e) if is_unique_violation(&e) => {
            Err(ApiError::conflict("Username or Email already exists"))
        }
        Err(e) => Err(internal(e, "Error registering user")),
    }
}

/// PUT /users/:id — not-found check first, then email uniqueness against
/// other rows, then the write. Username is left alone.
#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> ApiResult<Envelope> {
    let Ok(Path(id)) = id else {
        return Err(ApiError::bad_request("Invalid user ID"));
    };
    let updated = match payload {
        Ok(Json(p)) => p,
        Err(rejection) => {
            warn!(error = %rejection, "rejected update body");
            return Err(ApiError::bad_request("Invalid input data"));
        }
    };
    updated.validate().map_err(ApiError::bad_request)?;

    match User::exists_by_id(&state.db, id).await {
        Ok(true) => {}
        Ok(false) => return Err(ApiError::not_found("User not found")),
        Err(e) => {
            // A failing id check reads as not-found at the HTTP surface.
            error!(error = %e, id, "id existence check failed");
            return Err(ApiError::not_found("User not found"));
        }
    }

    let taken = User::email_taken_by_another(&state.db, &updated.email, id)
        .await
        .map_err(|e| internal(e, "Error checking email existence"))?;
    if taken {
        return Err(ApiError::conflict("Email already exists"));
    }

    match User::update(&state.db, id, &updated).await {
        Ok(()) => Ok(Envelope::message(StatusCode::OK, "User updated successfully")),
        Err(e) if is_unique_violation(&e) => Err(ApiError::conflict("Email already exists")),
        Err(e) => Err(internal(e, "Error updating user")),
    }
}

/// DELETE /users/:id — deleting an id that is already gone still succeeds.
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Envelope> {
    let Ok(Path(id)) = id else {
        return Err(ApiError::bad_request("Invalid user ID"));
    };

    User::delete_by_id(&state.db, id)
        .await
        .map_err(|e| internal(e, "Error deleting user"))?;

    Ok(Envelope::message(StatusCode::OK, "User deleted successfully"))
}

// --- helpers ---

fn header_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}

/// Log the real failure, hand the client the static message.
fn internal(err: anyhow::Error, message: &str) -> ApiError {
    error!(error = %err, "{message}");
    ApiError::internal(message)
}
