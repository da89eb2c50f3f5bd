//! Account profile routes.

use axum::{extract::State, Json};
use medimart_core::{validate, Envelope};
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    middleware::RequireAuth,
    models::UserProfile,
    state::AppState,
};

/// Payload for updating profile fields.
#[derive(Debug, Deserialize, Default)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

/// Payload for changing the password.
///
/// No `Debug` derive; both fields are passwords.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
}

/// Handle GET /api/account/profile requests.
pub async fn profile(RequireAuth(user): RequireAuth) -> Json<Envelope<UserProfile>> {
    Json(Envelope::ok(user.profile))
}

/// Handle PUT /api/account/profile requests.
///
/// Name is always validated; phone and address only when provided, since
/// a profile may legitimately leave them blank.
pub async fn update_profile(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<Envelope<UserProfile>>> {
    let mut problems = Vec::new();
    if let Err(err) = validate::name(&payload.name) {
        problems.push(err.to_string());
    }
    let phone = payload.phone.trim();
    if !phone.is_empty()
        && let Err(err) = validate::phone(phone)
    {
        problems.push(err.to_string());
    }
    let address = payload.address.trim();
    if !address.is_empty()
        && let Err(err) = validate::address(address)
    {
        problems.push(err.to_string());
    }
    if !problems.is_empty() {
        return Err(AppError::Validation(problems.join("; ")));
    }

    let envelope = state
        .session()
        .update_profile(
            payload.name.trim().to_owned(),
            phone.to_owned(),
            address.to_owned(),
        )
        .await;
    Ok(Json(envelope))
}

/// Handle POST /api/account/password requests.
pub async fn change_password(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Json(payload): Json<ChangePassword>,
) -> Result<Json<Envelope<()>>> {
    state
        .session()
        .change_password(&payload.current_password, &payload.new_password)
        .await?;
    Ok(Json(Envelope::ok(())))
}
