use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::db::{self, User};
use crate::server::{ApiError, AppState};
use crate::telemetry::REGISTRATION_CNTR;

#[derive(Deserialize)]
struct NewUser {
    username: String,
    password: String,
}

async fn register(
    State(pool): State<SqlitePool>,
    Json(new_user): Json<NewUser>,
) -> Result<Json<User>, ApiError> {
    if db::users::get_user_by_username(&pool, &new_user.username)
        .await?
        .is_some()
    {
        return Err(ApiError::UsernameTaken);
    }
    let user_id = db::users::create_user(&pool, &new_user.username, &new_user.password).await?;
    let user = db::users::get_user(&pool, user_id).await?;

    REGISTRATION_CNTR.inc();
    tracing::info!(user_id, username = %user.username, "registered user");
    Ok(Json(user))
}

pub fn users_router(state: AppState) -> Router {
    Router::new()
        .route("/register/", post(register))
        .with_state(state)
}
