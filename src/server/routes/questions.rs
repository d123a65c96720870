use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::completion::DynCompletionClient;
use crate::db::{self, Question};
use crate::server::{ApiError, AppState};
use crate::telemetry::QUESTION_CNTR;

#[derive(Deserialize)]
struct AskRequest {
    user_id: i64,
    question: String,
}

#[derive(Serialize)]
struct AskResponse {
    question: String,
    answer: String,
}

/// The question row is inserted only after the completion call returned;
/// an upstream failure must leave no orphaned row behind.
async fn ask(
    State(pool): State<SqlitePool>,
    State(completion): State<DynCompletionClient>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    match db::users::get_user(&pool, req.user_id).await {
        Ok(_) => {}
        Err(sqlx::Error::RowNotFound) => return Err(ApiError::UnknownUser(req.user_id)),
        Err(error) => return Err(error.into()),
    }

    let answer = match completion.complete(&req.question).await {
        Ok(answer) => answer,
        Err(error) => {
            QUESTION_CNTR.with_label_values(&["upstream_error"]).inc();
            return Err(error.into());
        }
    };

    db::questions::create_question(&pool, req.user_id, &req.question, &answer).await?;
    QUESTION_CNTR.with_label_values(&["ok"]).inc();

    Ok(Json(AskResponse {
        question: req.question,
        answer,
    }))
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Question>>, ApiError> {
    let questions = db::questions::get_questions_for_user(&pool, user_id).await?;
    Ok(Json(questions))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/ask/", post(ask))
        .route("/questions/{user_id}", get(list_questions))
        .with_state(state)
}
