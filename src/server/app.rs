use askama::Template;
use askama_web::WebTemplate;
use axum::body::Body;
use axum::http::header;
use axum::response::Response;
use axum::{extract::FromRef, http::StatusCode, routing::get, Router};
use prometheus::{Encoder, TextEncoder};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::routes::{questions_router, users_router};
use crate::completion::DynCompletionClient;
use crate::settings::ApplicationSettings;

#[derive(FromRef, Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub completion: DynCompletionClient,
}

pub fn app(state: AppState, static_dir: PathBuf) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/metrics", get(metrics))
        .nest_service("/static", ServeDir::new(static_dir))
        .merge(users_router(state.clone()))
        .merge(questions_router(state))
        .fallback(|| async {
            tracing::info!("Fallback");
            StatusCode::NOT_FOUND
        })
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(
    settings: ApplicationSettings,
    pool: SqlitePool,
    completion: DynCompletionClient,
) -> anyhow::Result<()> {
    let addr = format!("{}:{}", settings.host, settings.port);
    let state = AppState { pool, completion };
    let router = app(state, settings.static_dir);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, router).await?;
    Ok(())
}

#[derive(Template, WebTemplate)]
#[template(path = "index.html", escape = "none")]
struct IndexPage;

async fn index() -> IndexPage {
    IndexPage {}
}

async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    encoder.encode(&metrics, &mut buf).unwrap();
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, encoder.format_type())
        .body(Body::from(buf))
        .unwrap()
}
