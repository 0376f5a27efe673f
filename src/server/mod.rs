//! Router assembly and the serve loop.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::routing::{delete, get};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::core::store::CampusStore;
use crate::resources::{course, enrollment, student};

/// Shared state handed to every handler.
///
/// The store is the only dependency; handlers hold no mutable state of
/// their own between requests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CampusStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn CampusStore>) -> Self {
        Self { store }
    }
}

/// Build the `/api` router over the given state.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/course",
            get(course::list_courses).post(course::create_course),
        )
        .route(
            "/api/course/{cid}",
            get(course::get_course)
                .put(course::update_course)
                .delete(course::delete_course),
        )
        .route(
            "/api/student",
            get(student::list_students).post(student::create_student),
        )
        .route(
            "/api/student/{sid}",
            get(student::get_student)
                .put(student::update_student)
                .delete(student::delete_student),
        )
        .route(
            "/api/student/{sid}/course",
            get(enrollment::list_for_student).post(enrollment::create),
        )
        .route(
            "/api/student/{sid}/course/{cid}",
            delete(enrollment::remove),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the listener and run the server until it exits.
pub async fn serve(config: &AppConfig, store: Arc<dyn CampusStore>) -> Result<()> {
    let app = api_router(AppState::new(store));
    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
