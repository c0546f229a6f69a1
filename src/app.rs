use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/fragments/activities", get(handlers::activities_fragment))
        .route("/signup", post(handlers::signup))
        .route("/unregister", post(handlers::unregister))
        .route("/refresh", post(handlers::refresh))
        .route("/api/view", get(handlers::get_view))
        .route("/api/activities", get(handlers::get_activities))
        .route("/api/status", get(handlers::get_status))
        .with_state(state)
}
