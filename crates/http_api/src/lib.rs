mod errors;
mod handlers;
mod middleware;
mod state;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

pub use errors::HttpError;
pub use state::HttpState;

pub fn router(state: HttpState) -> Router<()> {
    let api = Router::new()
        .route("/ad_weeks", post(handlers::ad_weeks))
        .route("/build", post(handlers::build))
        .route("/cohort_summary", post(handlers::cohort_summary))
        .route("/cohort_grid", post(handlers::cohort_grid))
        .route("/ingest", post(handlers::ingest))
        .route("/settings_get", post(handlers::settings_get))
        .route("/settings_put", post(handlers::settings_put));

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(axum_middleware::from_fn(middleware::trace_requests))
        .with_state(state)
}
