pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::plan::handlers as plan;
use crate::state::AppState;
use crate::wizard::handlers as wizard;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Wizard flow
        .route(
            "/api/v1/wizard",
            get(wizard::handle_get_wizard).delete(wizard::handle_reset),
        )
        .route(
            "/api/v1/wizard/onboarding",
            post(wizard::handle_onboarding),
        )
        .route(
            "/api/v1/wizard/resume",
            post(wizard::handle_upload_resume).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/v1/wizard/profile",
            post(wizard::handle_analyze_profile),
        )
        .route("/api/v1/wizard/advice", post(wizard::handle_generate_advice))
        // Plan
        .route("/api/v1/plan", get(plan::handle_get_plan))
        .route("/api/v1/plan/markdown", get(plan::handle_plan_markdown))
        .route(
            "/api/v1/plan/weeks/:week/completion",
            post(plan::handle_toggle_completion),
        )
        .route(
            "/api/v1/plan/weeks/:week/expansion",
            post(plan::handle_toggle_expansion),
        )
        .with_state(state)
}
