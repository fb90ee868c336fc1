//! Axum route handlers for the rendered plan.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};

use crate::errors::AppError;
use crate::extract::PathParam;
use crate::plan::{render_plan_markdown, PlanView};
use crate::state::AppState;

/// GET /api/v1/plan
pub async fn handle_get_plan(State(state): State<AppState>) -> Result<Json<PlanView>, AppError> {
    Ok(Json(state.wizard.plan().await?))
}

/// GET /api/v1/plan/markdown
pub async fn handle_plan_markdown(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let plan = state.wizard.plan().await?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        render_plan_markdown(&plan),
    ))
}

/// POST /api/v1/plan/weeks/:week/completion
pub async fn handle_toggle_completion(
    State(state): State<AppState>,
    PathParam(week): PathParam<u32>,
) -> Result<Json<PlanView>, AppError> {
    Ok(Json(state.wizard.toggle_week(week).await?))
}

/// POST /api/v1/plan/weeks/:week/expansion
pub async fn handle_toggle_expansion(
    State(state): State<AppState>,
    PathParam(week): PathParam<u32>,
) -> Result<Json<PlanView>, AppError> {
    Ok(Json(state.wizard.toggle_expanded(week).await?))
}
