use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{ListQuery, UpdateStatusRequest, UpdateStatusResponse},
    repo_types::{Application, NewApplication},
    services,
};
use crate::{
    auth::{dto::MessageResponse, extractors::AuthUser},
    error::AppError,
    extract::JsonBody,
    state::AppState,
};

pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route("/applications", post(submit_application).get(list_applications))
        .route("/applications/:id/status", put(update_status))
        .route("/export", get(export_csv))
}

#[instrument(skip(state, body))]
pub async fn submit_application(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(body): JsonBody<NewApplication>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    services::submit(state.applications.as_ref(), body).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Application submitted successfully",
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_applications(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Application>>, AppError> {
    let filter = services::parse_status_filter(q.status.as_deref())?;
    let apps = services::list(state.applications.as_ref(), filter).await?;
    Ok(Json(apps))
}

#[instrument(skip(state, body))]
pub async fn update_status(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>, AppError> {
    let status = services::parse_status(&body.status)?;
    let updated = services::update_status(state.applications.as_ref(), &id, status).await?;
    Ok(Json(UpdateStatusResponse {
        message: "Status updated successfully",
        updated,
    }))
}

#[instrument(skip(state))]
pub async fn export_csv(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let csv = services::export_csv(state.applications.as_ref()).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"applications.csv\"",
            ),
        ],
        csv,
    ))
}
