use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{error, info, instrument};

use crate::{
    auth::{
        dto::{CredentialsRequest, MessageResponse, TokenResponse},
        services,
    },
    error::AppError,
    extract::JsonBody,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CredentialsRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    services::register(state.users.as_ref(), &payload.username, &payload.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully",
        }),
    ))
}

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CredentialsRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user_id =
        services::verify_credentials(state.users.as_ref(), &payload.username, &payload.password)
            .await?;

    let token = state.keys.issue(user_id).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::Storage(e)
    })?;

    info!(%user_id, "user logged in");
    Ok(Json(TokenResponse { token }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::testing::{send, TestApp};

    #[tokio::test]
    async fn register_returns_created() {
        let app = TestApp::new();
        let (status, body) = send(
            &app.router,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"username": "erin", "password": "hunter2"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "User registered successfully");
    }

    #[tokio::test]
    async fn second_registration_is_a_duplicate() {
        let app = TestApp::new();
        let creds = json!({"username": "erin", "password": "hunter2"});
        send(&app.router, Method::POST, "/api/auth/register", None, Some(creds.clone())).await;
        let (status, body) =
            send(&app.router, Method::POST, "/api/auth/register", None, Some(creds)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Username already exists");
    }

    #[tokio::test]
    async fn login_returns_token() {
        let app = TestApp::new();
        let token = app.login("frank", "s3cret").await;
        assert!(!token.is_empty());
        assert!(app.state.keys.verify(&token).is_ok());
    }

    #[tokio::test]
    async fn login_failures_share_one_shape() {
        let app = TestApp::new();
        app.register("grace", "correct").await;

        let (wrong_status, wrong_body) = send(
            &app.router,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "grace", "password": "incorrect"})),
        )
        .await;
        let (unknown_status, unknown_body) = send(
            &app.router,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "heidi", "password": "correct"})),
        )
        .await;

        assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
        assert_eq!(wrong_status, unknown_status);
        assert_eq!(wrong_body, unknown_body);
        assert_eq!(wrong_body["error"], "Invalid username or password");
    }
}
