use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;
use sqlx::postgres::PgPoolOptions;

use crate::{
    applications::repo::{ApplicationRepo, PgApplicationRepo},
    auth::{
        jwt::JwtKeys,
        repo::{PgUserRepo, UserRepo},
    },
    config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub keys: JwtKeys,
    pub users: Arc<dyn UserRepo>,
    pub applications: Arc<dyn ApplicationRepo>,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl AppState {
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        Ok(Self::from_parts(
            config,
            Arc::new(PgUserRepo::new(db.clone())),
            Arc::new(PgApplicationRepo::new(db)),
        ))
    }

    pub fn from_parts(
        config: &AppConfig,
        users: Arc<dyn UserRepo>,
        applications: Arc<dyn ApplicationRepo>,
    ) -> Self {
        Self {
            keys: JwtKeys::from_config(&config.jwt),
            users,
            applications,
        }
    }
}
