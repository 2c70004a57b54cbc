use std::sync::Arc;

use crate::{config::Config, utils::ids::IdGenerator};
use axum::extract::FromRef;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub ids: Arc<dyn IdGenerator>,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let ids = config.id_source.generator();
        Self { pool, config, ids }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn IdGenerator> {
    fn from_ref(state: &AppState) -> Self {
        state.ids.clone()
    }
}
