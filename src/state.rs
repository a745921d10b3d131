use crate::config::AppConfig;
use crate::meals::repo::{MealRepo, PgMealRepo};
use crate::users::repo::{PgUserRepo, UserRepo};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepo>,
    pub meals: Arc<dyn MealRepo>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn from_pool(db: PgPool, config: Arc<AppConfig>) -> Self {
        Self {
            users: Arc::new(PgUserRepo::new(db.clone())),
            meals: Arc::new(PgMealRepo::new(db)),
            config,
        }
    }

    #[cfg(test)]
    pub fn in_memory() -> (Self, Arc<crate::memory::MemoryStore>) {
        let store = Arc::new(crate::memory::MemoryStore::default());
        let config = Arc::new(AppConfig {
            database_url: "memory".into(),
            max_connections: 1,
            session: crate::config::SessionConfig::default(),
        });
        let state = Self {
            users: store.clone(),
            meals: store.clone(),
            config,
        };
        (state, store)
    }
}
