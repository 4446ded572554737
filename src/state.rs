use crate::auth::{jwt::JwtKeys, repo::UserRepository};
use crate::categories::repo::CategoryRepository;
use crate::config::AppConfig;
use crate::db::PgStore;
use crate::expenses::repo::ExpenseRepository;
use crate::incomes::repo::IncomeRepository;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub keys: JwtKeys,
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub expenses: Arc<dyn ExpenseRepository>,
    pub incomes: Arc<dyn IncomeRepository>,
}

impl AppState {
    pub fn from_pool(db: PgPool, config: &AppConfig) -> Self {
        let store = Arc::new(PgStore::new(db));
        Self {
            keys: JwtKeys::from_config(&config.jwt),
            users: store.clone(),
            categories: store.clone(),
            expenses: store.clone(),
            incomes: store,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::JwtConfig;
        use crate::test_support::MemoryStore;

        let jwt = JwtConfig {
            secret: "test".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 60,
        };

        let store = Arc::new(MemoryStore::default());
        Self {
            keys: JwtKeys::from_config(&jwt),
            users: store.clone(),
            categories: store.clone(),
            expenses: store.clone(),
            incomes: store,
        }
    }
}
