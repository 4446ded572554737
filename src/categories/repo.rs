use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{Category, CategoryInput, DeleteOutcome};
use crate::db::{is_foreign_key_violation, PgStore};

/// Every method is scoped by `user_id`; a row owned by someone else is
/// indistinguishable from a missing one.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self, user_id: Uuid) -> anyhow::Result<Vec<Category>>;
    async fn get(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Category>>;
    async fn create(&self, user_id: Uuid, input: CategoryInput) -> anyhow::Result<Category>;
    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: CategoryInput,
    ) -> anyhow::Result<Option<Category>>;
    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<DeleteOutcome>;
}

#[async_trait]
impl CategoryRepository for PgStore {
    async fn list(&self, user_id: Uuid) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, description, created_at
            FROM categories
            WHERE user_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, description, created_at
            FROM categories
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create(&self, user_id: Uuid, input: CategoryInput) -> anyhow::Result<Category> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (user_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, description, created_at
            "#,
        )
        .bind(user_id)
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: CategoryInput,
    ) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
               SET name = $3, description = $4
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, description, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&input.name)
        .bind(&input.description)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<DeleteOutcome> {
        let res = sqlx::query(r#"DELETE FROM categories WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await;
        match res {
            Ok(r) if r.rows_affected() == 0 => Ok(DeleteOutcome::NotOwned),
            Ok(_) => Ok(DeleteOutcome::Deleted),
            Err(e) if is_foreign_key_violation(&e) => Ok(DeleteOutcome::InUse),
            Err(e) => Err(e.into()),
        }
    }
}
