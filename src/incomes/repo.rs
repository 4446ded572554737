use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{Income, IncomeInput};
use crate::{db::PgStore, summary::engine::DateRange};

#[async_trait]
pub trait IncomeRepository: Send + Sync {
    /// Newest first, optionally restricted to dates inside `range`.
    async fn list(&self, user_id: Uuid, range: Option<DateRange>) -> anyhow::Result<Vec<Income>>;
    async fn get(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Income>>;
    async fn create(&self, user_id: Uuid, input: IncomeInput) -> anyhow::Result<Income>;
    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: IncomeInput,
    ) -> anyhow::Result<Option<Income>>;
    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

#[async_trait]
impl IncomeRepository for PgStore {
    async fn list(&self, user_id: Uuid, range: Option<DateRange>) -> anyhow::Result<Vec<Income>> {
        let rows = sqlx::query_as::<_, Income>(
            r#"
            SELECT id, user_id, title, amount, date, description, created_at
              FROM incomes
             WHERE user_id = $1
               AND ($2::date IS NULL OR date BETWEEN $2 AND $3)
             ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(range.map(|r| r.start()))
        .bind(range.map(|r| r.end()))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Income>> {
        let row = sqlx::query_as::<_, Income>(
            r#"
            SELECT id, user_id, title, amount, date, description, created_at
              FROM incomes
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create(&self, user_id: Uuid, input: IncomeInput) -> anyhow::Result<Income> {
        let row = sqlx::query_as::<_, Income>(
            r#"
            INSERT INTO incomes (user_id, title, amount, date, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, amount, date, description, created_at
            "#,
        )
        .bind(user_id)
        .bind(&input.title)
        .bind(input.amount)
        .bind(input.date)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: IncomeInput,
    ) -> anyhow::Result<Option<Income>> {
        let row = sqlx::query_as::<_, Income>(
            r#"
            UPDATE incomes
               SET title = $3, amount = $4, date = $5, description = $6
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, amount, date, description, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&input.title)
        .bind(input.amount)
        .bind(input.date)
        .bind(&input.description)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM incomes WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}
