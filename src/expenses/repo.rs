use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{Expense, ExpenseInput, ExpenseRow};
use crate::{db::PgStore, summary::engine::DateRange};

/// Every method is scoped by `user_id`. Writes also require the referenced
/// category to belong to the same user.
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Newest first. With a range, only expenses active in it.
    async fn list(&self, user_id: Uuid, range: Option<DateRange>) -> anyhow::Result<Vec<Expense>>;
    async fn get(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Expense>>;
    /// `None` when the category is not the caller's.
    async fn create(&self, user_id: Uuid, input: ExpenseInput) -> anyhow::Result<Option<Expense>>;
    /// `None` when the expense or the category is not the caller's.
    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: ExpenseInput,
    ) -> anyhow::Result<Option<Expense>>;
    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

fn into_expenses(rows: Vec<ExpenseRow>) -> anyhow::Result<Vec<Expense>> {
    rows.into_iter().map(Expense::try_from).collect()
}

#[async_trait]
impl ExpenseRepository for PgStore {
    async fn list(&self, user_id: Uuid, range: Option<DateRange>) -> anyhow::Result<Vec<Expense>> {
        let rows = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT e.id, e.user_id, e.category_id, c.name AS category_name, e.title, e.amount,
                   e.kind, e.date, e.start_date, e.end_date, e.description, e.receipt, e.created_at
              FROM expenses e
              JOIN categories c ON c.id = e.category_id
             WHERE e.user_id = $1
               AND ($2::date IS NULL
                    OR (e.kind = 'one-time' AND e.date BETWEEN $2 AND $3)
                    OR (e.kind = 'recurring' AND e.start_date <= $3
                        AND (e.end_date IS NULL OR e.end_date >= $2)))
             ORDER BY COALESCE(e.date, e.start_date) DESC, e.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(range.map(|r| r.start()))
        .bind(range.map(|r| r.end()))
        .fetch_all(&self.db)
        .await?;
        into_expenses(rows)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Expense>> {
        let row = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT e.id, e.user_id, e.category_id, c.name AS category_name, e.title, e.amount,
                   e.kind, e.date, e.start_date, e.end_date, e.description, e.receipt, e.created_at
              FROM expenses e
              JOIN categories c ON c.id = e.category_id
             WHERE e.id = $1 AND e.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        row.map(Expense::try_from).transpose()
    }

    async fn create(&self, user_id: Uuid, input: ExpenseInput) -> anyhow::Result<Option<Expense>> {
        let (date, start_date, end_date) = input.schedule.columns();
        let row = sqlx::query_as::<_, ExpenseRow>(
            r#"
            WITH ins AS (
                INSERT INTO expenses (user_id, category_id, title, amount, kind,
                                      date, start_date, end_date, description, receipt)
                SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10
                 WHERE EXISTS (SELECT 1 FROM categories WHERE id = $2 AND user_id = $1)
                RETURNING *
            )
            SELECT ins.id, ins.user_id, ins.category_id, c.name AS category_name, ins.title,
                   ins.amount, ins.kind, ins.date, ins.start_date, ins.end_date,
                   ins.description, ins.receipt, ins.created_at
              FROM ins
              JOIN categories c ON c.id = ins.category_id
            "#,
        )
        .bind(user_id)
        .bind(input.category_id)
        .bind(&input.title)
        .bind(input.amount)
        .bind(input.schedule.kind())
        .bind(date)
        .bind(start_date)
        .bind(end_date)
        .bind(&input.description)
        .bind(&input.receipt)
        .fetch_optional(&self.db)
        .await?;
        row.map(Expense::try_from).transpose()
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: ExpenseInput,
    ) -> anyhow::Result<Option<Expense>> {
        let (date, start_date, end_date) = input.schedule.columns();
        let row = sqlx::query_as::<_, ExpenseRow>(
            r#"
            WITH upd AS (
                UPDATE expenses
                   SET category_id = $3, title = $4, amount = $5, kind = $6,
                       date = $7, start_date = $8, end_date = $9,
                       description = $10, receipt = $11
                 WHERE id = $1 AND user_id = $2
                   AND EXISTS (SELECT 1 FROM categories WHERE id = $3 AND user_id = $2)
                RETURNING *
            )
            SELECT upd.id, upd.user_id, upd.category_id, c.name AS category_name, upd.title,
                   upd.amount, upd.kind, upd.date, upd.start_date, upd.end_date,
                   upd.description, upd.receipt, upd.created_at
              FROM upd
              JOIN categories c ON c.id = upd.category_id
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(input.category_id)
        .bind(&input.title)
        .bind(input.amount)
        .bind(input.schedule.kind())
        .bind(date)
        .bind(start_date)
        .bind(end_date)
        .bind(&input.description)
        .bind(&input.receipt)
        .fetch_optional(&self.db)
        .await?;
        row.map(Expense::try_from).transpose()
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM expenses WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}
