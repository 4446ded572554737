//! In-memory repositories for router and service tests. Ownership scoping
//! and referential checks mirror the SQL in the `repo.rs` files.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{
        repo::UserRepository,
        repo_types::{NewUser, User},
    },
    categories::{
        repo::CategoryRepository,
        repo_types::{Category, CategoryInput, DeleteOutcome},
    },
    expenses::{
        repo::ExpenseRepository,
        repo_types::{Expense, ExpenseInput},
    },
    incomes::{
        repo::IncomeRepository,
        repo_types::{Income, IncomeInput},
    },
    summary::engine::DateRange,
};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<Uuid, User>>,
    categories: Mutex<HashMap<Uuid, Category>>,
    expenses: Mutex<HashMap<Uuid, Expense>>,
    incomes: Mutex<HashMap<Uuid, Income>>,
}

impl MemoryStore {
    fn owned_category(&self, user_id: Uuid, id: Uuid) -> Option<Category> {
        let categories = self.categories.lock().unwrap();
        categories
            .get(&id)
            .filter(|c| c.user_id == user_id)
            .cloned()
    }

    fn with_category_name(&self, mut e: Expense) -> Expense {
        e.category_name = self
            .categories
            .lock()
            .unwrap()
            .get(&e.category_id)
            .map(|c| c.name.clone());
        e
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Ok(None);
        }
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(created.id, created.clone());
        Ok(Some(created))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> anyhow::Result<bool> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&id) {
            Some(u) => {
                u.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn list(&self, user_id: Uuid) -> anyhow::Result<Vec<Category>> {
        let mut rows: Vec<Category> = self
            .categories
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Category>> {
        Ok(self.owned_category(user_id, id))
    }

    async fn create(&self, user_id: Uuid, input: CategoryInput) -> anyhow::Result<Category> {
        let category = Category {
            id: Uuid::new_v4(),
            user_id,
            name: input.name,
            description: input.description,
            created_at: OffsetDateTime::now_utc(),
        };
        self.categories
            .lock()
            .unwrap()
            .insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: CategoryInput,
    ) -> anyhow::Result<Option<Category>> {
        let mut categories = self.categories.lock().unwrap();
        let Some(c) = categories.get_mut(&id).filter(|c| c.user_id == user_id) else {
            return Ok(None);
        };
        c.name = input.name;
        c.description = input.description;
        Ok(Some(c.clone()))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<DeleteOutcome> {
        if self.owned_category(user_id, id).is_none() {
            return Ok(DeleteOutcome::NotOwned);
        }
        let in_use = self
            .expenses
            .lock()
            .unwrap()
            .values()
            .any(|e| e.category_id == id);
        if in_use {
            return Ok(DeleteOutcome::InUse);
        }
        self.categories.lock().unwrap().remove(&id);
        Ok(DeleteOutcome::Deleted)
    }
}

#[async_trait]
impl ExpenseRepository for MemoryStore {
    async fn list(&self, user_id: Uuid, range: Option<DateRange>) -> anyhow::Result<Vec<Expense>> {
        let mut rows: Vec<Expense> = self
            .expenses
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.user_id == user_id)
            .filter(|e| range.map_or(true, |r| e.schedule.is_active_in(&r)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            let day = |e: &Expense| e.schedule.columns().0.or(e.schedule.columns().1);
            day(b).cmp(&day(a)).then(b.created_at.cmp(&a.created_at))
        });
        Ok(rows
            .into_iter()
            .map(|e| self.with_category_name(e))
            .collect())
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Expense>> {
        let found = self
            .expenses
            .lock()
            .unwrap()
            .get(&id)
            .filter(|e| e.user_id == user_id)
            .cloned();
        Ok(found.map(|e| self.with_category_name(e)))
    }

    async fn create(&self, user_id: Uuid, input: ExpenseInput) -> anyhow::Result<Option<Expense>> {
        if self.owned_category(user_id, input.category_id).is_none() {
            return Ok(None);
        }
        let expense = Expense {
            id: Uuid::new_v4(),
            user_id,
            category_id: input.category_id,
            category_name: None,
            title: input.title,
            amount: input.amount,
            schedule: input.schedule,
            description: input.description,
            receipt: input.receipt,
            created_at: OffsetDateTime::now_utc(),
        };
        self.expenses
            .lock()
            .unwrap()
            .insert(expense.id, expense.clone());
        Ok(Some(self.with_category_name(expense)))
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: ExpenseInput,
    ) -> anyhow::Result<Option<Expense>> {
        if self.owned_category(user_id, input.category_id).is_none() {
            return Ok(None);
        }
        let updated = {
            let mut expenses = self.expenses.lock().unwrap();
            let Some(e) = expenses.get_mut(&id).filter(|e| e.user_id == user_id) else {
                return Ok(None);
            };
            e.category_id = input.category_id;
            e.title = input.title;
            e.amount = input.amount;
            e.schedule = input.schedule;
            e.description = input.description;
            e.receipt = input.receipt;
            e.clone()
        };
        Ok(Some(self.with_category_name(updated)))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut expenses = self.expenses.lock().unwrap();
        if expenses.get(&id).is_some_and(|e| e.user_id == user_id) {
            expenses.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}

#[async_trait]
impl IncomeRepository for MemoryStore {
    async fn list(&self, user_id: Uuid, range: Option<DateRange>) -> anyhow::Result<Vec<Income>> {
        let mut rows: Vec<Income> = self
            .incomes
            .lock()
            .unwrap()
            .values()
            .filter(|i| i.user_id == user_id)
            .filter(|i| range.map_or(true, |r| r.contains(i.date)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(rows)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Income>> {
        let incomes = self.incomes.lock().unwrap();
        Ok(incomes.get(&id).filter(|i| i.user_id == user_id).cloned())
    }

    async fn create(&self, user_id: Uuid, input: IncomeInput) -> anyhow::Result<Income> {
        let income = Income {
            id: Uuid::new_v4(),
            user_id,
            title: input.title,
            amount: input.amount,
            date: input.date,
            description: input.description,
            created_at: OffsetDateTime::now_utc(),
        };
        self.incomes
            .lock()
            .unwrap()
            .insert(income.id, income.clone());
        Ok(income)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: IncomeInput,
    ) -> anyhow::Result<Option<Income>> {
        let mut incomes = self.incomes.lock().unwrap();
        let Some(i) = incomes.get_mut(&id).filter(|i| i.user_id == user_id) else {
            return Ok(None);
        };
        i.title = input.title;
        i.amount = input.amount;
        i.date = input.date;
        i.description = input.description;
        Ok(Some(i.clone()))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut incomes = self.incomes.lock().unwrap();
        if incomes.get(&id).is_some_and(|i| i.user_id == user_id) {
            incomes.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}
