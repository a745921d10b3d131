use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::meals::repo_types::{Meal, MealInput};

/// Meal persistence. Every lookup by id is scoped to `owner`: a meal belonging
/// to someone else is indistinguishable from a missing one.
#[async_trait]
pub trait MealRepo: Send + Sync {
    async fn insert(&self, owner: Uuid, input: &MealInput) -> anyhow::Result<Meal>;
    async fn find(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Meal>>;
    /// Returns `None` when no such meal exists; nothing is written then.
    async fn update(&self, owner: Uuid, id: Uuid, input: &MealInput) -> anyhow::Result<Option<Meal>>;
    /// Returns whether a meal was removed.
    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool>;
    /// All of the owner's meals, newest `date` first.
    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Meal>>;
}

#[derive(Clone)]
pub struct PgMealRepo {
    db: PgPool,
}

impl PgMealRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealRepo for PgMealRepo {
    async fn insert(&self, owner: Uuid, input: &MealInput) -> anyhow::Result<Meal> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals (id, owner, name, description, on_diet, date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner, name, description, on_diet, date, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.on_diet)
        .bind(input.date)
        .fetch_one(&self.db)
        .await
        .context("insert meal")?;
        Ok(meal)
    }

    async fn find(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, owner, name, description, on_diet, date, created_at, updated_at
            FROM meals
            WHERE id = $1 AND owner = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await
        .context("find meal")?;
        Ok(meal)
    }

    async fn update(&self, owner: Uuid, id: Uuid, input: &MealInput) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            UPDATE meals
               SET name = $3, description = $4, on_diet = $5, date = $6, updated_at = now()
             WHERE id = $1 AND owner = $2
            RETURNING id, owner, name, description, on_diet, date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.on_diet)
        .bind(input.date)
        .fetch_optional(&self.db)
        .await
        .context("update meal")?;
        Ok(meal)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM meals WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await
            .context("delete meal")?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, owner, name, description, on_diet, date, created_at, updated_at
            FROM meals
            WHERE owner = $1
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.db)
        .await
        .context("list meals by owner")?;
        Ok(rows)
    }
}
