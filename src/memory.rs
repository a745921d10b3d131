//! In-memory repositories backing router tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    meals::{
        repo::MealRepo,
        repo_types::{Meal, MealInput},
    },
    users::{
        repo::UserRepo,
        repo_types::{NewUser, User},
    },
};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    meals: Mutex<Vec<Meal>>, // insertion order
    meal_calls: AtomicUsize,
    last_tick: Mutex<Option<OffsetDateTime>>,
}

impl MemoryStore {
    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    /// Number of `MealRepo` calls made so far.
    pub fn meal_calls(&self) -> usize {
        self.meal_calls.load(Ordering::SeqCst)
    }

    /// Wall clock that never repeats, so every write gets a distinct timestamp.
    fn tick(&self) -> OffsetDateTime {
        let mut last = self.last_tick.lock().unwrap();
        let now = OffsetDateTime::now_utc();
        let next = match *last {
            Some(prev) if now <= prev => prev + Duration::microseconds(1),
            _ => now,
        };
        *last = Some(next);
        next
    }

    fn touch_meals(&self) -> std::sync::MutexGuard<'_, Vec<Meal>> {
        self.meal_calls.fetch_add(1, Ordering::SeqCst);
        self.meals.lock().unwrap()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_session(&self, session_id: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.session_id.as_deref() == Some(session_id))
            .cloned())
    }

    async fn create(&self, new: NewUser) -> anyhow::Result<User> {
        let mut users = self.users.lock().unwrap();
        anyhow::ensure!(
            !users.iter().any(|u| u.email == new.email),
            "duplicate email"
        );
        anyhow::ensure!(
            !users
                .iter()
                .any(|u| u.session_id.as_deref() == Some(new.session_id.as_str())),
            "duplicate session"
        );
        let now = self.tick();
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            username: new.username,
            session_id: Some(new.session_id),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl MealRepo for MemoryStore {
    async fn insert(&self, owner: Uuid, input: &MealInput) -> anyhow::Result<Meal> {
        let mut meals = self.touch_meals();
        let now = self.tick();
        let meal = Meal {
            id: Uuid::new_v4(),
            owner,
            name: input.name.clone(),
            description: input.description.clone(),
            on_diet: input.on_diet,
            date: input.date,
            created_at: now,
            updated_at: now,
        };
        meals.push(meal.clone());
        Ok(meal)
    }

    async fn find(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let meals = self.touch_meals();
        Ok(meals
            .iter()
            .find(|m| m.id == id && m.owner == owner)
            .cloned())
    }

    async fn update(&self, owner: Uuid, id: Uuid, input: &MealInput) -> anyhow::Result<Option<Meal>> {
        let mut meals = self.touch_meals();
        let Some(meal) = meals.iter_mut().find(|m| m.id == id && m.owner == owner) else {
            return Ok(None);
        };
        meal.name = input.name.clone();
        meal.description = input.description.clone();
        meal.on_diet = input.on_diet;
        meal.date = input.date;
        meal.updated_at = self.tick();
        Ok(Some(meal.clone()))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut meals = self.touch_meals();
        let before = meals.len();
        meals.retain(|m| !(m.id == id && m.owner == owner));
        Ok(meals.len() != before)
    }

    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Meal>> {
        let meals = self.touch_meals();
        // Newest insert first so equal dates tie-break like `created_at DESC`.
        let mut owned: Vec<Meal> = meals.iter().rev().filter(|m| m.owner == owner).cloned().collect();
        owned.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(owned)
    }
}
