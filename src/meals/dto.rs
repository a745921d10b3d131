use axum::{extract::rejection::JsonRejection, Json};
use serde::Serialize;
use serde_json::Value;

use crate::{error::AppError, meals::repo_types::{Meal, MealInput}, validation::Fields};

/// Parses the `{name, description, onDiet, date}` body shared by create and update.
pub fn parse_meal_body(body: Result<Json<Value>, JsonRejection>) -> Result<MealInput, AppError> {
    let mut fields = Fields::from_body(body)?;
    let name = fields.string("name");
    let description = fields.string("description");
    let on_diet = fields.boolean("onDiet");
    let date = fields.timestamp_ms("date");
    fields.finish()?;
    Ok(MealInput {
        name,
        description,
        on_diet,
        date,
    })
}

#[derive(Debug, Serialize)]
pub struct MealResponse {
    pub meal: Meal,
}

#[derive(Debug, Serialize)]
pub struct MealListResponse {
    pub meals: Vec<Meal>,
}
