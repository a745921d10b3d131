use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::{
    error::AppError,
    meals::{
        dto::{parse_meal_body, MealListResponse, MealResponse},
        services::{compute_metrics, MealMetrics},
    },
    state::AppState,
    users::extractors::SessionUser,
    validation::parse_id,
};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/metrics", get(get_metrics))
        .route(
            "/meals/:id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1]), AppError> {
    let input = parse_meal_body(body)?;
    let meal = state.meals.insert(user.id, &input).await?;
    info!(meal_id = %meal.id, "meal created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/meals/{}", meal.id))],
    ))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn update_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    let input = parse_meal_body(body)?;
    match state.meals.update(user.id, id, &input).await? {
        Some(_) => {
            info!(meal_id = %id, "meal updated");
            Ok(StatusCode::NO_CONTENT)
        }
        None => {
            warn!(meal_id = %id, "update of unknown meal");
            Err(AppError::NotFound)
        }
    }
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    if !state.meals.delete(user.id, id).await? {
        warn!(meal_id = %id, "delete of unknown meal");
        return Err(AppError::NotFound);
    }
    info!(meal_id = %id, "meal deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_meals(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> Result<Json<MealListResponse>, AppError> {
    let meals = state.meals.list_by_owner(user.id).await?;
    Ok(Json(MealListResponse { meals }))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<String>,
) -> Result<Json<MealResponse>, AppError> {
    let id = parse_id(&id)?;
    let meal = state.meals.find(user.id, id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(MealResponse { meal }))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_metrics(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> Result<Json<MealMetrics>, AppError> {
    let meals = state.meals.list_by_owner(user.id).await?;
    Ok(Json(compute_metrics(&meals)))
}
