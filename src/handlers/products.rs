use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::AppState;
use crate::db::queries;
use crate::error::AppError;

pub async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products = queries::list_products(&state.db).await?;

    Ok(Json(json!({
        "message": "Products retrieved successfully",
        "data": products,
    })))
}
