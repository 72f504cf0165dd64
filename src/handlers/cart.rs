use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::db::queries;
use crate::error::AppError;
use crate::handlers::AppJson;
use crate::middleware::AuthUser;
use crate::validation::validate_positive_int;

#[derive(Debug, Deserialize)]
pub struct AddToCartPayload {
    pub product_id: Option<i64>,
    pub qty: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartPayload {
    pub qty: Option<i64>,
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<AddToCartPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(product_id), Some(qty)) = (payload.product_id, payload.qty) else {
        return Err(AppError::Validation(
            "Product ID and quantity are required".to_string(),
        ));
    };

    validate_positive_int("product_id", product_id)?;
    validate_positive_int("qty", qty)?;

    if queries::get_product(&state.db, product_id).await?.is_none() {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    let item = queries::upsert_cart_item(&state.db, user.id, product_id, qty, Utc::now()).await?;

    tracing::info!(user_id = user.id, product_id, qty = item.qty, "cart item added");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Product added to cart successfully",
            "data": {
                "product_id": product_id,
                "qty": qty,
                "user_id": user.id,
            },
        })),
    ))
}

pub async fn get_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let items = queries::list_cart_items(&state.db, user.id).await?;
    let total: f64 = items.iter().map(|item| item.subtotal).sum();

    Ok(Json(json!({
        "message": "Cart retrieved successfully",
        "data": {
            "items": items,
            "total": total,
        },
    })))
}

pub async fn update_cart_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(cart_item_id): Path<i64>,
    AppJson(payload): AppJson<UpdateCartPayload>,
) -> Result<impl IntoResponse, AppError> {
    let qty = payload
        .qty
        .ok_or_else(|| AppError::Validation("Quantity is required".to_string()))?;

    // The update is scoped to the caller, so someone else's cart item looks
    // exactly like a missing one.
    let updated = queries::update_cart_item_qty(&state.db, cart_item_id, user.id, qty).await?;
    if updated == 0 {
        return Err(AppError::NotFound("Cart item not found".to_string()));
    }

    Ok(Json(json!({
        "message": "Cart item updated successfully",
    })))
}

pub async fn delete_cart_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(cart_item_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = queries::delete_cart_item_owned(&state.db, cart_item_id, user.id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Cart item not found".to_string()));
    }

    Ok(Json(json!({
        "message": "Cart item deleted successfully",
    })))
}
