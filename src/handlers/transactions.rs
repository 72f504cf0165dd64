use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::db::queries;
use crate::error::AppError;
use crate::handlers::AppJson;
use crate::middleware::AuthUser;
use crate::services::CheckoutService;
use crate::validation::{validate_non_negative, validate_positive_int};

#[derive(Debug, Deserialize)]
pub struct CheckoutPayload {
    pub cart_id: Option<i64>,
    pub admin_fee: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionFilter {
    pub search: Option<String>,
}

pub async fn checkout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<CheckoutPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(cart_id), Some(admin_fee)) = (payload.cart_id, payload.admin_fee) else {
        return Err(AppError::Validation(
            "Cart ID and admin fee are required".to_string(),
        ));
    };

    validate_positive_int("cart_id", cart_id)?;
    validate_non_negative("admin_fee", admin_fee)?;

    let service = CheckoutService::new(state.db.clone());
    let settled = service.checkout(user.id, cart_id, admin_fee).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Transaction created successfully",
            "data": {
                "transaction_id": settled.id,
                "cart_id": settled.cart_item_id,
                "subtotal": settled.subtotal,
                "admin_fee": settled.admin_fee,
                "total": settled.total,
                "created_at": settled.created_at,
            },
        })),
    ))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(filter): Query<TransactionFilter>,
) -> Result<impl IntoResponse, AppError> {
    // An empty search term means no filter, same as omitting it.
    let search = filter.search.as_deref().filter(|term| !term.is_empty());
    let transactions = queries::list_transactions(&state.db, user.id, search).await?;

    Ok(Json(json!({
        "message": "Transactions retrieved successfully",
        "data": transactions,
    })))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let transaction = queries::get_transaction(&state.db, transaction_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

    Ok(Json(json!({
        "message": "Transaction retrieved successfully",
        "data": transaction,
    })))
}
