use sqlx::SqlitePool;

use crate::db::models::{NewTransaction, Transaction};
use crate::db::{self, queries};
use crate::error::AppError;

/// Turns a single cart item into an immutable transaction record.
pub struct CheckoutService {
    pool: SqlitePool,
}

impl CheckoutService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Settle one cart item: price it at the current catalog price, write
    /// the transaction record, and retire the cart row. Every step runs in
    /// one database transaction, so a failure anywhere rolls back the whole
    /// settlement and the cart item stays purchasable.
    ///
    /// The already-settled check comes before the cart lookup so that a
    /// repeat checkout of an item the caller already settled reports a
    /// conflict rather than a missing item. Items settled by other users
    /// fall through to the ownership-scoped lookup and read as not found.
    pub async fn checkout(
        &self,
        user_id: i64,
        cart_item_id: i64,
        admin_fee: f64,
    ) -> Result<Transaction, AppError> {
        let mut tx = self.pool.begin().await?;

        if queries::transaction_exists_for_cart_item(&mut tx, cart_item_id, user_id).await? {
            return Err(AppError::Conflict(
                "Cart has already been checked out".to_string(),
            ));
        }

        if queries::get_cart_item_owned(&mut tx, cart_item_id, user_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Cart item not found".to_string()));
        }

        let priced = queries::get_cart_item_priced(&mut tx, cart_item_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart details not found".to_string()))?;

        if priced.qty <= 0 {
            return Err(AppError::Validation(
                "Cart quantity must be positive".to_string(),
            ));
        }

        let record = NewTransaction::new(
            user_id,
            cart_item_id,
            priced.product_id,
            priced.qty,
            admin_fee,
            priced.subtotal,
        );

        // The UNIQUE index on cart_item_id is the real settlement guard;
        // two racing checkouts both pass the checks above, but only one
        // insert survives.
        let settled = queries::insert_transaction(&mut tx, &record)
            .await
            .map_err(|e| {
                if db::is_unique_violation(&e) {
                    AppError::Conflict("Cart has already been checked out".to_string())
                } else {
                    AppError::Database(e)
                }
            })?;

        queries::delete_cart_item(&mut tx, cart_item_id).await?;

        tx.commit().await?;

        tracing::info!(
            transaction_id = settled.id,
            cart_item_id,
            user_id,
            total = settled.total,
            "cart item settled"
        );

        Ok(settled)
    }
}
