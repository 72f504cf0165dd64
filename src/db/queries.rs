use chrono::{DateTime, Utc};
use sqlx::{Result, Sqlite, SqlitePool, Transaction as SqlxTransaction};

use crate::db::models::{
    CartItem, CartItemDetail, NewTransaction, NewUser, Product, Transaction, TransactionDetail,
    User,
};

// --- User Queries ---

pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn insert_user(pool: &SqlitePool, user: &NewUser) -> Result<User> {
    // A RETURNING row streams back before the statement's implicit write
    // transaction commits; the explicit commit below is awaited, so the row
    // is visible to other pooled connections once this returns.
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, birthdate, address, email, password_hash, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&user.name)
    .bind(user.birthdate)
    .bind(&user.address)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.created_at)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(inserted)
}

// --- Product Queries ---

pub async fn list_products(pool: &SqlitePool) -> Result<Vec<Product>> {
    sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn get_product(pool: &SqlitePool, id: i64) -> Result<Option<Product>> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

// --- Cart Queries ---

/// Adding a product already in the user's cart accumulates qty on the
/// existing row instead of creating a second one.
pub async fn upsert_cart_item(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    qty: i64,
    added_at: DateTime<Utc>,
) -> Result<CartItem> {
    // Same commit discipline as insert_user: the RETURNING row alone does
    // not mean the write has committed yet.
    let mut tx = pool.begin().await?;

    let item = sqlx::query_as::<_, CartItem>(
        r#"
        INSERT INTO cart_items (user_id, product_id, qty, created_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (user_id, product_id) DO UPDATE SET qty = qty + excluded.qty
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .bind(qty)
    .bind(added_at)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(item)
}

pub async fn list_cart_items(pool: &SqlitePool, user_id: i64) -> Result<Vec<CartItemDetail>> {
    sqlx::query_as::<_, CartItemDetail>(
        r#"
        SELECT c.id, c.qty, p.id AS product_id, p.name, p.image, p.price,
               c.qty * p.price AS subtotal
        FROM cart_items c
        JOIN products p ON c.product_id = p.id
        WHERE c.user_id = ?
        ORDER BY c.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Scoped to the owner: a row belonging to someone else counts as absent.
pub async fn update_cart_item_qty(
    pool: &SqlitePool,
    cart_item_id: i64,
    user_id: i64,
    qty: i64,
) -> Result<u64> {
    let result = sqlx::query("UPDATE cart_items SET qty = ? WHERE id = ? AND user_id = ?")
        .bind(qty)
        .bind(cart_item_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_cart_item_owned(
    pool: &SqlitePool,
    cart_item_id: i64,
    user_id: i64,
) -> Result<u64> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = ? AND user_id = ?")
        .bind(cart_item_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

// --- Checkout Queries (transaction-scoped) ---

pub async fn get_cart_item_owned(
    executor: &mut SqlxTransaction<'_, Sqlite>,
    cart_item_id: i64,
    user_id: i64,
) -> Result<Option<CartItem>> {
    sqlx::query_as::<_, CartItem>("SELECT * FROM cart_items WHERE id = ? AND user_id = ?")
        .bind(cart_item_id)
        .bind(user_id)
        .fetch_optional(&mut **executor)
        .await
}

pub async fn transaction_exists_for_cart_item(
    executor: &mut SqlxTransaction<'_, Sqlite>,
    cart_item_id: i64,
    user_id: i64,
) -> Result<bool> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM transactions WHERE cart_item_id = ? AND user_id = ?")
            .bind(cart_item_id)
            .bind(user_id)
            .fetch_optional(&mut **executor)
            .await?;

    Ok(row.is_some())
}

pub async fn get_cart_item_priced(
    executor: &mut SqlxTransaction<'_, Sqlite>,
    cart_item_id: i64,
) -> Result<Option<CartItemDetail>> {
    sqlx::query_as::<_, CartItemDetail>(
        r#"
        SELECT c.id, c.qty, p.id AS product_id, p.name, p.image, p.price,
               c.qty * p.price AS subtotal
        FROM cart_items c
        JOIN products p ON c.product_id = p.id
        WHERE c.id = ?
        "#,
    )
    .bind(cart_item_id)
    .fetch_optional(&mut **executor)
    .await
}

pub async fn insert_transaction(
    executor: &mut SqlxTransaction<'_, Sqlite>,
    tx: &NewTransaction,
) -> Result<Transaction> {
    sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (
            user_id, cart_item_id, product_id, qty,
            admin_fee, subtotal, total, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(tx.user_id)
    .bind(tx.cart_item_id)
    .bind(tx.product_id)
    .bind(tx.qty)
    .bind(tx.admin_fee)
    .bind(tx.subtotal)
    .bind(tx.total)
    .bind(tx.created_at)
    .fetch_one(&mut **executor)
    .await
}

pub async fn delete_cart_item(
    executor: &mut SqlxTransaction<'_, Sqlite>,
    cart_item_id: i64,
) -> Result<()> {
    sqlx::query("DELETE FROM cart_items WHERE id = ?")
        .bind(cart_item_id)
        .execute(&mut **executor)
        .await?;

    Ok(())
}

// --- Ledger Queries ---

/// Search matches a case-sensitive substring of the product name or the
/// exact transaction id. The term is always bound, never interpolated.
pub async fn list_transactions(
    pool: &SqlitePool,
    user_id: i64,
    search: Option<&str>,
) -> Result<Vec<TransactionDetail>> {
    match search {
        Some(term) => {
            sqlx::query_as::<_, TransactionDetail>(
                r#"
                SELECT t.id, t.user_id, t.cart_item_id, t.product_id, t.qty,
                       t.admin_fee, t.subtotal, t.total, t.created_at,
                       p.name AS product_name, p.price,
                       u.email AS user_email, u.address AS user_address
                FROM transactions t
                JOIN products p ON t.product_id = p.id
                JOIN users u ON t.user_id = u.id
                WHERE t.user_id = ?
                  AND (instr(p.name, ?) > 0 OR CAST(t.id AS TEXT) = ?)
                ORDER BY t.created_at DESC, t.id DESC
                "#,
            )
            .bind(user_id)
            .bind(term)
            .bind(term)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, TransactionDetail>(
                r#"
                SELECT t.id, t.user_id, t.cart_item_id, t.product_id, t.qty,
                       t.admin_fee, t.subtotal, t.total, t.created_at,
                       p.name AS product_name, p.price,
                       u.email AS user_email, u.address AS user_address
                FROM transactions t
                JOIN products p ON t.product_id = p.id
                JOIN users u ON t.user_id = u.id
                WHERE t.user_id = ?
                ORDER BY t.created_at DESC, t.id DESC
                "#,
            )
            .bind(user_id)
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn get_transaction(
    pool: &SqlitePool,
    transaction_id: i64,
) -> Result<Option<TransactionDetail>> {
    sqlx::query_as::<_, TransactionDetail>(
        r#"
        SELECT t.id, t.user_id, t.cart_item_id, t.product_id, t.qty,
               t.admin_fee, t.subtotal, t.total, t.created_at,
               p.name AS product_name, p.price,
               u.email AS user_email, u.address AS user_address
        FROM transactions t
        JOIN products p ON t.product_id = p.id
        JOIN users u ON t.user_id = u.id
        WHERE t.id = ?
        "#,
    )
    .bind(transaction_id)
    .fetch_optional(pool)
    .await
}
