use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub birthdate: NaiveDate,
    pub address: String,
    pub email: String,
    /// Argon2 PHC string; never serialized into responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub birthdate: NaiveDate,
    pub address: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn new(
        name: String,
        birthdate: NaiveDate,
        address: String,
        email: String,
        password_hash: String,
    ) -> Self {
        Self {
            name,
            birthdate,
            address,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub qty: i64,
    pub created_at: DateTime<Utc>,
}

/// Cart row joined with its product, priced at the current catalog price.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CartItemDetail {
    pub id: i64,
    pub qty: i64,
    pub product_id: i64,
    pub name: String,
    pub image: String,
    pub price: f64,
    pub subtotal: f64,
}

/// Immutable settlement record. product_id and qty are frozen at checkout
/// time; the originating cart row no longer exists.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub cart_item_id: i64,
    pub product_id: i64,
    pub qty: i64,
    pub admin_fee: f64,
    pub subtotal: f64,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewTransaction {
    pub user_id: i64,
    pub cart_item_id: i64,
    pub product_id: i64,
    pub qty: i64,
    pub admin_fee: f64,
    pub subtotal: f64,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

impl NewTransaction {
    pub fn new(
        user_id: i64,
        cart_item_id: i64,
        product_id: i64,
        qty: i64,
        admin_fee: f64,
        subtotal: f64,
    ) -> Self {
        Self {
            user_id,
            cart_item_id,
            product_id,
            qty,
            admin_fee,
            subtotal,
            total: subtotal + admin_fee,
            created_at: Utc::now(),
        }
    }
}

/// Ledger row joined with the frozen product and the purchasing user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TransactionDetail {
    pub id: i64,
    pub user_id: i64,
    pub cart_item_id: i64,
    pub product_id: i64,
    pub qty: i64,
    pub admin_fee: f64,
    pub subtotal: f64,
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub product_name: String,
    pub price: f64,
    pub user_email: String,
    pub user_address: String,
}
