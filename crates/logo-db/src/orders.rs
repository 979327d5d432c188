//! Repository for the `orders` table.

use crate::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use logo_core::{LogoError, LogoResult, NewOrder, Order, OrderStore};
use tracing::{debug, error, instrument};

const ORDER_COLUMNS: &str = "id, name, email, image_url, created_at";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    name: String,
    email: String,
    image_url: String,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.id,
            name: row.name,
            email: row.email,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

fn db_error(err: sqlx::Error) -> LogoError {
    error!(error = %err, "Database error");
    LogoError::Database(err.to_string())
}

/// Order store backed by a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteOrderStore {
    pool: DbPool,
}

impl SqliteOrderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl OrderStore for SqliteOrderStore {
    #[instrument(skip(self, order), fields(email = %order.email))]
    async fn insert(&self, order: NewOrder) -> LogoResult<Order> {
        let query = format!(
            "INSERT INTO orders (name, email, image_url, created_at) \
             VALUES (?, ?, ?, ?) RETURNING {ORDER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, OrderRow>(&query)
            .bind(&order.name)
            .bind(&order.email)
            .bind(&order.image_url)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        debug!(order_id = row.id, "Order stored");
        Ok(row.into())
    }

    async fn list(&self) -> LogoResult<Vec<Order>> {
        let query =
            format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC");

        let rows = sqlx::query_as::<_, OrderRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(Order::from).collect())
    }
}
