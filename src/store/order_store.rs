use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;

use crate::domain::order::{LineItem, Order, OrderStatus, PaymentType};

// ============================================================================
// Order Store - Durable Record of Completed Orders
// ============================================================================
//
// Owns order-number allocation and the atomic commit of an order header
// plus its line items. Orders are append-only: there is no update or
// delete path here.
//
// ============================================================================

pub struct OrderStore {
    pool: SqlitePool,
}

impl OrderStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Allocate the next order number for the calendar day of
    /// `reference_date`: `YYYYMMDD-SSSS`, 1-based, zero-padded.
    ///
    /// Read-then-derive: the sequence is the count of existing orders for
    /// the day plus one. Two checkouts racing between this read and their
    /// commits could derive the same number; the single-writer till model
    /// rules that out, and the UNIQUE constraint on `order_no` turns a
    /// lost race into a failed commit rather than a silent duplicate.
    pub async fn generate_order_no(&self, reference_date: NaiveDate) -> sqlx::Result<String> {
        let prefix = reference_date.format("%Y%m%d").to_string();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE order_no LIKE ?1")
            .bind(format!("{prefix}%"))
            .fetch_one(&self.pool)
            .await?;

        Ok(format!("{prefix}-{:04}", count + 1))
    }

    /// Persist the order header and every line item as one transaction.
    ///
    /// Any failure rolls the whole unit back (the transaction guard rolls
    /// back on drop), leaving zero rows for the order. Returns the
    /// store-assigned id.
    pub async fn commit(&self, order: &Order) -> sqlx::Result<i64> {
        let mut tx = self.pool.begin().await?;

        let order_id: i64 = sqlx::query_scalar(
            "INSERT INTO orders (order_no, total, payment_type, status, created_at, completed_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id",
        )
        .bind(&order.order_no)
        .bind(order.total)
        .bind(order.payment_type.as_str())
        .bind(order.status.as_str())
        .bind(order.created_at)
        .bind(order.completed_at)
        .fetch_one(&mut *tx)
        .await?;

        for item in &order.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, product_name, quantity, unit_price, subtotal) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.subtotal)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            order_no = %order.order_no,
            order_id,
            item_count = order.items.len(),
            total = order.total,
            "order committed"
        );

        Ok(order_id)
    }

    /// All orders created on `date` (local calendar day), line items
    /// eagerly loaded, newest-created-first.
    pub async fn find_by_date(&self, date: NaiveDate) -> sqlx::Result<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            "SELECT id, order_no, total, payment_type, status, created_at, completed_at \
             FROM orders WHERE date(created_at) = ?1 \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let mut order = decode_order(row)?;
            order.items = self.load_items(order.id).await?;
            orders.push(order);
        }

        Ok(orders)
    }

    /// Single order header by id, or `None`. Line items are not hydrated;
    /// `items` is left empty.
    pub async fn find_by_id(&self, id: i64) -> sqlx::Result<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(
            "SELECT id, order_no, total, payment_type, status, created_at, completed_at \
             FROM orders WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(decode_order).transpose()
    }

    async fn load_items(&self, order_id: i64) -> sqlx::Result<Vec<LineItem>> {
        let rows: Vec<(i64, String, i64, i64, i64)> = sqlx::query_as(
            "SELECT product_id, product_name, quantity, unit_price, subtotal \
             FROM order_items WHERE order_id = ?1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(product_id, product_name, quantity, unit_price, subtotal)| LineItem {
                    product_id,
                    product_name,
                    quantity,
                    unit_price,
                    subtotal,
                },
            )
            .collect())
    }
}

type OrderRow = (i64, String, i64, String, String, NaiveDateTime, NaiveDateTime);

fn decode_order(row: OrderRow) -> sqlx::Result<Order> {
    let (id, order_no, total, payment_type, status, created_at, completed_at) = row;

    Ok(Order {
        id,
        order_no,
        total,
        payment_type: PaymentType::from_str(&payment_type)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        status: OrderStatus::from_str(&status).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        created_at,
        completed_at,
        items: Vec::new(),
    })
}

// ============================================================================
// Unit Tests
// ============================================================================
