use sqlx::SqlitePool;

// ============================================================================
// Schema Creation & Demo Seeding
// ============================================================================

const CREATE_CATEGORIES: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    icon        TEXT,
    sort_order  INTEGER NOT NULL DEFAULT 0
)
"#;

const CREATE_PRODUCTS: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    category_id INTEGER NOT NULL REFERENCES categories(id),
    name        TEXT NOT NULL,
    price       INTEGER NOT NULL CHECK (price >= 0),
    image_url   TEXT,
    is_active   INTEGER NOT NULL DEFAULT 1,
    sort_order  INTEGER NOT NULL DEFAULT 0
)
"#;

const CREATE_ORDERS: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    order_no     TEXT NOT NULL UNIQUE,
    total        INTEGER NOT NULL CHECK (total >= 0),
    payment_type TEXT NOT NULL,
    status       TEXT NOT NULL DEFAULT 'COMPLETED',
    created_at   TEXT NOT NULL,
    completed_at TEXT NOT NULL
)
"#;

// product_name is a snapshot taken at commit time so persisted orders
// stay stable when the catalog is edited later.
const CREATE_ORDER_ITEMS: &str = r#"
CREATE TABLE IF NOT EXISTS order_items (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    order_id     INTEGER NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    product_id   INTEGER NOT NULL,
    product_name TEXT NOT NULL,
    quantity     INTEGER NOT NULL CHECK (quantity > 0),
    unit_price   INTEGER NOT NULL CHECK (unit_price >= 0),
    subtotal     INTEGER NOT NULL CHECK (subtotal >= 0)
)
"#;

/// Create all tables. Idempotent.
pub async fn init(pool: &SqlitePool) -> sqlx::Result<()> {
    for statement in [
        CREATE_CATEGORIES,
        CREATE_PRODUCTS,
        CREATE_ORDERS,
        CREATE_ORDER_ITEMS,
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::debug!("schema initialized");
    Ok(())
}

/// Seed the demo catalog (cafe categories and products). No-op when the
/// catalog already has data.
pub async fn seed_demo_catalog(pool: &SqlitePool) -> sqlx::Result<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO categories (id, name, icon, sort_order) VALUES \
         (1, 'Coffee', 'coffee', 1), \
         (2, 'Drinks', 'cup', 2), \
         (3, 'Desserts', 'cake', 3), \
         (4, 'Bakery', 'bread', 4)",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO products (category_id, name, price, sort_order) VALUES \
         (1, 'Americano', 4500, 1), \
         (1, 'Cafe Latte', 5000, 2), \
         (1, 'Vanilla Latte', 5500, 3), \
         (1, 'Cappuccino', 5000, 4), \
         (1, 'Espresso', 3500, 5), \
         (1, 'Cold Brew', 5000, 6), \
         (2, 'Grapefruit Ade', 5500, 1), \
         (2, 'Lemonade', 5000, 2), \
         (2, 'Iced Tea', 4500, 3), \
         (2, 'Milk Tea', 5500, 4), \
         (3, 'Cheesecake', 6500, 1), \
         (3, 'Tiramisu', 7000, 2), \
         (3, 'Brownie', 5500, 3), \
         (4, 'Croissant', 4000, 1), \
         (4, 'Bagel', 3500, 2), \
         (4, 'Muffin', 4500, 3), \
         (4, 'Scone', 4000, 4)",
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!("demo catalog seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::connect_in_memory;

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let pool = connect_in_memory().await.unwrap();
        init(&pool).await.unwrap();
        init(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_seed_runs_once() {
        let pool = connect_in_memory().await.unwrap();
        init(&pool).await.unwrap();

        seed_demo_catalog(&pool).await.unwrap();
        seed_demo_catalog(&pool).await.unwrap();

        let categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(categories, 4);
    }
}
