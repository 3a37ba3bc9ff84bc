use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

// ============================================================================
// Catalog Source - Read-Only Category/Product Data
// ============================================================================
//
// The catalog is an external collaborator to the order pipeline: the core
// only ever reads it. Management (CRUD) lives in back-office tooling and
// is deliberately absent here.
//
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub icon: Option<String>,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub price: i64,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub sort_order: i64,
}

/// Read interface the order pipeline consumes.
#[async_trait]
pub trait CatalogSource {
    async fn list_categories(&self) -> sqlx::Result<Vec<Category>>;

    /// Active products, ordered by `(category_id, sort_order)` when
    /// unfiltered and by `sort_order` alone when filtered to a category.
    async fn list_products(&self, category_id: Option<i64>) -> sqlx::Result<Vec<Product>>;

    /// Product by id regardless of active flag, or `None`.
    async fn get_product(&self, id: i64) -> sqlx::Result<Option<Product>>;
}

pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

type ProductRow = (i64, i64, String, i64, Option<String>, bool, i64);

fn product_from_row(row: ProductRow) -> Product {
    let (id, category_id, name, price, image_url, is_active, sort_order) = row;
    Product {
        id,
        category_id,
        name,
        price,
        image_url,
        is_active,
        sort_order,
    }
}

#[async_trait]
impl CatalogSource for SqliteCatalog {
    async fn list_categories(&self) -> sqlx::Result<Vec<Category>> {
        let rows: Vec<(i64, String, Option<String>, i64)> = sqlx::query_as(
            "SELECT id, name, icon, sort_order FROM categories ORDER BY sort_order",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, icon, sort_order)| Category {
                id,
                name,
                icon,
                sort_order,
            })
            .collect())
    }

    async fn list_products(&self, category_id: Option<i64>) -> sqlx::Result<Vec<Product>> {
        let rows: Vec<ProductRow> = match category_id {
            Some(category_id) => {
                sqlx::query_as(
                    "SELECT id, category_id, name, price, image_url, is_active, sort_order \
                     FROM products WHERE category_id = ?1 AND is_active = 1 \
                     ORDER BY sort_order",
                )
                .bind(category_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT id, category_id, name, price, image_url, is_active, sort_order \
                     FROM products WHERE is_active = 1 \
                     ORDER BY category_id, sort_order",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(product_from_row).collect())
    }

    async fn get_product(&self, id: i64) -> sqlx::Result<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(
            "SELECT id, category_id, name, price, image_url, is_active, sort_order \
             FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(product_from_row))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
