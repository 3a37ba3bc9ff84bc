use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pos_core::store::{self, schema};
use pos_core::{Cart, CatalogSource, Checkout, OrderStore, Product, ReportAggregator, SqliteCatalog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging with environment-based filtering.
    // Override with RUST_LOG, e.g. RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pos_core=debug")),
        )
        .init();

    tracing::info!("starting POS core demo");

    // === 1. Open the till database ===
    // POS_DB points at a file-backed database; without it the demo runs
    // against an in-memory one.
    let pool = match std::env::var("POS_DB") {
        Ok(path) => {
            tracing::info!(path = %path, "opening till database");
            store::connect(&path).await?
        }
        Err(_) => store::connect_in_memory().await?,
    };

    schema::init(&pool).await?;
    schema::seed_demo_catalog(&pool).await?;

    // === 2. Wire the pipeline: one store, handed to checkout and reports ===
    let order_store = Arc::new(OrderStore::new(pool.clone()));
    let catalog = SqliteCatalog::new(pool);
    let mut checkout = Checkout::new(order_store.clone());
    let reports = ReportAggregator::new(order_store);

    for category in catalog.list_categories().await? {
        let products = catalog.list_products(Some(category.id)).await?;
        tracing::info!(
            category = %category.name,
            product_count = products.len(),
            "catalog loaded"
        );
    }

    // === 3. First order: two americanos and a latte, paid in cash ===
    let americano = demo_product(&catalog, 1).await?;
    let latte = demo_product(&catalog, 2).await?;

    let mut cart = Cart::new();
    cart.add_item(americano.id, &americano.name, americano.price);
    cart.add_item(americano.id, &americano.name, americano.price);
    cart.add_item(latte.id, &latte.name, latte.price);
    tracing::info!(total = cart.total_amount(), items = cart.len(), "cart ready");

    let receipt = checkout.complete(&mut cart, "CASH").await?;
    tracing::info!(order_no = %receipt.order_no, total = receipt.total, "first order completed");

    // === 4. Second order paid by card ===
    let cheesecake = demo_product(&catalog, 11).await?;
    cart.add_item(cheesecake.id, &cheesecake.name, cheesecake.price);
    let receipt = checkout.complete(&mut cart, "CARD").await?;
    tracing::info!(order_no = %receipt.order_no, total = receipt.total, "second order completed");

    // === 5. Today's sales report ===
    reports.refresh();
    let today = reports.current_date();
    let report = reports.daily_report(today).await?;
    tracing::info!(report = %serde_json::to_string(&report)?, "daily report");

    for order in reports.orders_for(today).await? {
        tracing::info!(
            order_no = %order.order_no,
            total = order.total,
            payment_type = %order.payment_type,
            item_count = order.items.len(),
            "order on report"
        );
    }

    tracing::info!("demo complete");
    Ok(())
}

async fn demo_product(catalog: &SqliteCatalog, id: i64) -> anyhow::Result<Product> {
    catalog
        .get_product(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("demo product {id} missing from seeded catalog"))
}
