use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::domain::order::Order;
use crate::store::OrderStore;

// ============================================================================
// Report Aggregator - Daily/Monthly Sales Summaries
// ============================================================================
//
// Read-only aggregation over completed orders. Reports are computed on
// demand and never persisted.
//
// ============================================================================

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Per-day sales summary, derived from the order store on demand.
///
/// `total_sales == cash_sales + card_sales` whenever every completed order
/// used CASH or CARD, which is all this core ever writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub order_count: i64,
    pub total_sales: i64,
    pub cash_sales: i64,
    pub card_sales: i64,
}

/// Notifications for the report view: the selected date moved, or the
/// underlying data should be re-read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    DateChanged { date: NaiveDate },
    Refreshed { date: NaiveDate },
}

pub struct ReportAggregator {
    store: Arc<OrderStore>,
    current_date: NaiveDate,
    events: broadcast::Sender<ReportEvent>,
}

impl ReportAggregator {
    pub fn new(store: Arc<OrderStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            current_date: Local::now().date_naive(),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReportEvent> {
        self.events.subscribe()
    }

    // ------------------------------------------------------------------
    // Aggregation
    // ------------------------------------------------------------------

    /// Daily summary for `date`: order count and total, plus cash-only and
    /// card-only sums, over COMPLETED orders.
    ///
    /// The three aggregations run inside one read transaction so a commit
    /// landing mid-aggregation is either fully visible or not at all.
    pub async fn daily_report(&self, date: NaiveDate) -> sqlx::Result<DailyReport> {
        let mut tx = self.store.pool().begin().await?;

        let (order_count, total_sales): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(total), 0) FROM orders \
             WHERE date(created_at) = ?1 AND status = 'COMPLETED'",
        )
        .bind(date)
        .fetch_one(&mut *tx)
        .await?;

        let cash_sales: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total), 0) FROM orders \
             WHERE date(created_at) = ?1 AND status = 'COMPLETED' AND payment_type = 'CASH'",
        )
        .bind(date)
        .fetch_one(&mut *tx)
        .await?;

        let card_sales: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total), 0) FROM orders \
             WHERE date(created_at) = ?1 AND status = 'COMPLETED' AND payment_type = 'CARD'",
        )
        .bind(date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DailyReport {
            date,
            order_count,
            total_sales,
            cash_sales,
            card_sales,
        })
    }

    /// Daily reports for every day of the month that had at least one
    /// completed order, in ascending calendar order. An invalid
    /// year/month yields an empty list.
    pub async fn monthly_report(&self, year: i32, month: u32) -> sqlx::Result<Vec<DailyReport>> {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            tracing::warn!(year, month, "monthly report requested for invalid month");
            return Ok(Vec::new());
        };

        let mut reports = Vec::new();
        let mut day = first;
        while day.year() == year && day.month() == month {
            let report = self.daily_report(day).await?;
            if report.order_count > 0 {
                reports.push(report);
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        Ok(reports)
    }

    /// The selected day's order list for the report detail view.
    pub async fn orders_for(&self, date: NaiveDate) -> sqlx::Result<Vec<Order>> {
        self.store.find_by_date(date).await
    }

    // ------------------------------------------------------------------
    // Date navigation
    // ------------------------------------------------------------------

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    /// Select a different report date. No-op when unchanged, so the view
    /// never reloads redundantly.
    pub fn set_current_date(&mut self, date: NaiveDate) {
        if self.current_date == date {
            return;
        }
        self.current_date = date;
        let _ = self.events.send(ReportEvent::DateChanged { date });
        let _ = self.events.send(ReportEvent::Refreshed { date });
    }

    pub fn previous_day(&mut self) {
        if let Some(date) = self.current_date.pred_opt() {
            self.set_current_date(date);
        }
    }

    pub fn next_day(&mut self) {
        if let Some(date) = self.current_date.succ_opt() {
            self.set_current_date(date);
        }
    }

    pub fn go_to_today(&mut self) {
        self.set_current_date(Local::now().date_naive());
    }

    /// Ask the view to re-read without moving the date (after a checkout
    /// landed, for instance).
    pub fn refresh(&self) {
        let _ = self.events.send(ReportEvent::Refreshed {
            date: self.current_date,
        });
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::Cart;
    use crate::domain::order::{Checkout, LineItem, OrderStatus, PaymentType};
    use crate::store::{connect_in_memory, schema};
    use chrono::NaiveDateTime;

    async fn setup() -> (ReportAggregator, Arc<OrderStore>) {
        let pool = connect_in_memory().await.unwrap();
        schema::init(&pool).await.unwrap();
        let store = Arc::new(OrderStore::new(pool));
        (ReportAggregator::new(store.clone()), store)
    }

    fn at(date: NaiveDate, hour: u32) -> NaiveDateTime {
        date.and_hms_opt(hour, 0, 0).unwrap()
    }

    fn order(
        order_no: &str,
        total: i64,
        payment_type: PaymentType,
        status: OrderStatus,
        created_at: NaiveDateTime,
    ) -> Order {
        let item = LineItem::new(1, "Americano", total);
        Order {
            id: 0,
            order_no: order_no.to_string(),
            total,
            payment_type,
            status,
            created_at,
            completed_at: created_at,
            items: vec![item],
        }
    }

    #[tokio::test]
    async fn test_daily_report_splits_cash_and_card() {
        let (reports, store) = setup().await;
        let day = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();

        for (no, total, payment) in [
            ("20260824-0001", 4500, PaymentType::Cash),
            ("20260824-0002", 5000, PaymentType::Cash),
            ("20260824-0003", 6500, PaymentType::Card),
        ] {
            store
                .commit(&order(no, total, payment, OrderStatus::Completed, at(day, 10)))
                .await
                .unwrap();
        }

        let report = reports.daily_report(day).await.unwrap();

        assert_eq!(report.order_count, 3);
        assert_eq!(report.total_sales, 16_000);
        assert_eq!(report.cash_sales, 9500);
        assert_eq!(report.card_sales, 6500);
        assert_eq!(report.total_sales, report.cash_sales + report.card_sales);
    }

    #[tokio::test]
    async fn test_daily_report_ignores_cancelled_orders() {
        let (reports, store) = setup().await;
        let day = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();

        store
            .commit(&order(
                "20260824-0001",
                4500,
                PaymentType::Cash,
                OrderStatus::Completed,
                at(day, 10),
            ))
            .await
            .unwrap();
        store
            .commit(&order(
                "20260824-0002",
                9000,
                PaymentType::Card,
                OrderStatus::Cancelled,
                at(day, 11),
            ))
            .await
            .unwrap();

        let report = reports.daily_report(day).await.unwrap();

        assert_eq!(report.order_count, 1);
        assert_eq!(report.total_sales, 4500);
        assert_eq!(report.card_sales, 0);
    }

    #[tokio::test]
    async fn test_daily_report_for_empty_day_is_all_zero() {
        let (reports, _store) = setup().await;
        let day = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();

        let report = reports.daily_report(day).await.unwrap();

        assert_eq!(
            report,
            DailyReport {
                date: day,
                order_count: 0,
                total_sales: 0,
                cash_sales: 0,
                card_sales: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_monthly_report_keeps_only_active_days_ascending() {
        let (reports, store) = setup().await;
        let fifth = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let twentieth = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();

        // Committed out of calendar order on purpose.
        store
            .commit(&order(
                "20260820-0001",
                5000,
                PaymentType::Card,
                OrderStatus::Completed,
                at(twentieth, 12),
            ))
            .await
            .unwrap();
        store
            .commit(&order(
                "20260805-0001",
                4500,
                PaymentType::Cash,
                OrderStatus::Completed,
                at(fifth, 12),
            ))
            .await
            .unwrap();

        let month = reports.monthly_report(2026, 8).await.unwrap();

        assert_eq!(month.len(), 2);
        assert_eq!(month[0].date, fifth);
        assert_eq!(month[1].date, twentieth);
        assert!(month.iter().all(|r| r.order_count > 0));
    }

    #[tokio::test]
    async fn test_monthly_report_invalid_month_is_empty() {
        let (reports, _store) = setup().await;
        assert!(reports.monthly_report(2026, 13).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_date_navigation_events() {
        let (mut reports, _store) = setup().await;
        let mut rx = reports.subscribe();
        let start = reports.current_date();

        reports.set_current_date(start); // unchanged: no events
        reports.previous_day();
        reports.refresh();

        let yesterday = start.pred_opt().unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            ReportEvent::DateChanged { date: yesterday }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            ReportEvent::Refreshed { date: yesterday }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            ReportEvent::Refreshed { date: yesterday }
        );
        assert!(rx.try_recv().is_err());

        reports.next_day();
        assert_eq!(
            rx.try_recv().unwrap(),
            ReportEvent::DateChanged { date: start }
        );
    }

    #[tokio::test]
    async fn test_end_to_end_cart_checkout_report() {
        let (reports, store) = setup().await;
        let mut checkout = Checkout::new(store.clone());
        let mut cart = Cart::new();

        cart.add_item(1, "Americano", 4500);
        cart.add_item(1, "Americano", 4500);
        cart.add_item(2, "Cafe Latte", 5000);
        assert_eq!(cart.total_amount(), 14_000);

        let receipt = checkout.complete(&mut cart, "CASH").await.unwrap();
        let today = Local::now().date_naive();

        assert_eq!(
            receipt.order_no,
            format!("{}-0001", today.format("%Y%m%d"))
        );
        assert_eq!(receipt.total, 14_000);
        assert!(cart.is_empty());

        let report = reports.daily_report(today).await.unwrap();
        assert_eq!(report.order_count, 1);
        assert_eq!(report.total_sales, 14_000);
        assert_eq!(report.cash_sales, 14_000);
        assert_eq!(report.card_sales, 0);

        let orders = reports.orders_for(today).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].items.len(), 2);
        assert!(orders[0].total_matches_items());
    }
}
