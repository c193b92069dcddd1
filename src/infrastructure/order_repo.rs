use std::collections::HashMap;

use chrono::{DateTime, SubsecRound, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::checkout;
use crate::domain::errors::DomainError;
use crate::domain::order::{Checkout, ListQuery, ListResult, Order};
use crate::domain::ports::OrderRepository;
use crate::domain::product::Product;
use crate::domain::status::OrderStatus;
use crate::schema::{order_items, orders, products};

use super::models::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow, ProductRow};
use super::product_repo::persist_stock;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, checkout: Checkout) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;
        let now = Utc::now().trunc_subsecs(6);

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Lock every purchased product, always in id order
            let ids = checkout::lock_order(&checkout);
            let mut locked = products::table
                .filter(products::id.eq_any(ids))
                .order(products::id.asc())
                .select(ProductRow::as_select())
                .for_update()
                .load(conn)?
                .into_iter()
                .map(|row| Product::try_from(row).map(|p| (p.id, p)))
                .collect::<Result<HashMap<Uuid, Product>, DomainError>>()?;

            let placed = checkout::place(checkout, Uuid::new_v4(), now, |product_id| {
                Ok(locked.remove(&product_id))
            })?;

            // 2. Write back the stock counters
            for (product_id, stock) in &placed.stock_updates {
                persist_stock(conn, *product_id, stock, now)?;
            }

            // 3. Insert the order and its items
            diesel::insert_into(orders::table)
                .values(&NewOrderRow::from_order(&placed.order)?)
                .execute(conn)?;
            diesel::insert_into(order_items::table)
                .values(&NewOrderItemRow::from_items(&placed.order))
                .execute(conn)?;

            Ok(placed.order)
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = OrderItemRow::belonging_to(&order)
            .select(OrderItemRow::as_select())
            .order(order_items::position.asc())
            .load(&mut conn)?;

        order.into_order(items).map(Some)
    }

    fn list(&self, query: &ListQuery) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let mut count = orders::table.into_boxed();
            let mut page = orders::table.select(OrderRow::as_select()).into_boxed();
            if let Some(status) = query.status {
                count = count.filter(orders::order_status.eq(status.as_str()));
                page = page.filter(orders::order_status.eq(status.as_str()));
            }

            let total: i64 = count.count().get_result(conn)?;
            let rows = page
                .order(orders::created_at.desc())
                .limit(query.limit)
                .offset(query.offset())
                .load(conn)?;

            Ok(ListResult {
                items: rows
                    .into_iter()
                    .map(|o| o.into_order(vec![]))
                    .collect::<Result<_, _>>()?,
                total,
            })
        })
    }

    fn compare_and_set_status(
        &self,
        id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(
            orders::table
                .filter(orders::id.eq(id))
                .filter(orders::order_status.eq(expected.as_str())),
        )
        .set((
            orders::order_status.eq(next.as_str()),
            orders::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)?;

        Ok(updated == 1)
    }

    fn mark_paid(&self, id: Uuid, paid_at: DateTime<Utc>) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(
            orders::table
                .filter(orders::id.eq(id))
                .filter(orders::is_paid.eq(false))
                .filter(orders::order_status.ne(OrderStatus::Cancelled.as_str())),
        )
        .set((
            orders::is_paid.eq(true),
            orders::paid_at.eq(Some(paid_at)),
            orders::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)?;

        Ok(updated == 1)
    }
}
