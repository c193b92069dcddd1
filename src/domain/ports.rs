use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::order::{Checkout, ListQuery, ListResult, Order};
use super::product::{Category, NewProduct, Product};
use super::status::OrderStatus;

pub trait OrderRepository: Send + Sync + 'static {
    /// Places the order and records the sales against product stock in one
    /// unit of work.
    fn create(&self, checkout: Checkout) -> Result<Order, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;
    fn list(&self, query: &ListQuery) -> Result<ListResult, DomainError>;
    /// Sets the status to `next` only if it is still `expected`. Returns
    /// whether a row was updated.
    fn compare_and_set_status(
        &self,
        id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<bool, DomainError>;
    /// Marks an unpaid, non-cancelled order as paid. Returns whether a row
    /// was updated.
    fn mark_paid(&self, id: Uuid, paid_at: DateTime<Utc>) -> Result<bool, DomainError>;
}

pub trait ProductRepository: Send + Sync + 'static {
    fn create(&self, product: NewProduct) -> Result<Product, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError>;
    fn list(&self, category: Option<Category>) -> Result<Vec<Product>, DomainError>;
    fn set_total_stock(&self, id: Uuid, total_stock: i32) -> Result<Product, DomainError>;
}
