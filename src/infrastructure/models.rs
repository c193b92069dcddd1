use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderItem, PaymentMethod, Pricing, ShippingAddress};
use crate::domain::product::{Category, Product, StockLevels};
use crate::domain::status::OrderStatus;
use crate::schema::{order_items, orders, products};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub order_status: String,
    pub items_price: BigDecimal,
    pub shipping_price: BigDecimal,
    pub tax_price: BigDecimal,
    pub total_price: BigDecimal,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_method: String,
    pub shipping_address: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub order_status: String,
    pub items_price: BigDecimal,
    pub shipping_price: BigDecimal,
    pub tax_price: BigDecimal,
    pub total_price: BigDecimal,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_method: String,
    pub shipping_address: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub position: i32,
    pub product_id: Uuid,
    pub product_name: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub position: i32,
    pub product_id: Uuid,
    pub product_name: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub category: String,
    pub subcategory: String,
    pub brand: Option<String>,
    pub is_active: bool,
    pub total_stock: i32,
    pub sold_count: i32,
    pub remaining_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub category: String,
    pub subcategory: String,
    pub brand: Option<String>,
    pub is_active: bool,
    pub total_stock: i32,
    pub sold_count: i32,
    pub remaining_stock: i32,
}

/// The only changeset that touches the stock columns.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = products)]
pub struct StockChangeset {
    pub total_stock: i32,
    pub sold_count: i32,
    pub remaining_stock: i32,
    pub updated_at: DateTime<Utc>,
}

impl StockChangeset {
    pub fn new(stock: &StockLevels, updated_at: DateTime<Utc>) -> Self {
        Self {
            total_stock: stock.total(),
            sold_count: stock.sold(),
            remaining_stock: stock.remaining(),
            updated_at,
        }
    }
}

// ── Row → domain ─────────────────────────────────────────────────────────────

fn corrupt(what: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::Internal(format!("corrupt {what} in storage: {err}"))
}

impl OrderRow {
    pub fn into_order(self, items: Vec<OrderItemRow>) -> Result<Order, DomainError> {
        let status = OrderStatus::from_str(&self.order_status).map_err(|e| corrupt("order status", e))?;
        let payment_method =
            PaymentMethod::from_str(&self.payment_method).map_err(|e| corrupt("payment method", e))?;
        let shipping_address: ShippingAddress = serde_json::from_value(self.shipping_address)
            .map_err(|e| corrupt("shipping address", e))?;
        if self.is_paid != self.paid_at.is_some() {
            return Err(corrupt("payment state", format!("order {}", self.id)));
        }

        Ok(Order {
            id: self.id,
            items: items.into_iter().map(OrderItem::from).collect(),
            pricing: Pricing {
                items_price: self.items_price,
                shipping_price: self.shipping_price,
                tax_price: self.tax_price,
                total_price: self.total_price,
            },
            status,
            paid_at: self.paid_at,
            payment_method,
            shipping_address,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            product_id: row.product_id,
            product_name: row.product_name,
            size: row.size,
            color: row.color,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = DomainError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category = Category::from_str(&row.category).map_err(|e| corrupt("category", e))?;
        let stock = StockLevels::new(row.total_stock, row.sold_count)
            .map_err(|e| corrupt("stock counters", e))?;
        if stock.remaining() != row.remaining_stock {
            return Err(corrupt("remaining stock", format!("product {}", row.id)));
        }

        Ok(Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            category,
            subcategory: row.subcategory,
            brand: row.brand,
            is_active: row.is_active,
            stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ── Domain → row ─────────────────────────────────────────────────────────────

impl NewOrderRow {
    pub fn from_order(order: &Order) -> Result<Self, DomainError> {
        Ok(Self {
            id: order.id,
            order_status: order.status.as_str().to_string(),
            items_price: order.pricing.items_price.clone(),
            shipping_price: order.pricing.shipping_price.clone(),
            tax_price: order.pricing.tax_price.clone(),
            total_price: order.pricing.total_price.clone(),
            is_paid: order.is_paid(),
            paid_at: order.paid_at,
            payment_method: order.payment_method.as_str().to_string(),
            shipping_address: serde_json::to_value(&order.shipping_address)
                .map_err(|e| DomainError::Internal(e.to_string()))?,
            created_at: order.created_at,
            updated_at: order.updated_at,
        })
    }
}

impl NewOrderItemRow {
    pub fn from_items(order: &Order) -> Vec<Self> {
        order
            .items
            .iter()
            .enumerate()
            .map(|(position, item)| NewOrderItemRow {
                id: Uuid::new_v4(),
                order_id: order.id,
                position: position as i32,
                product_id: item.product_id,
                product_name: item.product_name.clone(),
                size: item.size.clone(),
                color: item.color.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price.clone(),
                created_at: order.created_at,
            })
            .collect()
    }
}
