//! JSON shapes exchanged with the storefront. Field names are camelCase and
//! money travels as decimal strings to avoid floating-point issues.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    Checkout, CheckoutItem, Order, OrderItem, PaymentMethod, Pricing, ShippingAddress,
};
use crate::domain::product::{Category, NewProduct, Product};
use crate::domain::status::OrderStatus;

pub(crate) fn parse_money(field: &str, value: &str) -> Result<BigDecimal, DomainError> {
    BigDecimal::from_str(value.trim())
        .map_err(|e| DomainError::InvalidInput(format!("invalid {field} '{value}': {e}")))
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    pub product_id: Uuid,
    pub product_name: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub quantity: i32,
    /// Price per unit when the order was placed, e.g. "149.99"
    pub unit_price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: Uuid,
    pub order_items: Vec<OrderItemDto>,
    pub items_price: String,
    pub shipping_price: String,
    pub tax_price: String,
    pub total_price: String,
    pub order_status: OrderStatus,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_method: PaymentMethod,
    pub shipping_address: ShippingAddress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `GET /orders/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderEnvelope {
    pub order: OrderDto,
}

impl From<&Order> for OrderDto {
    fn from(order: &Order) -> Self {
        OrderDto {
            id: order.id,
            order_items: order
                .items
                .iter()
                .map(|i| OrderItemDto {
                    product_id: i.product_id,
                    product_name: i.product_name.clone(),
                    size: i.size.clone(),
                    color: i.color.clone(),
                    quantity: i.quantity,
                    unit_price: i.unit_price.to_string(),
                })
                .collect(),
            items_price: order.pricing.items_price.to_string(),
            shipping_price: order.pricing.shipping_price.to_string(),
            tax_price: order.pricing.tax_price.to_string(),
            total_price: order.pricing.total_price.to_string(),
            order_status: order.status,
            is_paid: order.is_paid(),
            paid_at: order.paid_at,
            payment_method: order.payment_method,
            shipping_address: order.shipping_address.clone(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

impl TryFrom<OrderDto> for Order {
    type Error = DomainError;

    fn try_from(dto: OrderDto) -> Result<Self, Self::Error> {
        if dto.is_paid != dto.paid_at.is_some() {
            return Err(DomainError::InvalidInput(
                "isPaid and paidAt disagree".to_string(),
            ));
        }
        let items = dto
            .order_items
            .into_iter()
            .map(|i| {
                Ok(OrderItem {
                    product_id: i.product_id,
                    product_name: i.product_name,
                    size: i.size,
                    color: i.color,
                    quantity: i.quantity,
                    unit_price: parse_money("unitPrice", &i.unit_price)?,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(Order {
            id: dto.id,
            items,
            pricing: Pricing {
                items_price: parse_money("itemsPrice", &dto.items_price)?,
                shipping_price: parse_money("shippingPrice", &dto.shipping_price)?,
                tax_price: parse_money("taxPrice", &dto.tax_price)?,
                total_price: parse_money("totalPrice", &dto.total_price)?,
            },
            status: dto.order_status,
            paid_at: dto.paid_at,
            payment_method: dto.payment_method,
            shipping_address: dto.shipping_address,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItemRequest {
    pub product_id: Uuid,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub order_items: Vec<CreateOrderItemRequest>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    /// Decimal string, e.g. "20.00"
    pub shipping_price: String,
    /// Decimal string, e.g. "0"
    pub tax_price: String,
}

impl TryFrom<CreateOrderRequest> for Checkout {
    type Error = DomainError;

    fn try_from(req: CreateOrderRequest) -> Result<Self, Self::Error> {
        Ok(Checkout {
            items: req
                .order_items
                .into_iter()
                .map(|i| CheckoutItem {
                    product_id: i.product_id,
                    size: i.size,
                    color: i.color,
                    quantity: i.quantity,
                })
                .collect(),
            shipping_address: req.shipping_address,
            payment_method: req.payment_method,
            shipping_price: parse_money("shippingPrice", &req.shipping_price)?,
            tax_price: parse_money("taxPrice", &req.tax_price)?,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// One of pending, processing, shipped, delivered, cancelled
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Only return orders in this status.
    #[serde(default)]
    pub status: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderDto>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Products ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: Category,
    pub subcategory: String,
    pub brand: Option<String>,
    pub is_active: bool,
    pub total_stock: i32,
    pub sold_count: i32,
    pub remaining_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Product> for ProductDto {
    fn from(p: &Product) -> Self {
        ProductDto {
            id: p.id,
            name: p.name.clone(),
            description: p.description.clone(),
            price: p.price.to_string(),
            category: p.category,
            subcategory: p.subcategory.clone(),
            brand: p.brand.clone(),
            is_active: p.is_active,
            total_stock: p.stock.total(),
            sold_count: p.stock.sold(),
            remaining_stock: p.stock.remaining(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    /// Decimal string, e.g. "149.99"
    pub price: String,
    /// men, women or kids
    pub category: String,
    pub subcategory: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub total_stock: i32,
}

impl TryFrom<CreateProductRequest> for NewProduct {
    type Error = DomainError;

    fn try_from(req: CreateProductRequest) -> Result<Self, Self::Error> {
        Ok(NewProduct {
            price: parse_money("price", &req.price)?,
            category: req.category.parse()?,
            name: req.name,
            description: req.description,
            subcategory: req.subcategory,
            brand: req.brand,
            total_stock: req.total_stock,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockRequest {
    pub total_stock: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListProductsParams {
    #[serde(default)]
    pub category: Option<String>,
}
