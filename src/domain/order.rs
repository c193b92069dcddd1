use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::DomainError;
use super::status::OrderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PaymentMethod {
    #[serde(rename = "cod")]
    CashOnDelivery,
    #[serde(rename = "paystack")]
    Paystack,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "cod",
            PaymentMethod::Paystack => "paystack",
        }
    }

    /// Customer-facing name of the payment method.
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "Pay on Delivery",
            PaymentMethod::Paystack => "Paystack",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cod" => Ok(PaymentMethod::CashOnDelivery),
            "paystack" => Ok(PaymentMethod::Paystack),
            other => Err(DomainError::InvalidInput(format!(
                "unknown payment method '{other}'"
            ))),
        }
    }
}

/// Postal and contact details captured at checkout.
///
/// Stored as a snapshot on the order; later edits to the customer's saved
/// address never reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    pub phone: String,
    pub email: String,
}

impl ShippingAddress {
    pub fn validate(&self) -> Result<(), DomainError> {
        let required = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("country", &self.country),
            ("phone", &self.phone),
            ("email", &self.email),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(DomainError::InvalidInput(format!(
                "shipping address {field} is required"
            )));
        }
        if !self.email.contains('@') {
            return Err(DomainError::InvalidInput(format!(
                "invalid email address '{}'",
                self.email
            )));
        }
        Ok(())
    }
}

/// Whole-number digits an order amount may have (`NUMERIC(12, 2)`).
pub const ORDER_AMOUNT_DIGITS: u32 = 10;
/// Whole-number digits a catalog price may have (`NUMERIC(10, 2)`).
pub const UNIT_PRICE_DIGITS: u32 = 8;

pub const MAX_SIZE_LEN: usize = 20;
pub const MAX_COLOR_LEN: usize = 50;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Rejects amounts the money columns would round or overflow: more than two
/// decimal places, or more than `whole_digits` digits before the point.
pub fn check_money(field: &str, amount: &BigDecimal, whole_digits: u32) -> Result<(), DomainError> {
    let (_, scale) = amount.normalized().as_bigint_and_exponent();
    if scale > 2 {
        return Err(DomainError::InvalidInput(format!(
            "{field} must have at most two decimal places"
        )));
    }
    if amount.abs() >= BigDecimal::from(10_i64.pow(whole_digits)) {
        return Err(DomainError::InvalidInput(format!(
            "{field} must be below {}",
            10_i64.pow(whole_digits)
        )));
    }
    Ok(())
}

pub(crate) fn check_len(field: &str, value: Option<&str>, max: usize) -> Result<(), DomainError> {
    match value {
        Some(v) if v.chars().count() > max => Err(DomainError::InvalidInput(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub product_id: Uuid,
    pub product_name: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: i32,
    /// Catalog price when the order was placed.
    pub unit_price: BigDecimal,
}

impl OrderItem {
    pub fn line_total(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }
}

/// Price breakdown fixed at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct Pricing {
    pub items_price: BigDecimal,
    pub shipping_price: BigDecimal,
    pub tax_price: BigDecimal,
    pub total_price: BigDecimal,
}

impl Pricing {
    /// Derives the breakdown for a new order. `total_price` is computed here
    /// once and never again.
    pub fn derive(
        items: &[OrderItem],
        shipping_price: BigDecimal,
        tax_price: BigDecimal,
    ) -> Result<Self, DomainError> {
        if shipping_price < BigDecimal::zero() || tax_price < BigDecimal::zero() {
            return Err(DomainError::InvalidInput(
                "shipping and tax must not be negative".to_string(),
            ));
        }
        let items_price = items
            .iter()
            .fold(BigDecimal::zero(), |acc, item| acc + item.line_total());
        let total_price = &items_price + &shipping_price + &tax_price;
        check_money("shippingPrice", &shipping_price, ORDER_AMOUNT_DIGITS)?;
        check_money("taxPrice", &tax_price, ORDER_AMOUNT_DIGITS)?;
        // Parts are non-negative, so a total in range keeps them in range too.
        check_money("totalPrice", &total_price, ORDER_AMOUNT_DIGITS)?;
        // Exact at this point; stored at the column's scale.
        Ok(Self {
            items_price: items_price.with_scale(2),
            shipping_price: shipping_price.with_scale(2),
            tax_price: tax_price.with_scale(2),
            total_price: total_price.with_scale(2),
        })
    }

    pub fn is_consistent(&self) -> bool {
        self.total_price == &self.items_price + &self.shipping_price + &self.tax_price
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub items: Vec<OrderItem>,
    pub pricing: Pricing,
    pub status: OrderStatus,
    /// Set exactly when the order has been paid.
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_method: PaymentMethod,
    pub shipping_address: ShippingAddress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn is_paid(&self) -> bool {
        self.paid_at.is_some()
    }

    /// Short customer-facing reference: `#` and the last eight characters of
    /// the id, upper-cased.
    pub fn reference(&self) -> String {
        let id = self.id.to_string();
        format!("#{}", id[id.len() - 8..].to_uppercase())
    }
}

#[derive(Debug, Clone)]
pub struct CheckoutItem {
    pub product_id: Uuid,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: i32,
}

/// Everything the customer submits when placing an order.
#[derive(Debug, Clone)]
pub struct Checkout {
    pub items: Vec<CheckoutItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub shipping_price: BigDecimal,
    pub tax_price: BigDecimal,
}

impl Checkout {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.items.is_empty() {
            return Err(DomainError::InvalidInput(
                "an order needs at least one item".to_string(),
            ));
        }
        if let Some(item) = self.items.iter().find(|i| i.quantity < 1) {
            return Err(DomainError::InvalidInput(format!(
                "quantity for product {} must be at least 1",
                item.product_id
            )));
        }
        for item in &self.items {
            check_len("size", item.size.as_deref(), MAX_SIZE_LEN)?;
            check_len("color", item.color.as_deref(), MAX_COLOR_LEN)?;
        }
        if self.shipping_price < BigDecimal::zero() || self.tax_price < BigDecimal::zero() {
            return Err(DomainError::InvalidInput(
                "shipping and tax must not be negative".to_string(),
            ));
        }
        check_money("shippingPrice", &self.shipping_price, ORDER_AMOUNT_DIGITS)?;
        check_money("taxPrice", &self.tax_price, ORDER_AMOUNT_DIGITS)?;
        self.shipping_address.validate()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListQuery {
    pub page: i64,
    pub limit: i64,
    pub status: Option<OrderStatus>,
}

impl ListQuery {
    /// Clamps `limit` to `1..=MAX_PAGE_SIZE` and `page` to at least 1. Pages
    /// whose offset does not fit an `i64` are rejected.
    pub fn new(page: i64, limit: i64, status: Option<OrderStatus>) -> Result<Self, DomainError> {
        let query = Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            status,
        };
        (query.page - 1).checked_mul(query.limit).ok_or_else(|| {
            DomainError::InvalidInput(format!("page {page} is out of range"))
        })?;
        Ok(query)
    }

    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit.max(0))
    }
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<Order>,
    pub total: i64,
}
