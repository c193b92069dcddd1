use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::order::{Checkout, Order, OrderItem, Pricing};
use super::product::{Product, StockLevels};
use super::status::OrderStatus;

/// Result of turning a checkout into an order: the order itself plus the
/// stock levels each purchased product must be written back with.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub stock_updates: Vec<(Uuid, StockLevels)>,
}

/// Distinct product ids of a checkout in ascending order. Stores lock rows
/// in this order so overlapping checkouts cannot deadlock.
pub fn lock_order(checkout: &Checkout) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = checkout.items.iter().map(|i| i.product_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Builds a pending order from a validated checkout.
///
/// `load_product` is called once per distinct product, in line order. Each line snapshots the catalog name and price, and
/// sales are recorded against a running stock level so repeated lines for the
/// same product are checked against what is left after the earlier ones.
pub fn place<F>(
    checkout: Checkout,
    order_id: Uuid,
    now: DateTime<Utc>,
    mut load_product: F,
) -> Result<PlacedOrder, DomainError>
where
    F: FnMut(Uuid) -> Result<Option<Product>, DomainError>,
{
    checkout.validate()?;

    let mut catalog: HashMap<Uuid, Product> = HashMap::new();
    let mut touched: Vec<Uuid> = Vec::new();
    let mut items = Vec::with_capacity(checkout.items.len());

    for line in checkout.items {
        if !catalog.contains_key(&line.product_id) {
            let product = load_product(line.product_id)?
                .ok_or(DomainError::ProductNotFound(line.product_id))?;
            if !product.is_active {
                return Err(DomainError::InvalidInput(format!(
                    "product '{}' is no longer available",
                    product.name
                )));
            }
            catalog.insert(line.product_id, product);
            touched.push(line.product_id);
        }
        let product = catalog
            .get_mut(&line.product_id)
            .ok_or(DomainError::ProductNotFound(line.product_id))?;

        product.stock = product.stock.record_sale(line.quantity).map_err(|e| match e {
            DomainError::InvalidInput(msg) => {
                DomainError::InvalidInput(format!("{}: {msg}", product.name))
            }
            other => other,
        })?;

        items.push(OrderItem {
            product_id: product.id,
            product_name: product.name.clone(),
            size: line.size,
            color: line.color,
            quantity: line.quantity,
            unit_price: product.price.clone(),
        });
    }

    let pricing = Pricing::derive(&items, checkout.shipping_price, checkout.tax_price)?;
    let stock_updates = touched
        .into_iter()
        .filter_map(|id| catalog.get(&id).map(|p| (id, p.stock)))
        .collect();

    Ok(PlacedOrder {
        order: Order {
            id: order_id,
            items,
            pricing,
            status: OrderStatus::Pending,
            paid_at: None,
            payment_method: checkout.payment_method,
            shipping_address: checkout.shipping_address,
            created_at: now,
            updated_at: now,
        },
        stock_updates,
    })
}
