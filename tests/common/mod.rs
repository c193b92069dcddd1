//! Shared helpers for the HTTP tests: an in-memory store standing in for
//! Postgres and a few request fixtures.

#![allow(dead_code)]

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use storefront_orders::application::catalog_service::CatalogService;
use storefront_orders::application::order_service::OrderService;
use storefront_orders::auth::AdminToken;
use storefront_orders::domain::checkout;
use storefront_orders::domain::errors::DomainError;
use storefront_orders::domain::order::{Checkout, ListQuery, ListResult, Order};
use storefront_orders::domain::ports::{OrderRepository, ProductRepository};
use storefront_orders::domain::product::{Category, NewProduct, Product, StockLevels};
use storefront_orders::domain::status::OrderStatus;
use storefront_orders::handlers::dto::CreateOrderRequest;
use storefront_orders::AppState;

pub const ADMIN_TOKEN: &str = "test-admin-token";

#[derive(Default)]
struct Tables {
    orders: HashMap<Uuid, Order>,
    products: HashMap<Uuid, Product>,
}

/// Orders and products behind one lock, so a checkout sees and updates stock
/// atomically the way the Postgres transaction does.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn order(&self, id: Uuid) -> Option<Order> {
        self.tables.lock().unwrap().orders.get(&id).cloned()
    }

    pub fn product(&self, id: Uuid) -> Option<Product> {
        self.tables.lock().unwrap().products.get(&id).cloned()
    }

    /// Inserts an order as-is, bypassing checkout.
    pub fn seed_order(&self, order: Order) {
        self.tables.lock().unwrap().orders.insert(order.id, order);
    }

    pub fn seed_product(&self, name: &str, price: &str, total_stock: i32) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{name} for tests"),
            price: money(price),
            category: Category::Women,
            subcategory: "dresses".to_string(),
            brand: None,
            is_active: true,
            stock: StockLevels::new(total_stock, 0).unwrap(),
            created_at: now,
            updated_at: now,
        };
        self.tables
            .lock()
            .unwrap()
            .products
            .insert(product.id, product.clone());
        product
    }
}

impl OrderRepository for MemoryStore {
    fn create(&self, checkout: Checkout) -> Result<Order, DomainError> {
        let mut tables = self.tables.lock().unwrap();
        let placed = checkout::place(checkout, Uuid::new_v4(), Utc::now(), |id| {
            Ok(tables.products.get(&id).cloned())
        })?;
        for (id, stock) in placed.stock_updates {
            if let Some(product) = tables.products.get_mut(&id) {
                product.stock = stock;
            }
        }
        tables.orders.insert(placed.order.id, placed.order.clone());
        Ok(placed.order)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self.order(id))
    }

    fn list(&self, query: &ListQuery) -> Result<ListResult, DomainError> {
        let tables = self.tables.lock().unwrap();
        let mut matching: Vec<Order> = tables
            .orders
            .values()
            .filter(|o| query.status.map_or(true, |s| o.status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();
        Ok(ListResult { items, total })
    }

    fn compare_and_set_status(
        &self,
        id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<bool, DomainError> {
        let mut tables = self.tables.lock().unwrap();
        match tables.orders.get_mut(&id) {
            Some(order) if order.status == expected => {
                order.status = next;
                order.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn mark_paid(&self, id: Uuid, paid_at: DateTime<Utc>) -> Result<bool, DomainError> {
        let mut tables = self.tables.lock().unwrap();
        match tables.orders.get_mut(&id) {
            Some(order) if order.paid_at.is_none() && order.status != OrderStatus::Cancelled => {
                order.paid_at = Some(paid_at);
                order.updated_at = paid_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl ProductRepository for MemoryStore {
    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            stock: StockLevels::new(product.total_stock, 0)?,
            name: product.name,
            description: product.description,
            price: product.price,
            category: product.category,
            subcategory: product.subcategory,
            brand: product.brand,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .lock()
            .unwrap()
            .products
            .insert(product.id, product.clone());
        Ok(product)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(self.product(id))
    }

    fn list(&self, category: Option<Category>) -> Result<Vec<Product>, DomainError> {
        let tables = self.tables.lock().unwrap();
        let mut products: Vec<Product> = tables
            .products
            .values()
            .filter(|p| p.is_active && category.map_or(true, |c| p.category == c))
            .cloned()
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    fn set_total_stock(&self, id: Uuid, total_stock: i32) -> Result<Product, DomainError> {
        let mut tables = self.tables.lock().unwrap();
        let product = tables
            .products
            .get_mut(&id)
            .ok_or(DomainError::ProductNotFound(id))?;
        product.stock = product.stock.restock(total_stock)?;
        product.updated_at = Utc::now();
        Ok(product.clone())
    }
}

pub fn app_state(store: &MemoryStore) -> AppState {
    AppState {
        orders: OrderService::new(store.clone()),
        catalog: CatalogService::new(store.clone()),
        admin_token: AdminToken::new(ADMIN_TOKEN),
    }
}

pub fn money(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

pub fn bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {ADMIN_TOKEN}"))
}

pub fn shipping_address() -> Value {
    json!({
        "firstName": "Kofi",
        "lastName": "Boateng",
        "address": "4 Ring Road",
        "city": "Kumasi",
        "state": "Ashanti",
        "country": "Ghana",
        "phone": "+233244000111",
        "email": "kofi@example.com"
    })
}

pub fn checkout_body(lines: &[(Uuid, i32)]) -> Value {
    json!({
        "orderItems": lines
            .iter()
            .map(|(id, quantity)| json!({ "productId": id, "size": "L", "color": "Green", "quantity": quantity }))
            .collect::<Vec<_>>(),
        "shippingAddress": shipping_address(),
        "paymentMethod": "cod",
        "shippingPrice": "20.00",
        "taxPrice": "0"
    })
}

/// Places an order straight through the store, as a customer checkout would.
pub fn place_order(store: &MemoryStore, lines: &[(Uuid, i32)]) -> Order {
    let request: CreateOrderRequest = serde_json::from_value(checkout_body(lines)).unwrap();
    OrderRepository::create(store, Checkout::try_from(request).unwrap()).unwrap()
}
