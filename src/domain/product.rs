use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::DomainError;
use super::order::{check_len, check_money, UNIT_PRICE_DIGITS};

pub const MAX_SUBCATEGORY_LEN: usize = 50;
pub const MAX_BRAND_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Men,
    Women,
    Kids,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Men => "men",
            Category::Women => "women",
            Category::Kids => "kids",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "men" => Ok(Category::Men),
            "women" => Ok(Category::Women),
            "kids" => Ok(Category::Kids),
            other => Err(DomainError::InvalidInput(format!(
                "unknown category '{other}'"
            ))),
        }
    }
}

/// Stock counters for a product.
///
/// `remaining` is always `total - sold`. The fields are private so the only
/// way to change them is through [`StockLevels::record_sale`] and
/// [`StockLevels::restock`], which recompute `remaining` on every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevels {
    total: i32,
    sold: i32,
    remaining: i32,
}

impl StockLevels {
    pub fn new(total: i32, sold: i32) -> Result<Self, DomainError> {
        if total < 0 || sold < 0 {
            return Err(DomainError::InvalidInput(
                "stock counters must not be negative".to_string(),
            ));
        }
        if sold > total {
            return Err(DomainError::InvalidInput(format!(
                "sold count {sold} exceeds total stock {total}"
            )));
        }
        Ok(Self {
            total,
            sold,
            remaining: total - sold,
        })
    }

    pub fn total(&self) -> i32 {
        self.total
    }

    pub fn sold(&self) -> i32 {
        self.sold
    }

    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    pub fn record_sale(self, quantity: i32) -> Result<Self, DomainError> {
        if quantity < 1 {
            return Err(DomainError::InvalidInput(
                "quantity must be at least 1".to_string(),
            ));
        }
        if quantity > self.remaining {
            return Err(DomainError::InvalidInput(format!(
                "insufficient stock: {} requested, {} remaining",
                quantity, self.remaining
            )));
        }
        Self::new(self.total, self.sold + quantity)
    }

    pub fn restock(self, total: i32) -> Result<Self, DomainError> {
        Self::new(total, self.sold)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub category: Category,
    pub subcategory: String,
    pub brand: Option<String>,
    pub is_active: bool,
    pub stock: StockLevels,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub category: Category,
    pub subcategory: String,
    pub brand: Option<String>,
    pub total_stock: i32,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "Product name is required".to_string(),
            ));
        }
        if self.name.chars().count() > 200 {
            return Err(DomainError::InvalidInput(
                "Product name must be at most 200 characters".to_string(),
            ));
        }
        if self.subcategory.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "Product subcategory is required".to_string(),
            ));
        }
        if self.price < BigDecimal::zero() {
            return Err(DomainError::InvalidInput(
                "Product price must not be negative".to_string(),
            ));
        }
        check_money("price", &self.price, UNIT_PRICE_DIGITS)?;
        check_len("subcategory", Some(self.subcategory.as_str()), MAX_SUBCATEGORY_LEN)?;
        check_len("brand", self.brand.as_deref(), MAX_BRAND_LEN)?;
        StockLevels::new(self.total_stock, 0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn remaining_is_total_minus_sold() {
        let stock = StockLevels::new(10, 3).unwrap();
        assert_eq!(stock.remaining(), 7);
    }

    #[test]
    fn sale_updates_sold_and_remaining_together() {
        let stock = StockLevels::new(10, 3).unwrap().record_sale(4).unwrap();
        assert_eq!(stock.sold(), 7);
        assert_eq!(stock.remaining(), 3);
        assert_eq!(stock.total(), 10);
    }

    #[test]
    fn sale_beyond_remaining_is_rejected() {
        let err = StockLevels::new(5, 4).unwrap().record_sale(2).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn zero_quantity_sale_is_rejected() {
        assert!(StockLevels::new(5, 0).unwrap().record_sale(0).is_err());
    }

    #[test]
    fn restock_keeps_sold_count() {
        let stock = StockLevels::new(5, 5).unwrap().restock(20).unwrap();
        assert_eq!(stock.sold(), 5);
        assert_eq!(stock.remaining(), 15);
    }

    #[test]
    fn restock_below_sold_is_rejected() {
        assert!(StockLevels::new(10, 6).unwrap().restock(5).is_err());
    }

    #[test]
    fn negative_counters_are_rejected() {
        assert!(StockLevels::new(-1, 0).is_err());
        assert!(StockLevels::new(1, -1).is_err());
    }

    fn new_product() -> NewProduct {
        NewProduct {
            name: "Kente Shirt".to_string(),
            description: "Handwoven".to_string(),
            price: BigDecimal::from_str("149.99").unwrap(),
            category: Category::Men,
            subcategory: "shirts".to_string(),
            brand: None,
            total_stock: 12,
        }
    }

    #[test]
    fn valid_product_passes() {
        assert!(new_product().validate().is_ok());
    }

    #[test]
    fn blank_name_fails() {
        let mut product = new_product();
        product.name = "  ".to_string();
        assert!(product.validate().is_err());
    }

    #[test]
    fn negative_price_fails() {
        let mut product = new_product();
        product.price = BigDecimal::from_str("-1").unwrap();
        assert!(product.validate().is_err());
    }

    #[test]
    fn price_must_fit_the_column() {
        let mut product = new_product();
        product.price = BigDecimal::from_str("19.999").unwrap();
        assert!(product.validate().is_err());

        product.price = BigDecimal::from_str("100000000").unwrap();
        assert!(product.validate().is_err());

        product.price = BigDecimal::from_str("99999999.99").unwrap();
        assert!(product.validate().is_ok());
    }

    #[test]
    fn long_subcategory_or_brand_fails() {
        let mut product = new_product();
        product.subcategory = "s".repeat(MAX_SUBCATEGORY_LEN + 1);
        assert!(product.validate().unwrap_err().to_string().contains("subcategory"));

        let mut product = new_product();
        product.brand = Some("b".repeat(MAX_BRAND_LEN + 1));
        assert!(product.validate().unwrap_err().to_string().contains("brand"));

        let mut product = new_product();
        product.brand = Some("b".repeat(MAX_BRAND_LEN));
        assert!(product.validate().is_ok());
    }

    #[test]
    fn category_parses() {
        assert_eq!("kids".parse::<Category>().unwrap(), Category::Kids);
        assert!("pets".parse::<Category>().is_err());
    }
}
