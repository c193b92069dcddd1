use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{Category, NewProduct, Product};

#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn ProductRepository>,
}

impl CatalogService {
    pub fn new<R: ProductRepository>(repo: R) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }

    pub fn create_product(&self, product: NewProduct) -> Result<Product, DomainError> {
        product.validate()?;
        let product = self.repo.create(product)?;
        log::info!("Added product {} ({})", product.id, product.name);
        Ok(product)
    }

    pub fn get_product(&self, id: Uuid) -> Result<Product, DomainError> {
        self.repo
            .find_by_id(id)?
            .ok_or(DomainError::ProductNotFound(id))
    }

    pub fn list_products(&self, category: Option<Category>) -> Result<Vec<Product>, DomainError> {
        self.repo.list(category)
    }

    pub fn set_total_stock(&self, id: Uuid, total_stock: i32) -> Result<Product, DomainError> {
        let product = self.repo.set_total_stock(id, total_stock)?;
        log::info!(
            "Stock for product {} set to {} ({} remaining)",
            id,
            product.stock.total(),
            product.stock.remaining()
        );
        Ok(product)
    }
}
