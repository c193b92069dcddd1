use chrono::{DateTime, SubsecRound, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{Category, NewProduct, Product, StockLevels};
use crate::schema::products;

use super::models::{NewProductRow, ProductRow, StockChangeset};

/// Writes a product's stock counters. Every stock change in the service goes
/// through here, so `remaining_stock` is always written together with the
/// counters it is derived from.
pub(crate) fn persist_stock(
    conn: &mut PgConnection,
    product_id: Uuid,
    stock: &StockLevels,
    updated_at: DateTime<Utc>,
) -> Result<(), DomainError> {
    let updated = diesel::update(products::table.find(product_id))
        .set(&StockChangeset::new(stock, updated_at))
        .execute(conn)?;
    if updated == 0 {
        return Err(DomainError::ProductNotFound(product_id));
    }
    Ok(())
}

pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductRepository for DieselProductRepository {
    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;
        let stock = StockLevels::new(product.total_stock, 0)?;

        let row = diesel::insert_into(products::table)
            .values(&NewProductRow {
                id: Uuid::new_v4(),
                name: product.name,
                description: product.description,
                price: product.price,
                category: product.category.as_str().to_string(),
                subcategory: product.subcategory,
                brand: product.brand,
                is_active: true,
                total_stock: stock.total(),
                sold_count: stock.sold(),
                remaining_stock: stock.remaining(),
            })
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)?;

        Product::try_from(row)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Product::try_from)
            .transpose()
    }

    fn list(&self, category: Option<Category>) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = products::table
            .filter(products::is_active.eq(true))
            .select(ProductRow::as_select())
            .into_boxed();
        if let Some(category) = category {
            query = query.filter(products::category.eq(category.as_str()));
        }

        query
            .order(products::created_at.desc())
            .load(&mut conn)?
            .into_iter()
            .map(Product::try_from)
            .collect()
    }

    fn set_total_stock(&self, id: Uuid, total_stock: i32) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = products::table
                .find(id)
                .select(ProductRow::as_select())
                .for_update()
                .first(conn)
                .optional()?
                .ok_or(DomainError::ProductNotFound(id))?;
            let mut product = Product::try_from(row)?;

            product.stock = product.stock.restock(total_stock)?;
            product.updated_at = Utc::now().trunc_subsecs(6);
            persist_stock(conn, id, &product.stock, product.updated_at)?;

            Ok(product)
        })
    }
}
