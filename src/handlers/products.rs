use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::application::catalog_service::CatalogService;
use crate::auth::AdminGuard;
use crate::catalog::size_guide::{size_guide_for, FIT_TIPS, MEASURING_TIPS};
use crate::domain::product::{Category, NewProduct};
use crate::errors::AppError;

use super::dto::{CreateProductRequest, ListProductsParams, ProductDto, UpdateStockRequest};

fn blocking_failed(e: actix_web::error::BlockingError) -> AppError {
    AppError::Internal(e.to_string())
}

/// POST /products
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductDto),
        (status = 400, description = "Invalid product"),
        (status = 401, description = "Missing or invalid admin token"),
    ),
    security(("admin_token" = [])),
    tag = "products"
)]
pub async fn create_product(
    _admin: AdminGuard,
    service: web::Data<CatalogService>,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let product = NewProduct::try_from(body.into_inner())?;

    let product = web::block(move || service.create_product(product))
        .await
        .map_err(blocking_failed)??;

    Ok(HttpResponse::Created().json(ProductDto::from(&product)))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Product found", body = ProductDto),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_product(
    service: web::Data<CatalogService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();

    let product = web::block(move || service.get_product(product_id))
        .await
        .map_err(blocking_failed)??;

    Ok(HttpResponse::Ok().json(ProductDto::from(&product)))
}

/// GET /products
///
/// Active products, newest first, optionally for one category.
#[utoipa::path(
    get,
    path = "/products",
    params(
        ("category" = Option<String>, Query, description = "men, women or kids"),
    ),
    responses(
        (status = 200, description = "Products", body = Vec<ProductDto>),
        (status = 400, description = "Unknown category"),
    ),
    tag = "products"
)]
pub async fn list_products(
    service: web::Data<CatalogService>,
    query: web::Query<ListProductsParams>,
) -> Result<HttpResponse, AppError> {
    let category = query
        .category
        .as_deref()
        .map(str::parse::<Category>)
        .transpose()?;

    let products = web::block(move || service.list_products(category))
        .await
        .map_err(blocking_failed)??;

    Ok(HttpResponse::Ok().json(products.iter().map(ProductDto::from).collect::<Vec<_>>()))
}

/// PATCH /products/{id}/stock
///
/// Admin only. Sets the total stock; remaining stock follows from it.
#[utoipa::path(
    patch,
    path = "/products/{id}/stock",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    request_body = UpdateStockRequest,
    responses(
        (status = 200, description = "Stock updated", body = ProductDto),
        (status = 400, description = "Total below units already sold"),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "Product not found"),
    ),
    security(("admin_token" = [])),
    tag = "products"
)]
pub async fn update_stock(
    _admin: AdminGuard,
    service: web::Data<CatalogService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStockRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let total_stock = body.total_stock;

    let product = web::block(move || service.set_total_stock(product_id, total_stock))
        .await
        .map_err(blocking_failed)??;

    Ok(HttpResponse::Ok().json(ProductDto::from(&product)))
}

/// GET /size-guide/{category}
///
/// Unknown categories get the men's guide.
#[utoipa::path(
    get,
    path = "/size-guide/{category}",
    params(
        ("category" = String, Path, description = "men, women or kids"),
    ),
    responses(
        (status = 200, description = "Size charts and measuring tips"),
    ),
    tag = "products"
)]
pub async fn get_size_guide(path: web::Path<String>) -> HttpResponse {
    let guide = size_guide_for(&path);
    HttpResponse::Ok().json(serde_json::json!({
        "guide": guide,
        "measuringTips": &MEASURING_TIPS,
        "fitTips": &FIT_TIPS,
    }))
}
