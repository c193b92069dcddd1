use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::application::order_service::OrderService;
use crate::auth::AdminGuard;
use crate::domain::order::{Checkout, ListQuery};
use crate::domain::status::{OrderStatus, UnknownStatus};
use crate::errors::AppError;
use crate::presentation::{render_order_detail, OrderDetailView};

use super::dto::{
    CreateOrderRequest, ListOrdersParams, ListOrdersResponse, OrderDto, OrderEnvelope,
    UpdateStatusRequest,
};

fn blocking_failed(e: actix_web::error::BlockingError) -> AppError {
    AppError::Internal(e.to_string())
}

/// POST /orders
///
/// Places an order. Catalog prices are snapshotted onto the items and the
/// sale is recorded against each product's stock in the same transaction.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderEnvelope),
        (status = 400, description = "Invalid checkout or insufficient stock"),
        (status = 404, description = "Unknown product"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<OrderService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let checkout = Checkout::try_from(body.into_inner())?;

    let order = web::block(move || service.place_order(checkout))
        .await
        .map_err(blocking_failed)??;

    Ok(HttpResponse::Created().json(OrderEnvelope {
        order: OrderDto::from(&order),
    }))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderEnvelope),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<OrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || service.get_order(order_id))
        .await
        .map_err(blocking_failed)??;

    Ok(HttpResponse::Ok().json(OrderEnvelope {
        order: OrderDto::from(&order),
    }))
}

/// GET /orders/{id}/view
///
/// The order as the detail page shows it: progress or cancellation notice,
/// delivery estimate and cedi-formatted amounts.
#[utoipa::path(
    get,
    path = "/orders/{id}/view",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Rendered order", body = OrderDetailView),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order_view(
    service: web::Data<OrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || service.get_order(order_id))
        .await
        .map_err(blocking_failed)??;

    Ok(HttpResponse::Ok().json(render_order_detail(&order)))
}

/// GET /orders
///
/// Returns a paginated list of orders (without their items), newest first.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
        ("status" = Option<String>, Query, description = "Filter by order status"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 400, description = "Unknown status filter"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    service: web::Data<OrderService>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let status = params
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let query = ListQuery::new(params.page, params.limit, status)?;

    let result = web::block(move || service.list_orders(&query))
        .await
        .map_err(blocking_failed)??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.iter().map(OrderDto::from).collect(),
        total: result.total,
        page: query.page,
        limit: query.limit,
    }))
}

/// PATCH /orders/{id}/status
///
/// Admin only. Moves the order one step forward or cancels it.
#[utoipa::path(
    patch,
    path = "/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderEnvelope),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order changed concurrently"),
        (status = 422, description = "Transition not allowed"),
    ),
    security(("admin_token" = [])),
    tag = "orders"
)]
pub async fn update_status(
    _admin: AdminGuard,
    service: web::Data<OrderService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let target: OrderStatus = body
        .status
        .parse()
        .map_err(|e: UnknownStatus| AppError::BadRequest(e.to_string()))?;

    let order = web::block(move || service.update_status(order_id, target))
        .await
        .map_err(blocking_failed)??;

    Ok(HttpResponse::Ok().json(OrderEnvelope {
        order: OrderDto::from(&order),
    }))
}

/// POST /orders/{id}/pay
///
/// Admin only. Records that payment for the order has been received.
#[utoipa::path(
    post,
    path = "/orders/{id}/pay",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Payment recorded", body = OrderEnvelope),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already paid or cancelled"),
    ),
    security(("admin_token" = [])),
    tag = "orders"
)]
pub async fn confirm_payment(
    _admin: AdminGuard,
    service: web::Data<OrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || service.confirm_payment(order_id))
        .await
        .map_err(blocking_failed)??;

    Ok(HttpResponse::Ok().json(OrderEnvelope {
        order: OrderDto::from(&order),
    }))
}
