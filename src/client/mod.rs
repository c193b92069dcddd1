//! Storefront side of order viewing: fetching an order over HTTP and
//! driving the order detail page.

pub mod page;

use std::future::Future;

use reqwest::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::order::Order;
use crate::handlers::dto::OrderEnvelope;

pub use page::{Navigator, Notifier, OrderDetailPage, PageState};

/// Route of the customer's order list.
pub const ORDER_LIST_ROUTE: &str = "/orders";

/// Route of a single order's detail page.
pub fn order_route(id: Uuid) -> String {
    format!("{ORDER_LIST_ROUTE}/{id}")
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Order not found")]
    NotFound,
    #[error("Not authorised to view this order")]
    Unauthorized,
    #[error("Server responded with {0}")]
    Status(u16),
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unreadable order: {0}")]
    Decode(String),
}

/// Anything that can look up one order by id.
pub trait OrderSource {
    fn fetch_order(&self, id: Uuid) -> impl Future<Output = Result<Order, FetchError>> + Send;
}

/// Reads orders from the order service's `GET /orders/{id}`.
#[derive(Debug, Clone)]
pub struct HttpOrderSource {
    http: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpOrderSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: None,
        }
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

impl OrderSource for HttpOrderSource {
    async fn fetch_order(&self, id: Uuid) -> Result<Order, FetchError> {
        let mut request = self.http.get(format!("{}/orders/{}", self.base_url, id));
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        match response.status() {
            s if s.is_success() => {}
            StatusCode::NOT_FOUND => return Err(FetchError::NotFound),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(FetchError::Unauthorized)
            }
            other => return Err(FetchError::Status(other.as_u16())),
        }

        let envelope: OrderEnvelope = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        Order::try_from(envelope.order).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
