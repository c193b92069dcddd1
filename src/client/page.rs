use uuid::Uuid;

use super::{OrderSource, ORDER_LIST_ROUTE};
use crate::domain::order::Order;
use crate::presentation::{render_order_detail, OrderDetailView};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch order details";

/// Shows toast-style messages to the customer.
pub trait Notifier {
    fn error(&self, message: &str);
}

/// Moves the customer to another route.
pub trait Navigator {
    fn navigate(&self, route: &str);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn error(&self, message: &str) {
        (**self).error(message)
    }
}

impl<T: Navigator + ?Sized> Navigator for &T {
    fn navigate(&self, route: &str) {
        (**self).navigate(route)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    Loading,
    Loaded(Box<Order>),
    /// The fetch failed and the customer was sent back to the order list.
    Redirected,
}

/// The `/orders/:id` page.
///
/// A failed fetch never leaves an order behind: the previous one is dropped,
/// a single error is shown and the customer is sent to the order list.
pub struct OrderDetailPage<S, N, V> {
    order_id: Uuid,
    source: S,
    notifier: N,
    navigator: V,
    state: PageState,
}

impl<S, N, V> OrderDetailPage<S, N, V>
where
    S: OrderSource,
    N: Notifier,
    V: Navigator,
{
    pub fn new(order_id: Uuid, source: S, notifier: N, navigator: V) -> Self {
        Self {
            order_id,
            source,
            notifier,
            navigator,
            state: PageState::Loading,
        }
    }

    pub async fn load(&mut self) -> &PageState {
        self.state = PageState::Loading;

        match self.source.fetch_order(self.order_id).await {
            Ok(order) => self.state = PageState::Loaded(Box::new(order)),
            Err(e) => {
                log::warn!("Could not load order {}: {}", self.order_id, e);
                self.state = PageState::Redirected;
                self.notifier.error(FETCH_FAILED_MESSAGE);
                self.navigator.navigate(ORDER_LIST_ROUTE);
            }
        }
        &self.state
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn order(&self) -> Option<&Order> {
        match &self.state {
            PageState::Loaded(order) => Some(order),
            PageState::Loading | PageState::Redirected => None,
        }
    }

    /// What the page renders; nothing unless an order is loaded.
    pub fn view(&self) -> Option<OrderDetailView> {
        self.order().map(render_order_detail)
    }
}
