use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{Checkout, ListQuery, ListResult, Order};
use crate::domain::ports::OrderRepository;
use crate::domain::status::OrderStatus;

/// Entry point for every order mutation. Status changes are validated by
/// the state machine here and nowhere else.
#[derive(Clone)]
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new<R: OrderRepository>(repo: R) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }

    pub fn place_order(&self, checkout: Checkout) -> Result<Order, DomainError> {
        checkout.validate()?;
        let order = self.repo.create(checkout)?;
        log::info!(
            "Placed order {} ({} items, total {})",
            order.id,
            order.items.len(),
            order.pricing.total_price
        );
        Ok(order)
    }

    pub fn get_order(&self, id: Uuid) -> Result<Order, DomainError> {
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn list_orders(&self, query: &ListQuery) -> Result<ListResult, DomainError> {
        self.repo.list(query)
    }

    /// Moves the order to `target` if the state machine allows it.
    ///
    /// The write is conditional on the status read here, so of two racing
    /// requests only one can win; the loser gets a `Conflict`.
    pub fn update_status(&self, id: Uuid, target: OrderStatus) -> Result<Order, DomainError> {
        let order = self.get_order(id)?;
        let next = order.status.transition(target)?;

        if !self.repo.compare_and_set_status(id, order.status, next)? {
            log::warn!(
                "Status of order {} changed while moving {} -> {}",
                id,
                order.status,
                next
            );
            return Err(DomainError::Conflict(format!(
                "order {id} was modified concurrently, reload and retry"
            )));
        }

        log::info!("Order {} moved {} -> {}", id, order.status, next);
        self.get_order(id)
    }

    pub fn cancel_order(&self, id: Uuid) -> Result<Order, DomainError> {
        self.update_status(id, OrderStatus::Cancelled)
    }

    pub fn confirm_payment(&self, id: Uuid) -> Result<Order, DomainError> {
        self.confirm_payment_at(id, Utc::now().trunc_subsecs(6))
    }

    pub fn confirm_payment_at(
        &self,
        id: Uuid,
        paid_at: DateTime<Utc>,
    ) -> Result<Order, DomainError> {
        if let Some(err) = payment_conflict(&self.get_order(id)?) {
            return Err(err);
        }
        if !self.repo.mark_paid(id, paid_at)? {
            // Another write got there first; report what it did.
            let current = self.get_order(id)?;
            return Err(payment_conflict(&current).unwrap_or_else(|| {
                DomainError::Conflict(format!(
                    "order {id} was modified concurrently, reload and retry"
                ))
            }));
        }

        log::info!("Payment confirmed for order {}", id);
        self.get_order(id)
    }
}

fn payment_conflict(order: &Order) -> Option<DomainError> {
    if order.status == OrderStatus::Cancelled {
        Some(DomainError::Conflict(format!(
            "order {} is cancelled and cannot be paid",
            order.id
        )))
    } else if order.is_paid() {
        Some(DomainError::Conflict(format!(
            "order {} is already paid",
            order.id
        )))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::domain::order::fixtures;
    use crate::domain::status::TransitionError;

    /// Holds orders in memory; `stale` makes every conditional write lose.
    #[derive(Default)]
    struct FakeRepo {
        orders: Mutex<HashMap<Uuid, Order>>,
        stale: bool,
        /// Cancels the order from under a payment, as a concurrent admin would.
        cancel_on_pay: bool,
    }

    impl FakeRepo {
        fn with(order: Order, stale: bool) -> Self {
            let repo = FakeRepo {
                stale,
                ..Default::default()
            };
            repo.orders.lock().unwrap().insert(order.id, order);
            repo
        }
    }

    impl OrderRepository for FakeRepo {
        fn create(&self, _checkout: Checkout) -> Result<Order, DomainError> {
            Err(DomainError::Internal("not used".to_string()))
        }

        fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
            Ok(self.orders.lock().unwrap().get(&id).cloned())
        }

        fn list(&self, _query: &ListQuery) -> Result<ListResult, DomainError> {
            Err(DomainError::Internal("not used".to_string()))
        }

        fn compare_and_set_status(
            &self,
            id: Uuid,
            expected: OrderStatus,
            next: OrderStatus,
        ) -> Result<bool, DomainError> {
            if self.stale {
                return Ok(false);
            }
            let mut orders = self.orders.lock().unwrap();
            match orders.get_mut(&id) {
                Some(o) if o.status == expected => {
                    o.status = next;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        fn mark_paid(&self, id: Uuid, paid_at: DateTime<Utc>) -> Result<bool, DomainError> {
            if self.stale {
                return Ok(false);
            }
            let mut orders = self.orders.lock().unwrap();
            if self.cancel_on_pay {
                if let Some(o) = orders.get_mut(&id) {
                    o.status = OrderStatus::Cancelled;
                }
                return Ok(false);
            }
            match orders.get_mut(&id) {
                Some(o) if o.paid_at.is_none() => {
                    o.paid_at = Some(paid_at);
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
    }

    fn service(status: OrderStatus, stale: bool) -> (OrderService, Uuid) {
        let order = fixtures::order(status, Utc::now());
        let id = order.id;
        (OrderService::new(FakeRepo::with(order, stale)), id)
    }

    #[test]
    fn advances_one_step() {
        let (svc, id) = service(OrderStatus::Pending, false);
        let order = svc.update_status(id, OrderStatus::Processing).unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
    }

    #[test]
    fn rejects_skipping_ahead() {
        let (svc, id) = service(OrderStatus::Pending, false);
        let err = svc.update_status(id, OrderStatus::Delivered).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Transition(TransitionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn rejects_changes_to_delivered_orders() {
        let (svc, id) = service(OrderStatus::Delivered, false);
        let err = svc.cancel_order(id).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Transition(TransitionError::TerminalState(OrderStatus::Delivered))
        ));
    }

    #[test]
    fn lost_race_is_a_conflict() {
        let (svc, id) = service(OrderStatus::Processing, true);
        let err = svc.update_status(id, OrderStatus::Shipped).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn unknown_order_is_not_found() {
        let (svc, _) = service(OrderStatus::Pending, false);
        let err = svc.update_status(Uuid::new_v4(), OrderStatus::Processing).unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
    }

    #[test]
    fn payment_sets_paid_at() {
        let (svc, id) = service(OrderStatus::Processing, false);
        let at = Utc::now().trunc_subsecs(6);
        let order = svc.confirm_payment_at(id, at).unwrap();
        assert!(order.is_paid());
        assert_eq!(order.paid_at, Some(at));
    }

    #[test]
    fn paying_twice_is_a_conflict() {
        let (svc, id) = service(OrderStatus::Pending, false);
        svc.confirm_payment(id).unwrap();
        assert!(matches!(
            svc.confirm_payment(id).unwrap_err(),
            DomainError::Conflict(_)
        ));
    }

    #[test]
    fn cancelled_orders_cannot_be_paid() {
        let (svc, id) = service(OrderStatus::Cancelled, false);
        assert!(matches!(
            svc.confirm_payment(id).unwrap_err(),
            DomainError::Conflict(_)
        ));
    }

    #[test]
    fn payment_losing_to_a_cancellation_says_cancelled() {
        let order = fixtures::order(OrderStatus::Processing, Utc::now());
        let id = order.id;
        let repo = FakeRepo {
            cancel_on_pay: true,
            ..Default::default()
        };
        repo.orders.lock().unwrap().insert(id, order);
        let svc = OrderService::new(repo);

        let err = svc.confirm_payment(id).unwrap_err();
        assert!(matches!(&err, DomainError::Conflict(msg) if msg.contains("cancelled")));
    }

    #[test]
    fn payment_losing_an_unexplained_race_asks_for_a_retry() {
        let (svc, id) = service(OrderStatus::Pending, true);
        let err = svc.confirm_payment(id).unwrap_err();
        assert!(matches!(&err, DomainError::Conflict(msg) if msg.contains("retry")));
    }
}
