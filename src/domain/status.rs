use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Fulfilment status of an order.
///
/// Orders move forward one step at a time along [`FULFILMENT_SEQUENCE`].
/// `Cancelled` is absorbing and reachable from any status before
/// `Delivered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// The forward path an order takes from checkout to the customer's door.
pub const FULFILMENT_SEQUENCE: [OrderStatus; 4] = [
    OrderStatus::Pending,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("Order is {0} and can no longer change status")]
    TerminalState(OrderStatus),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown order status '{0}'")]
pub struct UnknownStatus(pub String);

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Position along [`FULFILMENT_SEQUENCE`]; `None` for cancelled orders.
    pub fn step_index(self) -> Option<usize> {
        FULFILMENT_SEQUENCE.iter().position(|s| *s == self)
    }

    /// The next status on the forward path, if any.
    pub fn successor(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// Validates a move from `self` to `target` and returns the new status.
    ///
    /// Legal moves are the immediate successor, or `Cancelled` from any
    /// non-terminal status. Terminal statuses reject every target.
    pub fn transition(self, target: OrderStatus) -> Result<OrderStatus, TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::TerminalState(self));
        }
        if target == OrderStatus::Cancelled || self.successor() == Some(target) {
            return Ok(target);
        }
        Err(TransitionError::InvalidTransition {
            from: self,
            to: target,
        })
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn forward_steps_are_allowed() {
        assert_eq!(
            OrderStatus::Pending.transition(OrderStatus::Processing),
            Ok(OrderStatus::Processing)
        );
        assert_eq!(
            OrderStatus::Processing.transition(OrderStatus::Shipped),
            Ok(OrderStatus::Shipped)
        );
        assert_eq!(
            OrderStatus::Shipped.transition(OrderStatus::Delivered),
            Ok(OrderStatus::Delivered)
        );
    }

    #[test]
    fn skipping_a_step_is_rejected() {
        assert_eq!(
            OrderStatus::Pending.transition(OrderStatus::Shipped),
            Err(TransitionError::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Shipped,
            })
        );
    }

    #[test]
    fn moving_backwards_is_rejected() {
        assert!(matches!(
            OrderStatus::Shipped.transition(OrderStatus::Processing),
            Err(TransitionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn staying_put_is_rejected() {
        assert!(matches!(
            OrderStatus::Processing.transition(OrderStatus::Processing),
            Err(TransitionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn cancel_is_reachable_from_every_open_status() {
        for from in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
        ] {
            assert_eq!(
                from.transition(OrderStatus::Cancelled),
                Ok(OrderStatus::Cancelled)
            );
        }
    }

    #[test]
    fn terminal_statuses_reject_everything() {
        for from in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            for to in ALL {
                assert_eq!(
                    from.transition(to),
                    Err(TransitionError::TerminalState(from))
                );
            }
        }
    }

    #[test]
    fn transition_table_matches_forward_or_cancel_rule() {
        for from in ALL {
            for to in ALL {
                let expected = from.successor() == Some(to)
                    || (to == OrderStatus::Cancelled && !from.is_terminal());
                assert_eq!(from.transition(to).is_ok(), expected, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn step_index_follows_the_sequence() {
        assert_eq!(OrderStatus::Pending.step_index(), Some(0));
        assert_eq!(OrderStatus::Shipped.step_index(), Some(2));
        assert_eq!(OrderStatus::Delivered.step_index(), Some(3));
        assert_eq!(OrderStatus::Cancelled.step_index(), None);
    }

    #[test]
    fn parses_its_own_display() {
        for status in ALL {
            assert_eq!(status.to_string().parse::<OrderStatus>(), Ok(status));
        }
        assert_eq!(
            "returned".parse::<OrderStatus>(),
            Err(UnknownStatus("returned".to_string()))
        );
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Shipped).unwrap(),
            "\"shipped\""
        );
    }
}
