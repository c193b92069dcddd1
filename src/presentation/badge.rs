use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::status::OrderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Package,
    Clock,
    Refresh,
    Truck,
    CheckCircle,
    XCircle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Yellow,
    Blue,
    Purple,
    Green,
    Red,
}

/// Icon and colour shown next to an order's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusBadge {
    pub icon: Icon,
    pub tone: Tone,
}

impl From<OrderStatus> for StatusBadge {
    fn from(status: OrderStatus) -> Self {
        let (icon, tone) = match status {
            OrderStatus::Pending => (Icon::Clock, Tone::Yellow),
            OrderStatus::Processing => (Icon::Refresh, Tone::Blue),
            OrderStatus::Shipped => (Icon::Truck, Tone::Purple),
            OrderStatus::Delivered => (Icon::CheckCircle, Tone::Green),
            OrderStatus::Cancelled => (Icon::XCircle, Tone::Red),
        };
        StatusBadge { icon, tone }
    }
}
