use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::badge::Icon;
use crate::domain::status::{OrderStatus, FULFILMENT_SEQUENCE};

/// Days between checkout and the delivery date shown to the customer.
pub const DELIVERY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStep {
    pub status: OrderStatus,
    pub label: String,
    pub icon: Icon,
    pub completed: bool,
    pub current: bool,
    /// Shown under the current step until the order is delivered.
    pub in_progress: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub step_index: usize,
    /// Share of the fulfilment path covered, in `[0, 1]`.
    pub fraction: f64,
    pub steps: Vec<ProgressStep>,
}

fn step_appearance(status: OrderStatus) -> (&'static str, Icon) {
    match status {
        OrderStatus::Pending => ("Order Placed", Icon::Package),
        OrderStatus::Processing => ("Processing", Icon::Refresh),
        OrderStatus::Shipped => ("Shipped", Icon::Truck),
        OrderStatus::Delivered => ("Delivered", Icon::CheckCircle),
        OrderStatus::Cancelled => ("Cancelled", Icon::XCircle),
    }
}

/// Projects a status onto the fulfilment path. Cancelled orders have no
/// projection and are rendered separately.
pub fn project(status: OrderStatus) -> Option<Progress> {
    let step_index = status.step_index()?;
    let last = (FULFILMENT_SEQUENCE.len() - 1) as f64;
    let fraction = (step_index as f64 / last).clamp(0.0, 1.0);

    let steps = FULFILMENT_SEQUENCE
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let (label, icon) = step_appearance(*step);
            let current = i == step_index;
            ProgressStep {
                status: *step,
                label: label.to_string(),
                icon,
                completed: i <= step_index,
                current,
                in_progress: current && status != OrderStatus::Delivered,
            }
        })
        .collect();

    Some(Progress {
        step_index,
        fraction,
        steps,
    })
}

/// Delivery estimate shown while an order is still on its way.
pub fn estimated_delivery(status: OrderStatus, created_at: DateTime<Utc>) -> Option<NaiveDate> {
    match status {
        OrderStatus::Delivered | OrderStatus::Cancelled => None,
        OrderStatus::Pending | OrderStatus::Processing | OrderStatus::Shipped => {
            Some((created_at + Duration::days(DELIVERY_WINDOW_DAYS)).date_naive())
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn shipped_is_two_thirds_along() {
        let progress = project(OrderStatus::Shipped).unwrap();
        assert_eq!(progress.step_index, 2);
        assert!((progress.fraction - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn pending_starts_at_zero_and_delivered_ends_at_one() {
        assert_eq!(project(OrderStatus::Pending).unwrap().fraction, 0.0);
        assert_eq!(project(OrderStatus::Delivered).unwrap().fraction, 1.0);
    }

    #[test]
    fn cancelled_has_no_projection() {
        assert!(project(OrderStatus::Cancelled).is_none());
    }

    #[test]
    fn steps_up_to_current_are_completed() {
        let steps = project(OrderStatus::Processing).unwrap().steps;
        let completed: Vec<bool> = steps.iter().map(|s| s.completed).collect();
        assert_eq!(completed, vec![true, true, false, false]);
        assert!(steps[1].current && steps[1].in_progress);
        assert_eq!(steps[0].label, "Order Placed");
    }

    #[test]
    fn delivered_step_is_not_in_progress() {
        let steps = project(OrderStatus::Delivered).unwrap().steps;
        assert!(steps[3].current);
        assert!(!steps[3].in_progress);
    }

    #[test]
    fn delivery_estimate_is_a_week_after_checkout() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 15, 30, 0).unwrap();
        assert_eq!(
            estimated_delivery(OrderStatus::Processing, created),
            NaiveDate::from_ymd_opt(2024, 1, 8)
        );
    }

    #[test]
    fn no_estimate_once_delivered_or_cancelled() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(estimated_delivery(OrderStatus::Delivered, created), None);
        assert_eq!(estimated_delivery(OrderStatus::Cancelled, created), None);
    }
}
