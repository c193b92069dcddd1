use bigdecimal::{BigDecimal, Zero};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::badge::StatusBadge;
use super::format::{format_cedis, format_day_and_month, format_long_date, format_time};
use super::progress::{estimated_delivery, project, ProgressStep};
use crate::domain::order::{Order, OrderItem, ShippingAddress};
use crate::domain::status::OrderStatus;

pub const CANCELLED_TITLE: &str = "Order Cancelled";
pub const CANCELLED_MESSAGE: &str =
    "This order has been cancelled. If you have any questions, please contact our support team.";

/// Everything the order detail page shows, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailView {
    pub reference: String,
    pub status: OrderStatus,
    pub badge: StatusBadge,
    pub placed_on: String,
    /// Absent for cancelled orders.
    pub progress: Option<ProgressView>,
    /// Present only for cancelled orders.
    pub cancellation: Option<CancellationNotice>,
    pub items: Vec<ItemLine>,
    pub summary: SummaryView,
    pub payment: PaymentView,
    pub shipping: AddressView,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressView {
    pub percent: f64,
    pub steps: Vec<ProgressStep>,
    pub estimated_delivery: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CancellationNotice {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemLine {
    pub product_id: Uuid,
    pub name: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: i32,
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SummaryView {
    pub subtotal: String,
    /// `FREE` when no shipping was charged.
    pub shipping: String,
    pub tax: String,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    pub method: String,
    pub status: String,
    pub paid_on: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AddressView {
    pub name: String,
    pub lines: Vec<String>,
    pub phone: String,
    pub email: String,
}

pub fn render_order_detail(order: &Order) -> OrderDetailView {
    let (progress, cancellation) = match order.status {
        OrderStatus::Cancelled => (
            None,
            Some(CancellationNotice {
                title: CANCELLED_TITLE.to_string(),
                message: CANCELLED_MESSAGE.to_string(),
            }),
        ),
        status => (
            project(status).map(|p| ProgressView {
                percent: p.fraction * 100.0,
                steps: p.steps,
                estimated_delivery: estimated_delivery(status, order.created_at)
                    .map(format_day_and_month),
            }),
            None,
        ),
    };

    OrderDetailView {
        reference: order.reference(),
        status: order.status,
        badge: StatusBadge::from(order.status),
        placed_on: format!(
            "{} at {}",
            format_long_date(order.created_at),
            format_time(order.created_at)
        ),
        progress,
        cancellation,
        items: order.items.iter().map(item_line).collect(),
        summary: SummaryView {
            subtotal: format_cedis(&order.pricing.items_price),
            shipping: if order.pricing.shipping_price == BigDecimal::zero() {
                "FREE".to_string()
            } else {
                format_cedis(&order.pricing.shipping_price)
            },
            tax: format_cedis(&order.pricing.tax_price),
            // Stored at checkout; never re-added from the lines.
            total: format_cedis(&order.pricing.total_price),
        },
        payment: PaymentView {
            method: order.payment_method.label().to_string(),
            status: if order.is_paid() { "Paid" } else { "Pending" }.to_string(),
            paid_on: order.paid_at.map(format_long_date),
        },
        shipping: address_view(&order.shipping_address),
    }
}

fn item_line(item: &OrderItem) -> ItemLine {
    ItemLine {
        product_id: item.product_id,
        name: item.product_name.clone(),
        size: item.size.clone(),
        color: item.color.clone(),
        quantity: item.quantity,
        unit_price: format_cedis(&item.unit_price),
        line_total: format_cedis(&item.line_total()),
    }
}

fn address_view(address: &ShippingAddress) -> AddressView {
    let mut lines = vec![
        address.address.clone(),
        format!("{}, {}", address.city, address.state),
        address.country.clone(),
    ];
    if let Some(zip) = address.zip_code.as_ref().filter(|z| !z.is_empty()) {
        lines.push(zip.clone());
    }

    AddressView {
        name: format!("{} {}", address.first_name, address.last_name),
        lines,
        phone: address.phone.clone(),
        email: address.email.clone(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::order::fixtures::{self, price};

    fn created() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 0).unwrap()
    }

    #[test]
    fn cancelled_order_shows_notice_and_no_progress() {
        let view = render_order_detail(&fixtures::order(OrderStatus::Cancelled, created()));
        assert!(view.progress.is_none());
        let notice = view.cancellation.expect("notice");
        assert_eq!(notice.title, "Order Cancelled");
    }

    #[test]
    fn processing_order_shows_progress_and_estimate() {
        let view = render_order_detail(&fixtures::order(OrderStatus::Processing, created()));
        assert!(view.cancellation.is_none());
        let progress = view.progress.expect("progress");
        assert!((progress.percent - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(
            progress.estimated_delivery.as_deref(),
            Some("Monday, 8 January")
        );
    }

    #[test]
    fn delivered_order_has_no_estimate() {
        let view = render_order_detail(&fixtures::order(OrderStatus::Delivered, created()));
        let progress = view.progress.expect("progress");
        assert_eq!(progress.percent, 100.0);
        assert!(progress.estimated_delivery.is_none());
    }

    #[test]
    fn summary_uses_stored_total() {
        let mut order = fixtures::order(OrderStatus::Pending, created());
        // A stored total that no longer matches the lines is still shown as-is.
        order.pricing.total_price = price("1000.00");
        let view = render_order_detail(&order);
        assert_eq!(view.summary.total, "GH₵1,000.00");
        assert_eq!(view.summary.subtotal, "GH₵275.50");
        assert_eq!(view.summary.shipping, "GH₵20.00");
    }

    #[test]
    fn zero_shipping_is_free() {
        let mut order = fixtures::order(OrderStatus::Pending, created());
        order.pricing.shipping_price = price("0.00");
        assert_eq!(render_order_detail(&order).summary.shipping, "FREE");
    }

    #[test]
    fn line_totals_multiply_unit_price() {
        let view = render_order_detail(&fixtures::order(OrderStatus::Pending, created()));
        assert_eq!(view.items[0].unit_price, "GH₵120.00");
        assert_eq!(view.items[0].line_total, "GH₵240.00");
    }

    #[test]
    fn header_and_payment() {
        let mut order = fixtures::order(OrderStatus::Shipped, created());
        order.paid_at = Some(Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap());
        let view = render_order_detail(&order);
        assert_eq!(view.placed_on, "Monday, 1 January 2024 at 10:30");
        assert_eq!(view.payment.method, "Pay on Delivery");
        assert_eq!(view.payment.status, "Paid");
        assert_eq!(view.payment.paid_on.as_deref(), Some("Tuesday, 2 January 2024"));
        assert!(view.reference.starts_with('#'));
    }

    #[test]
    fn address_lines() {
        let view = render_order_detail(&fixtures::order(OrderStatus::Pending, created()));
        assert_eq!(view.shipping.name, "Ama Mensah");
        assert_eq!(view.shipping.lines[1], "Accra, Greater Accra");
        assert_eq!(view.shipping.lines.len(), 3);
    }
}
