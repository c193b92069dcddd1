//! Display-only projections of stored orders. Nothing here is persisted.

pub mod badge;
pub mod format;
pub mod order_detail;
pub mod progress;

pub use order_detail::{render_order_detail, OrderDetailView};
