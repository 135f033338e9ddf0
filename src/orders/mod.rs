//! Orders
//!
//! Checkout: validating customer details, pricing the cart with the delivery
//! fee, rendering the order message and recording the order.

pub mod composer;
pub mod details;
pub mod order;
pub mod session;
pub mod summary;
pub mod totals;

pub use composer::{OrderComposer, SubmitError};
pub use details::{DeliveryType, OrderDetails, PaymentMethod, ValidationError};
pub use order::{ComposedOrder, NewOrder, OrderStatus, OrderUuid};
pub use session::Session;
pub use summary::OrderSummary;
pub use totals::OrderTotals;
