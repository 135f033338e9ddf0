//! Composed Orders

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    items::LineItem,
    orders::{details::OrderDetails, summary::OrderSummary, totals::OrderTotals},
    recording::{LineItemAggregate, OrderReceipt, OrderRevenue},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<ComposedOrder>;

/// Fulfilment status. The only transition is pending to completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Received, not yet fulfilled
    #[default]
    Pending,

    /// Fulfilled
    Completed,
}

impl OrderStatus {
    /// Move to [`OrderStatus::Completed`]. Returns whether the status changed.
    pub fn complete(&mut self) -> bool {
        let changed = *self == Self::Pending;

        *self = Self::Completed;

        changed
    }
}

/// An order ready to be handed to the recorder, before it has a number.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    /// Snapshot of the cart at submission
    pub line_items: Vec<LineItem>,

    /// Customer and fulfilment details
    pub details: OrderDetails,

    /// Priced breakdown
    pub totals: OrderTotals,
}

impl NewOrder {
    /// Attach the identity assigned by the recorder.
    pub fn into_composed(self, receipt: OrderReceipt) -> ComposedOrder {
        ComposedOrder {
            uuid: receipt.uuid,
            order_number: receipt.order_number,
            created_at: receipt.created_at,
            status: OrderStatus::Pending,
            line_items: self.line_items,
            details: self.details,
            totals: self.totals,
        }
    }
}

/// A submitted, fully priced order.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedOrder {
    uuid: OrderUuid,
    order_number: u64,
    created_at: Timestamp,
    status: OrderStatus,
    line_items: Vec<LineItem>,
    details: OrderDetails,
    totals: OrderTotals,
}

impl ComposedOrder {
    /// Storage identity.
    pub fn uuid(&self) -> OrderUuid {
        self.uuid
    }

    /// Human-facing order number.
    pub fn order_number(&self) -> u64 {
        self.order_number
    }

    /// When the order was recorded.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Line items as they were at submission.
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// Customer and fulfilment details.
    pub fn details(&self) -> &OrderDetails {
        &self.details
    }

    /// Priced breakdown.
    pub fn totals(&self) -> &OrderTotals {
        &self.totals
    }

    /// Mark the order completed. Returns whether the status changed.
    pub fn complete(&mut self) -> bool {
        self.status.complete()
    }

    /// What this order contributes to revenue metrics.
    pub fn revenue(&self) -> OrderRevenue {
        OrderRevenue {
            total: self.totals.total,
            created_at: self.created_at,
        }
    }

    /// One sales row per line item.
    pub fn line_item_aggregates(&self) -> impl Iterator<Item = LineItemAggregate> + '_ {
        self.line_items.iter().map(|line| LineItemAggregate {
            name: line.item().name.clone(),
            quantity: u64::from(line.quantity()),
            revenue: line.total_price(),
        })
    }

    /// Render the order as the plain-text message sent to the restaurant.
    pub fn summary(&self, store_name: &str) -> String {
        OrderSummary::new(store_name, &self.line_items, &self.details, &self.totals).to_string()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::BRL};

    use crate::orders::details::DeliveryType;

    use super::*;

    fn order() -> ComposedOrder {
        let zero = Money::from_minor(0, BRL);

        NewOrder {
            line_items: Vec::new(),
            details: OrderDetails::default(),
            totals: OrderTotals {
                delivery_type: DeliveryType::Pickup,
                subtotal: zero,
                delivery_fee: zero,
                total: zero,
            },
        }
        .into_composed(OrderReceipt {
            uuid: OrderUuid::new(),
            order_number: 7,
            created_at: Timestamp::UNIX_EPOCH,
        })
    }

    #[test]
    fn new_orders_are_pending() {
        let order = order();

        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.order_number(), 7);
        assert_eq!(order.created_at(), Timestamp::UNIX_EPOCH);
    }

    #[test]
    fn completion_is_one_way() {
        let mut order = order();

        assert!(order.complete(), "first completion should change status");
        assert!(!order.complete(), "second completion should be a no-op");
        assert_eq!(order.status(), OrderStatus::Completed);
    }
}
