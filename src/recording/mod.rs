//! Order Recording
//!
//! The storage boundary for submitted orders. Implementations must make an
//! order, its line items and their add-ons visible to readers all at once or
//! not at all.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use thiserror::Error;

use crate::{
    orders::{ComposedOrder, NewOrder, OrderUuid},
    pricing::Price,
};

pub mod memory;
pub mod records;

pub use memory::InMemoryOrderRecorder;

/// Order recording errors
#[derive(Debug, Error)]
pub enum RecordingError {
    /// The storage backend failed; nothing was written.
    #[error("storage error: {0}")]
    Storage(String),

    /// No order exists with the given id.
    #[error("order {0} not found")]
    NotFound(OrderUuid),
}

/// Identity assigned to an order when it is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderReceipt {
    /// Storage identity
    pub uuid: OrderUuid,

    /// Sequential, human-facing order number
    pub order_number: u64,

    /// When the order was recorded
    pub created_at: Timestamp,
}

/// Revenue contributed by a single order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderRevenue {
    /// Order total
    pub total: Price,

    /// When the order was recorded
    pub created_at: Timestamp,
}

/// Sales of one recorded line item.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemAggregate {
    /// Menu item name
    pub name: String,

    /// Units sold
    pub quantity: u64,

    /// Line total
    pub revenue: Price,
}

/// Storage for submitted orders.
#[automock]
#[async_trait]
pub trait OrderRecorder: Send + Sync {
    /// Record an order with its line items and add-ons in one atomic write.
    async fn persist(&self, order: NewOrder) -> Result<OrderReceipt, RecordingError>;

    /// Mark an order completed. Completing a completed order is a no-op.
    async fn mark_completed(&self, order: OrderUuid) -> Result<(), RecordingError>;

    /// Pending orders, most recent first.
    async fn list_pending(&self, limit: usize) -> Result<Vec<ComposedOrder>, RecordingError>;

    /// Revenue of every order recorded at or after `since`.
    async fn orders_since(&self, since: Timestamp) -> Result<Vec<OrderRevenue>, RecordingError>;

    /// Sales of every recorded line item.
    async fn line_item_aggregates(&self) -> Result<Vec<LineItemAggregate>, RecordingError>;
}
