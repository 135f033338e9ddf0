//! In-memory order recorder

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::RwLock;
use tracing::info;

use crate::{
    orders::{ComposedOrder, NewOrder, OrderStatus, OrderUuid},
    recording::{
        LineItemAggregate, OrderReceipt, OrderRecorder, OrderRevenue, RecordingError,
        records::OrderRecord,
    },
};

#[derive(Debug, Default)]
struct RecorderState {
    last_order_number: u64,
    orders: Vec<ComposedOrder>,
}

/// An [`OrderRecorder`] that keeps every order in process memory.
///
/// Each order is inserted with all of its line items and add-ons under a single
/// write lock, so readers never see a partially recorded order.
#[derive(Debug, Default)]
pub struct InMemoryOrderRecorder {
    state: RwLock<RecorderState>,
}

impl InMemoryOrderRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an order with an explicit creation time.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::Storage`] if the order number space is exhausted.
    pub async fn persist_at(
        &self,
        order: NewOrder,
        created_at: Timestamp,
    ) -> Result<OrderReceipt, RecordingError> {
        let mut state = self.state.write().await;

        let order_number = state
            .last_order_number
            .checked_add(1)
            .ok_or_else(|| RecordingError::Storage("order numbers exhausted".to_string()))?;

        let receipt = OrderReceipt {
            uuid: OrderUuid::new(),
            order_number,
            created_at,
        };

        state.orders.push(order.into_composed(receipt));
        state.last_order_number = order_number;

        info!(order_uuid = %receipt.uuid, order_number, "recorded order");

        Ok(receipt)
    }

    /// Number of recorded orders.
    pub async fn len(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Whether no orders have been recorded.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.orders.is_empty()
    }

    /// Persisted record of an order, if it exists.
    pub async fn record(&self, uuid: OrderUuid) -> Option<OrderRecord> {
        self.state
            .read()
            .await
            .orders
            .iter()
            .find(|order| order.uuid() == uuid)
            .map(OrderRecord::from)
    }
}

#[async_trait]
impl OrderRecorder for InMemoryOrderRecorder {
    async fn persist(&self, order: NewOrder) -> Result<OrderReceipt, RecordingError> {
        self.persist_at(order, Timestamp::now()).await
    }

    async fn mark_completed(&self, uuid: OrderUuid) -> Result<(), RecordingError> {
        let mut state = self.state.write().await;

        let order = state
            .orders
            .iter_mut()
            .find(|order| order.uuid() == uuid)
            .ok_or(RecordingError::NotFound(uuid))?;

        if order.complete() {
            info!(order_uuid = %uuid, "completed order");
        }

        Ok(())
    }

    async fn list_pending(&self, limit: usize) -> Result<Vec<ComposedOrder>, RecordingError> {
        let state = self.state.read().await;

        let mut pending: Vec<&ComposedOrder> = state
            .orders
            .iter()
            .filter(|order| order.status() == OrderStatus::Pending)
            .collect();

        pending.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.order_number().cmp(&a.order_number()))
        });

        Ok(pending.into_iter().take(limit).cloned().collect())
    }

    async fn orders_since(&self, since: Timestamp) -> Result<Vec<OrderRevenue>, RecordingError> {
        let state = self.state.read().await;

        Ok(state
            .orders
            .iter()
            .filter(|order| order.created_at() >= since)
            .map(ComposedOrder::revenue)
            .collect())
    }

    async fn line_item_aggregates(&self) -> Result<Vec<LineItemAggregate>, RecordingError> {
        let state = self.state.read().await;

        Ok(state
            .orders
            .iter()
            .flat_map(ComposedOrder::line_item_aggregates)
            .collect())
    }
}
