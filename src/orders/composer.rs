//! Order Composer

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use rusty_money::{MoneyError, iso::Currency};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::Cart,
    config::StorefrontConfig,
    orders::{
        details::{DeliveryType, OrderDetails, ValidationError},
        order::{ComposedOrder, NewOrder},
        summary::OrderSummary,
        totals::OrderTotals,
    },
    pricing::Price,
    recording::{OrderRecorder, RecordingError},
};

/// Reasons a submission did not produce an order. The cart is left untouched.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Customer details are incomplete.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// There is nothing to order.
    #[error("cannot submit an empty cart")]
    EmptyCart,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// The recorder rejected the order.
    #[error("failed to record order: {0}")]
    Recording(#[from] RecordingError),
}

/// Turns a cart and checkout details into a priced, recorded order.
pub struct OrderComposer {
    recorder: Arc<dyn OrderRecorder>,
    delivery_fee: Price,
    store_name: String,
}

impl Debug for OrderComposer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OrderComposer")
            .field("delivery_fee", &self.delivery_fee)
            .field("store_name", &self.store_name)
            .finish_non_exhaustive()
    }
}

impl OrderComposer {
    /// Create a composer recording orders through `recorder`.
    pub fn new(recorder: Arc<dyn OrderRecorder>, config: &StorefrontConfig) -> Self {
        Self {
            recorder,
            delivery_fee: config.delivery_fee(),
            store_name: config.store_name().to_string(),
        }
    }

    /// The fixed fee charged for delivery orders.
    pub fn delivery_fee(&self) -> Price {
        self.delivery_fee
    }

    /// Currency orders are priced in.
    pub fn currency(&self) -> &'static Currency {
        self.delivery_fee.currency()
    }

    /// Check the details are complete enough to submit.
    ///
    /// # Errors
    ///
    /// See [`OrderDetails::validate`].
    pub fn validate(&self, details: &OrderDetails) -> Result<(), ValidationError> {
        details.validate()
    }

    /// Subtotal, delivery fee and total for a cart.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the cart is priced in another currency.
    pub fn compute_totals(
        &self,
        cart: &Cart,
        delivery_type: DeliveryType,
    ) -> Result<OrderTotals, MoneyError> {
        OrderTotals::calculate(cart, delivery_type, self.delivery_fee)
    }

    /// Render the message describing an order for the restaurant.
    pub fn render_summary(&self, cart: &Cart, details: &OrderDetails, totals: &OrderTotals) -> String {
        OrderSummary::new(&self.store_name, cart.line_items(), details, totals).to_string()
    }

    /// Validate, price and record an order, then empty the cart.
    ///
    /// The cart is only cleared once the recorder has acknowledged the order; on
    /// any error it is left exactly as it was so the customer can retry.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Validation`]: the details are incomplete.
    /// - [`SubmitError::EmptyCart`]: the cart has no line items.
    /// - [`SubmitError::Money`]: prices are in mixed currencies.
    /// - [`SubmitError::Recording`]: the recorder failed.
    #[tracing::instrument(
        name = "orders.composer.submit",
        skip(self, cart, details),
        fields(
            delivery_type = ?details.delivery_type,
            line_items = cart.len(),
            order_number = tracing::field::Empty
        ),
        err
    )]
    pub async fn submit(
        &self,
        cart: &mut Cart,
        details: &OrderDetails,
    ) -> Result<ComposedOrder, SubmitError> {
        self.validate(details)?;

        if cart.is_empty() {
            return Err(SubmitError::EmptyCart);
        }

        let totals = self.compute_totals(cart, details.delivery_type)?;

        let order = NewOrder {
            line_items: cart.line_items().to_vec(),
            details: details.clone(),
            totals,
        };

        let receipt = match self.recorder.persist(order.clone()).await {
            Ok(receipt) => receipt,
            Err(error) => {
                warn!(%error, "order was not recorded; cart kept for retry");

                return Err(error.into());
            }
        };

        tracing::Span::current().record("order_number", receipt.order_number);

        cart.clear();

        info!(order_uuid = %receipt.uuid, order_number = receipt.order_number, "submitted order");

        Ok(order.into_composed(receipt))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::BRL};
    use testresult::TestResult;

    use crate::{
        catalog::Catalog,
        items::LineItemBuilder,
        recording::{InMemoryOrderRecorder, MockOrderRecorder},
    };

    use super::*;

    fn details() -> OrderDetails {
        OrderDetails {
            customer_name: "Ana".to_string(),
            customer_phone: "123".to_string(),
            ..OrderDetails::default()
        }
    }

    fn cart() -> TestResult<Cart> {
        let catalog = Catalog::bundled()?;
        let mut cart = Cart::new(BRL);

        cart.add(LineItemBuilder::new(&catalog).build_by_id("1", &[], 1, None)?);

        Ok(cart)
    }

    fn composer(recorder: Arc<dyn OrderRecorder>) -> OrderComposer {
        OrderComposer::new(recorder, &StorefrontConfig::default())
    }

    #[tokio::test]
    async fn submit_records_order_and_clears_cart() -> TestResult {
        let recorder = Arc::new(InMemoryOrderRecorder::new());
        let composer = composer(recorder.clone());
        let mut cart = cart()?;

        let order = composer.submit(&mut cart, &details()).await?;

        assert!(cart.is_empty());
        assert_eq!(order.order_number(), 1);
        assert_eq!(order.totals().total, Money::from_minor(25_00, BRL));
        assert_eq!(order.line_items().len(), 1);
        assert_eq!(recorder.len().await, 1);

        Ok(())
    }

    #[tokio::test]
    async fn invalid_details_never_reach_the_recorder() -> TestResult {
        let mut recorder = MockOrderRecorder::new();
        recorder.expect_persist().never();

        let composer = composer(Arc::new(recorder));
        let mut cart = cart()?;
        let details = OrderDetails {
            customer_name: String::new(),
            ..details()
        };

        let result = composer.submit(&mut cart, &details).await;

        assert!(
            matches!(
                result,
                Err(SubmitError::Validation(ValidationError::MissingCustomerInfo))
            ),
            "expected MissingCustomerInfo, got {result:?}"
        );
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_is_rejected() {
        let mut recorder = MockOrderRecorder::new();
        recorder.expect_persist().never();

        let composer = composer(Arc::new(recorder));
        let mut cart = Cart::new(BRL);

        let result = composer.submit(&mut cart, &details()).await;

        assert!(
            matches!(result, Err(SubmitError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );
    }

    #[tokio::test]
    async fn storage_failure_keeps_cart() -> TestResult {
        let mut recorder = MockOrderRecorder::new();
        recorder
            .expect_persist()
            .times(1)
            .returning(|_| Err(RecordingError::Storage("connection reset".to_string())));

        let composer = composer(Arc::new(recorder));
        let mut cart = cart()?;
        let before = cart.line_items().to_vec();

        let result = composer.submit(&mut cart, &details()).await;

        assert!(
            matches!(result, Err(SubmitError::Recording(RecordingError::Storage(_)))),
            "expected storage error, got {result:?}"
        );
        assert_eq!(cart.line_items(), before.as_slice());

        Ok(())
    }

    #[test]
    fn render_summary_uses_configured_store_name() -> TestResult {
        let composer = composer(Arc::new(InMemoryOrderRecorder::new()));
        let cart = cart()?;
        let totals = composer.compute_totals(&cart, DeliveryType::Pickup)?;

        let message = composer.render_summary(&cart, &details(), &totals);

        assert!(message.starts_with("🍔 *NOVO PEDIDO - NA BRASA BURGUER*"), "{message}");

        Ok(())
    }
}
