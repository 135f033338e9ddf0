//! Session

use std::sync::Arc;

use rusty_money::MoneyError;

use crate::{
    cart::Cart,
    orders::{
        composer::{OrderComposer, SubmitError},
        details::{DeliveryType, OrderDetails},
        order::ComposedOrder,
        totals::OrderTotals,
    },
};

/// One customer's shopping session: a single cart and the composer that checks it out.
///
/// Submitting borrows the session mutably, so a cart can never have two
/// submissions in flight at once.
#[derive(Debug)]
pub struct Session {
    cart: Cart,
    composer: Arc<OrderComposer>,
}

impl Session {
    /// Start a session with an empty cart.
    pub fn new(composer: Arc<OrderComposer>) -> Self {
        Self {
            cart: Cart::new(composer.currency()),
            composer,
        }
    }

    /// The session's cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The session's cart, for adding, removing and updating line items.
    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Totals for the current cart.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the cart is priced in another currency.
    pub fn totals(&self, delivery_type: DeliveryType) -> Result<OrderTotals, MoneyError> {
        self.composer.compute_totals(&self.cart, delivery_type)
    }

    /// The message that would be sent for the current cart.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the cart is priced in another currency.
    pub fn preview(&self, details: &OrderDetails) -> Result<String, MoneyError> {
        let totals = self.totals(details.delivery_type)?;

        Ok(self.composer.render_summary(&self.cart, details, &totals))
    }

    /// Check out the cart.
    ///
    /// # Errors
    ///
    /// See [`OrderComposer::submit`].
    pub async fn submit(&mut self, details: &OrderDetails) -> Result<ComposedOrder, SubmitError> {
        self.composer.submit(&mut self.cart, details).await
    }
}
