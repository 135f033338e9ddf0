//! Order Totals

use rusty_money::{Money, MoneyError};

use crate::{cart::Cart, orders::details::DeliveryType, pricing::Price};

/// Priced breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    /// How the order is fulfilled
    pub delivery_type: DeliveryType,

    /// Sum of every line item
    pub subtotal: Price,

    /// Delivery fee, zero for pickup
    pub delivery_fee: Price,

    /// Amount the customer pays
    pub total: Price,
}

impl OrderTotals {
    /// Calculate totals for a cart, charging `delivery_fee` only for delivery.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the cart and fee currencies differ.
    pub fn calculate(
        cart: &Cart,
        delivery_type: DeliveryType,
        delivery_fee: Price,
    ) -> Result<Self, MoneyError> {
        let subtotal = cart.total_price()?;

        let delivery_fee = match delivery_type {
            DeliveryType::Delivery => delivery_fee,
            DeliveryType::Pickup => Money::from_minor(0, delivery_fee.currency()),
        };

        Ok(Self {
            delivery_type,
            subtotal,
            delivery_fee,
            total: subtotal.add(delivery_fee)?,
        })
    }

    /// Whether the delivery fee applies, even when it is configured as zero.
    pub fn has_delivery_fee(&self) -> bool {
        self.delivery_type == DeliveryType::Delivery
    }
}
