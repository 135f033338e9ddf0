//! Cart

use rusty_money::{Money, MoneyError, iso::Currency};
use tracing::debug;

use crate::{
    items::{LineItem, LineItemError, LineItemId},
    pricing::{Price, total_price},
};

/// An ordered collection of line items belonging to one session.
#[derive(Debug, Clone)]
pub struct Cart {
    items: Vec<LineItem>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Append a line item, returning the id it is stored under.
    ///
    /// If the item's id is already present in the cart a fresh one is assigned.
    pub fn add(&mut self, mut item: LineItem) -> LineItemId {
        while self.contains(item.id()) {
            item.set_id(LineItemId::new());
        }

        let id = item.id();

        debug!(line_item = %id, quantity = item.quantity(), "added line item to cart");

        self.items.push(item);

        id
    }

    /// Remove a line item. Removing an id that is not in the cart does nothing.
    pub fn remove(&mut self, id: LineItemId) -> Option<LineItem> {
        let idx = self.items.iter().position(|item| item.id() == id)?;

        debug!(line_item = %id, "removed line item from cart");

        Some(self.items.remove(idx))
    }

    /// Change the quantity of a line item and reprice it.
    ///
    /// A quantity of zero removes the line item. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError::Overflow`] if the new total does not fit; the line
    /// item keeps its previous quantity.
    pub fn update_quantity(&mut self, id: LineItemId, quantity: u32) -> Result<(), LineItemError> {
        if quantity == 0 {
            self.remove(id);

            return Ok(());
        }

        if let Some(item) = self.items.iter_mut().find(|item| item.id() == id) {
            item.set_quantity(quantity)?;

            debug!(line_item = %id, quantity, "updated line item quantity");
        }

        Ok(())
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of every line item's total price.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if a line item is priced in another currency.
    pub fn total_price(&self) -> Result<Price, MoneyError> {
        if self.is_empty() {
            return Ok(Money::from_minor(0, self.currency));
        }

        total_price(self.items.iter().map(LineItem::total_price), self.currency)
    }

    /// Sum of every line item's quantity.
    pub fn total_item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Get a line item by id.
    pub fn get(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Check whether a line item is in the cart.
    pub fn contains(&self, id: LineItemId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate over the line items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    /// Line items in insertion order.
    pub fn line_items(&self) -> &[LineItem] {
        &self.items
    }

    /// Get the number of line items in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
