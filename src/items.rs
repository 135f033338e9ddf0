//! Line Items
//!
//! A line item is one configured entry in a cart: a snapshot of a menu item,
//! the add-ons chosen for it, how many units were ordered and any notes. Its
//! total price is always `(item price + Σ add-on price × add-on quantity) × quantity`.

use rusty_money::MoneyError;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogItem},
    pricing::{Price, checked_scale},
    uuids::TypedUuid,
};

/// Line item id
pub type LineItemId = TypedUuid<LineItem>;

/// Errors raised while building or repricing a line item.
#[derive(Debug, Error, PartialEq)]
pub enum LineItemError {
    /// Quantity must be at least one.
    #[error("line item quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),

    /// The menu item id does not exist in the catalog.
    #[error("unknown menu item: {0}")]
    UnknownItem(String),

    /// The add-on id does not exist in the catalog.
    #[error("unknown add-on: {0}")]
    UnknownAddOn(String),

    /// The price no longer fits in minor units.
    #[error("line item price overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A customer's choice of an add-on and how many of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedAddOn {
    /// Catalog add-on id
    pub add_on_id: String,

    /// Number of units; zero means not selected
    pub quantity: u32,
}

impl SelectedAddOn {
    /// Select `quantity` units of the given add-on.
    pub fn new(add_on_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            add_on_id: add_on_id.into(),
            quantity,
        }
    }
}

/// An add-on as captured on a line item.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemAddOn {
    /// Catalog add-on id
    pub add_on_id: String,

    /// Add-on name at the time of selection
    pub name: String,

    /// Add-on price at the time of selection
    pub price: Price,

    /// Units per line item unit
    pub quantity: u32,
}

/// One priced entry in a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    id: LineItemId,
    item: CatalogItem,
    add_ons: SmallVec<[LineItemAddOn; 4]>,
    quantity: u32,
    notes: Option<String>,
    unit_price: Price,
    total_price: Price,
}

impl LineItem {
    /// Unique id of this line item.
    pub fn id(&self) -> LineItemId {
        self.id
    }

    /// Snapshot of the menu item.
    pub fn item(&self) -> &CatalogItem {
        &self.item
    }

    /// Selected add-ons, in selection order.
    pub fn add_ons(&self) -> &[LineItemAddOn] {
        &self.add_ons
    }

    /// Number of units ordered.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Free-text notes from the customer.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Price of a single unit, including add-ons.
    pub fn unit_price(&self) -> Price {
        self.unit_price
    }

    /// Price of all units, including add-ons.
    pub fn total_price(&self) -> Price {
        self.total_price
    }

    /// Change the number of units and reprice.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError::InvalidQuantity`] for zero and
    /// [`LineItemError::Overflow`] if the new total does not fit. The line item is
    /// left untouched on error.
    pub fn set_quantity(&mut self, quantity: u32) -> Result<(), LineItemError> {
        if quantity == 0 {
            return Err(LineItemError::InvalidQuantity(quantity));
        }

        self.total_price = checked_scale(self.unit_price, quantity).ok_or(LineItemError::Overflow)?;
        self.quantity = quantity;

        Ok(())
    }

    pub(crate) fn set_id(&mut self, id: LineItemId) {
        self.id = id;
    }
}

/// Builds priced line items against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct LineItemBuilder<'c> {
    catalog: &'c Catalog,
}

impl<'c> LineItemBuilder<'c> {
    /// Create a builder resolving add-ons from the given catalog.
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    /// Build a line item for the menu item with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError::UnknownItem`] if the id is not in the catalog, and
    /// otherwise the same errors as [`LineItemBuilder::build`].
    pub fn build_by_id(
        &self,
        item_id: &str,
        selections: &[SelectedAddOn],
        quantity: u32,
        notes: Option<&str>,
    ) -> Result<LineItem, LineItemError> {
        let item = self
            .catalog
            .item(item_id)
            .ok_or_else(|| LineItemError::UnknownItem(item_id.to_string()))?;

        self.build(item, selections, quantity, notes)
    }

    /// Build a line item from a menu item and its add-on selections.
    ///
    /// Selections with a zero quantity are dropped. Repeated selections of the
    /// same add-on are merged into the first occurrence. Blank notes are dropped.
    ///
    /// # Errors
    ///
    /// - [`LineItemError::InvalidQuantity`]: `quantity` is zero.
    /// - [`LineItemError::UnknownAddOn`]: a selected add-on is not in the catalog.
    /// - [`LineItemError::Overflow`]: the total does not fit in minor units.
    /// - [`LineItemError::Money`]: an add-on is priced in another currency.
    pub fn build(
        &self,
        item: &CatalogItem,
        selections: &[SelectedAddOn],
        quantity: u32,
        notes: Option<&str>,
    ) -> Result<LineItem, LineItemError> {
        if quantity == 0 {
            return Err(LineItemError::InvalidQuantity(quantity));
        }

        let mut add_ons: SmallVec<[LineItemAddOn; 4]> = SmallVec::new();

        for selection in selections.iter().filter(|selection| selection.quantity > 0) {
            let add_on = self
                .catalog
                .add_on(&selection.add_on_id)
                .ok_or_else(|| LineItemError::UnknownAddOn(selection.add_on_id.clone()))?;

            if let Some(existing) = add_ons
                .iter_mut()
                .find(|existing| existing.add_on_id == add_on.id)
            {
                existing.quantity = existing
                    .quantity
                    .checked_add(selection.quantity)
                    .ok_or(LineItemError::Overflow)?;

                continue;
            }

            add_ons.push(LineItemAddOn {
                add_on_id: add_on.id.clone(),
                name: add_on.name.clone(),
                price: add_on.price,
                quantity: selection.quantity,
            });
        }

        let unit_price = unit_price(item.price, &add_ons)?;
        let total_price = checked_scale(unit_price, quantity).ok_or(LineItemError::Overflow)?;

        Ok(LineItem {
            id: LineItemId::new(),
            item: item.clone(),
            add_ons,
            quantity,
            notes: notes
                .map(str::trim)
                .filter(|notes| !notes.is_empty())
                .map(str::to_string),
            unit_price,
            total_price,
        })
    }
}

fn unit_price(item_price: Price, add_ons: &[LineItemAddOn]) -> Result<Price, LineItemError> {
    add_ons.iter().try_fold(item_price, |acc, add_on| {
        let extra = checked_scale(add_on.price, add_on.quantity).ok_or(LineItemError::Overflow)?;

        Ok(acc.add(extra)?)
    })
}
