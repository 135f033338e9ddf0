//! Persisted order records
//!
//! Flat shapes for storage backends. Monetary fields are integer minor units,
//! i.e. fixed two-place precision for the supported currencies.

use jiff::Timestamp;
use rusty_money::iso::Currency;

use crate::{
    items::{LineItem, LineItemAddOn},
    orders::{ComposedOrder, DeliveryType, OrderStatus, OrderUuid, PaymentMethod},
};

/// Order row
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    /// Order id
    pub uuid: OrderUuid,

    /// Order number
    pub order_number: u64,

    /// Creation time
    pub created_at: Timestamp,

    /// Fulfilment status
    pub status: OrderStatus,

    /// Delivery or pickup
    pub delivery_type: DeliveryType,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Customer name
    pub customer_name: String,

    /// Customer phone
    pub customer_phone: String,

    /// Delivery address
    pub address: Option<String>,

    /// Notes
    pub notes: Option<String>,

    /// Currency of every amount
    pub currency: &'static Currency,

    /// Subtotal in minor units
    pub subtotal: i64,

    /// Delivery fee in minor units
    pub delivery_fee: i64,

    /// Total in minor units
    pub total: i64,

    /// Line items
    pub items: Vec<LineItemRecord>,
}

/// Line item row, owned by an [`OrderRecord`]
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemRecord {
    /// Menu item id
    pub menu_item_id: String,

    /// Menu item name
    pub menu_item_name: String,

    /// Menu item price in minor units
    pub menu_item_price: i64,

    /// Units
    pub quantity: u32,

    /// Line total in minor units
    pub total_price: i64,

    /// Notes
    pub notes: Option<String>,

    /// Add-ons
    pub add_ons: Vec<AddOnRecord>,
}

/// Add-on row, owned by a [`LineItemRecord`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOnRecord {
    /// Add-on name
    pub name: String,

    /// Add-on price in minor units
    pub price: i64,

    /// Units
    pub quantity: u32,
}

impl From<&ComposedOrder> for OrderRecord {
    fn from(order: &ComposedOrder) -> Self {
        let details = order.details();
        let totals = order.totals();

        Self {
            uuid: order.uuid(),
            order_number: order.order_number(),
            created_at: order.created_at(),
            status: order.status(),
            delivery_type: details.delivery_type,
            payment_method: details.payment_method,
            customer_name: details.customer_name.trim().to_string(),
            customer_phone: details.customer_phone.trim().to_string(),
            address: details.delivery_address().map(str::to_string),
            notes: details.order_notes().map(str::to_string),
            currency: totals.total.currency(),
            subtotal: totals.subtotal.to_minor_units(),
            delivery_fee: totals.delivery_fee.to_minor_units(),
            total: totals.total.to_minor_units(),
            items: order.line_items().iter().map(LineItemRecord::from).collect(),
        }
    }
}

impl From<&LineItem> for LineItemRecord {
    fn from(line: &LineItem) -> Self {
        Self {
            menu_item_id: line.item().id.clone(),
            menu_item_name: line.item().name.clone(),
            menu_item_price: line.item().price.to_minor_units(),
            quantity: line.quantity(),
            total_price: line.total_price().to_minor_units(),
            notes: line.notes().map(str::to_string),
            add_ons: line.add_ons().iter().map(AddOnRecord::from).collect(),
        }
    }
}

impl From<&LineItemAddOn> for AddOnRecord {
    fn from(add_on: &LineItemAddOn) -> Self {
        Self {
            name: add_on.name.clone(),
            price: add_on.price.to_minor_units(),
            quantity: add_on.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::BRL};
    use testresult::TestResult;

    use crate::{
        cart::Cart,
        catalog::Catalog,
        items::{LineItemBuilder, SelectedAddOn},
        orders::{NewOrder, OrderDetails, OrderTotals},
        recording::OrderReceipt,
    };

    use super::*;

    #[test]
    fn record_flattens_order_into_minor_units() -> TestResult {
        let catalog = Catalog::bundled()?;
        let mut cart = Cart::new(BRL);

        cart.add(LineItemBuilder::new(&catalog).build_by_id(
            "1",
            &[SelectedAddOn::new("bacon", 1)],
            2,
            Some("bem passado"),
        )?);

        let details = OrderDetails {
            delivery_type: DeliveryType::Delivery,
            customer_name: " Ana ".to_string(),
            customer_phone: "123".to_string(),
            address: Some("Rua A".to_string()),
            ..OrderDetails::default()
        };
        let totals = OrderTotals::calculate(&cart, details.delivery_type, Money::from_minor(3_00, BRL))?;

        let order = NewOrder {
            line_items: cart.line_items().to_vec(),
            details,
            totals,
        }
        .into_composed(OrderReceipt {
            uuid: OrderUuid::new(),
            order_number: 1,
            created_at: Timestamp::UNIX_EPOCH,
        });

        let record = OrderRecord::from(&order);

        assert_eq!(record.customer_name, "Ana");
        assert_eq!(record.subtotal, 60_00);
        assert_eq!(record.delivery_fee, 3_00);
        assert_eq!(record.total, 63_00);

        let item = record.items.first().ok_or("missing line item")?;

        assert_eq!(item.menu_item_price, 25_00);
        assert_eq!(item.total_price, 60_00);
        assert_eq!(item.notes.as_deref(), Some("bem passado"));
        assert_eq!(
            item.add_ons,
            vec![AddOnRecord {
                name: "Bacon".to_string(),
                price: 5_00,
                quantity: 1,
            }]
        );

        Ok(())
    }
}
