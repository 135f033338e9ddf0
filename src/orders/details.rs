//! Order Details

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons an order cannot be submitted with the given customer details.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Customer name or phone is empty.
    #[error("customer name and phone are required")]
    MissingCustomerInfo,

    /// Delivery was chosen without an address.
    #[error("an address is required for delivery")]
    MissingAddress,
}

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    /// Delivered to the customer's address, incurring the delivery fee.
    Delivery,

    /// Collected by the customer at the restaurant.
    #[default]
    Pickup,
}

impl DeliveryType {
    /// Customer-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Delivery => "Delivery",
            Self::Pickup => "Retirada",
        }
    }
}

/// How the customer intends to pay on receipt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash
    #[default]
    Cash,

    /// PIX instant transfer
    Pix,

    /// Credit or debit card
    Card,
}

impl PaymentMethod {
    /// Customer-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cash => "Dinheiro",
            Self::Pix => "PIX",
            Self::Card => "Cartão",
        }
    }
}

/// Customer and fulfilment details collected at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    /// Delivery or pickup
    pub delivery_type: DeliveryType,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Customer name
    pub customer_name: String,

    /// Customer phone
    pub customer_phone: String,

    /// Delivery address, required for delivery
    #[serde(default)]
    pub address: Option<String>,

    /// Order-level notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl OrderDetails {
    /// Check the details are complete enough to submit an order.
    ///
    /// Whitespace-only values count as empty.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingCustomerInfo`]: name or phone is empty.
    /// - [`ValidationError::MissingAddress`]: delivery without an address.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.customer_name) || is_blank(&self.customer_phone) {
            return Err(ValidationError::MissingCustomerInfo);
        }

        if self.delivery_type == DeliveryType::Delivery && self.delivery_address().is_none() {
            return Err(ValidationError::MissingAddress);
        }

        Ok(())
    }

    /// The address, only when the order is for delivery and one was given.
    pub fn delivery_address(&self) -> Option<&str> {
        match self.delivery_type {
            DeliveryType::Delivery => non_blank(self.address.as_deref()),
            DeliveryType::Pickup => None,
        }
    }

    /// Order notes, if any were given.
    pub fn order_notes(&self) -> Option<&str> {
        non_blank(self.notes.as_deref())
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
