//! Storefront
//!
//! Cart pricing and order composition for a single-restaurant online menu:
//! customers build priced line items from the catalog, review their cart and
//! submit it as an order, and the merchant reads sales metrics from the
//! recorded history.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod items;
pub mod metrics;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod recording;
pub mod uuids;
