//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::Cart,
    catalog::{AddOn, Catalog, CatalogError, CatalogItem},
    config::{ConfigError, StorefrontConfig},
    items::{LineItem, LineItemAddOn, LineItemBuilder, LineItemError, LineItemId, SelectedAddOn},
    metrics::{
        DailyRevenue, MetricsAggregator, MetricsError, MetricsSnapshot, MonthlyRevenue, TopItem,
        YearMonth,
    },
    orders::{
        ComposedOrder, DeliveryType, NewOrder, OrderComposer, OrderDetails, OrderStatus,
        OrderSummary, OrderTotals, OrderUuid, PaymentMethod, Session, SubmitError,
        ValidationError,
    },
    pricing::{Price, PriceParseError, format_price, parse_price},
    recording::{
        InMemoryOrderRecorder, LineItemAggregate, OrderReceipt, OrderRecorder, OrderRevenue,
        RecordingError,
    },
};
