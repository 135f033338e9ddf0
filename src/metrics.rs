//! Sales metrics
//!
//! Read-only reporting over recorded orders: totals, best sellers and revenue
//! series bucketed by calendar day and month. Calendar dates are taken in a
//! single fixed UTC offset, and both series always have one entry per day or
//! month in the window, oldest first, so charts stay continuous.

use std::{
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    sync::Arc,
};

use jiff::{Timestamp, ToSpan, civil::Date, tz::Offset};
use rustc_hash::FxHashMap;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    config::StorefrontConfig,
    pricing::{Price, total_price},
    recording::{LineItemAggregate, OrderRecorder, OrderRevenue, RecordingError},
};

/// Errors raised while computing metrics.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// The recorder could not be queried.
    #[error("failed to query orders: {0}")]
    Recording(#[from] RecordingError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// A window reached past the supported calendar range.
    #[error("calendar error: {0}")]
    Calendar(#[from] jiff::Error),

    /// Summed quantities no longer fit.
    #[error("quantity overflowed")]
    Overflow,
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i16,
    month: i8,
}

impl YearMonth {
    /// The month containing `date`.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Year
    pub fn year(self) -> i16 {
        self.year
    }

    /// Month, 1 to 12
    pub fn month(self) -> i8 {
        self.month
    }

    /// The month before this one.
    ///
    /// # Errors
    ///
    /// Returns an error if the previous month is before the supported calendar range.
    pub fn previous(self) -> Result<Self, jiff::Error> {
        let first = Date::new(self.year, self.month, 1)?;

        Ok(Self::from_date(first.checked_sub(1.month())?))
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Revenue for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRevenue {
    /// Day
    pub date: Date,

    /// Sum of order totals
    pub revenue: Price,
}

/// Revenue for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyRevenue {
    /// Month
    pub month: YearMonth,

    /// Sum of order totals
    pub revenue: Price,
}

/// A best-selling menu item.
#[derive(Debug, Clone, PartialEq)]
pub struct TopItem {
    /// Menu item name
    pub name: String,

    /// Units sold
    pub quantity: u64,

    /// Revenue from those units
    pub revenue: Price,
}

impl TopItem {
    /// Average revenue per unit, rounded down to the minor unit.
    pub fn average_price(&self) -> Option<Price> {
        let quantity = i64::try_from(self.quantity).ok()?;
        let minor = self.revenue.to_minor_units().checked_div(quantity)?;

        Some(Money::from_minor(minor, self.revenue.currency()))
    }
}

/// Dashboard figures derived from the order history.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    /// Number of recorded orders
    pub total_orders: usize,

    /// Sum of every order total
    pub total_revenue: Price,

    /// Best sellers by units sold
    pub top_items: Vec<TopItem>,

    /// Trailing daily revenue, oldest first
    pub daily_revenue: Vec<DailyRevenue>,

    /// Trailing monthly revenue, oldest first
    pub monthly_revenue: Vec<MonthlyRevenue>,
}

/// Sum the totals of the given orders.
///
/// # Errors
///
/// Returns a [`MoneyError`] if an order is in another currency.
pub fn total_revenue(
    orders: &[OrderRevenue],
    currency: &'static Currency,
) -> Result<Price, MoneyError> {
    total_price(orders.iter().map(|order| order.total), currency)
}

/// Group line item sales by name and rank by units sold, keeping the top `n`.
///
/// Items selling the same number of units keep the order they were first seen in.
///
/// # Errors
///
/// Returns an error if revenues are in mixed currencies or quantities overflow.
pub fn top_items(aggregates: &[LineItemAggregate], n: usize) -> Result<Vec<TopItem>, MetricsError> {
    let mut items: Vec<TopItem> = Vec::new();
    let mut positions: FxHashMap<&str, usize> = FxHashMap::default();

    for aggregate in aggregates {
        let existing = positions
            .get(aggregate.name.as_str())
            .and_then(|idx| items.get_mut(*idx));

        if let Some(item) = existing {
            item.quantity = item
                .quantity
                .checked_add(aggregate.quantity)
                .ok_or(MetricsError::Overflow)?;
            item.revenue = item.revenue.add(aggregate.revenue)?;
        } else {
            positions.insert(aggregate.name.as_str(), items.len());
            items.push(TopItem {
                name: aggregate.name.clone(),
                quantity: aggregate.quantity,
                revenue: aggregate.revenue,
            });
        }
    }

    items.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    items.truncate(n);

    Ok(items)
}

/// Revenue for each of the `days` calendar days ending on `today`.
///
/// Orders outside the window are ignored; days without orders are zero.
///
/// # Errors
///
/// Returns an error if the window runs past the calendar's start or revenues
/// are in mixed currencies.
pub fn daily_revenue(
    orders: &[OrderRevenue],
    today: Date,
    days: usize,
    offset: Offset,
    currency: &'static Currency,
) -> Result<Vec<DailyRevenue>, MetricsError> {
    let zero = Money::from_minor(0, currency);
    let mut buckets = Vec::new();
    let mut date = today;

    for idx in 0..days {
        if idx > 0 {
            date = date.yesterday()?;
        }

        buckets.push(DailyRevenue {
            date,
            revenue: zero,
        });
    }

    buckets.reverse();

    let positions: FxHashMap<Date, usize> = buckets
        .iter()
        .enumerate()
        .map(|(idx, bucket)| (bucket.date, idx))
        .collect();

    for order in orders {
        let date = offset.to_datetime(order.created_at).date();

        if let Some(bucket) = positions.get(&date).and_then(|idx| buckets.get_mut(*idx)) {
            bucket.revenue = bucket.revenue.add(order.total)?;
        }
    }

    Ok(buckets)
}

/// Revenue for each of the `months` calendar months ending with `this_month`.
///
/// Orders outside the window are ignored; months without orders are zero.
///
/// # Errors
///
/// Returns an error if the window runs past the calendar's start or revenues
/// are in mixed currencies.
pub fn monthly_revenue(
    orders: &[OrderRevenue],
    this_month: YearMonth,
    months: usize,
    offset: Offset,
    currency: &'static Currency,
) -> Result<Vec<MonthlyRevenue>, MetricsError> {
    let zero = Money::from_minor(0, currency);
    let mut buckets = Vec::new();
    let mut month = this_month;

    for idx in 0..months {
        if idx > 0 {
            month = month.previous()?;
        }

        buckets.push(MonthlyRevenue {
            month,
            revenue: zero,
        });
    }

    buckets.reverse();

    let positions: FxHashMap<YearMonth, usize> = buckets
        .iter()
        .enumerate()
        .map(|(idx, bucket)| (bucket.month, idx))
        .collect();

    for order in orders {
        let month = YearMonth::from_date(offset.to_datetime(order.created_at).date());

        if let Some(bucket) = positions.get(&month).and_then(|idx| buckets.get_mut(*idx)) {
            bucket.revenue = bucket.revenue.add(order.total)?;
        }
    }

    Ok(buckets)
}

/// Computes dashboard metrics from an [`OrderRecorder`].
pub struct MetricsAggregator {
    recorder: Arc<dyn OrderRecorder>,
    currency: &'static Currency,
    offset: Offset,
    daily_window: usize,
    monthly_window: usize,
    top_items: usize,
}

impl Debug for MetricsAggregator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MetricsAggregator")
            .field("currency", &self.currency.iso_alpha_code)
            .field("offset", &self.offset)
            .field("daily_window", &self.daily_window)
            .field("monthly_window", &self.monthly_window)
            .field("top_items", &self.top_items)
            .finish_non_exhaustive()
    }
}

impl MetricsAggregator {
    /// Create an aggregator reading from `recorder`.
    pub fn new(recorder: Arc<dyn OrderRecorder>, config: &StorefrontConfig) -> Self {
        Self {
            recorder,
            currency: config.currency(),
            offset: config.utc_offset(),
            daily_window: config.daily_window(),
            monthly_window: config.monthly_window(),
            top_items: config.top_items(),
        }
    }

    /// The calendar date of `now` in the configured offset.
    pub fn today(&self, now: Timestamp) -> Date {
        self.offset.to_datetime(now).date()
    }

    /// Number of orders and their combined revenue.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorder fails or revenues are in mixed currencies.
    pub async fn totals(&self) -> Result<(usize, Price), MetricsError> {
        let orders = self.recorder.orders_since(Timestamp::MIN).await?;

        Ok((orders.len(), total_revenue(&orders, self.currency)?))
    }

    /// The `n` best-selling items.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorder fails or the aggregates cannot be summed.
    pub async fn top_items(&self, n: usize) -> Result<Vec<TopItem>, MetricsError> {
        let aggregates = self.recorder.line_item_aggregates().await?;

        top_items(&aggregates, n)
    }

    /// Revenue for each of the trailing `days` days up to `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorder fails or the window is out of range.
    pub async fn daily_revenue(
        &self,
        now: Timestamp,
        days: usize,
    ) -> Result<Vec<DailyRevenue>, MetricsError> {
        let orders = self.recorder.orders_since(Timestamp::MIN).await?;

        daily_revenue(&orders, self.today(now), days, self.offset, self.currency)
    }

    /// Revenue for each of the trailing `months` months up to `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorder fails or the window is out of range.
    pub async fn monthly_revenue(
        &self,
        now: Timestamp,
        months: usize,
    ) -> Result<Vec<MonthlyRevenue>, MetricsError> {
        let orders = self.recorder.orders_since(Timestamp::MIN).await?;
        let this_month = YearMonth::from_date(self.today(now));

        monthly_revenue(&orders, this_month, months, self.offset, self.currency)
    }

    /// Every dashboard figure, with windows ending at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if any recorder query fails; no partial snapshot is returned.
    #[tracing::instrument(name = "metrics.aggregator.snapshot", skip(self), err)]
    pub async fn snapshot(&self, now: Timestamp) -> Result<MetricsSnapshot, MetricsError> {
        let orders = self.recorder.orders_since(Timestamp::MIN).await?;
        let aggregates = self.recorder.line_item_aggregates().await?;
        let today = self.today(now);

        let snapshot = MetricsSnapshot {
            total_orders: orders.len(),
            total_revenue: total_revenue(&orders, self.currency)?,
            top_items: top_items(&aggregates, self.top_items)?,
            daily_revenue: daily_revenue(
                &orders,
                today,
                self.daily_window,
                self.offset,
                self.currency,
            )?,
            monthly_revenue: monthly_revenue(
                &orders,
                YearMonth::from_date(today),
                self.monthly_window,
                self.offset,
                self.currency,
            )?,
        };

        debug!(total_orders = snapshot.total_orders, "computed metrics snapshot");

        Ok(snapshot)
    }
}
