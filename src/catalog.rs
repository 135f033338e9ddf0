//! Catalog
//!
//! Static reference data for the menu: the items a customer can order and the
//! add-ons that can be attached to them. A catalog is loaded once and never
//! mutated afterwards.

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;

use crate::pricing::{Price, PriceParseError, parse_currency, parse_price};

const BUNDLED_CATALOG: &str = include_str!("../fixtures/catalog.yml");

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A price or currency could not be parsed
    #[error("invalid price for {id}: {source}")]
    Price {
        /// Id of the entry carrying the bad price
        id: String,

        /// Underlying parse error
        #[source]
        source: PriceParseError,
    },

    /// The catalog currency code is not supported
    #[error("invalid catalog currency: {0}")]
    Currency(#[from] PriceParseError),

    /// An entry is priced in a different currency from the catalog
    #[error("{id} is priced in {found}, but the catalog uses {expected}")]
    CurrencyMismatch {
        /// Id of the offending entry
        id: String,

        /// Catalog currency code
        expected: &'static str,

        /// Entry currency code
        found: &'static str,
    },

    /// Two menu items share an id
    #[error("duplicate menu item id: {0}")]
    DuplicateItem(String),

    /// Two add-ons share an id
    #[error("duplicate add-on id: {0}")]
    DuplicateAddOn(String),
}

/// A menu item as offered by the restaurant.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    /// Unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Description shown on the menu
    pub description: String,

    /// Unit price
    pub price: Price,
}

/// A paid extra that can be attached to a menu item.
#[derive(Debug, Clone, PartialEq)]
pub struct AddOn {
    /// Unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit price
    pub price: Price,
}

#[derive(Debug, Deserialize)]
struct CatalogFixture {
    currency: String,

    #[serde(default)]
    items: Vec<CatalogItemFixture>,

    #[serde(default)]
    add_ons: Vec<AddOnFixture>,
}

#[derive(Debug, Deserialize)]
struct CatalogItemFixture {
    id: String,
    name: String,

    #[serde(default)]
    description: String,

    price: String,
}

#[derive(Debug, Deserialize)]
struct AddOnFixture {
    id: String,
    name: String,
    price: String,
}

/// The full menu: items and add-ons, in display order, indexed by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    currency: &'static Currency,
    items: Vec<CatalogItem>,
    add_ons: Vec<AddOn>,
    item_keys: FxHashMap<String, usize>,
    add_on_keys: FxHashMap<String, usize>,
}

impl Catalog {
    /// Create an empty catalog priced in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            currency,
            items: Vec::new(),
            add_ons: Vec::new(),
            item_keys: FxHashMap::default(),
            add_on_keys: FxHashMap::default(),
        }
    }

    /// The menu bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled fixture fails to parse.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_yaml(BUNDLED_CATALOG)
    }

    /// Load a catalog from a YAML file on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, a price is invalid or in the
    /// wrong currency, or an id appears twice.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;
        let mut catalog = Self::new(parse_currency(&fixture.currency)?);

        for item in fixture.items {
            let price = catalog.parse_entry_price(&item.id, &item.price)?;

            catalog.insert_item(CatalogItem {
                id: item.id,
                name: item.name,
                description: item.description,
                price,
            })?;
        }

        for add_on in fixture.add_ons {
            let price = catalog.parse_entry_price(&add_on.id, &add_on.price)?;

            catalog.insert_add_on(AddOn {
                id: add_on.id,
                name: add_on.name,
                price,
            })?;
        }

        Ok(catalog)
    }

    /// Add a menu item.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is already taken or the price is in another currency.
    pub fn insert_item(&mut self, item: CatalogItem) -> Result<(), CatalogError> {
        if self.item_keys.contains_key(&item.id) {
            return Err(CatalogError::DuplicateItem(item.id));
        }

        self.check_currency(&item.id, &item.price)?;

        self.item_keys.insert(item.id.clone(), self.items.len());
        self.items.push(item);

        Ok(())
    }

    /// Add an add-on.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is already taken or the price is in another currency.
    pub fn insert_add_on(&mut self, add_on: AddOn) -> Result<(), CatalogError> {
        if self.add_on_keys.contains_key(&add_on.id) {
            return Err(CatalogError::DuplicateAddOn(add_on.id));
        }

        self.check_currency(&add_on.id, &add_on.price)?;

        self.add_on_keys.insert(add_on.id.clone(), self.add_ons.len());
        self.add_ons.push(add_on);

        Ok(())
    }

    /// Look up a menu item by id.
    pub fn item(&self, id: &str) -> Option<&CatalogItem> {
        self.item_keys.get(id).and_then(|idx| self.items.get(*idx))
    }

    /// Look up an add-on by id.
    pub fn add_on(&self, id: &str) -> Option<&AddOn> {
        self.add_on_keys
            .get(id)
            .and_then(|idx| self.add_ons.get(*idx))
    }

    /// Menu items in display order.
    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter()
    }

    /// Add-ons in display order.
    pub fn add_ons(&self) -> impl Iterator<Item = &AddOn> {
        self.add_ons.iter()
    }

    /// Currency every price in this catalog is expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn parse_entry_price(&self, id: &str, price: &str) -> Result<Price, CatalogError> {
        let price = parse_price(price).map_err(|source| CatalogError::Price {
            id: id.to_string(),
            source,
        })?;

        self.check_currency(id, &price)?;

        Ok(price)
    }

    fn check_currency(&self, id: &str, price: &Price) -> Result<(), CatalogError> {
        let found = price.currency();

        if found == self.currency {
            Ok(())
        } else {
            Err(CatalogError::CurrencyMismatch {
                id: id.to_string(),
                expected: self.currency.iso_alpha_code,
                found: found.iso_alpha_code,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rusty_money::{
        Money,
        iso::{BRL, USD},
    };
    use testresult::TestResult;

    use super::*;

    #[test]
    fn bundled_catalog_loads_menu_in_order() -> TestResult {
        let catalog = Catalog::bundled()?;

        let names: Vec<&str> = catalog.items().map(|item| item.name.as_str()).collect();

        assert_eq!(names, ["Na Brasa Clássico", "Na Brasa Especial"]);
        assert_eq!(catalog.add_ons().count(), 6);
        assert_eq!(catalog.currency(), BRL);

        Ok(())
    }

    #[test]
    fn lookups_resolve_by_id() -> TestResult {
        let catalog = Catalog::bundled()?;

        let item = catalog.item("2").ok_or("missing item 2")?;
        let bacon = catalog.add_on("bacon").ok_or("missing bacon")?;

        assert_eq!(item.price, Money::from_minor(30_00, BRL));
        assert_eq!(bacon.price, Money::from_minor(5_00, BRL));
        assert!(catalog.item("99").is_none());
        assert!(catalog.add_on("queijo").is_none());

        Ok(())
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let yaml = "
currency: BRL
items:
  - { id: a, name: A, price: 1.00 BRL }
  - { id: a, name: B, price: 2.00 BRL }
";

        let result = Catalog::from_yaml(yaml);

        assert!(matches!(result, Err(CatalogError::DuplicateItem(id)) if id == "a"));
    }

    #[test]
    fn mismatched_currency_is_rejected() {
        let yaml = "
currency: BRL
add_ons:
  - { id: egg, name: Egg, price: 1.00 USD }
";

        let result = Catalog::from_yaml(yaml);

        assert!(matches!(
            result,
            Err(CatalogError::CurrencyMismatch { id, expected: "BRL", found: "USD" }) if id == "egg"
        ));
    }

    #[test]
    fn invalid_price_names_the_entry() {
        let yaml = "
currency: BRL
items:
  - { id: burger, name: Burger, price: -5.00 BRL }
";

        let result = Catalog::from_yaml(yaml);

        assert!(matches!(result, Err(CatalogError::Price { id, .. }) if id == "burger"));
    }

    #[test]
    fn insert_item_checks_currency() {
        let mut catalog = Catalog::new(BRL);

        let result = catalog.insert_item(CatalogItem {
            id: "x".to_string(),
            name: "X".to_string(),
            description: String::new(),
            price: Money::from_minor(100, USD),
        });

        assert!(matches!(result, Err(CatalogError::CurrencyMismatch { .. })));
        assert!(catalog.item("x").is_none());
    }

    #[test]
    fn from_path_reads_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;

        writeln!(
            file,
            "currency: BRL\nitems:\n  - {{ id: x, name: X, price: 10.00 BRL }}"
        )?;

        let catalog = Catalog::from_path(file.path())?;

        assert_eq!(catalog.items().count(), 1);

        Ok(())
    }
}
