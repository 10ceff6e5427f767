//! Fixtures
//!
//! YAML fixture sets live under `<base>/{catalogs,codes,orders}/<set>.yml`. Catalogs must be
//! loaded first; codes and orders refer to products and categories by their string keys.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    codes::{DiscountCode, ValidationError},
    fixtures::{catalog::CatalogFixture, codes::CodesFixture, orders::OrdersFixture},
    orders::{Order, OrderError},
    products::{Catalog, CatalogError, CategoryKey, Product, ProductKey},
};

pub mod catalog;
pub mod codes;
pub mod orders;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Category not found
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Discount code not found
    #[error("Discount code not found: {0}")]
    CodeNotFound(String),

    /// Order not found
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Currency mismatch between fixture records
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No catalog loaded yet
    #[error("No catalog loaded yet; currency unknown")]
    NoCurrency,

    /// Discount code record breaks an invariant
    #[error("Invalid discount code: {0}")]
    InvalidCode(#[from] ValidationError),

    /// Catalog construction error
    #[error("Failed to build catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Order construction error
    #[error("Failed to build order: {0}")]
    Order(#[from] OrderError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products and categories
    catalog: Catalog<'static>,

    /// String key -> `SlotMap` key mappings for lookups
    category_keys: FxHashMap<String, CategoryKey>,
    product_keys: FxHashMap<String, ProductKey>,

    /// Discount codes, in file order
    codes: Vec<DiscountCode<'static>>,

    /// Named orders, in file order
    orders: Vec<(String, Order<'static>)>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: Catalog::new(),
            category_keys: FxHashMap::default(),
            product_keys: FxHashMap::default(),
            codes: Vec::new(),
            orders: Vec::new(),
            currency: None,
        }
    }

    /// Load categories and products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a product refers to an unknown
    /// category, or prices use more than one currency.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = self.read("catalogs", name)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        for (key, category) in fixture.categories {
            let category_key = self.catalog.add_category(category.name);

            self.category_keys.insert(key, category_key);
        }

        for (key, product_fixture) in fixture.products {
            let price = catalog::parse_price(&product_fixture.price)?;

            self.check_currency(price.currency())?;

            let category = self.category_key(&product_fixture.category)?;

            let product_key = self.catalog.add_product(Product {
                name: product_fixture.name,
                category,
                price,
            })?;

            self.product_keys.insert(key, product_key);
        }

        Ok(self)
    }

    /// Load discount codes from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a code refers to an unknown
    /// product or category, or a code's money fields use a different currency.
    pub fn load_codes(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = self.read("codes", name)?;
        let fixture: CodesFixture = serde_norway::from_str(&contents)?;

        for code_fixture in fixture.codes {
            let code = code_fixture
                .try_into_code(|key| self.product_key(key), |key| self.category_key(key))?;

            if let Some(currency) = code.currency()? {
                self.check_currency(currency)?;
            }

            self.codes.push(code);
        }

        Ok(self)
    }

    /// Load orders from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, an order refers to an unknown
    /// product, or no catalog has been loaded.
    pub fn load_orders(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = self.read("orders", name)?;
        let fixture: OrdersFixture = serde_norway::from_str(&contents)?;
        let currency = self.currency()?;

        for order_fixture in fixture.orders {
            let line_items = order_fixture
                .items
                .iter()
                .map(|item| {
                    let product = self.product_key(&item.product)?;

                    Ok(self.catalog.line_item(product, item.quantity)?)
                })
                .collect::<Result<Vec<_>, FixtureError>>()?;

            let order = match order_fixture.total.as_deref() {
                Some(total) => {
                    Order::with_total(line_items, catalog::parse_price(total)?, currency)?
                }
                None => Order::with_line_items(line_items, currency)?,
            };

            self.orders.push((
                order_fixture.name,
                order.with_first_purchase(order_fixture.first_purchase),
            ));
        }

        Ok(self)
    }

    /// Load a complete fixture set (catalog, codes, and orders with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_set(name)?;

        Ok(fixture)
    }

    /// Load a complete fixture set into this fixture
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn load_set(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        self.load_catalog(name)?
            .load_codes(name)?
            .load_orders(name)
    }

    /// Get the catalog
    pub fn catalog(&self) -> &Catalog<'static> {
        &self.catalog
    }

    /// Get a product key by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product_key(&self, key: &str) -> Result<ProductKey, FixtureError> {
        self.product_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get a category key by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found.
    pub fn category_key(&self, key: &str) -> Result<CategoryKey, FixtureError> {
        self.category_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::CategoryNotFound(key.to_string()))
    }

    /// Get a discount code by its code string
    ///
    /// # Errors
    ///
    /// Returns an error if the code is not found.
    pub fn code(&self, code: &str) -> Result<&DiscountCode<'static>, FixtureError> {
        self.codes
            .iter()
            .find(|candidate| candidate.code == code)
            .ok_or_else(|| FixtureError::CodeNotFound(code.to_string()))
    }

    /// Get an order by name
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found.
    pub fn order(&self, name: &str) -> Result<&Order<'static>, FixtureError> {
        self.orders
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, order)| order)
            .ok_or_else(|| FixtureError::OrderNotFound(name.to_string()))
    }

    /// Get all discount codes
    pub fn codes(&self) -> &[DiscountCode<'static>] {
        &self.codes
    }

    /// Get all named orders
    pub fn orders(&self) -> &[(String, Order<'static>)] {
        &self.orders
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog has been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    fn read(&self, kind: &str, name: &str) -> Result<String, FixtureError> {
        let file_path = self.base_path.join(kind).join(format!("{name}.yml"));

        Ok(fs::read_to_string(file_path)?)
    }

    fn check_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            Some(_) => Ok(()),
            None => {
                self.currency = Some(currency);

                Ok(())
            }
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use rusty_money::{Money, iso::GBP};
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    const CATALOG: &str = "\
categories:
  books:
    name: Books
  games:
    name: Games
products:
  novel:
    name: Novel
    category: books
    price: 12.50 GBP
  chess:
    name: Chess Set
    category: games
    price: 30.00 GBP
";

    const CODES: &str = "\
codes:
  - code: BOOKS10
    kind: percentage
    value: \"10\"
    categories: [books]
  - code: FIVER
    kind: fixed_amount
    value: 5.00 GBP
    min_purchase: 20.00 GBP
";

    const ORDERS: &str = "\
orders:
  - name: mixed
    items:
      - product: novel
        quantity: 2
      - product: chess
  - name: shipped
    first_purchase: true
    total: 34.99 GBP
    items:
      - product: chess
";

    fn write_fixture(base: &Path, kind: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(kind);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    fn shop() -> TestResult<TempDir> {
        let dir = tempfile::tempdir()?;

        write_fixture(dir.path(), "catalogs", "shop", CATALOG)?;
        write_fixture(dir.path(), "codes", "shop", CODES)?;
        write_fixture(dir.path(), "orders", "shop", ORDERS)?;

        Ok(dir)
    }

    #[test]
    fn fixture_loads_catalog_codes_and_orders() -> TestResult {
        let dir = shop()?;
        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_set("shop")?;

        assert_eq!(fixture.catalog().products().len(), 2);
        assert_eq!(fixture.catalog().categories().len(), 2);
        assert_eq!(fixture.codes().len(), 2);
        assert_eq!(fixture.orders().len(), 2);
        assert_eq!(fixture.currency()?, GBP);

        Ok(())
    }

    #[test]
    fn orders_sum_line_items_unless_total_is_given() -> TestResult {
        let dir = shop()?;
        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_set("shop")?;

        let mixed = fixture.order("mixed")?;
        let shipped = fixture.order("shipped")?;

        assert_eq!(mixed.total(), &Money::from_minor(55_00, GBP));
        assert_eq!(mixed.len(), 2);
        assert!(!mixed.is_first_purchase());
        assert_eq!(shipped.total(), &Money::from_minor(34_99, GBP));
        assert!(shipped.is_first_purchase());

        Ok(())
    }

    #[test]
    fn codes_resolve_scope_keys() -> TestResult {
        let dir = shop()?;
        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_set("shop")?;

        let books = fixture.category_key("books")?;
        let code = fixture.code("BOOKS10")?;

        assert!(code.scope.categories.contains(&books));
        assert!(code.scope.products.is_empty());

        Ok(())
    }

    #[test]
    fn orders_require_a_catalog() -> TestResult {
        let dir = shop()?;
        let mut fixture = Fixture::with_base_path(dir.path());

        let result = fixture.load_orders("shop");

        assert!(matches!(result, Err(FixtureError::NoCurrency)));

        Ok(())
    }

    #[test]
    fn catalog_rejects_unknown_category() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "catalogs",
            "broken",
            "products:\n  apple:\n    name: Apple\n    category: fruit\n    price: 1.00 GBP\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        let result = fixture.load_catalog("broken");

        assert!(matches!(result, Err(FixtureError::CategoryNotFound(key)) if key == "fruit"));

        Ok(())
    }

    #[test]
    fn catalog_rejects_currency_mismatch() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "catalogs",
            "usd_set",
            "categories:\n  fruit:\n    name: Fruit\nproducts:\n  apple:\n    name: Apple\n    category: fruit\n    price: 1.00 USD\n",
        )?;

        write_fixture(
            dir.path(),
            "catalogs",
            "gbp_set",
            "categories:\n  veg:\n    name: Veg\nproducts:\n  leek:\n    name: Leek\n    category: veg\n    price: 1.00 GBP\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_catalog("usd_set")?;

        let result = fixture.load_catalog("gbp_set");

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(_, _))));

        Ok(())
    }

    #[test]
    fn codes_reject_foreign_currency() -> TestResult {
        let dir = shop()?;

        write_fixture(
            dir.path(),
            "codes",
            "dollars",
            "codes:\n  - code: USD5\n    kind: fixed_amount\n    value: 5.00 USD\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_catalog("shop")?;

        let result = fixture.load_codes("dollars");

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(_, _))));

        Ok(())
    }

    #[test]
    fn lookups_report_missing_keys() {
        let fixture = Fixture::new();

        assert!(matches!(
            fixture.product_key("nonexistent"),
            Err(FixtureError::ProductNotFound(_))
        ));
        assert!(matches!(
            fixture.code("NOPE"),
            Err(FixtureError::CodeNotFound(_))
        ));
        assert!(matches!(
            fixture.order("nothing"),
            Err(FixtureError::OrderNotFound(_))
        ));
        assert!(matches!(fixture.currency(), Err(FixtureError::NoCurrency)));
    }

    #[test]
    fn fixture_default_matches_new() {
        let fixture = Fixture::default();

        assert_eq!(fixture.base_path, PathBuf::from("./fixtures"));
        assert!(fixture.codes.is_empty());
        assert!(fixture.orders.is_empty());
    }
}
