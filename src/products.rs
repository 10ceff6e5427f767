//! Products

use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::orders::LineItem;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

new_key_type! {
    /// Category Key
    pub struct CategoryKey;
}

/// Errors raised while building or reading the catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A product referenced a category that is not in the catalog.
    #[error("unknown category")]
    UnknownCategory(CategoryKey),

    /// A line item referenced a product that is not in the catalog.
    #[error("unknown product")]
    UnknownProduct(ProductKey),

    /// Line items need at least one unit.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// Product price has a negative amount.
    #[error("product price must not be negative")]
    NegativePrice,

    /// Quantity multiplied by price does not fit in minor units.
    #[error("line amount overflowed")]
    Overflow,
}

/// Product category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category name
    pub name: String,
}

/// Product
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Product name
    pub name: String,

    /// Category the product is listed under
    pub category: CategoryKey,

    /// Unit price
    pub price: Money<'a, Currency>,
}

/// Products and categories known to the shop.
#[derive(Debug)]
pub struct Catalog<'a> {
    categories: SlotMap<CategoryKey, Category>,
    products: SlotMap<ProductKey, Product<'a>>,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            categories: SlotMap::with_key(),
            products: SlotMap::with_key(),
        }
    }

    /// Add a category and return its key.
    pub fn add_category(&mut self, name: impl Into<String>) -> CategoryKey {
        self.categories.insert(Category { name: name.into() })
    }

    /// Add a product and return its key.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::UnknownCategory`]: the product's category is not in the catalog.
    /// - [`CatalogError::NegativePrice`]: the product's price is below zero.
    pub fn add_product(&mut self, product: Product<'a>) -> Result<ProductKey, CatalogError> {
        if !self.categories.contains_key(product.category) {
            return Err(CatalogError::UnknownCategory(product.category));
        }

        if product.price.to_minor_units() < 0 {
            return Err(CatalogError::NegativePrice);
        }

        Ok(self.products.insert(product))
    }

    /// Get a product by key.
    pub fn product(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Get a category by key.
    pub fn category(&self, key: CategoryKey) -> Option<&Category> {
        self.categories.get(key)
    }

    /// Build a line item for `quantity` units of a product.
    ///
    /// The line item is tagged with the product's own category.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::UnknownProduct`]: the product is not in the catalog.
    /// - [`CatalogError::ZeroQuantity`]: `quantity` is zero.
    /// - [`CatalogError::Overflow`]: the line amount does not fit in minor units.
    pub fn line_item(
        &self,
        key: ProductKey,
        quantity: u32,
    ) -> Result<LineItem<'a>, CatalogError> {
        let product = self
            .products
            .get(key)
            .ok_or(CatalogError::UnknownProduct(key))?;

        if quantity == 0 {
            return Err(CatalogError::ZeroQuantity);
        }

        let amount = product
            .price
            .to_minor_units()
            .checked_mul(i64::from(quantity))
            .ok_or(CatalogError::Overflow)?;

        Ok(LineItem::new(
            key,
            product.category,
            Money::from_minor(amount, product.price.currency()),
        ))
    }

    /// Get the product `SlotMap`
    pub fn products(&self) -> &SlotMap<ProductKey, Product<'a>> {
        &self.products
    }

    /// Get the category `SlotMap`
    pub fn categories(&self) -> &SlotMap<CategoryKey, Category> {
        &self.categories
    }
}

impl Default for Catalog<'_> {
    fn default() -> Self {
        Self::new()
    }
}
