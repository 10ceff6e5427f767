//! Order Fixtures

use serde::Deserialize;

/// Wrapper for orders in YAML
#[derive(Debug, Deserialize)]
pub struct OrdersFixture {
    /// Order records, in file order
    pub orders: Vec<OrderFixture>,
}

/// Order Fixture
#[derive(Debug, Deserialize)]
pub struct OrderFixture {
    /// Order name
    pub name: String,

    /// Whether this is the customer's first purchase
    #[serde(default)]
    pub first_purchase: bool,

    /// Explicit order total (e.g. including shipping); defaults to the line item sum
    #[serde(default)]
    pub total: Option<String>,

    /// Line items
    pub items: Vec<LineItemFixture>,
}

/// Line Item Fixture
#[derive(Debug, Deserialize)]
pub struct LineItemFixture {
    /// Product key
    pub product: String,

    /// Number of units
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}
