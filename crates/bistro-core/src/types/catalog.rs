//! Catalog types: categories, inventory products, menu items and recipes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::quantity::Quantity;

// =============================================================================
// Category
// =============================================================================

/// Groups products and sales items ("Coffee", "Bakery", "Dairy").
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Ordering in menus and reports (ascending).
    pub sort_order: i64,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit
// =============================================================================

/// Unit an inventory product is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Piece,
    Kilogram,
    Liter,
}

impl Unit {
    /// All units, in display order.
    pub const ALL: [Unit; 3] = [Unit::Piece, Unit::Kilogram, Unit::Liter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Piece => "piece",
            Unit::Kilogram => "kilogram",
            Unit::Liter => "liter",
        }
    }
}

impl Default for Unit {
    fn default() -> Self {
        Unit::Piece
    }
}

// =============================================================================
// Product
// =============================================================================

/// An inventory product: something that is bought, stored and counted.
///
/// Not to be confused with [`SalesItem`], which is what the customer buys.
/// A latte (sales item) consumes milk and coffee beans (products).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub category_id: Option<String>,
    pub name: String,
    pub unit: Unit,
    /// Purchase cost of one whole unit, in cents.
    pub cost_cents: i64,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }
}

// =============================================================================
// Sales Item
// =============================================================================

/// A menu item rung up at the point of sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SalesItem {
    pub id: String,
    pub category_id: Option<String>,
    pub name: String,
    pub price_cents: i64,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl SalesItem {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Recipe Component
// =============================================================================

/// How much of a product one unit of a sales item consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RecipeComponent {
    pub sales_item_id: String,
    pub product_id: String,
    /// Amount consumed per item sold, in thousandths of the product unit.
    pub quantity_milli: i64,
}

impl RecipeComponent {
    #[inline]
    pub fn quantity(&self) -> Quantity {
        Quantity::from_milli(self.quantity_milli)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Unit::Kilogram).unwrap(), "\"kilogram\"");
        let unit: Unit = serde_json::from_str("\"liter\"").unwrap();
        assert_eq!(unit, Unit::Liter);
        assert_eq!(Unit::default(), Unit::Piece);
    }
}
