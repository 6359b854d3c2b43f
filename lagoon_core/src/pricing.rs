//! # Price Tables
//!
//! Unit prices per material, flat prices for optional extras, and the
//! [`PriceBook`] bundle that carries both into an engine call. Prices
//! are explicit values passed by the caller; the built-in market table
//! is just a convenient starting point, not ambient state.
//!
//! ## Missing prices
//!
//! Looking up a material with no table entry yields **zero**, by
//! design: a budget with an unpriced line is still a budget, and the
//! gap shows up as a suspiciously cheap line rather than an error.
//! Collaborators that want to catch gaps up front can call
//! [`UnitCostTable::missing_materials`] before costing.
//!
//! ## Example
//!
//! ```rust
//! use lagoon_core::materials::Material;
//! use lagoon_core::pricing::UnitCostTable;
//!
//! let table = UnitCostTable::market();
//! assert_eq!(table.price_of(Material::Cement), 25.0);
//! // Vinyl liner carries no market price; it costs out at zero.
//! assert_eq!(table.price_of(Material::VinylLiner), 0.0);
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::materials::Material;

/// An optional feature with a flat, quantity-independent price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Extra {
    /// Whirlpool spa kit, installed
    SpaKit,
}

impl Extra {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Extra::SpaKit => "Spa kit",
        }
    }
}

/// Unit prices keyed by material.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitCostTable {
    prices: HashMap<Material, f64>,
}

static MARKET_UNIT_COSTS: Lazy<UnitCostTable> = Lazy::new(|| {
    UnitCostTable::new()
        .with_price(Material::Blocks, 1.5)
        .with_price(Material::CornerMesh, 50.0)
        .with_price(Material::WaterproofingOne, 100.0)
        .with_price(Material::WaterproofingTwo, 150.0)
        .with_price(Material::Cement, 25.0)
        .with_price(Material::Sand, 150.0)
        .with_price(Material::BondingLiquid, 10.0)
        .with_price(Material::TileFinish, 60.0)
        .with_price(Material::AdhesiveMortar, 20.0)
        .with_price(Material::Grout, 40.0)
        .with_price(Material::Spacers, 0.1)
});

impl UnitCostTable {
    /// Create an empty table (every lookup yields zero).
    pub fn new() -> Self {
        UnitCostTable {
            prices: HashMap::new(),
        }
    }

    /// The built-in market reference prices.
    pub fn market() -> Self {
        MARKET_UNIT_COSTS.clone()
    }

    /// Set a unit price (builder pattern)
    pub fn with_price(mut self, material: Material, price: f64) -> Self {
        self.prices.insert(material, price);
        self
    }

    /// Set a unit price in place
    pub fn set_price(&mut self, material: Material, price: f64) {
        self.prices.insert(material, price);
    }

    /// Unit price for a material, zero when the table has no entry.
    pub fn price_of(&self, material: Material) -> f64 {
        self.prices.get(&material).copied().unwrap_or(0.0)
    }

    /// Whether the table carries a price for a material.
    pub fn has_price(&self, material: Material) -> bool {
        self.prices.contains_key(&material)
    }

    /// Materials from `lines` that would cost out at zero because the
    /// table has no entry for them. Flat-priced lines are skipped: they
    /// are costed from the extras table, not from here.
    pub fn missing_materials(
        &self,
        lines: impl IntoIterator<Item = Material>,
    ) -> Vec<Material> {
        lines
            .into_iter()
            .filter(|m| !m.is_flat_priced() && !self.has_price(*m))
            .collect()
    }
}

/// Flat prices keyed by extra feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrasCostTable {
    prices: HashMap<Extra, f64>,
}

impl ExtrasCostTable {
    /// Create an empty table (every lookup yields zero).
    pub fn new() -> Self {
        ExtrasCostTable {
            prices: HashMap::new(),
        }
    }

    /// Set a flat price (builder pattern)
    pub fn with_price(mut self, extra: Extra, price: f64) -> Self {
        self.prices.insert(extra, price);
        self
    }

    /// Flat price for an extra, zero when the table has no entry.
    pub fn price_of(&self, extra: Extra) -> f64 {
        self.prices.get(&extra).copied().unwrap_or(0.0)
    }
}

impl Default for ExtrasCostTable {
    fn default() -> Self {
        ExtrasCostTable::new().with_price(Extra::SpaKit, 5000.0)
    }
}

/// Both price tables, passed together into an engine call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBook {
    /// Per-unit material prices
    pub unit_costs: UnitCostTable,

    /// Flat prices for optional extras
    pub extras: ExtrasCostTable,
}

impl PriceBook {
    /// A price book with the given tables.
    pub fn new(unit_costs: UnitCostTable, extras: ExtrasCostTable) -> Self {
        PriceBook { unit_costs, extras }
    }
}

impl Default for PriceBook {
    /// Built-in market prices plus the default spa-kit flat price.
    fn default() -> Self {
        PriceBook {
            unit_costs: UnitCostTable::market(),
            extras: ExtrasCostTable::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_prices() {
        let table = UnitCostTable::market();
        assert_eq!(table.price_of(Material::Blocks), 1.5);
        assert_eq!(table.price_of(Material::Spacers), 0.1);
    }

    #[test]
    fn test_unknown_material_costs_zero() {
        let table = UnitCostTable::market();
        assert!(!table.has_price(Material::VinylLiner));
        assert_eq!(table.price_of(Material::VinylLiner), 0.0);
    }

    #[test]
    fn test_missing_materials_helper() {
        let table = UnitCostTable::market();
        let lines = [Material::Blocks, Material::VinylLiner, Material::SpaKit];
        let missing = table.missing_materials(lines);
        // Spa kit is flat-priced, so only the liner is flagged.
        assert_eq!(missing, vec![Material::VinylLiner]);
    }

    #[test]
    fn test_extras_default_spa_price() {
        let extras = ExtrasCostTable::default();
        assert_eq!(extras.price_of(Extra::SpaKit), 5000.0);
    }

    #[test]
    fn test_extras_empty_table() {
        let extras = ExtrasCostTable::new();
        assert_eq!(extras.price_of(Extra::SpaKit), 0.0);
    }

    #[test]
    fn test_override_price() {
        let mut table = UnitCostTable::market();
        table.set_price(Material::Cement, 32.0);
        assert_eq!(table.price_of(Material::Cement), 32.0);
    }

    #[test]
    fn test_price_book_serialization() {
        let book = PriceBook::default();
        let json = serde_json::to_string(&book).unwrap();
        let roundtrip: PriceBook = serde_json::from_str(&json).unwrap();
        assert_eq!(book, roundtrip);
    }
}
