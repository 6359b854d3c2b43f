//! # Material Lines
//!
//! Every line that can appear on a pool bill of quantities, as a typed
//! enum. Keying quantities and prices by [`Material`] instead of free
//! strings keeps the cost tables, phase lists, and export sheets in
//! agreement at compile time.
//!
//! [`CostItem`] widens the key space for the cost breakdown: the water
//! needed to fill the pool is costed directly in currency (liters times
//! the water tariff) and never appears in the quantities list, so it
//! gets its own variant rather than a fake quantity line.
//!
//! ## Example
//!
//! ```rust
//! use lagoon_core::materials::{CostItem, Material};
//!
//! assert_eq!(Material::Blocks.label(), "Structural blocks");
//! assert_eq!(CostItem::WaterFill.label(), "Pool filling (water)");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A bill-of-quantities line.
///
/// Labels carry the counting unit where one applies, matching how the
/// lines appear on supplier quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    /// Structural concrete blocks for the shell
    Blocks,
    /// Reinforcement mesh for live corners, sold by the box
    CornerMesh,
    /// First waterproofing compound, 20 kg boxes
    WaterproofingOne,
    /// Second waterproofing compound, 20 kg boxes
    WaterproofingTwo,
    /// Cement, 50 kg bags
    Cement,
    /// Sand, cubic meters
    Sand,
    /// Bonding liquid for render coats, liters
    BondingLiquid,
    /// Tile/mosaic finish, square meters
    TileFinish,
    /// Tile adhesive mortar, kilograms
    AdhesiveMortar,
    /// Acrylic grout, bags
    Grout,
    /// Tile spacers, units
    Spacers,
    /// Vinyl liner membrane, square meters
    VinylLiner,
    /// Whirlpool spa kit, flat-priced
    SpaKit,
}

impl Material {
    /// Human-readable label with counting unit
    pub fn label(&self) -> &'static str {
        match self {
            Material::Blocks => "Structural blocks",
            Material::CornerMesh => "Corner reinforcement mesh (boxes)",
            Material::WaterproofingOne => "Waterproofing compound 1 (20 kg boxes)",
            Material::WaterproofingTwo => "Waterproofing compound 2 (20 kg boxes)",
            Material::Cement => "Cement (bags)",
            Material::Sand => "Sand (m3)",
            Material::BondingLiquid => "Bonding liquid (liters)",
            Material::TileFinish => "Tile finish (m2)",
            Material::AdhesiveMortar => "Adhesive mortar (kg)",
            Material::Grout => "Acrylic grout (bags)",
            Material::Spacers => "Tile spacers (units)",
            Material::VinylLiner => "Vinyl liner (m2)",
            Material::SpaKit => "Spa kit",
        }
    }

    /// Flat-priced lines are costed from the extras table, not
    /// quantity times unit price.
    pub fn is_flat_priced(&self) -> bool {
        matches!(self, Material::SpaKit)
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A key in the cost breakdown: either a material line or the synthetic
/// water-fill entry, which has a cost but no quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostItem {
    /// Cost of a bill-of-quantities line
    Material(Material),
    /// Water to fill the pool, costed directly from liters
    WaterFill,
}

impl CostItem {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            CostItem::Material(m) => m.label(),
            CostItem::WaterFill => "Pool filling (water)",
        }
    }

    /// The underlying material, if this entry has one
    pub fn material(&self) -> Option<Material> {
        match self {
            CostItem::Material(m) => Some(*m),
            CostItem::WaterFill => None,
        }
    }
}

impl fmt::Display for CostItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Material> for CostItem {
    fn from(m: Material) -> Self {
        CostItem::Material(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_unique() {
        let all = [
            Material::Blocks,
            Material::CornerMesh,
            Material::WaterproofingOne,
            Material::WaterproofingTwo,
            Material::Cement,
            Material::Sand,
            Material::BondingLiquid,
            Material::TileFinish,
            Material::AdhesiveMortar,
            Material::Grout,
            Material::Spacers,
            Material::VinylLiner,
            Material::SpaKit,
        ];
        let mut labels: Vec<_> = all.iter().map(|m| m.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), all.len());
    }

    #[test]
    fn test_flat_priced() {
        assert!(Material::SpaKit.is_flat_priced());
        assert!(!Material::Blocks.is_flat_priced());
    }

    #[test]
    fn test_cost_item_material() {
        assert_eq!(
            CostItem::from(Material::Cement).material(),
            Some(Material::Cement)
        );
        assert_eq!(CostItem::WaterFill.material(), None);
    }

    #[test]
    fn test_serialization() {
        let item = CostItem::Material(Material::VinylLiner);
        let json = serde_json::to_string(&item).unwrap();
        let roundtrip: CostItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, roundtrip);
    }
}
