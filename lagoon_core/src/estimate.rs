//! # Estimation Engine
//!
//! Converts a [`PoolSpecification`] and a [`PriceBook`] into a bill of
//! quantities, a costed breakdown, a per-phase cost summary, and the
//! filling logistics. One call, four outputs.
//!
//! ## Contract
//!
//! [`estimate`] is a pure, total function: no I/O, no hidden state, no
//! failure modes. It performs **no validation** - degenerate geometry
//! flows through the arithmetic (a zero dimension produces a mostly
//! zero bill), so callers gate input with
//! [`PoolSpecification::validate`] before calling.
//!
//! ## Example
//!
//! ```rust
//! use lagoon_core::estimate::estimate;
//! use lagoon_core::phases::UnassignedPolicy;
//! use lagoon_core::pool::PoolSpecification;
//! use lagoon_core::pricing::PriceBook;
//!
//! let spec = PoolSpecification::new(4.0, 8.0, 1.5);
//! let result = estimate(&spec, &PriceBook::default(), UnassignedPolicy::Drop);
//!
//! assert_eq!(result.area_m2, 32.0);
//! assert_eq!(result.filling.water.value(), 48_000.0);
//! println!("Total: {:.2}", result.total_cost());
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::materials::{CostItem, Material};
use crate::phases::{Phase, UnassignedPolicy};
use crate::pool::{Lining, PoolSpecification};
use crate::pricing::{Extra, PriceBook};
use crate::units::{CubicMeters, Hours, Liters};

/// Round to a fixed number of decimal places.
fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

// ============================================================================
// Quantity formulas
// ============================================================================
//
// Takeoff coefficients per square meter of footprint, from the supplier
// worksheets the budget model was calibrated against.

fn blocks_quantity(area: f64) -> f64 {
    area * 12.5
}

/// Mesh runs the perimeter plus the four vertical corners.
fn corner_mesh_boxes(perimeter: f64, depth: f64) -> f64 {
    (perimeter + 4.0 * depth) / 5.0
}

fn waterproofing_one_boxes(area: f64) -> f64 {
    (area / 9.0).ceil()
}

fn waterproofing_two_boxes(area: f64) -> f64 {
    (area / 4.0).ceil()
}

fn cement_bags(area: f64) -> f64 {
    (0.013 + 0.038 + 0.14) * area / 50.0
}

fn sand_m3(area: f64) -> f64 {
    (0.065 + 0.004 + 0.025) * area
}

fn bonding_liquid_liters(area: f64) -> f64 {
    (0.0026 + 0.05) * area
}

fn adhesive_mortar_kg(area: f64) -> f64 {
    0.45 * area
}

fn grout_bags(area: f64) -> f64 {
    0.05 * area / 20.0
}

fn spacer_count(area: f64) -> f64 {
    12.0 * area
}

/// Liner covers floor plus walls, with a 10% welding/overlap allowance.
fn vinyl_liner_m2(area: f64, perimeter: f64, depth: f64) -> f64 {
    round_to((area + perimeter * depth) * 1.10, 3)
}

// ============================================================================
// Output structures
// ============================================================================

/// Ordered bill of quantities.
///
/// Insertion order is fixed (the ten unconditional lines, then the
/// finish-dependent ones) so tables and sheets render the same way on
/// every run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialQuantities {
    entries: Vec<(Material, f64)>,
}

impl MaterialQuantities {
    fn push(&mut self, material: Material, quantity: f64) {
        self.entries.push((material, quantity));
    }

    /// Quantity for a material, if the line is present.
    pub fn get(&self, material: Material) -> Option<f64> {
        self.entries
            .iter()
            .find(|(m, _)| *m == material)
            .map(|(_, q)| *q)
    }

    /// Whether the bill contains a line for this material.
    pub fn contains(&self, material: Material) -> bool {
        self.get(material).is_some()
    }

    /// Lines in bill order.
    pub fn iter(&self) -> impl Iterator<Item = (Material, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Materials in bill order, without quantities.
    pub fn kinds(&self) -> impl Iterator<Item = Material> + '_ {
        self.entries.iter().map(|(m, _)| *m)
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bill has no lines.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered cost breakdown: one entry per bill line (zero when unpriced)
/// plus the synthetic water-fill entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    entries: Vec<(CostItem, f64)>,
}

impl CostBreakdown {
    fn push(&mut self, item: CostItem, cost: f64) {
        self.entries.push((item, cost));
    }

    /// Cost for an item, zero when absent. Phase aggregation relies on
    /// this lookup never failing.
    pub fn get(&self, item: CostItem) -> f64 {
        self.entries
            .iter()
            .find(|(i, _)| *i == item)
            .map(|(_, c)| *c)
            .unwrap_or(0.0)
    }

    /// Entries in breakdown order.
    pub fn iter(&self) -> impl Iterator<Item = (CostItem, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Sum of every entry.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the breakdown has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cost per construction phase, in report order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseCostSummary {
    entries: Vec<(Phase, f64)>,
}

impl PhaseCostSummary {
    fn push(&mut self, phase: Phase, cost: f64) {
        self.entries.push((phase, cost));
    }

    /// Cost for a phase, if summarized.
    pub fn get(&self, phase: Phase) -> Option<f64> {
        self.entries
            .iter()
            .find(|(p, _)| *p == phase)
            .map(|(_, c)| *c)
    }

    /// Phases in report order.
    pub fn iter(&self) -> impl Iterator<Item = (Phase, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of summarized phases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the summary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Water-delivery logistics for filling the pool.
///
/// Always derived, even for degenerate geometry. The water cost is the
/// only currency figure here; it is mirrored into the cost breakdown as
/// [`CostItem::WaterFill`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillingPlan {
    /// Water volume at the effective depth
    pub volume: CubicMeters,

    /// Volume in liters, rounded to 2 decimals
    pub water: Liters,

    /// Trucks delivering simultaneously (pass-through from the pool
    /// specification)
    pub truck_count: u32,

    /// Hours to fill at the combined hose flow, rounded to 2 decimals
    pub fill_hours: Hours,

    /// Water cost: liters x tariff, rounded to 2 decimals
    pub water_cost: f64,
}

impl FillingPlan {
    /// Derive the plan from a specification.
    pub fn for_spec(spec: &PoolSpecification) -> Self {
        let volume = CubicMeters(spec.volume_m3());
        let water = Liters(round_to(Liters::from(volume).value(), 2));
        let combined_flow = spec.fill_truck_count as f64 * spec.hose_flow_lph;
        let fill_hours = Hours(round_to(water.value() / combined_flow, 2));
        let water_cost = round_to(water.value() * spec.water_price_per_liter, 2);

        FillingPlan {
            volume,
            water,
            truck_count: spec.fill_truck_count,
            fill_hours,
            water_cost,
        }
    }
}

/// Everything one engine call produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Bill of quantities
    pub materials: MaterialQuantities,

    /// Costed breakdown (bill lines plus water fill)
    pub costs: CostBreakdown,

    /// Cost per construction phase
    pub phase_costs: PhaseCostSummary,

    /// Water-delivery logistics
    pub filling: FillingPlan,

    /// Footprint area used by every formula (m2)
    pub area_m2: f64,
}

impl Estimate {
    /// Grand total across the cost breakdown.
    pub fn total_cost(&self) -> f64 {
        self.costs.total()
    }
}

// ============================================================================
// The engine
// ============================================================================

/// Estimate materials, costs, phase costs, and filling logistics.
///
/// Pure and deterministic: identical inputs produce identical outputs,
/// and repeated calls share no state. Costing multiplies each quantity
/// by the unit price (zero when the table has no entry); the spa kit is
/// the exception, taken flat from the extras table regardless of any
/// unit-cost entry under its key.
///
/// # Example
///
/// ```rust
/// use lagoon_core::estimate::estimate;
/// use lagoon_core::materials::Material;
/// use lagoon_core::phases::UnassignedPolicy;
/// use lagoon_core::pool::{Lining, PoolSpecification};
/// use lagoon_core::pricing::PriceBook;
///
/// let spec = PoolSpecification::new(4.0, 8.0, 1.5).with_lining(Lining::Tiled);
/// let result = estimate(&spec, &PriceBook::default(), UnassignedPolicy::Drop);
///
/// assert_eq!(result.materials.get(Material::Blocks), Some(400.0));
/// ```
pub fn estimate(
    spec: &PoolSpecification,
    prices: &PriceBook,
    unassigned: UnassignedPolicy,
) -> Estimate {
    let area = spec.area_m2();
    let perimeter = spec.perimeter_m();
    let depth = spec.effective_depth_m();

    // Bill of quantities, in fixed order.
    let mut materials = MaterialQuantities::default();
    materials.push(Material::Blocks, blocks_quantity(area));
    materials.push(Material::CornerMesh, corner_mesh_boxes(perimeter, depth));
    materials.push(Material::WaterproofingOne, waterproofing_one_boxes(area));
    materials.push(Material::WaterproofingTwo, waterproofing_two_boxes(area));
    materials.push(Material::Cement, cement_bags(area));
    materials.push(Material::Sand, sand_m3(area));
    materials.push(Material::BondingLiquid, bonding_liquid_liters(area));
    materials.push(Material::AdhesiveMortar, adhesive_mortar_kg(area));
    materials.push(Material::Grout, grout_bags(area));
    materials.push(Material::Spacers, spacer_count(area));

    if spec.lining == Lining::Tiled {
        materials.push(Material::TileFinish, area);
    }
    if spec.spa {
        materials.push(Material::SpaKit, 1.0);
    }
    if spec.lining == Lining::Vinyl {
        materials.push(Material::VinylLiner, vinyl_liner_m2(area, perimeter, depth));
    }

    let filling = FillingPlan::for_spec(spec);

    // Costing: quantity x unit price, spa kit flat from extras.
    let mut costs = CostBreakdown::default();
    for (material, quantity) in materials.iter() {
        let cost = match material {
            Material::SpaKit => prices.extras.price_of(Extra::SpaKit),
            m => quantity * prices.unit_costs.price_of(m),
        };
        costs.push(material.into(), cost);
    }
    costs.push(CostItem::WaterFill, filling.water_cost);

    // Phase aggregation over the fixed membership table.
    let mut phases: Vec<Phase> = Phase::standard_order().to_vec();
    if materials.contains(Material::SpaKit) {
        phases.push(Phase::Extras);
    }

    let mut phase_costs = PhaseCostSummary::default();
    for phase in &phases {
        let total = phase.members().iter().map(|item| costs.get(*item)).sum();
        phase_costs.push(*phase, total);
    }

    if unassigned == UnassignedPolicy::Bucket {
        let assigned: HashSet<CostItem> = phases
            .iter()
            .flat_map(|p| p.members().iter().copied())
            .collect();
        let leftover = costs
            .iter()
            .filter(|(item, _)| !assigned.contains(item))
            .map(|(_, cost)| cost)
            .sum();
        phase_costs.push(Phase::Unassigned, leftover);
    }

    Estimate {
        materials,
        costs,
        phase_costs,
        filling,
        area_m2: area,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{ExtrasCostTable, UnitCostTable};

    /// 4 x 8 m, flat 1.5 m floor, tiled, no spa - the reference pool.
    fn reference_spec() -> PoolSpecification {
        PoolSpecification::new(4.0, 8.0, 1.5).with_lining(Lining::Tiled)
    }

    #[test]
    fn test_reference_quantities() {
        let result = estimate(&reference_spec(), &PriceBook::default(), UnassignedPolicy::Drop);

        assert_eq!(result.area_m2, 32.0);
        assert_eq!(result.materials.get(Material::Blocks), Some(400.0));
        // (24 + 4*1.5) / 5 = 6 boxes of mesh
        assert_eq!(result.materials.get(Material::CornerMesh), Some(6.0));
        assert_eq!(result.materials.get(Material::WaterproofingOne), Some(4.0));
        assert_eq!(result.materials.get(Material::WaterproofingTwo), Some(8.0));
        let cement = result.materials.get(Material::Cement).unwrap();
        assert!((cement - 0.12224).abs() < 1e-9);
        let sand = result.materials.get(Material::Sand).unwrap();
        assert!((sand - 3.008).abs() < 1e-9);
        let bonding = result.materials.get(Material::BondingLiquid).unwrap();
        assert!((bonding - 1.6832).abs() < 1e-9);
        assert_eq!(result.materials.get(Material::TileFinish), Some(32.0));
        assert_eq!(result.materials.get(Material::AdhesiveMortar), Some(14.4));
        let grout = result.materials.get(Material::Grout).unwrap();
        assert!((grout - 0.08).abs() < 1e-9);
        assert_eq!(result.materials.get(Material::Spacers), Some(384.0));
        // No spa, no vinyl
        assert!(!result.materials.contains(Material::SpaKit));
        assert!(!result.materials.contains(Material::VinylLiner));
    }

    #[test]
    fn test_reference_filling_plan() {
        let result = estimate(&reference_spec(), &PriceBook::default(), UnassignedPolicy::Drop);

        assert_eq!(result.filling.volume.value(), 48.0);
        assert_eq!(result.filling.water.value(), 48_000.0);
        assert_eq!(result.filling.truck_count, 3);
        // 48000 / (3 * 1000)
        assert_eq!(result.filling.fill_hours.value(), 16.0);
        assert_eq!(result.filling.water_cost, 480.0);
        assert_eq!(result.costs.get(CostItem::WaterFill), 480.0);
    }

    #[test]
    fn test_every_bill_line_is_costed() {
        let spec = reference_spec().with_spa();
        let result = estimate(&spec, &PriceBook::default(), UnassignedPolicy::Drop);

        for material in result.materials.kinds() {
            let present = result
                .costs
                .iter()
                .any(|(item, _)| item == CostItem::Material(material));
            assert!(present, "no cost entry for {material}");
        }
        // Bill lines + the synthetic water entry
        assert_eq!(result.costs.len(), result.materials.len() + 1);
    }

    #[test]
    fn test_spa_kit_is_flat_priced() {
        // A unit price under the spa-kit key must be ignored.
        let unit_costs = UnitCostTable::market().with_price(Material::SpaKit, 123.0);
        let prices = PriceBook::new(unit_costs, ExtrasCostTable::default());
        let spec = reference_spec().with_spa();
        let result = estimate(&spec, &prices, UnassignedPolicy::Drop);

        assert_eq!(result.materials.get(Material::SpaKit), Some(1.0));
        assert_eq!(result.costs.get(CostItem::Material(Material::SpaKit)), 5000.0);
        assert_eq!(result.phase_costs.get(Phase::Extras), Some(5000.0));
    }

    #[test]
    fn test_no_spa_no_extras_phase() {
        let result = estimate(&reference_spec(), &PriceBook::default(), UnassignedPolicy::Drop);
        assert_eq!(result.phase_costs.get(Phase::Extras), None);
        assert_eq!(result.phase_costs.len(), 6);
    }

    #[test]
    fn test_vinyl_liner_quantity() {
        let spec = reference_spec().with_lining(Lining::Vinyl);
        let result = estimate(&spec, &PriceBook::default(), UnassignedPolicy::Drop);

        // (32 + 24 * 1.5) * 1.10 = 74.8, rounded to 3 decimals
        assert_eq!(result.materials.get(Material::VinylLiner), Some(74.8));
        assert!(!result.materials.contains(Material::TileFinish));
        // No market price for the liner: silent zero cost.
        assert_eq!(result.costs.get(CostItem::Material(Material::VinylLiner)), 0.0);
    }

    #[test]
    fn test_bare_shell_has_neither_finish_line() {
        let spec = reference_spec().with_lining(Lining::None);
        let result = estimate(&spec, &PriceBook::default(), UnassignedPolicy::Drop);
        assert!(!result.materials.contains(Material::TileFinish));
        assert!(!result.materials.contains(Material::VinylLiner));
        assert_eq!(result.materials.len(), 10);
    }

    #[test]
    fn test_waterproofing_ceiling_boundary() {
        let at_nine = estimate(
            &PoolSpecification::new(1.0, 9.0, 1.5),
            &PriceBook::default(),
            UnassignedPolicy::Drop,
        );
        assert_eq!(at_nine.materials.get(Material::WaterproofingOne), Some(1.0));

        let just_over = estimate(
            &PoolSpecification::new(1.0, 9.01, 1.5),
            &PriceBook::default(),
            UnassignedPolicy::Drop,
        );
        assert_eq!(just_over.materials.get(Material::WaterproofingOne), Some(2.0));
    }

    #[test]
    fn test_waterproofing_monotone_in_area() {
        let prices = PriceBook::default();
        let mut previous = 0.0;
        for tenths in 1..200 {
            let length = tenths as f64 / 10.0;
            let spec = PoolSpecification::new(2.0, length, 1.5);
            let result = estimate(&spec, &prices, UnassignedPolicy::Drop);
            let boxes = result.materials.get(Material::WaterproofingTwo).unwrap();
            assert!(boxes >= previous);
            previous = boxes;
        }
    }

    #[test]
    fn test_phase_costs_equal_member_sums() {
        let spec = reference_spec().with_spa();
        let result = estimate(&spec, &PriceBook::default(), UnassignedPolicy::Drop);

        for (phase, total) in result.phase_costs.iter() {
            let expected: f64 = phase
                .members()
                .iter()
                .map(|item| result.costs.get(*item))
                .sum();
            assert!(
                (total - expected).abs() < 1e-9,
                "{phase} summary disagrees with member sum"
            );
        }
    }

    #[test]
    fn test_reference_phase_totals() {
        let result = estimate(&reference_spec(), &PriceBook::default(), UnassignedPolicy::Drop);

        // Blocks 400*1.5 + cement 0.12224*25
        let masonry = result.phase_costs.get(Phase::Masonry).unwrap();
        assert!((masonry - 603.056).abs() < 1e-6);
        // 4*100 + 8*150
        assert_eq!(result.phase_costs.get(Phase::Waterproofing), Some(1600.0));
        // Cement 3.056 + sand 451.2 + mortar 288
        let render = result.phase_costs.get(Phase::RenderCoat).unwrap();
        assert!((render - 742.256).abs() < 1e-6);
        // Tile 1920 + mortar 288
        let finishing = result.phase_costs.get(Phase::Finishing).unwrap();
        assert!((finishing - 2208.0).abs() < 1e-6);
        // Grout 3.2 + spacers 38.4
        let trim = result.phase_costs.get(Phase::Trim).unwrap();
        assert!((trim - 41.6).abs() < 1e-9);
        assert_eq!(result.phase_costs.get(Phase::Filling), Some(480.0));
    }

    #[test]
    fn test_unassigned_bucket_policy() {
        let result = estimate(&reference_spec(), &PriceBook::default(), UnassignedPolicy::Bucket);

        // Corner mesh 6*50 + bonding liquid 1.6832*10
        let bucket = result.phase_costs.get(Phase::Unassigned).unwrap();
        assert!((bucket - 316.832).abs() < 1e-6);
        assert_eq!(result.phase_costs.len(), 7);
    }

    #[test]
    fn test_drop_policy_omits_unassigned() {
        let result = estimate(&reference_spec(), &PriceBook::default(), UnassignedPolicy::Drop);
        assert_eq!(result.phase_costs.get(Phase::Unassigned), None);
        // The dropped lines stay in the raw breakdown.
        assert!(result.costs.get(CostItem::Material(Material::CornerMesh)) > 0.0);
    }

    #[test]
    fn test_idempotent() {
        let spec = reference_spec().with_spa();
        let prices = PriceBook::default();
        let first = estimate(&spec, &prices, UnassignedPolicy::Bucket);
        let second = estimate(&spec, &prices, UnassignedPolicy::Bucket);
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_area_does_not_panic() {
        let spec = PoolSpecification::new(0.0, 8.0, 1.5);
        let result = estimate(&spec, &PriceBook::default(), UnassignedPolicy::Drop);

        assert_eq!(result.area_m2, 0.0);
        assert_eq!(result.materials.get(Material::Blocks), Some(0.0));
        assert_eq!(result.materials.get(Material::Spacers), Some(0.0));
        assert_eq!(result.filling.water.value(), 0.0);
        assert_eq!(result.filling.water_cost, 0.0);
        // The corner mesh follows the perimeter, which a zero width
        // does not eliminate.
        assert!(result.materials.get(Material::CornerMesh).unwrap() > 0.0);
    }

    #[test]
    fn test_total_cost_matches_breakdown_sum() {
        let result = estimate(&reference_spec(), &PriceBook::default(), UnassignedPolicy::Drop);
        let manual: f64 = result.costs.iter().map(|(_, c)| c).sum();
        assert_eq!(result.total_cost(), manual);
    }

    #[test]
    fn test_empty_price_book_costs_zero_but_quantities_stand() {
        let prices = PriceBook::new(UnitCostTable::new(), ExtrasCostTable::new());
        let result = estimate(&reference_spec(), &prices, UnassignedPolicy::Drop);

        assert_eq!(result.materials.get(Material::Blocks), Some(400.0));
        for (item, cost) in result.costs.iter() {
            if item == CostItem::WaterFill {
                // Water is tariffed on the pool specification, not the
                // price book.
                assert_eq!(cost, 480.0);
            } else {
                assert_eq!(cost, 0.0, "{item} should be unpriced");
            }
        }
    }

    #[test]
    fn test_serialization_roundtrip() {
        let spec = reference_spec().with_spa();
        let result = estimate(&spec, &PriceBook::default(), UnassignedPolicy::Bucket);
        let json = serde_json::to_string_pretty(&result).unwrap();
        let roundtrip: Estimate = serde_json::from_str(&json).unwrap();
        assert_eq!(result, roundtrip);
    }

    #[test]
    fn test_custom_truck_logistics() {
        let mut spec = reference_spec();
        spec.fill_truck_count = 2;
        spec.hose_flow_lph = 1200.0;
        let result = estimate(&spec, &PriceBook::default(), UnassignedPolicy::Drop);

        assert_eq!(result.filling.truck_count, 2);
        // 48000 / 2400 = 20 h
        assert_eq!(result.filling.fill_hours.value(), 20.0);
    }
}
