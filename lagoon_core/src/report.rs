//! # Report Series
//!
//! Data-only chart series derived from an [`Estimate`]. Renderers (the
//! PDF export, a future GUI) draw these; nothing here touches a canvas.
//!
//! The quantity-per-m2 series is where the degenerate-geometry contract
//! lives: a zero-area estimate yields all-zero ratios instead of a
//! division by zero.

use serde::{Deserialize, Serialize};

use crate::estimate::Estimate;

/// One labeled bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarPoint {
    /// Axis label
    pub label: String,
    /// Bar magnitude
    pub value: f64,
}

/// A titled series of bars, ready for any renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    /// Chart title
    pub title: String,
    /// Bars in display order
    pub points: Vec<BarPoint>,
}

impl BarSeries {
    fn new(title: impl Into<String>) -> Self {
        BarSeries {
            title: title.into(),
            points: Vec::new(),
        }
    }

    fn push(&mut self, label: impl Into<String>, value: f64) {
        self.points.push(BarPoint {
            label: label.into(),
            value,
        });
    }

    /// Largest bar, for renderers scaling widths. Zero for an empty
    /// or all-zero series.
    pub fn max_value(&self) -> f64 {
        self.points.iter().map(|p| p.value).fold(0.0, f64::max)
    }
}

/// Material quantity per square meter of footprint.
///
/// Zero area is a legal (degenerate) input to the engine; here it must
/// not become a division. All ratios collapse to zero in that case.
pub fn quantity_per_square_meter(estimate: &Estimate) -> BarSeries {
    let mut series = BarSeries::new("Material quantity per m2");
    for (material, quantity) in estimate.materials.iter() {
        let ratio = if estimate.area_m2 == 0.0 {
            0.0
        } else {
            quantity / estimate.area_m2
        };
        series.push(material.label(), ratio);
    }
    series
}

/// Cost distribution across construction phases.
pub fn cost_by_phase(estimate: &Estimate) -> BarSeries {
    let mut series = BarSeries::new("Cost by construction phase");
    for (phase, cost) in estimate.phase_costs.iter() {
        series.push(phase.label(), cost);
    }
    series
}

/// Cost lines ranked most expensive first, truncated to `limit`.
/// Includes the water-fill entry alongside the material lines.
pub fn ranked_material_costs(estimate: &Estimate, limit: usize) -> BarSeries {
    let mut entries: Vec<_> = estimate.costs.iter().collect();
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut series = BarSeries::new("Top costs by line");
    for (item, cost) in entries.into_iter().take(limit) {
        series.push(item.label(), cost);
    }
    series
}

/// Filling logistics at a glance: volume, trucks, duration, cost.
pub fn filling_overview(estimate: &Estimate) -> BarSeries {
    let mut series = BarSeries::new("Pool filling");
    series.push("Volume (L)", estimate.filling.water.value());
    series.push("Trucks", estimate.filling.truck_count as f64);
    series.push("Time (h)", estimate.filling.fill_hours.value());
    series.push("Cost", estimate.filling.water_cost);
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::estimate;
    use crate::materials::Material;
    use crate::phases::UnassignedPolicy;
    use crate::pool::{Lining, PoolSpecification};
    use crate::pricing::PriceBook;

    fn reference_estimate() -> Estimate {
        let spec = PoolSpecification::new(4.0, 8.0, 1.5).with_lining(Lining::Tiled);
        estimate(&spec, &PriceBook::default(), UnassignedPolicy::Drop)
    }

    #[test]
    fn test_quantity_per_m2() {
        let series = quantity_per_square_meter(&reference_estimate());
        let blocks = series
            .points
            .iter()
            .find(|p| p.label == Material::Blocks.label())
            .unwrap();
        // 400 blocks over 32 m2
        assert!((blocks.value - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_area_yields_zero_ratios() {
        let spec = PoolSpecification::new(0.0, 8.0, 1.5);
        let zero = estimate(&spec, &PriceBook::default(), UnassignedPolicy::Drop);
        let series = quantity_per_square_meter(&zero);

        assert!(!series.points.is_empty());
        assert!(series.points.iter().all(|p| p.value == 0.0));
    }

    #[test]
    fn test_cost_by_phase_preserves_report_order() {
        let series = cost_by_phase(&reference_estimate());
        assert_eq!(series.points[0].label, "Masonry");
        assert_eq!(series.points.last().unwrap().label, "Filling");
    }

    #[test]
    fn test_ranked_costs_descend_and_truncate() {
        let series = ranked_material_costs(&reference_estimate(), 5);
        assert_eq!(series.points.len(), 5);
        for pair in series.points.windows(2) {
            assert!(pair[0].value >= pair[1].value);
        }
        // Tile finish (1920.0) tops the reference budget.
        assert_eq!(series.points[0].label, Material::TileFinish.label());
    }

    #[test]
    fn test_filling_overview_points() {
        let series = filling_overview(&reference_estimate());
        let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![48_000.0, 3.0, 16.0, 480.0]);
    }

    #[test]
    fn test_max_value() {
        let series = filling_overview(&reference_estimate());
        assert_eq!(series.max_value(), 48_000.0);
    }
}
