//! # Construction Phases
//!
//! The fixed grouping of cost lines into construction stages used by
//! the phase-cost summary. Membership is a static table: a material can
//! belong to several phases (cement is bought for the masonry stage and
//! again for the render coat), and a few lines belong to none.
//!
//! What happens to the unassigned lines is a caller choice, see
//! [`UnassignedPolicy`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::materials::{CostItem, Material};

/// A named construction stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Shell structure: blocks and cement
    Masonry,
    /// Both waterproofing compounds
    Waterproofing,
    /// Scratch and render coats
    RenderCoat,
    /// Interior finish: tile and adhesive
    Finishing,
    /// Grout and spacers
    Trim,
    /// Water delivery
    Filling,
    /// Optional features (spa kit)
    Extras,
    /// Lines assigned to no stage, reported only under
    /// [`UnassignedPolicy::Bucket`]
    Unassigned,
}

impl Phase {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Masonry => "Masonry",
            Phase::Waterproofing => "Waterproofing",
            Phase::RenderCoat => "Render coat",
            Phase::Finishing => "Finishing",
            Phase::Trim => "Trim",
            Phase::Filling => "Filling",
            Phase::Extras => "Extras",
            Phase::Unassigned => "Unassigned",
        }
    }

    /// The cost lines belonging to this phase.
    ///
    /// Membership is fixed; lines the estimate does not contain simply
    /// contribute zero. [`Phase::Unassigned`] has no static members -
    /// its contents are whatever the other phases left behind.
    pub fn members(&self) -> &'static [CostItem] {
        match self {
            Phase::Masonry => &[
                CostItem::Material(Material::Blocks),
                CostItem::Material(Material::Cement),
            ],
            Phase::Waterproofing => &[
                CostItem::Material(Material::WaterproofingOne),
                CostItem::Material(Material::WaterproofingTwo),
            ],
            Phase::RenderCoat => &[
                CostItem::Material(Material::Cement),
                CostItem::Material(Material::Sand),
                CostItem::Material(Material::AdhesiveMortar),
            ],
            Phase::Finishing => &[
                CostItem::Material(Material::TileFinish),
                CostItem::Material(Material::AdhesiveMortar),
            ],
            Phase::Trim => &[
                CostItem::Material(Material::Grout),
                CostItem::Material(Material::Spacers),
            ],
            Phase::Filling => &[CostItem::WaterFill],
            Phase::Extras => &[CostItem::Material(Material::SpaKit)],
            Phase::Unassigned => &[],
        }
    }

    /// Phases summarized on every estimate, in report order. Extras is
    /// appended only when the spa line exists, Unassigned only under
    /// the bucket policy.
    pub fn standard_order() -> &'static [Phase] {
        &[
            Phase::Masonry,
            Phase::Waterproofing,
            Phase::RenderCoat,
            Phase::Finishing,
            Phase::Trim,
            Phase::Filling,
        ]
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What to do with cost lines that belong to no phase.
///
/// The corner mesh, the bonding liquid, and the vinyl liner sit outside
/// the phase table. `Drop` leaves them out of the phase summary (they
/// remain in the raw cost breakdown); `Bucket` collects them under
/// [`Phase::Unassigned`] so the phase view still sums to the full
/// budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnassignedPolicy {
    /// Omit unassigned lines from the phase summary
    #[default]
    Drop,
    /// Append an Unassigned phase summing them
    Bucket,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cement_in_two_phases() {
        let cement = CostItem::Material(Material::Cement);
        assert!(Phase::Masonry.members().contains(&cement));
        assert!(Phase::RenderCoat.members().contains(&cement));
    }

    #[test]
    fn test_filling_phase_holds_only_water() {
        assert_eq!(Phase::Filling.members(), &[CostItem::WaterFill]);
    }

    #[test]
    fn test_standard_order_excludes_conditional_phases() {
        let order = Phase::standard_order();
        assert!(!order.contains(&Phase::Extras));
        assert!(!order.contains(&Phase::Unassigned));
        assert_eq!(order.len(), 6);
    }

    #[test]
    fn test_corner_mesh_is_unassigned() {
        let mesh = CostItem::Material(Material::CornerMesh);
        let assigned = Phase::standard_order()
            .iter()
            .chain([Phase::Extras].iter())
            .any(|p| p.members().contains(&mesh));
        assert!(!assigned);
    }

    #[test]
    fn test_policy_default_is_drop() {
        assert_eq!(UnassignedPolicy::default(), UnassignedPolicy::Drop);
    }
}
