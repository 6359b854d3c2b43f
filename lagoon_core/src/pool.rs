//! # Pool Specification
//!
//! Input parameters for a pool budget. One immutable value carries the
//! geometry, the finish configuration, and the filling-logistics knobs;
//! the engine reads it and never writes it back.
//!
//! ## Assumptions
//!
//! - Rectangular footprint (width x length)
//! - Sloped floors are averaged: a single effective depth feeds every
//!   formula that needs one
//! - Metric units throughout (meters, liters, hours)
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "width_m": 4.0,
//!   "length_m": 8.0,
//!   "min_depth_m": 1.2,
//!   "max_depth_m": 1.8,
//!   "lining": "Tiled",
//!   "spa": false,
//!   "fill_truck_count": 3,
//!   "hose_flow_lph": 1000.0,
//!   "water_price_per_liter": 0.01
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// Interior finish of the pool shell.
///
/// `Tiled` adds the tile-finish line to the bill, `Vinyl` adds the
/// liner membrane line, `None` leaves the rendered shell bare. The spa
/// option is independent of the finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lining {
    /// Bare rendered shell, no finish line
    None,
    /// Ceramic tile or mosaic finish
    #[default]
    Tiled,
    /// Welded vinyl liner membrane
    Vinyl,
}

impl Lining {
    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Lining::None => "No finish",
            Lining::Tiled => "Tiled",
            Lining::Vinyl => "Vinyl liner",
        }
    }
}

/// Input parameters for a pool budget.
///
/// Constraints checked by [`PoolSpecification::validate`]: positive
/// width, length, and depths; `min_depth_m <= max_depth_m`; at least
/// one fill truck; positive hose flow. The engine does not call
/// `validate` — out-of-range values propagate arithmetically (a zero
/// dimension produces an all-zero bill), so the intake boundary is
/// responsible for rejecting bad input before calculating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSpecification {
    /// Pool width in meters
    pub width_m: f64,

    /// Pool length in meters
    pub length_m: f64,

    /// Depth at the shallow end in meters (equal to `max_depth_m` for
    /// a flat floor)
    pub min_depth_m: f64,

    /// Depth at the deep end in meters
    pub max_depth_m: f64,

    /// Interior finish
    #[serde(default)]
    pub lining: Lining,

    /// Include the whirlpool spa kit
    #[serde(default)]
    pub spa: bool,

    /// Number of water trucks filling simultaneously
    #[serde(default = "default_fill_truck_count")]
    pub fill_truck_count: u32,

    /// Hose flow per truck, liters per hour
    #[serde(default = "default_hose_flow_lph")]
    pub hose_flow_lph: f64,

    /// Water tariff, currency per liter
    #[serde(default = "default_water_price_per_liter")]
    pub water_price_per_liter: f64,
}

fn default_fill_truck_count() -> u32 {
    3
}

fn default_hose_flow_lph() -> f64 {
    1000.0
}

fn default_water_price_per_liter() -> f64 {
    0.01
}

impl PoolSpecification {
    /// A flat-floor pool with default filling logistics.
    pub fn new(width_m: f64, length_m: f64, depth_m: f64) -> Self {
        PoolSpecification {
            width_m,
            length_m,
            min_depth_m: depth_m,
            max_depth_m: depth_m,
            lining: Lining::default(),
            spa: false,
            fill_truck_count: default_fill_truck_count(),
            hose_flow_lph: default_hose_flow_lph(),
            water_price_per_liter: default_water_price_per_liter(),
        }
    }

    /// Set the interior finish (builder pattern)
    pub fn with_lining(mut self, lining: Lining) -> Self {
        self.lining = lining;
        self
    }

    /// Include the spa kit (builder pattern)
    pub fn with_spa(mut self) -> Self {
        self.spa = true;
        self
    }

    /// Set a sloped floor (builder pattern)
    pub fn with_slope(mut self, min_depth_m: f64, max_depth_m: f64) -> Self {
        self.min_depth_m = min_depth_m;
        self.max_depth_m = max_depth_m;
        self
    }

    /// Surface area of the footprint: width x length (m2)
    pub fn area_m2(&self) -> f64 {
        self.width_m * self.length_m
    }

    /// Boundary length of the footprint: 2 x (width + length) (m)
    pub fn perimeter_m(&self) -> f64 {
        2.0 * (self.width_m + self.length_m)
    }

    /// Average of shallow and deep depths, used wherever a single
    /// depth value is needed (m)
    pub fn effective_depth_m(&self) -> f64 {
        (self.min_depth_m + self.max_depth_m) / 2.0
    }

    /// Water volume at the effective depth (m3)
    pub fn volume_m3(&self) -> f64 {
        self.width_m * self.length_m * self.effective_depth_m()
    }

    /// Validate input parameters at the intake boundary.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.width_m <= 0.0 {
            return Err(EstimateError::invalid_input(
                "width_m",
                self.width_m.to_string(),
                "Width must be positive",
            ));
        }
        if self.length_m <= 0.0 {
            return Err(EstimateError::invalid_input(
                "length_m",
                self.length_m.to_string(),
                "Length must be positive",
            ));
        }
        if self.min_depth_m <= 0.0 {
            return Err(EstimateError::invalid_input(
                "min_depth_m",
                self.min_depth_m.to_string(),
                "Depth must be positive",
            ));
        }
        if self.max_depth_m < self.min_depth_m {
            return Err(EstimateError::invalid_input(
                "max_depth_m",
                self.max_depth_m.to_string(),
                "Maximum depth must not be less than minimum depth",
            ));
        }
        if self.fill_truck_count == 0 {
            return Err(EstimateError::invalid_input(
                "fill_truck_count",
                "0",
                "At least one fill truck is required",
            ));
        }
        if self.hose_flow_lph <= 0.0 {
            return Err(EstimateError::invalid_input(
                "hose_flow_lph",
                self.hose_flow_lph.to_string(),
                "Hose flow must be positive",
            ));
        }
        if self.water_price_per_liter < 0.0 {
            return Err(EstimateError::invalid_input(
                "water_price_per_liter",
                self.water_price_per_liter.to_string(),
                "Water tariff must not be negative",
            ));
        }
        Ok(())
    }
}
