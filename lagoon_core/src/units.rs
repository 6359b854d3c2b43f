//! # Unit Types
//!
//! Type-safe wrappers for the quantities that cross module boundaries in
//! the filling-logistics pipeline. Simple newtype wrappers rather than a
//! full units library:
//!
//! - Pool budgets use a small, fixed set of metric units
//! - JSON serialization stays clean (just numbers)
//! - Minimal runtime overhead
//!
//! ## Example
//!
//! ```rust
//! use lagoon_core::units::{CubicMeters, Liters};
//!
//! let volume = CubicMeters(48.0);
//! let liters: Liters = volume.into();
//! assert_eq!(liters.0, 48_000.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Area in square meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMeters(pub f64);

/// Volume in cubic meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMeters(pub f64);

/// Volume in liters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Liters(pub f64);

/// Duration in hours
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hours(pub f64);

impl From<CubicMeters> for Liters {
    fn from(m3: CubicMeters) -> Self {
        Liters(m3.0 * 1000.0)
    }
}

impl From<Liters> for CubicMeters {
    fn from(l: Liters) -> Self {
        CubicMeters(l.0 / 1000.0)
    }
}

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(SquareMeters);
impl_arithmetic!(CubicMeters);
impl_arithmetic!(Liters);
impl_arithmetic!(Hours);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_meters_to_liters() {
        let volume = CubicMeters(1.5);
        let liters: Liters = volume.into();
        assert_eq!(liters.0, 1500.0);
    }

    #[test]
    fn test_liters_to_cubic_meters() {
        let liters = Liters(250.0);
        let m3: CubicMeters = liters.into();
        assert_eq!(m3.0, 0.25);
    }

    #[test]
    fn test_arithmetic() {
        let a = Liters(1000.0);
        let b = Liters(500.0);
        assert_eq!((a + b).0, 1500.0);
        assert_eq!((a - b).0, 500.0);
        assert_eq!((a * 2.0).0, 2000.0);
        assert_eq!((a / 4.0).0, 250.0);
    }

    #[test]
    fn test_serialization() {
        let hours = Hours(16.0);
        let json = serde_json::to_string(&hours).unwrap();
        assert_eq!(json, "16.0");

        let roundtrip: Hours = serde_json::from_str(&json).unwrap();
        assert_eq!(hours, roundtrip);
    }
}
