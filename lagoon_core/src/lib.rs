//! # lagoon_core - Pool Construction Budgeting Engine
//!
//! `lagoon_core` is the computational heart of Lagoon: it turns a pool
//! specification and a price book into a bill of quantities, a costed
//! breakdown, per-phase cost totals, and filling logistics, then feeds
//! renderers and exporters with ready-to-display data.
//!
//! ## Design Philosophy
//!
//! - **Pure engine**: [`estimate::estimate`] is a deterministic function
//!   of its arguments - no I/O, no hidden state, no failure modes
//! - **JSON-First**: all inputs and outputs implement Serialize/Deserialize
//! - **Explicit configuration**: price tables travel with the call,
//!   never as process globals
//! - **Rich Errors**: structured error types at the file and export
//!   boundaries, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use lagoon_core::estimate::estimate;
//! use lagoon_core::phases::UnassignedPolicy;
//! use lagoon_core::pool::{Lining, PoolSpecification};
//! use lagoon_core::pricing::PriceBook;
//!
//! let spec = PoolSpecification::new(4.0, 8.0, 1.5).with_lining(Lining::Tiled);
//! spec.validate().unwrap();
//!
//! let result = estimate(&spec, &PriceBook::default(), UnassignedPolicy::Drop);
//! println!("Total budget: {:.2}", result.total_cost());
//! ```
//!
//! ## Modules
//!
//! - [`pool`] - Pool specification and geometry
//! - [`materials`] - Typed bill-of-quantities lines
//! - [`pricing`] - Unit-cost and extras tables
//! - [`phases`] - Construction-phase grouping
//! - [`estimate`] - The estimation engine
//! - [`report`] - Chart-series derivation for renderers
//! - [`project`] - Project container and metadata
//! - [`file_io`] - Project files with atomic saves and locking
//! - [`export`] - Spreadsheet and PDF artifacts
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod errors;
pub mod estimate;
pub mod export;
pub mod file_io;
pub mod materials;
pub mod phases;
pub mod pool;
pub mod pricing;
pub mod project;
pub mod report;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{EstimateError, EstimateResult};
pub use estimate::{estimate, Estimate};
pub use file_io::{load_project, save_project, FileLock};
pub use phases::UnassignedPolicy;
pub use pool::{Lining, PoolSpecification};
pub use pricing::PriceBook;
pub use project::{Project, ProjectMetadata};
