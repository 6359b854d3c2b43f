//! # Export Artifacts
//!
//! Turns a computed [`crate::estimate::Estimate`] plus its
//! [`crate::project::Project`] into deliverables:
//!
//! - [`xlsx`] - a four-sheet spreadsheet workbook
//! - [`pdf`] - a paginated budget report with embedded charts
//!
//! Exports are one-shot writes. A failure here is a notice to the user,
//! never a reason to discard the estimate that produced the data - see
//! [`crate::errors::EstimateError::is_export_notice`].

pub mod pdf;
pub mod xlsx;

pub use pdf::{render_budget_pdf, save_budget_pdf};
pub use xlsx::save_workbook;
