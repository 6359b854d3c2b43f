//! # Spreadsheet Export
//!
//! Writes the budget as an `.xlsx` workbook with one sheet per output:
//! project record, bill of quantities, cost breakdown, phase summary.
//! Sheet and column layout stay stable across runs so downstream
//! spreadsheets can link against them.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::errors::{EstimateError, EstimateResult};
use crate::estimate::Estimate;
use crate::project::Project;

/// Save the project record and estimate as a four-sheet workbook.
///
/// Sheets: `Project` (key/value), `Materials` (line, quantity),
/// `Costs` (line, cost), `Phase Costs` (phase, cost).
///
/// # Example
///
/// ```rust,no_run
/// use lagoon_core::estimate::estimate;
/// use lagoon_core::export::save_workbook;
/// use lagoon_core::phases::UnassignedPolicy;
/// use lagoon_core::pricing::PriceBook;
/// use lagoon_core::project::Project;
/// use std::path::Path;
///
/// let project = Project::new("Beach House", "R. Lima", 5);
/// let result = estimate(&project.pool, &project.prices, UnassignedPolicy::Drop);
/// save_workbook(&project, &result, Path::new("budget.xlsx"))?;
/// # Ok::<(), lagoon_core::errors::EstimateError>(())
/// ```
pub fn save_workbook(project: &Project, estimate: &Estimate, path: &Path) -> EstimateResult<()> {
    let mut workbook =
        build_workbook(project, estimate).map_err(|e| workbook_error(path, e))?;
    workbook.save(path).map_err(|e| workbook_error(path, e))?;
    Ok(())
}

fn workbook_error(path: &Path, e: XlsxError) -> EstimateError {
    EstimateError::export_failed(
        format!("workbook '{}'", path.display()),
        e.to_string(),
    )
}

fn build_workbook(project: &Project, estimate: &Estimate) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    write_project_sheet(workbook.add_worksheet(), project, estimate, &header)?;
    write_materials_sheet(workbook.add_worksheet(), estimate, &header)?;
    write_costs_sheet(workbook.add_worksheet(), estimate, &header)?;
    write_phases_sheet(workbook.add_worksheet(), estimate, &header)?;

    Ok(workbook)
}

fn write_project_sheet(
    sheet: &mut Worksheet,
    project: &Project,
    estimate: &Estimate,
    header: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name("Project")?;
    sheet.set_column_width(0, 28.0)?;
    sheet.set_column_width(1, 24.0)?;

    sheet.write_string_with_format(0, 0, "Field", header)?;
    sheet.write_string_with_format(0, 1, "Value", header)?;

    let pool = &project.pool;
    let texts: [(&str, String); 5] = [
        ("Project name", project.meta.name.clone()),
        ("Client", project.meta.client.clone()),
        ("Family size", project.meta.family_size.to_string()),
        ("Lining", pool.lining.display_name().to_string()),
        ("Spa", if pool.spa { "Yes" } else { "No" }.to_string()),
    ];
    let mut row = 1;
    for (field, value) in &texts {
        sheet.write_string(row, 0, *field)?;
        sheet.write_string(row, 1, value.as_str())?;
        row += 1;
    }

    let numbers: [(&str, f64); 6] = [
        ("Width (m)", pool.width_m),
        ("Length (m)", pool.length_m),
        ("Min depth (m)", pool.min_depth_m),
        ("Max depth (m)", pool.max_depth_m),
        ("Area (m2)", estimate.area_m2),
        ("Water volume (L)", estimate.filling.water.value()),
    ];
    for (field, value) in numbers {
        sheet.write_string(row, 0, field)?;
        sheet.write_number(row, 1, value)?;
        row += 1;
    }

    Ok(())
}

fn write_materials_sheet(
    sheet: &mut Worksheet,
    estimate: &Estimate,
    header: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name("Materials")?;
    sheet.set_column_width(0, 40.0)?;

    sheet.write_string_with_format(0, 0, "Material", header)?;
    sheet.write_string_with_format(0, 1, "Quantity", header)?;

    for (row, (material, quantity)) in estimate.materials.iter().enumerate() {
        let row = row as u32 + 1;
        sheet.write_string(row, 0, material.label())?;
        sheet.write_number(row, 1, quantity)?;
    }

    Ok(())
}

fn write_costs_sheet(
    sheet: &mut Worksheet,
    estimate: &Estimate,
    header: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name("Costs")?;
    sheet.set_column_width(0, 40.0)?;

    sheet.write_string_with_format(0, 0, "Line", header)?;
    sheet.write_string_with_format(0, 1, "Cost", header)?;

    let mut row = 1;
    for (item, cost) in estimate.costs.iter() {
        sheet.write_string(row, 0, item.label())?;
        sheet.write_number(row, 1, cost)?;
        row += 1;
    }

    sheet.write_string_with_format(row, 0, "Total", header)?;
    sheet.write_number_with_format(row, 1, estimate.total_cost(), header)?;

    Ok(())
}

fn write_phases_sheet(
    sheet: &mut Worksheet,
    estimate: &Estimate,
    header: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name("Phase Costs")?;
    sheet.set_column_width(0, 24.0)?;

    sheet.write_string_with_format(0, 0, "Phase", header)?;
    sheet.write_string_with_format(0, 1, "Cost", header)?;

    for (row, (phase, cost)) in estimate.phase_costs.iter().enumerate() {
        let row = row as u32 + 1;
        sheet.write_string(row, 0, phase.label())?;
        sheet.write_number(row, 1, cost)?;
    }

    Ok(())
}
