//! # Lagoon CLI Application
//!
//! Terminal front end for the pool budgeting engine. Collects the
//! project record and pool specification from prompts, runs one
//! estimate, prints the result tables, and writes the export artifacts
//! (project file, workbook, PDF report) next to the working directory.
//!
//! Numeric parse failures re-prompt; validation failures abort before
//! the engine runs; export failures are notices that leave the printed
//! results intact.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use lagoon_core::estimate::{estimate, Estimate};
use lagoon_core::export::{save_budget_pdf, save_workbook};
use lagoon_core::file_io::save_project;
use lagoon_core::phases::UnassignedPolicy;
use lagoon_core::pool::{Lining, PoolSpecification};
use lagoon_core::project::Project;

fn read_line() -> Option<String> {
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok()?;
    Some(input.trim().to_string())
}

fn prompt_text(prompt: &str, default: &str) -> String {
    print!("{} [{}]: ", prompt, default);
    let _ = io::stdout().flush();
    match read_line() {
        Some(line) if !line.is_empty() => line,
        _ => default.to_string(),
    }
}

/// Prompt for a number. Empty input takes the default; anything
/// unparseable is reported and asked again.
fn prompt_f64(prompt: &str, default: f64) -> f64 {
    loop {
        print!("{} [{}]: ", prompt, default);
        let _ = io::stdout().flush();
        let line = match read_line() {
            Some(line) => line,
            None => return default,
        };
        if line.is_empty() {
            return default;
        }
        match line.replace(',', ".").parse() {
            Ok(value) => return value,
            Err(_) => println!("  '{}' is not a number, try again.", line),
        }
    }
}

fn prompt_u32(prompt: &str, default: u32) -> u32 {
    loop {
        print!("{} [{}]: ", prompt, default);
        let _ = io::stdout().flush();
        let line = match read_line() {
            Some(line) => line,
            None => return default,
        };
        if line.is_empty() {
            return default;
        }
        match line.parse() {
            Ok(value) => return value,
            Err(_) => println!("  '{}' is not a whole number, try again.", line),
        }
    }
}

fn prompt_yes_no(prompt: &str, default: bool) -> bool {
    let hint = if default { "Y/n" } else { "y/N" };
    loop {
        print!("{} [{}]: ", prompt, hint);
        let _ = io::stdout().flush();
        let line = match read_line() {
            Some(line) => line.to_lowercase(),
            None => return default,
        };
        match line.as_str() {
            "" => return default,
            "y" | "yes" => return true,
            "n" | "no" => return false,
            other => println!("  '{}' is not yes or no, try again.", other),
        }
    }
}

fn prompt_lining() -> Lining {
    loop {
        print!("Lining (tiled/vinyl/none) [tiled]: ");
        let _ = io::stdout().flush();
        let line = match read_line() {
            Some(line) => line.to_lowercase(),
            None => return Lining::Tiled,
        };
        match line.as_str() {
            "" | "t" | "tiled" => return Lining::Tiled,
            "v" | "vinyl" => return Lining::Vinyl,
            "n" | "none" => return Lining::None,
            other => println!("  '{}' is not a lining type, try again.", other),
        }
    }
}

fn collect_project() -> Project {
    println!("=== PROJECT ===");
    let name = prompt_text("Project or site name", "Pool project");
    let client = prompt_text("Client name", "");
    let family_size = prompt_u32("People in the household", 4);

    println!();
    println!("=== POOL ===");
    let width_m = prompt_f64("Pool width (m)", 4.0);
    let length_m = prompt_f64("Pool length (m)", 8.0);

    let sloped = prompt_yes_no("Sloped floor?", false);
    let (min_depth_m, max_depth_m) = if sloped {
        let min = prompt_f64("Minimum depth (m)", 1.2);
        let max = prompt_f64("Maximum depth (m)", 1.8);
        (min, max)
    } else {
        let depth = prompt_f64("Depth (m)", 1.5);
        (depth, depth)
    };

    let lining = prompt_lining();
    let spa = prompt_yes_no("Include whirlpool spa?", false);

    let mut pool = PoolSpecification::new(width_m, length_m, min_depth_m);
    pool.max_depth_m = max_depth_m;
    pool.lining = lining;
    pool.spa = spa;

    let mut project = Project::new(name, client, family_size);
    project.set_pool(pool);
    project
}

fn print_estimate(project: &Project, result: &Estimate) {
    println!();
    println!("═══════════════════════════════════════════════");
    println!("  POOL BUDGET - {}", project.meta.name);
    println!("═══════════════════════════════════════════════");
    println!();
    println!("Area:       {:.2} m2", result.area_m2);
    println!("Volume:     {:.2} L", result.filling.water.value());
    println!("Total cost: {:.2}", result.total_cost());
    println!();

    println!("Materials:");
    for (material, quantity) in result.materials.iter() {
        println!("  {:<42} {:>12.2}", material.label(), quantity);
    }
    println!();

    println!("Costs by line:");
    for (item, cost) in result.costs.iter() {
        println!("  {:<42} {:>12.2}", item.label(), cost);
    }
    println!();

    println!("Costs by phase:");
    for (phase, cost) in result.phase_costs.iter() {
        println!("  {:<42} {:>12.2}", phase.label(), cost);
    }
    println!();

    println!("Filling:");
    println!("  {:<42} {:>12.2}", "Volume (m3)", result.filling.volume.value());
    println!("  {:<42} {:>12}", "Trucks", result.filling.truck_count);
    println!("  {:<42} {:>12.2}", "Time (h)", result.filling.fill_hours.value());
    println!("  {:<42} {:>12.2}", "Water cost", result.filling.water_cost);
    println!("═══════════════════════════════════════════════");
}

/// File stem derived from the project name.
fn artifact_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = stem.trim_matches('_');
    if trimmed.is_empty() {
        "pool_budget".to_string()
    } else {
        trimmed.to_string()
    }
}

fn write_artifacts(project: &Project, result: &Estimate) {
    let stem = artifact_stem(&project.meta.name);

    let project_path = PathBuf::from(format!("{stem}.lgn"));
    match save_project(project, &project_path) {
        Ok(()) => println!("Saved project: {}", project_path.display()),
        Err(e) => eprintln!("Warning: could not save project file: {}", e),
    }

    let workbook_path = PathBuf::from(format!("{stem}.xlsx"));
    match save_workbook(project, result, &workbook_path) {
        Ok(()) => println!("Saved workbook: {}", workbook_path.display()),
        Err(e) => eprintln!("Warning: could not write workbook: {}", e),
    }

    let pdf_path = PathBuf::from(format!("{stem}.pdf"));
    match save_budget_pdf(project, result, &pdf_path) {
        Ok(()) => println!("Saved report: {}", pdf_path.display()),
        Err(e) => eprintln!("Warning: could not write report: {}", e),
    }
}

fn main() -> ExitCode {
    println!("Lagoon - Pool Budget Calculator");
    println!("===============================");
    println!();

    let project = collect_project();

    if let Err(e) = project.pool.validate() {
        eprintln!();
        eprintln!("Error: {}", e);
        if let Ok(json) = serde_json::to_string_pretty(&e) {
            eprintln!("{}", json);
        }
        return ExitCode::FAILURE;
    }

    let result = estimate(&project.pool, &project.prices, UnassignedPolicy::Drop);

    print_estimate(&project, &result);

    // Flag bill lines the price book cannot cost before anyone reads
    // zeroes off the workbook.
    let missing = project
        .prices
        .unit_costs
        .missing_materials(result.materials.kinds());
    if !missing.is_empty() {
        println!();
        println!("Note: no unit price on file for:");
        for material in missing {
            println!("  - {}", material.label());
        }
    }

    println!();
    write_artifacts(&project, &result);

    println!();
    println!("JSON output:");
    if let Ok(json) = serde_json::to_string_pretty(&result) {
        println!("{}", json);
    }

    ExitCode::SUCCESS
}
