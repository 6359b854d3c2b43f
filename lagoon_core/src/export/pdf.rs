//! # PDF Report Export
//!
//! Generates the paginated budget report using Typst, compiled entirely
//! in-process:
//!
//! - The Typst template is an embedded string constant
//! - Table rows and chart bars are injected as generated fragments
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! The report carries the project record, the four estimate outputs,
//! bar charts built from the [`crate::report`] series, and a fixed
//! walkthrough of the construction stages.

use chrono::Utc;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::errors::{EstimateError, EstimateResult};
use crate::estimate::Estimate;
use crate::project::Project;
use crate::report::{
    cost_by_phase, filling_overview, quantity_per_square_meter, ranked_material_costs, BarSeries,
};

/// Ranked-cost chart is truncated to this many bars.
const RANKED_CHART_LIMIT: usize = 10;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Available fonts
    fonts: Vec<Font>,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    /// Bundled fonts from typst-assets cover text and math symbols.
    fn load_fonts() -> Vec<Font> {
        let mut fonts = Vec::new();
        for font_bytes in typst_assets::fonts() {
            let buffer = Bytes::new(font_bytes.to_vec());
            for font in Font::iter(buffer) {
                fonts.push(font);
            }
        }
        fonts
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// Template
// ============================================================================

const BUDGET_TEMPLATE: &str = r##"
#set page(
  paper: "us-letter",
  margin: (top: 1in, bottom: 1in, left: 1in, right: 1in),
  header: align(right)[
    #text(size: 9pt, fill: gray)[Lagoon Pool Budgets]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[{{PROJECT_NAME}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 11pt)

// Title Block
#align(center)[
  #block(width: 100%, fill: rgb("#eef4f8"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Pool Construction Budget]
    #v(4pt)
    #text(size: 14pt)[{{PROJECT_NAME}}]
  ]
]

#v(12pt)

== Project Data

#table(
  columns: (auto, 1fr),
  inset: 8pt,
  stroke: 0.5pt,
  table.header([*Field*], [*Value*]),
{{PROJECT_ROWS}}
)

#v(12pt)

== Materials

#table(
  columns: (1fr, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right),
  table.header([*Material*], [*Quantity*]),
{{MATERIAL_ROWS}}
)

#v(12pt)

== Costs by Line

#table(
  columns: (1fr, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right),
  table.header([*Line*], [*Cost*]),
{{COST_ROWS}}
)

#v(12pt)

== Costs by Phase

#table(
  columns: (1fr, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right),
  table.header([*Phase*], [*Cost*]),
{{PHASE_ROWS}}
)

#v(12pt)

== Filling Logistics

#table(
  columns: (1fr, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right),
  table.header([*Item*], [*Value*]),
{{FILLING_ROWS}}
)

#pagebreak()

== Charts

{{CHARTS}}

#v(16pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

== Construction Stages

+ Masonry: block shell structure.
+ Waterproofing: protection against leaks.
+ Render coat: scratch and base coats.
+ Finishing: tile or liner surface.
+ Trim: grout and accessories.
+ Filling: water delivery by truck.
+ Extras: whirlpool spa, when included.

#v(24pt)
#text(size: 9pt, fill: gray)[
  Generated by Lagoon. Quantities are takeoff estimates; confirm with
  your supplier before ordering.
]
"##;

// ============================================================================
// Fragment builders
// ============================================================================

/// Escape user-supplied text for safe interpolation into Typst markup.
fn typst_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '#' | '[' | ']' | '$' | '*' | '_' | '`' | '<' | '>' | '@' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// One `[label], [value],` table row.
fn table_row(label: &str, value: &str) -> String {
    format!("  [{}], [{}],\n", typst_escape(label), typst_escape(value))
}

fn project_rows(project: &Project, estimate: &Estimate) -> String {
    let pool = &project.pool;
    let mut rows = String::new();
    rows.push_str(&table_row("Project name", &project.meta.name));
    rows.push_str(&table_row("Client", &project.meta.client));
    rows.push_str(&table_row("Family size", &project.meta.family_size.to_string()));
    rows.push_str(&table_row("Width", &format!("{:.2} m", pool.width_m)));
    rows.push_str(&table_row("Length", &format!("{:.2} m", pool.length_m)));
    rows.push_str(&table_row("Min depth", &format!("{:.2} m", pool.min_depth_m)));
    rows.push_str(&table_row("Max depth", &format!("{:.2} m", pool.max_depth_m)));
    rows.push_str(&table_row("Lining", pool.lining.display_name()));
    rows.push_str(&table_row("Spa", if pool.spa { "Yes" } else { "No" }));
    rows.push_str(&table_row("Area", &format!("{:.2} m2", estimate.area_m2)));
    rows
}

fn material_rows(estimate: &Estimate) -> String {
    let mut rows = String::new();
    for (material, quantity) in estimate.materials.iter() {
        rows.push_str(&table_row(material.label(), &format!("{:.2}", quantity)));
    }
    rows
}

fn cost_rows(estimate: &Estimate) -> String {
    let mut rows = String::new();
    for (item, cost) in estimate.costs.iter() {
        rows.push_str(&table_row(item.label(), &format!("{:.2}", cost)));
    }
    rows.push_str(&format!(
        "  [*Total*], [*{:.2}*],\n",
        estimate.total_cost()
    ));
    rows
}

fn phase_rows(estimate: &Estimate) -> String {
    let mut rows = String::new();
    for (phase, cost) in estimate.phase_costs.iter() {
        rows.push_str(&table_row(phase.label(), &format!("{:.2}", cost)));
    }
    rows
}

fn filling_rows(estimate: &Estimate) -> String {
    let filling = &estimate.filling;
    let mut rows = String::new();
    rows.push_str(&table_row(
        "Volume (m3)",
        &format!("{:.2}", filling.volume.value()),
    ));
    rows.push_str(&table_row(
        "Volume (L)",
        &format!("{:.2}", filling.water.value()),
    ));
    rows.push_str(&table_row("Fill trucks", &filling.truck_count.to_string()));
    rows.push_str(&table_row(
        "Fill time",
        &format!("{:.2} h", filling.fill_hours.value()),
    ));
    rows.push_str(&table_row("Water cost", &format!("{:.2}", filling.water_cost)));
    rows
}

/// Render one series as a horizontal bar chart: label, scaled bar,
/// right-aligned value.
fn chart_fragment(series: &BarSeries) -> String {
    let max = series.max_value();
    let mut out = String::new();
    out.push_str(&format!("=== {}\n\n", typst_escape(&series.title)));
    out.push_str("#grid(\n  columns: (170pt, 1fr, 70pt),\n  gutter: 6pt,\n");
    for point in &series.points {
        let fraction = if max > 0.0 { point.value / max } else { 0.0 };
        out.push_str(&format!(
            "  [#text(size: 9pt)[{}]], [#rect(width: {:.1}%, height: 8pt, fill: rgb(\"#7fb3d5\"))], align(right)[#text(size: 9pt)[{:.2}]],\n",
            typst_escape(&point.label),
            fraction * 100.0,
            point.value,
        ));
    }
    out.push_str(")\n\n#v(12pt)\n\n");
    out
}

fn charts_fragment(estimate: &Estimate) -> String {
    let mut out = String::new();
    out.push_str(&chart_fragment(&quantity_per_square_meter(estimate)));
    out.push_str(&chart_fragment(&cost_by_phase(estimate)));
    out.push_str(&chart_fragment(&ranked_material_costs(
        estimate,
        RANKED_CHART_LIMIT,
    )));
    out.push_str(&chart_fragment(&filling_overview(estimate)));
    out
}

// ============================================================================
// Rendering
// ============================================================================

/// Render the budget report to PDF bytes.
///
/// # Example
///
/// ```rust,no_run
/// use lagoon_core::estimate::estimate;
/// use lagoon_core::export::render_budget_pdf;
/// use lagoon_core::phases::UnassignedPolicy;
/// use lagoon_core::project::Project;
///
/// let project = Project::new("Beach House", "R. Lima", 5);
/// let result = estimate(&project.pool, &project.prices, UnassignedPolicy::Drop);
/// let pdf = render_budget_pdf(&project, &result).unwrap();
/// std::fs::write("budget.pdf", pdf).unwrap();
/// ```
pub fn render_budget_pdf(project: &Project, estimate: &Estimate) -> EstimateResult<Vec<u8>> {
    let source = BUDGET_TEMPLATE
        .replace("{{PROJECT_NAME}}", &typst_escape(&project.meta.name))
        .replace("{{DATE}}", &Utc::now().format("%Y-%m-%d").to_string())
        .replace("{{PROJECT_ROWS}}", &project_rows(project, estimate))
        .replace("{{MATERIAL_ROWS}}", &material_rows(estimate))
        .replace("{{COST_ROWS}}", &cost_rows(estimate))
        .replace("{{PHASE_ROWS}}", &phase_rows(estimate))
        .replace("{{FILLING_ROWS}}", &filling_rows(estimate))
        .replace("{{CHARTS}}", &charts_fragment(estimate));

    let world = PdfWorld::new(source);

    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        EstimateError::export_failed(
            "budget report",
            format!("Typst compilation failed: {}", error_msgs.join("; ")),
        )
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        EstimateError::export_failed(
            "budget report",
            format!("PDF rendering failed: {}", error_msgs.join("; ")),
        )
    })?;

    Ok(pdf_bytes)
}

/// Render and write the report in one step.
pub fn save_budget_pdf(
    project: &Project,
    estimate: &Estimate,
    path: &std::path::Path,
) -> EstimateResult<()> {
    let bytes = render_budget_pdf(project, estimate)?;
    std::fs::write(path, bytes).map_err(|e| {
        EstimateError::file_error("write pdf", path.display().to_string(), e.to_string())
    })
}
