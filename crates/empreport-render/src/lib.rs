//! # empreport-render
//!
//! Rendering backends for employee reports.
//!
//! This crate provides:
//! - Excel workbook output (one sheet per table)
//! - SVG bar chart of average salary per department
//! - SVG pie chart of the salary category distribution
//! - Console tables and a JSON summary
//!
//! ## Example
//!
//! ```rust,ignore
//! use empreport_core::Renderer;
//! use empreport_render::{BarChartRenderer, ExcelRenderer, PieChartRenderer};
//!
//! ExcelRenderer::new().render_to_file(&report, "employee_analysis_result.xlsx")?;
//!
//! let bar = BarChartRenderer::new().render(&report)?;
//! std::fs::write("avg_salary_by_dept.svg", bar)?;
//!
//! let pie = PieChartRenderer::new().render(&report)?;
//! std::fs::write("salary_category_distribution.svg", pie)?;
//! ```

pub mod bar;
pub mod excel;
pub mod pie;
pub mod text;

pub use bar::BarChartRenderer;
pub use excel::ExcelRenderer;
pub use pie::PieChartRenderer;
pub use text::{JsonRenderer, TextRenderer};

use empreport_core::RenderError;
use svg::Document;

/// Shared look of the SVG charts
#[derive(Clone, Debug)]
pub struct ChartStyle {
    /// Total image width in pixels
    pub width: u32,
    /// Total image height in pixels
    pub height: u32,
    /// Padding around the plot
    pub padding: u32,
    /// Fill colors, cycled per bar or slice
    pub palette: Vec<String>,
    /// Background color
    pub background_color: String,
    /// Axis and grid line color
    pub grid_color: String,
    /// Text color
    pub text_color: String,
    /// Font family
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            padding: 20,
            palette: [
                "#4c72b0", "#dd8452", "#55a868", "#c44e52", "#8172b3", "#937860", "#da8bc3",
                "#8c8c8c", "#ccb974", "#64b5cd",
            ]
            .iter()
            .map(|c| (*c).to_string())
            .collect(),
            background_color: "#ffffff".into(),
            grid_color: "#d0d5da".into(),
            text_color: "#2c3e50".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
        }
    }
}

impl ChartStyle {
    /// Fill color for the `index`-th bar or slice
    pub fn color(&self, index: usize) -> &str {
        if self.palette.is_empty() {
            return "#4c72b0";
        }
        &self.palette[index % self.palette.len()]
    }

    /// Empty document with background, sized to the style
    fn document(&self) -> Document {
        let background = svg::node::element::Rectangle::new()
            .set("width", "100%")
            .set("height", "100%")
            .set("fill", self.background_color.as_str());

        Document::new()
            .set("width", self.width)
            .set("height", self.height)
            .set("viewBox", (0, 0, self.width, self.height))
            .set("xmlns", "http://www.w3.org/2000/svg")
            .add(background)
    }

    /// Centered bold chart title
    fn title(&self, title: &str) -> svg::node::element::Text {
        svg::node::element::Text::new(title)
            .set("x", self.width / 2)
            .set("y", self.padding + 16)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size + 4)
            .set("font-weight", "bold")
            .set("fill", self.text_color.as_str())
            .set("text-anchor", "middle")
    }
}

/// Serialize an SVG document
fn write_svg(document: &Document) -> Result<String, RenderError> {
    let mut output = Vec::new();
    svg::write(&mut output, document)
        .map_err(|e| RenderError::Format(format!("Failed to write SVG: {}", e)))?;

    String::from_utf8(output).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {}", e)))
}

/// Truncate a string to a maximum number of characters with ellipsis
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
