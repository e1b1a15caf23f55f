//! SVG bar chart of a per-department mean
//!
//! Defaults chart the average salary; the same renderer draws any
//! `DepartmentMean` series through [`BarChartRenderer::render_means`].

use crate::{truncate, write_svg, ChartStyle};
use empreport_core::{DepartmentMean, RenderError, Renderer, Report};
use rust_decimal::prelude::ToPrimitive;
use svg::node::element::{Group, Line, Rectangle, Text};

/// Bar chart renderer configuration
#[derive(Clone, Debug)]
pub struct BarChartRenderer {
    pub style: ChartStyle,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Width of the y axis label column in pixels
    pub axis_width: u32,
    /// Height reserved below the plot for rotated category labels
    pub label_height: u32,
    /// Rotation of category labels in degrees (negative = counter-clockwise)
    pub label_rotation: i32,
}

impl Default for BarChartRenderer {
    fn default() -> Self {
        Self {
            style: ChartStyle::default(),
            title: "Average Salary by Department".into(),
            x_label: "Department".into(),
            y_label: "Salary".into(),
            axis_width: 90,
            label_height: 120,
            label_rotation: -45,
        }
    }
}

impl BarChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plot area as (left, top, right, bottom)
    fn plot_area(&self) -> (f64, f64, f64, f64) {
        let s = &self.style;
        let left = f64::from(s.padding + self.axis_width);
        let top = f64::from(s.padding + 40);
        let right = f64::from(s.width.saturating_sub(s.padding));
        let bottom = f64::from(s.height.saturating_sub(s.padding + self.label_height));
        (left, top, right.max(left + 1.0), bottom.max(top + 1.0))
    }

    /// Render an arbitrary department series
    pub fn render_means(&self, means: &[DepartmentMean]) -> Result<String, RenderError> {
        if means.is_empty() {
            return Err(RenderError::InvalidData("No departments to chart".into()));
        }

        let values: Vec<f64> = means
            .iter()
            .map(|m| m.value.to_f64().unwrap_or_default().max(0.0))
            .collect();
        let max = values.iter().copied().fold(0.0, f64::max);
        let (step, axis_max) = nice_scale(max);

        let mut document = self.style.document().add(self.style.title(&self.title));
        document = document.add(self.render_axis(step, axis_max));

        let (left, top, right, bottom) = self.plot_area();
        let slot = (right - left) / means.len() as f64;
        let mut bars = Group::new().set("class", "bars");
        for (i, (mean, value)) in means.iter().zip(&values).enumerate() {
            let height = value / axis_max * (bottom - top);
            let x = left + slot * i as f64 + slot * 0.1;
            let bar = Rectangle::new()
                .set("x", x)
                .set("y", bottom - height)
                .set("width", slot * 0.8)
                .set("height", height)
                .set("fill", self.style.color(i));
            bars = bars.add(bar);

            let label_x = left + slot * (i as f64 + 0.5);
            let label_y = bottom + 16.0;
            let label = Text::new(truncate(&mean.department, 24))
                .set("x", label_x)
                .set("y", label_y)
                .set("font-family", self.style.font_family.as_str())
                .set("font-size", self.style.font_size)
                .set("fill", self.style.text_color.as_str())
                .set("text-anchor", if self.label_rotation == 0 { "middle" } else { "end" })
                .set(
                    "transform",
                    format!("rotate({} {:.2} {:.2})", self.label_rotation, label_x, label_y),
                );
            bars = bars.add(label);
        }
        document = document.add(bars);

        // Axis titles
        let x_title = Text::new(self.x_label.as_str())
            .set("x", (left + right) / 2.0)
            .set("y", self.style.height.saturating_sub(self.style.padding))
            .set("font-family", self.style.font_family.as_str())
            .set("font-size", self.style.font_size + 1)
            .set("fill", self.style.text_color.as_str())
            .set("text-anchor", "middle");
        let y_title_x = f64::from(self.style.padding + 10);
        let y_title_y = (top + bottom) / 2.0;
        let y_title = Text::new(self.y_label.as_str())
            .set("x", y_title_x)
            .set("y", y_title_y)
            .set("font-family", self.style.font_family.as_str())
            .set("font-size", self.style.font_size + 1)
            .set("fill", self.style.text_color.as_str())
            .set("text-anchor", "middle")
            .set("transform", format!("rotate(-90 {:.2} {:.2})", y_title_x, y_title_y));
        document = document.add(x_title).add(y_title);

        write_svg(&document)
    }

    /// Value axis with gridlines and tick labels
    fn render_axis(&self, step: f64, axis_max: f64) -> Group {
        let (left, top, right, bottom) = self.plot_area();
        let mut group = Group::new().set("class", "axis");

        let ticks = (axis_max / step).round() as usize;
        for i in 0..=ticks {
            let value = step * i as f64;
            let y = bottom - value / axis_max * (bottom - top);
            let grid = Line::new()
                .set("x1", left)
                .set("y1", y)
                .set("x2", right)
                .set("y2", y)
                .set("stroke", self.style.grid_color.as_str())
                .set("stroke-width", 1);
            let label = Text::new(format_tick(value))
                .set("x", left - 8.0)
                .set("y", y + 4.0)
                .set("font-family", self.style.font_family.as_str())
                .set("font-size", self.style.font_size - 1)
                .set("fill", self.style.text_color.as_str())
                .set("text-anchor", "end");
            group = group.add(grid).add(label);
        }

        let baseline = Line::new()
            .set("x1", left)
            .set("y1", bottom)
            .set("x2", right)
            .set("y2", bottom)
            .set("stroke", self.style.text_color.as_str())
            .set("stroke-width", 1);
        let spine = Line::new()
            .set("x1", left)
            .set("y1", top)
            .set("x2", left)
            .set("y2", bottom)
            .set("stroke", self.style.text_color.as_str())
            .set("stroke-width", 1);

        group.add(baseline).add(spine)
    }
}

impl Renderer for BarChartRenderer {
    type Output = String;

    fn render(&self, report: &Report) -> Result<String, RenderError> {
        self.render_means(&report.aggregates.avg_salary_by_dept)
    }
}

/// Pick a 1/2/5 x 10^k tick step giving about five ticks, and the axis
/// maximum rounded up to a whole step.
pub fn nice_scale(max: f64) -> (f64, f64) {
    if !max.is_finite() || max <= 0.0 {
        return (1.0, 1.0);
    }
    let raw = max / 5.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let multiplier = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    let step = multiplier * magnitude;
    let axis_max = (max / step).ceil() * step;
    (step, axis_max)
}

/// Tick label: whole numbers get thousands separators
fn format_tick(value: f64) -> String {
    if value.fract().abs() > f64::EPSILON {
        return format!("{value:.2}");
    }
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
