//! SVG pie chart of the salary category distribution
//!
//! Slices are drawn in distribution order, starting at `start_angle` and
//! running counter-clockwise. Each slice carries its category label outside
//! the rim and its percentage share inside.

use crate::{write_svg, ChartStyle};
use empreport_core::{CategoryCount, RenderError, Renderer, Report};
use svg::node::element::{Circle, Group, Path, Text};

/// Pie chart renderer configuration
#[derive(Clone, Debug)]
pub struct PieChartRenderer {
    pub style: ChartStyle,
    pub title: String,
    /// Angle of the first slice edge, degrees counter-clockwise from 3 o'clock
    pub start_angle: f64,
}

impl Default for PieChartRenderer {
    fn default() -> Self {
        Self {
            style: ChartStyle {
                width: 600,
                height: 600,
                palette: ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd"]
                    .iter()
                    .map(|c| (*c).to_string())
                    .collect(),
                ..ChartStyle::default()
            },
            title: "Salary Category Distribution".into(),
            start_angle: 140.0,
        }
    }
}

/// One computed slice
#[derive(Clone, Debug, PartialEq)]
pub struct Slice {
    pub label: String,
    pub count: usize,
    /// Share of the total in percent
    pub percent: f64,
    /// Start and end angles in degrees, end > start
    pub start: f64,
    pub end: f64,
}

impl PieChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out slices for a distribution; zero-count categories are dropped
    pub fn slices(&self, distribution: &[CategoryCount]) -> Vec<Slice> {
        let total: usize = distribution.iter().map(|c| c.count).sum();
        if total == 0 {
            return Vec::new();
        }

        let mut angle = self.start_angle;
        distribution
            .iter()
            .filter(|c| c.count > 0)
            .map(|c| {
                let fraction = c.count as f64 / total as f64;
                let start = angle;
                angle += fraction * 360.0;
                Slice {
                    label: c.category.to_string(),
                    count: c.count,
                    percent: fraction * 100.0,
                    start,
                    end: angle,
                }
            })
            .collect()
    }

    fn center_and_radius(&self) -> (f64, f64, f64) {
        let s = &self.style;
        let cx = f64::from(s.width) / 2.0;
        let top = f64::from(s.padding + 40);
        let cy = top + (f64::from(s.height) - top - f64::from(s.padding)) / 2.0;
        let room = (f64::from(s.width).min(f64::from(s.height) - top) / 2.0) - f64::from(s.padding);
        // Leave space outside the rim for category labels
        (cx, cy, (room * 0.75).max(10.0))
    }

    /// Render a distribution directly
    pub fn render_distribution(&self, distribution: &[CategoryCount]) -> Result<String, RenderError> {
        let slices = self.slices(distribution);
        if slices.is_empty() {
            return Err(RenderError::InvalidData("No salary categories to chart".into()));
        }

        let (cx, cy, r) = self.center_and_radius();
        let mut group = Group::new().set("class", "slices");

        for (i, slice) in slices.iter().enumerate() {
            let color = self.style.color(i);
            if slices.len() == 1 {
                group = group.add(
                    Circle::new()
                        .set("cx", cx)
                        .set("cy", cy)
                        .set("r", r)
                        .set("fill", color),
                );
            } else {
                let (x0, y0) = polar(cx, cy, r, slice.start);
                let (x1, y1) = polar(cx, cy, r, slice.end);
                let large_arc = u8::from(slice.end - slice.start > 180.0);
                let data = format!(
                    "M {cx:.2} {cy:.2} L {x0:.2} {y0:.2} A {r:.2} {r:.2} 0 {large_arc} 0 {x1:.2} {y1:.2} Z"
                );
                group = group.add(
                    Path::new()
                        .set("d", data)
                        .set("fill", color)
                        .set("stroke", self.style.background_color.as_str())
                        .set("stroke-width", 1),
                );
            }

            let mid = (slice.start + slice.end) / 2.0;
            let (lx, ly) = polar(cx, cy, r * 1.12, mid);
            let anchor = if lx < cx - 1.0 {
                "end"
            } else if lx > cx + 1.0 {
                "start"
            } else {
                "middle"
            };
            group = group.add(
                Text::new(slice.label.as_str())
                    .set("x", lx)
                    .set("y", ly + 4.0)
                    .set("font-family", self.style.font_family.as_str())
                    .set("font-size", self.style.font_size + 1)
                    .set("fill", self.style.text_color.as_str())
                    .set("text-anchor", anchor),
            );

            let (px, py) = polar(cx, cy, r * 0.6, mid);
            group = group.add(
                Text::new(format!("{:.1}%", slice.percent))
                    .set("x", px)
                    .set("y", py + 4.0)
                    .set("font-family", self.style.font_family.as_str())
                    .set("font-size", self.style.font_size)
                    .set("fill", "#ffffff")
                    .set("text-anchor", "middle"),
            );
        }

        let document = self
            .style
            .document()
            .add(self.style.title(&self.title))
            .add(group);
        write_svg(&document)
    }
}

impl Renderer for PieChartRenderer {
    type Output = String;

    fn render(&self, report: &Report) -> Result<String, RenderError> {
        self.render_distribution(&report.salary_distribution)
    }
}

/// Point on a circle, angle in degrees counter-clockwise from 3 o'clock
fn polar(cx: f64, cy: f64, r: f64, degrees: f64) -> (f64, f64) {
    let rad = degrees.to_radians();
    (cx + r * rad.cos(), cy - r * rad.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use empreport_core::SalaryCategory;
    use pretty_assertions::assert_eq;

    fn distribution() -> Vec<CategoryCount> {
        vec![
            CategoryCount { category: SalaryCategory::Medium, count: 5 },
            CategoryCount { category: SalaryCategory::Low, count: 3 },
            CategoryCount { category: SalaryCategory::High, count: 2 },
        ]
    }

    #[test]
    fn slices_cover_full_circle_from_start_angle() {
        let slices = PieChartRenderer::new().slices(&distribution());
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].start, 140.0);
        assert_eq!(slices[0].end, 320.0);
        assert_eq!(slices[1].start, 320.0);
        assert!((slices[2].end - 500.0).abs() < 1e-9);

        let percents: Vec<_> = slices.iter().map(|s| format!("{:.1}", s.percent)).collect();
        assert_eq!(percents, vec!["50.0", "30.0", "20.0"]);
    }

    #[test]
    fn zero_counts_are_dropped() {
        let mut dist = distribution();
        dist.push(CategoryCount { category: SalaryCategory::High, count: 0 });
        assert_eq!(PieChartRenderer::new().slices(&dist).len(), 3);
    }

    #[test]
    fn polar_points() {
        let (x, y) = polar(100.0, 100.0, 10.0, 90.0);
        assert!((x - 100.0).abs() < 1e-9);
        assert!((y - 90.0).abs() < 1e-9);
    }

    #[test]
    fn pie_chart_labels_and_percentages() {
        let svg = PieChartRenderer::new().render_distribution(&distribution()).unwrap();
        assert!(svg.contains("Salary Category Distribution"));
        for label in ["Low", "Medium", "High", "50.0%", "30.0%", "20.0%"] {
            assert!(svg.contains(label), "missing {label}");
        }
        assert_eq!(svg.matches("<path").count(), 3);
    }

    #[test]
    fn single_category_is_full_circle() {
        let dist = vec![CategoryCount { category: SalaryCategory::Low, count: 4 }];
        let svg = PieChartRenderer::new().render_distribution(&dist).unwrap();
        assert!(svg.contains("<circle"));
        assert!(svg.contains("100.0%"));
        assert_eq!(svg.matches("<path").count(), 0);
    }

    #[test]
    fn pie_chart_empty_fails() {
        let result = PieChartRenderer::new().render(&Report::default());
        assert!(matches!(result, Err(RenderError::InvalidData(_))));
    }
}
