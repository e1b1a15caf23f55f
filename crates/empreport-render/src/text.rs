//! Console renderers
//!
//! `TextRenderer` prints the cleaned table preview, a feature sample and each
//! aggregate as tables. `JsonRenderer` emits the aggregates as one JSON
//! document for scripting.

use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Table};
use empreport_core::{
    columns, Column, DepartmentMean, EmployeeRecord, RenderError, Renderer, Report,
};
use rust_decimal::Decimal;
use std::fmt::Write;

/// Table-based console summary
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Rows shown in the cleaning preview and feature sample
    pub preview_rows: usize,
    /// Decimal places for means
    pub precision: u32,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            precision: 2,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of preview rows
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    fn table(headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(headers.to_vec());
        table
    }

    /// Cleaned input columns in layout order, before features are derived
    fn preview(&self, report: &Report) -> Table {
        let layout: Vec<Column> = report
            .table
            .columns()
            .into_iter()
            .filter(|c| !c.is_derived())
            .collect();
        let headers: Vec<&str> = layout.iter().map(|&c| report.table.header(c)).collect();
        let mut table = Self::table(&headers);
        for record in report.table.records.iter().take(self.preview_rows) {
            table.add_row(layout.iter().map(|&c| column_text(record, c)).collect::<Vec<_>>());
        }
        table
    }

    fn feature_sample(&self, report: &Report) -> Table {
        let mut table = Self::table(&[
            columns::NAME,
            columns::JOIN_DATE,
            columns::TENURE,
            columns::SALARY,
            columns::SALARY_CATEGORY,
        ]);
        for record in report.table.records.iter().take(self.preview_rows) {
            table.add_row(vec![
                opt(record.name.as_deref()),
                date(record.join_date),
                record.tenure.map(|t| t.to_string()).unwrap_or_default(),
                decimal(record.salary),
                record
                    .salary_category
                    .map(|c| c.to_string())
                    .unwrap_or_default(),
            ]);
        }
        table
    }

    fn means(&self, value_header: &str, means: &[DepartmentMean]) -> Table {
        let mut table = Self::table(&[columns::DEPARTMENT, value_header]);
        for mean in means {
            table.add_row(vec![
                mean.department.clone(),
                mean.value.round_dp(self.precision).to_string(),
            ]);
        }
        table
    }

    fn low_performers(records: &[EmployeeRecord]) -> Table {
        let mut table = Self::table(&[columns::NAME, columns::DEPARTMENT, columns::PERFORMANCE_RATING]);
        for record in records {
            table.add_row(vec![
                opt(record.name.as_deref()),
                opt(record.department.as_deref()),
                decimal(record.performance_rating),
            ]);
        }
        table
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, report: &Report) -> Result<String, RenderError> {
        let aggregates = &report.aggregates;
        let mut gender = Self::table(&[columns::DEPARTMENT, columns::GENDER, columns::COUNT]);
        for count in &aggregates.gender_count_by_dept {
            gender.add_row(vec![
                count.department.clone(),
                count.gender.clone(),
                count.count.to_string(),
            ]);
        }

        let sections = [
            (
                format!("Data Cleaning - First {} rows", self.preview_rows),
                self.preview(report),
            ),
            ("Feature Engineering - Sample".to_string(), self.feature_sample(report)),
            (
                "Average Salary by Department".to_string(),
                self.means(columns::SALARY, &aggregates.avg_salary_by_dept),
            ),
            ("Gender Count by Department".to_string(), gender),
            (
                "Average Performance Rating by Department".to_string(),
                self.means(columns::PERFORMANCE_RATING, &aggregates.avg_rating_by_dept),
            ),
            (
                format!("Low Performers ({})", aggregates.low_performers.len()),
                Self::low_performers(&aggregates.low_performers),
            ),
        ];

        let mut output = String::new();
        for (title, table) in sections {
            writeln!(output, "{title}:").map_err(|e| RenderError::Format(e.to_string()))?;
            writeln!(output, "{table}\n").map_err(|e| RenderError::Format(e.to_string()))?;
        }
        Ok(output)
    }
}

/// Aggregates and distribution as pretty JSON
#[derive(Clone, Debug, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    type Output = String;

    fn render(&self, report: &Report) -> Result<String, RenderError> {
        let value = serde_json::json!({
            "rows": report.table.len(),
            "avg_salary_by_dept": report.aggregates.avg_salary_by_dept,
            "gender_count_by_dept": report.aggregates.gender_count_by_dept,
            "avg_rating_by_dept": report.aggregates.avg_rating_by_dept,
            "low_performers": report.aggregates.low_performers,
            "salary_distribution": report.salary_distribution,
        });
        serde_json::to_string_pretty(&value).map_err(|e| RenderError::Format(e.to_string()))
    }
}

fn column_text(record: &EmployeeRecord, column: Column) -> String {
    match column {
        Column::Name => opt(record.name.as_deref()),
        Column::Department => opt(record.department.as_deref()),
        Column::Gender => opt(record.gender.as_deref()),
        Column::JoinDate => date(record.join_date),
        Column::Salary => decimal(record.salary),
        Column::PerformanceRating => decimal(record.performance_rating),
        Column::Extra(i) => record.extra.get(i).and_then(|c| c.to_text()).unwrap_or_default(),
        Column::Tenure => record.tenure.map(|t| t.to_string()).unwrap_or_default(),
        Column::SalaryCategory => record.salary_category.map(|c| c.to_string()).unwrap_or_default(),
    }
}

fn opt(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn date(value: Option<NaiveDate>) -> String {
    value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn decimal(value: Option<Decimal>) -> String {
    value.map(|d| d.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use empreport_core::{Aggregates, CategoryCount, GenderCount, SalaryCategory, WorkingTable};
    use rust_decimal_macros::dec;

    fn create_test_report() -> Report {
        let records: Vec<EmployeeRecord> = (0..7)
            .map(|i| {
                let mut record = EmployeeRecord::new(format!("Employee{i}"))
                    .department(if i % 2 == 0 { "Sales" } else { "IT" })
                    .gender("F")
                    .join_date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
                    .salary(dec!(60000))
                    .rating(dec!(3));
                record.tenure = Some(5);
                record.salary_category = Some(SalaryCategory::Medium);
                record
            })
            .collect();

        Report {
            table: WorkingTable::new(records.clone()),
            aggregates: Aggregates {
                avg_salary_by_dept: vec![DepartmentMean {
                    department: "IT".into(),
                    value: dec!(61234.5678),
                }],
                gender_count_by_dept: vec![GenderCount {
                    department: "IT".into(),
                    gender: "F".into(),
                    count: 3,
                }],
                avg_rating_by_dept: vec![],
                low_performers: vec![records[0].clone()],
            },
            salary_distribution: vec![CategoryCount {
                category: SalaryCategory::Medium,
                count: 7,
            }],
        }
    }

    #[test]
    fn text_renderer_sections() {
        let text = TextRenderer::new().render(&create_test_report()).unwrap();
        assert!(text.contains("Data Cleaning - First 5 rows:"));
        assert!(text.contains("Feature Engineering - Sample:"));
        assert!(text.contains("Average Salary by Department:"));
        assert!(text.contains("Gender Count by Department:"));
        assert!(text.contains("Average Performance Rating by Department:"));
        assert!(text.contains("Low Performers (1):"));
    }

    #[test]
    fn text_renderer_limits_preview() {
        let text = TextRenderer::new().render(&create_test_report()).unwrap();
        assert!(text.contains("Employee4"));
        // Employee5/6 only appear in the preview tables, which stop at five rows
        assert!(!text.contains("Employee5"));
        assert!(!text.contains("Employee6"));

        let text = TextRenderer::new()
            .preview_rows(7)
            .render(&create_test_report())
            .unwrap();
        assert!(text.contains("Employee6"));
    }

    #[test]
    fn text_renderer_rounds_means() {
        let text = TextRenderer::new().render(&create_test_report()).unwrap();
        assert!(text.contains("61234.57"));
        assert!(!text.contains("61234.5678"));
    }

    #[test]
    fn json_renderer_output() {
        let json = JsonRenderer.render(&create_test_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rows"], 7);
        assert_eq!(value["gender_count_by_dept"][0]["count"], 3);
        assert_eq!(value["salary_distribution"][0]["category"], "Medium");
        assert_eq!(value["low_performers"].as_array().unwrap().len(), 1);
    }
}
