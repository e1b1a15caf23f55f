//! # empreport-analysis
//!
//! Turns a loaded worksheet into a cleaned working table and its summaries.
//!
//! This crate provides:
//! - Type coercion and missing-value filling (`clean`)
//! - Tenure and salary category derivation (`features`)
//! - Department aggregates and the low performer subset (`aggregate`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use empreport_analysis::Analyzer;
//! use empreport_core::AnalysisConfig;
//!
//! let raw = empreport_loader::load_workbook("employee_performance.xlsx", None)?;
//! let analysis = Analyzer::new(AnalysisConfig::default()).analyze(&raw)?;
//! println!("{} low performers", analysis.report.aggregates.low_performers.len());
//! ```

pub mod aggregate;
pub mod clean;
pub mod features;

pub use clean::CleaningSummary;

use empreport_core::{AnalysisConfig, LoadError, RawTable, Report};
use tracing::info;

/// Result of one analysis run
#[derive(Clone, Debug)]
pub struct Analysis {
    pub report: Report,
    pub cleaning: CleaningSummary,
}

/// Runs clean, derive and aggregate in order over a raw table
#[derive(Clone, Debug, Default)]
pub struct Analyzer {
    pub config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, raw: &RawTable) -> Result<Analysis, LoadError> {
        let mut table = clean::coerce_table(raw, &self.config)?;
        let cleaning = clean::fill_missing(&mut table, &self.config);
        features::derive_features(&mut table, &self.config);

        let aggregates = aggregate::aggregate(&table, &self.config);
        let salary_distribution = aggregate::salary_category_distribution(&table);
        info!(
            departments = aggregates.avg_salary_by_dept.len(),
            low_performers = aggregates.low_performers.len(),
            "Computed aggregates"
        );

        Ok(Analysis {
            report: Report {
                table,
                aggregates,
                salary_distribution,
            },
            cleaning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use empreport_core::{columns, Cell};

    #[test]
    fn analyzer_creation() {
        let analyzer = Analyzer::default();
        assert_eq!(analyzer.config.reference_year, 2025);
    }

    #[test]
    fn analyze_rejects_missing_columns() {
        let raw = RawTable::new(vec!["Name".into(), "Salary".into()]);
        assert!(Analyzer::default().analyze(&raw).is_err());
    }

    #[test]
    fn analyze_empty_sheet() {
        let raw = RawTable::new(columns::REQUIRED.iter().map(|s| s.to_string()).collect());
        let analysis = Analyzer::default().analyze(&raw).unwrap();
        assert!(analysis.report.table.is_empty());
        assert!(analysis.report.salary_distribution.is_empty());
        assert_eq!(analysis.cleaning.rows, 0);
    }

    #[test]
    fn analyze_single_row() {
        let mut raw = RawTable::new(columns::REQUIRED.iter().map(|s| s.to_string()).collect());
        raw.push_row(vec![
            Cell::Text("Ann".into()),
            Cell::Text("IT".into()),
            Cell::Text("F".into()),
            Cell::Text("10-10-2020".into()),
            Cell::Number(92000.0),
            Cell::Number(2.0),
        ]);
        let analysis = Analyzer::default().analyze(&raw).unwrap();
        let record = &analysis.report.table.records[0];
        assert_eq!(record.tenure, Some(5));
        assert_eq!(record.salary_category, Some(empreport_core::SalaryCategory::High));
        assert_eq!(analysis.report.aggregates.low_performers.len(), 1);
    }
}
