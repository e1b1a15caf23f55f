//! Per-row derived columns: Tenure and SalaryCategory

use chrono::{Datelike, NaiveDate};
use empreport_core::{AnalysisConfig, SalaryCategory, WorkingTable};

/// Years between the join year and `reference_year`.
///
/// Not validated: a join date after the reference year yields a negative
/// tenure.
pub fn tenure(join_date: NaiveDate, reference_year: i32) -> i32 {
    reference_year - join_date.year()
}

/// Set Tenure and SalaryCategory on every record whose inputs are present
pub fn derive_features(table: &mut WorkingTable, config: &AnalysisConfig) {
    let bands = config.salary_bands();
    for record in &mut table.records {
        record.tenure = record
            .join_date
            .map(|date| tenure(date, config.reference_year));
        record.salary_category = record
            .salary
            .map(|salary| SalaryCategory::classify(salary, &bands));
    }
}
