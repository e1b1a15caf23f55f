//! Type coercion and missing-value filling
//!
//! Coercion never fails: a cell that cannot be read as the column's type is
//! treated as missing. Filling then replaces missing values per column:
//!
//! | Column            | Fill value                         |
//! |-------------------|------------------------------------|
//! | Salary            | mean of the valid salaries         |
//! | PerformanceRating | most frequent valid rating         |
//! | JoinDate          | configured default date            |
//!
//! Mean and mode are computed from the values present before any fill, so
//! filling is idempotent.
//!
//! The working table keeps the input's column order. Tenure and
//! SalaryCategory stay where the input had them, otherwise they are appended.

use chrono::NaiveDate;
use empreport_core::{
    columns, AnalysisConfig, Cell, Column, EmployeeRecord, LoadError, RawTable, WorkingTable,
};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// What `fill_missing` changed
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CleaningSummary {
    pub rows: usize,
    pub salary_filled: usize,
    pub rating_filled: usize,
    pub join_date_filled: usize,
    /// `None` when no valid salary exists to average
    pub salary_fill_value: Option<Decimal>,
    /// `None` when no valid rating exists
    pub rating_fill_value: Option<Decimal>,
}

/// Build the working table from raw rows, coercing each typed column.
///
/// Fails only when a required column header is absent.
pub fn coerce_table(raw: &RawTable, config: &AnalysisConfig) -> Result<WorkingTable, LoadError> {
    raw.require_columns(&columns::REQUIRED)?;

    let idx = |name: &str| raw.column_index(name).unwrap_or_default();
    let name_col = idx(columns::NAME);
    let dept_col = idx(columns::DEPARTMENT);
    let gender_col = idx(columns::GENDER);
    let date_col = idx(columns::JOIN_DATE);
    let salary_col = idx(columns::SALARY);
    let rating_col = idx(columns::PERFORMANCE_RATING);

    // Known headers keep their position; an input copy of a derived column
    // only reserves the slot, its values are recomputed
    let mut layout = Vec::with_capacity(raw.headers.len() + 2);
    let mut extra_cols = Vec::new();
    for (i, header) in raw.headers.iter().enumerate() {
        match Column::from_header(header) {
            Some(column) if !layout.contains(&column) => layout.push(column),
            Some(_) => {}
            None => {
                layout.push(Column::Extra(extra_cols.len()));
                extra_cols.push(i);
            }
        }
    }
    for derived in [Column::Tenure, Column::SalaryCategory] {
        if !layout.contains(&derived) {
            layout.push(derived);
        }
    }

    let mut records = Vec::with_capacity(raw.len());
    for (row_idx, row) in raw.rows.iter().enumerate() {
        let cell = |col: usize| row.get(col).unwrap_or(&Cell::Empty);

        let join_date = coerce_date(cell(date_col), &config.join_date_format);
        let salary = coerce_decimal(cell(salary_col));
        let performance_rating = coerce_decimal(cell(rating_col));

        for (column, value, ok) in [
            (columns::JOIN_DATE, cell(date_col), join_date.is_some()),
            (columns::SALARY, cell(salary_col), salary.is_some()),
            (columns::PERFORMANCE_RATING, cell(rating_col), performance_rating.is_some()),
        ] {
            if ok || value.is_empty() {
                continue;
            }
            if matches!(value, Cell::Number(n) if n.is_finite()) {
                warn!(row = row_idx + 2, column, value = ?value, "Number out of range, treating as missing");
            } else {
                debug!(row = row_idx + 2, column, value = ?value, "Coercion failed, treating as missing");
            }
        }

        records.push(EmployeeRecord {
            name: cell(name_col).to_text(),
            department: cell(dept_col).to_text(),
            gender: cell(gender_col).to_text(),
            join_date,
            salary,
            performance_rating,
            tenure: None,
            salary_category: None,
            extra: extra_cols.iter().map(|&c| cell(c).clone()).collect(),
        });
    }

    Ok(WorkingTable {
        extra_headers: extra_cols.iter().map(|&c| raw.headers[c].clone()).collect(),
        layout,
        records,
    })
}

/// Read a join date: native date cells pass through, text is parsed with `format`
pub fn coerce_date(cell: &Cell, format: &str) -> Option<NaiveDate> {
    match cell {
        Cell::Date(date) => Some(*date),
        Cell::Text(s) => NaiveDate::parse_from_str(s.trim(), format).ok(),
        _ => None,
    }
}

/// Read a numeric cell.
///
/// Numeric text is accepted. Non-finite numbers, numbers outside the
/// `Decimal` range and text with `_` digit separators are not.
pub fn coerce_decimal(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Number(n) if n.is_finite() => Decimal::from_f64(*n),
        Cell::Bool(b) => Some(Decimal::from(u8::from(*b))),
        Cell::Text(s) => {
            let s = s.trim();
            if s.contains('_') {
                return None;
            }
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        }
        _ => None,
    }
}

/// Arithmetic mean, `None` for an empty input or one whose mean is not
/// representable
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let count = Decimal::from(values.len());
    let mean = match values.iter().try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v)) {
        Some(total) => total.checked_div(count),
        // Sum left the Decimal range; add the pre-divided terms instead
        None => values
            .iter()
            .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v.checked_div(count)?)),
    };
    mean.map(|m| m.normalize())
}

/// Most frequent value; ties go to the smallest value
pub fn mode(values: &[Decimal]) -> Option<Decimal> {
    let mut counts: BTreeMap<Decimal, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(*v).or_default() += 1;
    }
    let max = counts.values().copied().max()?;
    counts
        .into_iter()
        .find(|(_, count)| *count == max)
        .map(|(value, _)| value.normalize())
}

/// Replace missing salary, rating and join date values in place
pub fn fill_missing(table: &mut WorkingTable, config: &AnalysisConfig) -> CleaningSummary {
    let salaries: Vec<Decimal> = table.records.iter().filter_map(|r| r.salary).collect();
    let ratings: Vec<Decimal> = table
        .records
        .iter()
        .filter_map(|r| r.performance_rating)
        .collect();

    let mut summary = CleaningSummary {
        rows: table.len(),
        salary_fill_value: mean(&salaries),
        rating_fill_value: mode(&ratings),
        ..CleaningSummary::default()
    };

    for record in &mut table.records {
        if record.salary.is_none() {
            if let Some(fill) = summary.salary_fill_value {
                record.salary = Some(fill);
                summary.salary_filled += 1;
            }
        }
        if record.performance_rating.is_none() {
            if let Some(fill) = summary.rating_fill_value {
                record.performance_rating = Some(fill);
                summary.rating_filled += 1;
            }
        }
        if record.join_date.is_none() {
            record.join_date = Some(config.default_join_date);
            summary.join_date_filled += 1;
        }
    }

    if summary.salary_fill_value.is_none() && !table.is_empty() {
        if salaries.is_empty() {
            warn!("No valid Salary values; missing salaries left empty");
        } else {
            warn!("Salary mean out of range; missing salaries left empty");
        }
    }
    if summary.rating_fill_value.is_none() && !table.is_empty() {
        warn!("No valid PerformanceRating values; missing ratings left empty");
    }

    info!(
        rows = summary.rows,
        salary_filled = summary.salary_filled,
        rating_filled = summary.rating_filled,
        join_date_filled = summary.join_date_filled,
        "Cleaned working table"
    );

    summary
}
