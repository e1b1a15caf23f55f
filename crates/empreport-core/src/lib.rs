//! # empreport-core
//!
//! Core domain model and traits for the empreport report generator.
//!
//! This crate provides:
//! - Domain types: `Cell`, `RawTable`, `EmployeeRecord`, `WorkingTable`
//! - Derived types: `SalaryCategory`, `DepartmentMean`, `GenderCount`, `Aggregates`
//! - Core traits: `Renderer`
//! - Analysis configuration (`AnalysisConfig`)
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use empreport_core::{EmployeeRecord, SalaryBands, SalaryCategory, WorkingTable};
//! use rust_decimal::Decimal;
//!
//! let mut table = WorkingTable::default();
//! table.records.push(
//!     EmployeeRecord::new("Alice")
//!         .department("Engineering")
//!         .gender("F")
//!         .salary(Decimal::from(72_000)),
//! );
//!
//! let category = SalaryCategory::classify(Decimal::from(72_000), &SalaryBands::default());
//! assert_eq!(category, SalaryCategory::Medium);
//! ```

pub mod config;

pub use config::{AnalysisConfig, SalaryBands};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Column and Sheet Names
// ============================================================================

/// Column headers of the input and the cleaned output
pub mod columns {
    pub const NAME: &str = "Name";
    pub const DEPARTMENT: &str = "Department";
    pub const GENDER: &str = "Gender";
    pub const JOIN_DATE: &str = "JoinDate";
    pub const SALARY: &str = "Salary";
    pub const PERFORMANCE_RATING: &str = "PerformanceRating";
    pub const TENURE: &str = "Tenure";
    pub const SALARY_CATEGORY: &str = "SalaryCategory";
    pub const COUNT: &str = "Count";

    /// Headers the input sheet must carry
    pub const REQUIRED: [&str; 6] = [
        NAME,
        DEPARTMENT,
        GENDER,
        JOIN_DATE,
        SALARY,
        PERFORMANCE_RATING,
    ];
}

/// Worksheet names of the output workbook, in write order
pub mod sheets {
    pub const CLEANED_DATA: &str = "Cleaned_Data";
    pub const AVG_SALARY_BY_DEPT: &str = "Avg_Salary_By_Dept";
    pub const GENDER_COUNT_BY_DEPT: &str = "Gender_Count_By_Dept";
    pub const AVG_RATING_BY_DEPT: &str = "Avg_Rating_By_Dept";
    pub const LOW_PERFORMERS: &str = "Low_Performers";

    pub const ALL: [&str; 5] = [
        CLEANED_DATA,
        AVG_SALARY_BY_DEPT,
        GENDER_COUNT_BY_DEPT,
        AVG_RATING_BY_DEPT,
        LOW_PERFORMERS,
    ];
}

// ============================================================================
// Raw Input
// ============================================================================

/// A single untyped spreadsheet cell as read from the input
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the cell as display text, `None` for blank cells
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Cell::Number(n) => Some(n.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
            Cell::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}

/// Header row plus untyped data rows, as loaded from one worksheet
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    /// Data rows, each padded to `headers.len()`
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the header width
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.headers.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Check that every required header is present
    pub fn require_columns(&self, required: &[&str]) -> Result<(), LoadError> {
        match required.iter().find(|c| self.column_index(c).is_none()) {
            Some(missing) => Err(LoadError::MissingColumn((*missing).to_string())),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// Working Table
// ============================================================================

/// Three-bucket classification of a salary
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SalaryCategory {
    Low,
    Medium,
    High,
}

impl SalaryCategory {
    pub const ALL: [SalaryCategory; 3] = [Self::Low, Self::Medium, Self::High];

    /// Bucket a salary: below the low ceiling is Low, above the high floor is
    /// High, both bounds themselves are Medium.
    pub fn classify(salary: Decimal, bands: &SalaryBands) -> Self {
        if salary < bands.low_ceiling {
            SalaryCategory::Low
        } else if salary <= bands.high_floor {
            SalaryCategory::Medium
        } else {
            SalaryCategory::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SalaryCategory::Low => "Low",
            SalaryCategory::Medium => "Medium",
            SalaryCategory::High => "High",
        }
    }
}

impl fmt::Display for SalaryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One employee row of the working table
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EmployeeRecord {
    pub name: Option<String>,
    pub department: Option<String>,
    pub gender: Option<String>,
    pub join_date: Option<NaiveDate>,
    pub salary: Option<Decimal>,
    pub performance_rating: Option<Decimal>,
    /// Whole years between the join year and the reference year
    pub tenure: Option<i32>,
    pub salary_category: Option<SalaryCategory>,
    /// Input columns beyond the required ones, aligned with `WorkingTable::extra_headers`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<Cell>,
}

impl EmployeeRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn join_date(mut self, date: NaiveDate) -> Self {
        self.join_date = Some(date);
        self
    }

    pub fn salary(mut self, salary: Decimal) -> Self {
        self.salary = Some(salary);
        self
    }

    pub fn rating(mut self, rating: Decimal) -> Self {
        self.performance_rating = Some(rating);
        self
    }

    /// True once salary, rating and join date all hold typed values
    pub fn is_clean(&self) -> bool {
        self.salary.is_some() && self.performance_rating.is_some() && self.join_date.is_some()
    }
}

/// One output column of the cleaned table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Column {
    Name,
    Department,
    Gender,
    JoinDate,
    Salary,
    PerformanceRating,
    /// Index into `WorkingTable::extra_headers` and `EmployeeRecord::extra`
    Extra(usize),
    Tenure,
    SalaryCategory,
}

impl Column {
    /// Column for a known header name; extra columns are not matched
    pub fn from_header(header: &str) -> Option<Self> {
        Some(match header {
            columns::NAME => Self::Name,
            columns::DEPARTMENT => Self::Department,
            columns::GENDER => Self::Gender,
            columns::JOIN_DATE => Self::JoinDate,
            columns::SALARY => Self::Salary,
            columns::PERFORMANCE_RATING => Self::PerformanceRating,
            columns::TENURE => Self::Tenure,
            columns::SALARY_CATEGORY => Self::SalaryCategory,
            _ => return None,
        })
    }

    /// Derived columns are computed by the feature step, never read from input
    pub fn is_derived(self) -> bool {
        matches!(self, Self::Tenure | Self::SalaryCategory)
    }
}

/// The in-memory row collection, built by the cleaner and mutated in place
/// until aggregation.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WorkingTable {
    pub extra_headers: Vec<String>,
    /// Output column order; empty means the standard order
    pub layout: Vec<Column>,
    pub records: Vec<EmployeeRecord>,
}

impl WorkingTable {
    pub fn new(records: Vec<EmployeeRecord>) -> Self {
        Self {
            extra_headers: Vec::new(),
            layout: Vec::new(),
            records,
        }
    }

    /// Columns in output order.
    ///
    /// Without an explicit layout this is the required columns, then extras,
    /// then Tenure and SalaryCategory.
    pub fn columns(&self) -> Vec<Column> {
        if !self.layout.is_empty() {
            return self.layout.clone();
        }
        let mut columns = vec![
            Column::Name,
            Column::Department,
            Column::Gender,
            Column::JoinDate,
            Column::Salary,
            Column::PerformanceRating,
        ];
        columns.extend((0..self.extra_headers.len()).map(Column::Extra));
        columns.extend([Column::Tenure, Column::SalaryCategory]);
        columns
    }

    /// Header text for `column`
    pub fn header(&self, column: Column) -> &str {
        match column {
            Column::Name => columns::NAME,
            Column::Department => columns::DEPARTMENT,
            Column::Gender => columns::GENDER,
            Column::JoinDate => columns::JOIN_DATE,
            Column::Salary => columns::SALARY,
            Column::PerformanceRating => columns::PERFORMANCE_RATING,
            Column::Extra(i) => self.extra_headers.get(i).map_or("", String::as_str),
            Column::Tenure => columns::TENURE,
            Column::SalaryCategory => columns::SALARY_CATEGORY,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows belonging to `department`
    pub fn department_len(&self, department: &str) -> usize {
        self.records
            .iter()
            .filter(|r| r.department.as_deref() == Some(department))
            .count()
    }
}

// ============================================================================
// Aggregates
// ============================================================================

/// Mean of a measure over one department
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DepartmentMean {
    pub department: String,
    pub value: Decimal,
}

/// Row count for one (department, gender) pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenderCount {
    pub department: String,
    pub gender: String,
    pub count: usize,
}

/// Number of rows in one salary category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: SalaryCategory,
    pub count: usize,
}

/// The four read-only summaries computed from the working table
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Aggregates {
    pub avg_salary_by_dept: Vec<DepartmentMean>,
    pub gender_count_by_dept: Vec<GenderCount>,
    pub avg_rating_by_dept: Vec<DepartmentMean>,
    pub low_performers: Vec<EmployeeRecord>,
}

/// Everything the reporters need: the cleaned table and what was derived from it
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Report {
    pub table: WorkingTable,
    pub aggregates: Aggregates,
    pub salary_distribution: Vec<CategoryCount>,
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a report to the output format
    fn render(&self, report: &Report) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Input loading error, always fatal
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported workbook format: {} (expected .xlsx, .xlsm, .xlsb, .xls or .ods)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Failed to read workbook '{}': {message}", path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Input has no data: {0}")]
    Empty(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// Tests
// ============================================================================
