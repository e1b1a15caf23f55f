//! Analysis configuration
//!
//! Every knob the cleaner, feature deriver and aggregator read. All fields
//! have defaults, so an empty TOML document is a valid configuration:
//!
//! ```toml
//! reference_year = 2025
//! default_join_date = "2020-01-01"
//! join_date_format = "%d-%m-%Y"
//! low_salary_ceiling = 50000
//! high_salary_floor = 90000
//! low_performer_threshold = 2
//! ```

use crate::ConfigError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Salary thresholds for `SalaryCategory::classify`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SalaryBands {
    /// Salaries strictly below this are Low
    pub low_ceiling: Decimal,
    /// Salaries strictly above this are High
    pub high_floor: Decimal,
}

impl Default for SalaryBands {
    fn default() -> Self {
        Self {
            low_ceiling: Decimal::from(50_000),
            high_floor: Decimal::from(90_000),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Year that tenure is measured against
    pub reference_year: i32,
    /// Substituted for join dates that are missing or unparsable
    pub default_join_date: NaiveDate,
    /// chrono pattern for textual join dates
    pub join_date_format: String,
    pub low_salary_ceiling: Decimal,
    pub high_salary_floor: Decimal,
    /// Ratings at or below this are low performers
    pub low_performer_threshold: Decimal,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let bands = SalaryBands::default();
        Self {
            reference_year: 2025,
            default_join_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            join_date_format: "%d-%m-%Y".into(),
            low_salary_ceiling: bands.low_ceiling,
            high_salary_floor: bands.high_floor,
            low_performer_threshold: Decimal::from(2),
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tenure reference year
    pub fn reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    /// Set the fill value for missing join dates
    pub fn default_join_date(mut self, date: NaiveDate) -> Self {
        self.default_join_date = date;
        self
    }

    /// Set the low performer threshold
    pub fn low_performer_threshold(mut self, threshold: Decimal) -> Self {
        self.low_performer_threshold = threshold;
        self
    }

    pub fn salary_bands(&self) -> SalaryBands {
        SalaryBands {
            low_ceiling: self.low_salary_ceiling,
            high_floor: self.high_salary_floor,
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.low_salary_ceiling > self.high_salary_floor {
            return Err(ConfigError::Invalid(format!(
                "low_salary_ceiling ({}) exceeds high_salary_floor ({})",
                self.low_salary_ceiling, self.high_salary_floor
            )));
        }
        if self.join_date_format.trim().is_empty() {
            return Err(ConfigError::Invalid("join_date_format is empty".into()));
        }
        Ok(())
    }
}
