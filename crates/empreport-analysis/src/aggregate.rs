//! Read-only summaries over the working table
//!
//! Groups come out ordered by key. Rows without a department are left out of
//! the department groupings, and rows whose measure is missing are left out
//! of that mean. A missing gender is counted under a blank gender, so each
//! department's gender counts add up to its row count.

use empreport_core::{
    Aggregates, AnalysisConfig, CategoryCount, DepartmentMean, EmployeeRecord, GenderCount,
    SalaryCategory, WorkingTable,
};
use crate::clean::mean;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::warn;

/// Mean of `measure` per department
pub fn mean_by_department(
    table: &WorkingTable,
    measure: impl Fn(&EmployeeRecord) -> Option<Decimal>,
) -> Vec<DepartmentMean> {
    let mut groups: BTreeMap<&str, Vec<Decimal>> = BTreeMap::new();
    for record in &table.records {
        let (Some(department), Some(value)) = (record.department.as_deref(), measure(record)) else {
            continue;
        };
        groups.entry(department).or_default().push(value);
    }

    groups
        .into_iter()
        .filter_map(|(department, values)| match mean(&values) {
            Some(value) => Some(DepartmentMean {
                department: department.to_string(),
                value,
            }),
            None => {
                warn!(department, "Department mean out of range, omitted");
                None
            }
        })
        .collect()
}

pub fn avg_salary_by_department(table: &WorkingTable) -> Vec<DepartmentMean> {
    mean_by_department(table, |r| r.salary)
}

pub fn avg_rating_by_department(table: &WorkingTable) -> Vec<DepartmentMean> {
    mean_by_department(table, |r| r.performance_rating)
}

/// Row count per (department, gender) pair; a missing gender counts as ""
pub fn gender_count_by_department(table: &WorkingTable) -> Vec<GenderCount> {
    let mut groups: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for record in &table.records {
        if let Some(department) = record.department.as_deref() {
            let gender = record.gender.as_deref().unwrap_or_default();
            *groups.entry((department, gender)).or_default() += 1;
        }
    }

    groups
        .into_iter()
        .map(|((department, gender), count)| GenderCount {
            department: department.to_string(),
            gender: gender.to_string(),
            count,
        })
        .collect()
}

/// Rows rated at or below `threshold`, in table order
pub fn low_performers(table: &WorkingTable, threshold: Decimal) -> Vec<EmployeeRecord> {
    table
        .records
        .iter()
        .filter(|r| r.performance_rating.is_some_and(|rating| rating <= threshold))
        .cloned()
        .collect()
}

/// Row count per salary category, largest first
pub fn salary_category_distribution(table: &WorkingTable) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<SalaryCategory, usize> = BTreeMap::new();
    for category in table.records.iter().filter_map(|r| r.salary_category) {
        *counts.entry(category).or_default() += 1;
    }

    let mut distribution: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();
    // Stable sort keeps Low, Medium, High order among equal counts
    distribution.sort_by(|a, b| b.count.cmp(&a.count));
    distribution
}

/// All four aggregates
pub fn aggregate(table: &WorkingTable, config: &AnalysisConfig) -> Aggregates {
    Aggregates {
        avg_salary_by_dept: avg_salary_by_department(table),
        gender_count_by_dept: gender_count_by_department(table),
        avg_rating_by_dept: avg_rating_by_department(table),
        low_performers: low_performers(table, config.low_performer_threshold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn employee(name: &str, dept: &str, gender: &str, salary: Decimal, rating: Decimal) -> EmployeeRecord {
        EmployeeRecord::new(name)
            .department(dept)
            .gender(gender)
            .salary(salary)
            .rating(rating)
    }

    fn sample_table() -> WorkingTable {
        WorkingTable::new(vec![
            employee("Ann", "Sales", "F", dec!(45000), dec!(2)),
            employee("Ben", "IT", "M", dec!(95000), dec!(4)),
            employee("Cat", "IT", "F", dec!(85000), dec!(5)),
            employee("Dov", "Sales", "M", dec!(55000), dec!(1)),
            employee("Eli", "IT", "M", dec!(70000), dec!(3)),
            employee("Fay", "HR", "F", dec!(60000), dec!(2.5)),
        ])
    }

    #[test]
    fn salary_mean_per_department_sorted() {
        let result = avg_salary_by_department(&sample_table());
        let values: Vec<(String, Decimal)> = result
            .into_iter()
            .map(|m| (m.department, m.value.round_dp(2)))
            .collect();
        assert_eq!(
            values,
            vec![
                ("HR".to_string(), dec!(60000)),
                ("IT".to_string(), dec!(83333.33)),
                ("Sales".to_string(), dec!(50000)),
            ]
        );
    }

    #[test]
    fn rating_mean_per_department() {
        let result = avg_rating_by_department(&sample_table());
        let values: Vec<(String, Decimal)> =
            result.into_iter().map(|m| (m.department, m.value)).collect();
        assert_eq!(
            values,
            vec![
                ("HR".to_string(), dec!(2.5)),
                ("IT".to_string(), dec!(4)),
                ("Sales".to_string(), dec!(1.5)),
            ]
        );
    }

    #[test]
    fn gender_counts_sum_to_department_size() {
        let table = sample_table();
        let counts = gender_count_by_department(&table);
        assert_eq!(
            counts,
            vec![
                GenderCount { department: "HR".into(), gender: "F".into(), count: 1 },
                GenderCount { department: "IT".into(), gender: "F".into(), count: 1 },
                GenderCount { department: "IT".into(), gender: "M".into(), count: 2 },
                GenderCount { department: "Sales".into(), gender: "F".into(), count: 1 },
                GenderCount { department: "Sales".into(), gender: "M".into(), count: 1 },
            ]
        );

        for dept in ["HR", "IT", "Sales"] {
            let total: usize = counts.iter().filter(|c| c.department == dept).map(|c| c.count).sum();
            assert_eq!(total, table.department_len(dept));
        }
    }

    #[test]
    fn low_performers_inclusive_threshold() {
        let table = sample_table();
        let low = low_performers(&table, dec!(2));
        let names: Vec<_> = low.iter().filter_map(|r| r.name.as_deref()).collect();
        assert_eq!(names, vec!["Ann", "Dov"]);
        assert!(low.iter().all(|r| r.performance_rating.unwrap() <= dec!(2)));

        let excluded = table.records.len() - low.len();
        assert_eq!(
            table
                .records
                .iter()
                .filter(|r| r.performance_rating.unwrap() > dec!(2))
                .count(),
            excluded
        );
    }

    #[test]
    fn missing_keys_are_excluded_from_groups() {
        let mut table = sample_table();
        table.records.push(EmployeeRecord::new("Gus").gender("M").salary(dec!(1)).rating(dec!(1)));
        table.records.push(EmployeeRecord::new("Hal").department("HR").salary(dec!(80000)));

        let salaries = avg_salary_by_department(&table);
        assert_eq!(salaries.len(), 3);
        assert_eq!(salaries[0].value, dec!(70000));

        // Gus has no department and is left out entirely
        let counts = gender_count_by_department(&table);
        assert!(counts.iter().all(|c| c.count > 0));
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), table.records.len() - 1);

        // Gus still counts as a low performer without a department
        let low = low_performers(&table, dec!(2));
        assert!(low.iter().any(|r| r.name.as_deref() == Some("Gus")));
    }

    #[test]
    fn missing_gender_counts_under_blank_key() {
        let mut table = sample_table();
        table.records.push(EmployeeRecord::new("Hal").department("IT").salary(dec!(80000)));

        let counts = gender_count_by_department(&table);
        let it: Vec<(&str, usize)> = counts
            .iter()
            .filter(|c| c.department == "IT")
            .map(|c| (c.gender.as_str(), c.count))
            .collect();
        assert_eq!(it, vec![("", 1), ("F", 1), ("M", 2)]);

        for dept in ["HR", "IT", "Sales"] {
            let total: usize = counts.iter().filter(|c| c.department == dept).map(|c| c.count).sum();
            assert_eq!(total, table.department_len(dept));
        }
    }

    #[test]
    fn department_mean_survives_sum_overflow() {
        let huge = Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0);
        let table = WorkingTable::new(vec![
            employee("Ann", "Ops", "F", huge, dec!(3)),
            employee("Ben", "Ops", "M", huge, dec!(3)),
        ]);
        let salaries = avg_salary_by_department(&table);
        assert_eq!(
            salaries,
            vec![DepartmentMean { department: "Ops".into(), value: huge }]
        );
    }

    #[test]
    fn distribution_largest_first() {
        let mut table = sample_table();
        crate::features::derive_features(&mut table, &AnalysisConfig::default());
        let distribution = salary_category_distribution(&table);
        assert_eq!(
            distribution,
            vec![
                CategoryCount { category: SalaryCategory::Medium, count: 4 },
                CategoryCount { category: SalaryCategory::Low, count: 1 },
                CategoryCount { category: SalaryCategory::High, count: 1 },
            ]
        );
    }

    #[test]
    fn empty_table_gives_empty_aggregates() {
        let aggregates = aggregate(&WorkingTable::default(), &AnalysisConfig::default());
        assert_eq!(aggregates, Aggregates::default());
    }
}
