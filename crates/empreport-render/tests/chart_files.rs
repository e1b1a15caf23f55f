//! Chart rendering from a full report

use empreport_core::{
    Aggregates, CategoryCount, DepartmentMean, Renderer, Report, SalaryCategory,
};
use empreport_render::{BarChartRenderer, PieChartRenderer};
use rust_decimal_macros::dec;

fn create_report() -> Report {
    Report {
        aggregates: Aggregates {
            avg_salary_by_dept: vec![
                DepartmentMean { department: "Engineering".into(), value: dec!(88250) },
                DepartmentMean { department: "Finance".into(), value: dec!(71000) },
                DepartmentMean { department: "Marketing & PR".into(), value: dec!(52000) },
            ],
            ..Aggregates::default()
        },
        salary_distribution: vec![
            CategoryCount { category: SalaryCategory::Medium, count: 6 },
            CategoryCount { category: SalaryCategory::High, count: 3 },
            CategoryCount { category: SalaryCategory::Low, count: 1 },
        ],
        ..Report::default()
    }
}

#[test]
fn bar_chart_written_to_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("avg_salary_by_dept.svg");
    let svg = BarChartRenderer::new().render(&create_report()).unwrap();
    std::fs::write(&path, &svg).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("<svg"));
    assert!(written.contains("Engineering"));
    assert!(written.contains("Marketing"));
    assert!(written.contains("Average Salary by Department"));
}

#[test]
fn pie_chart_shares_match_distribution() {
    let svg = PieChartRenderer::new().render(&create_report()).unwrap();
    assert!(svg.contains("60.0%"));
    assert!(svg.contains("30.0%"));
    assert!(svg.contains("10.0%"));
    assert!(svg.contains("Salary Category Distribution"));
}

#[test]
fn charts_reject_empty_report() {
    let report = Report::default();
    assert!(BarChartRenderer::new().render(&report).is_err());
    assert!(PieChartRenderer::new().render(&report).is_err());
}
