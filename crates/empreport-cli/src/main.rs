//! empreport CLI - Employee Performance Report
//!
//! Loads an employee spreadsheet, cleans it, derives tenure and salary
//! categories, prints the department summaries and writes the result
//! workbook plus two SVG charts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use empreport_analysis::{Analysis, Analyzer, CleaningSummary};
use empreport_core::{AnalysisConfig, Renderer, Report};
use empreport_render::{BarChartRenderer, ExcelRenderer, JsonRenderer, PieChartRenderer, TextRenderer};
use rust_decimal::Decimal;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "empreport")]
#[command(author, version, about = "Employee performance report", long_about = None)]
struct Cli {
    /// Input workbook (.xlsx, .xlsm, .xlsb, .xls or .ods)
    #[arg(value_name = "INPUT", default_value = "employee_performance.xlsx")]
    input: PathBuf,

    /// Worksheet to read (first sheet if not specified)
    #[arg(long, value_name = "NAME")]
    sheet: Option<String>,

    /// Result workbook path
    #[arg(short, long, default_value = "employee_analysis_result.xlsx")]
    output: PathBuf,

    /// Average salary bar chart path
    #[arg(long, default_value = "avg_salary_by_dept.svg")]
    bar_chart: PathBuf,

    /// Salary category pie chart path
    #[arg(long, default_value = "salary_category_distribution.svg")]
    pie_chart: PathBuf,

    /// Analysis settings (TOML)
    #[arg(short, long, value_name = "FILE", env = "EMPREPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Year tenure is measured against
    #[arg(long)]
    reference_year: Option<i32>,

    /// Ratings at or below this are reported as low performers
    #[arg(long)]
    low_performer_threshold: Option<Decimal>,

    /// Fill value for missing join dates (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    default_join_date: Option<NaiveDate>,

    /// Rows shown in the cleaning and feature previews
    #[arg(long, default_value_t = 5)]
    preview_rows: usize,

    /// Console summary format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Suppress the console summary
    #[arg(short, long)]
    quiet: bool,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(&cli)
}

/// RUST_LOG takes precedence; otherwise verbosity picks the level
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    debug!(?config, "Resolved configuration");

    let raw = empreport_loader::load_workbook(&cli.input, cli.sheet.as_deref())
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;

    let Analysis { report, cleaning } = Analyzer::new(config)
        .analyze(&raw)
        .with_context(|| format!("Failed to analyze {}", cli.input.display()))?;

    let show_text = !cli.quiet && cli.format == Format::Text;
    if !cli.quiet {
        print_summary(&report, &cleaning, cli)?;
    }

    ExcelRenderer::new()
        .render_to_file(&report, &cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    info!(path = %cli.output.display(), "Saved result workbook");

    write_chart(&BarChartRenderer::new(), &report, &cli.bar_chart)?;
    write_chart(&PieChartRenderer::new(), &report, &cli.pie_chart)?;

    if show_text {
        println!("Results saved to {}", cli.output.display());
        println!("Charts saved to {} and {}", cli.bar_chart.display(), cli.pie_chart.display());
    }

    Ok(())
}

/// Config file (if any), then command-line overrides
fn resolve_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(year) = cli.reference_year {
        config = config.reference_year(year);
    }
    if let Some(threshold) = cli.low_performer_threshold {
        config = config.low_performer_threshold(threshold);
    }
    if let Some(date) = cli.default_join_date {
        config = config.default_join_date(date);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn print_summary(report: &Report, cleaning: &CleaningSummary, cli: &Cli) -> Result<()> {
    match cli.format {
        Format::Text => {
            let text = TextRenderer::new()
                .preview_rows(cli.preview_rows)
                .render(report)
                .context("Failed to render summary")?;
            println!(
                "Cleaned {} rows (filled salary: {}, rating: {}, join date: {})\n",
                cleaning.rows, cleaning.salary_filled, cleaning.rating_filled, cleaning.join_date_filled
            );
            print!("{text}");
        }
        Format::Json => {
            let json = JsonRenderer.render(report).context("Failed to render summary")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn write_chart<R>(renderer: &R, report: &Report, path: &Path) -> Result<()>
where
    R: Renderer<Output = String>,
{
    let svg = renderer
        .render(report)
        .with_context(|| format!("Failed to render {}", path.display()))?;
    std::fs::write(path, svg).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Saved chart");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("empreport").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_match_standard_file_names() {
        let cli = parse(&[]);
        assert_eq!(cli.input, PathBuf::from("employee_performance.xlsx"));
        assert_eq!(cli.output, PathBuf::from("employee_analysis_result.xlsx"));
        assert_eq!(cli.bar_chart, PathBuf::from("avg_salary_by_dept.svg"));
        assert_eq!(cli.pie_chart, PathBuf::from("salary_category_distribution.svg"));
        assert_eq!(cli.format, Format::Text);
        assert_eq!(cli.preview_rows, 5);
        assert!(!cli.quiet);
    }

    #[test]
    fn flags_override_config() {
        let cli = parse(&[
            "--reference-year",
            "2030",
            "--low-performer-threshold",
            "2.5",
            "--default-join-date",
            "2018-04-01",
        ]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.reference_year, 2030);
        assert_eq!(config.low_performer_threshold, Decimal::new(25, 1));
        assert_eq!(config.default_join_date, NaiveDate::from_ymd_opt(2018, 4, 1).unwrap());
    }

    #[test]
    fn config_file_is_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("empreport.toml");
        std::fs::write(&path, "reference_year = 2024\n").unwrap();

        let cli = parse(&["--config", path.to_str().unwrap()]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.reference_year, 2024);
        assert_eq!(config.join_date_format, "%d-%m-%Y");
    }

    #[test]
    fn verbosity_counts() {
        assert_eq!(parse(&["-vv"]).verbose, 2);
        assert_eq!(parse(&["--format", "json"]).format, Format::Json);
    }
}
