//! Excel report renderer
//!
//! Writes the cleaned table and the four aggregates to one workbook, one
//! sheet per table, in this order:
//!
//! ```text
//! Sheet: Cleaned_Data
//! | Name  | Department | Gender | JoinDate   | Salary | PerformanceRating | ... | Tenure | SalaryCategory |
//! |-------|------------|--------|------------|--------|-------------------|-----|--------|----------------|
//! | Alice | Sales      | F      | 2019-03-15 | 52000  | 4                 | ... | 6      | Medium         |
//!
//! Sheet: Avg_Salary_By_Dept       | Department | Salary |
//! Sheet: Gender_Count_By_Dept     | Department | Gender | Count |
//! Sheet: Avg_Rating_By_Dept       | Department | PerformanceRating |
//! Sheet: Low_Performers           (same columns as Cleaned_Data)
//! ```
//!
//! Columns follow the table's layout: the input order, with Tenure and
//! SalaryCategory appended unless the input already had them. The diagram
//! shows the layout of a table without one. Missing values are left blank.
//! There is no index column.

use chrono::NaiveDate;
use empreport_core::{
    columns, sheets, Cell, Column, DepartmentMean, EmployeeRecord, GenderCount, RenderError,
    Renderer, Report, WorkingTable,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, FormatBorder, Workbook, Worksheet, XlsxError};
use std::path::Path;

/// Excel report renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Number format for dates
    pub date_format: String,
    /// Number format for salaries and means
    pub number_format: String,
    /// Whether to freeze the header row
    pub freeze_header: bool,
    /// Whether to size columns to their content
    pub autofit: bool,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            date_format: "yyyy-mm-dd".into(),
            number_format: "General".into(),
            freeze_header: true,
            autofit: true,
        }
    }
}

/// Formats shared by every sheet
struct ExcelFormats {
    header: Format,
    text: Format,
    number: Format,
    integer: Format,
    date: Format,
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate workbook bytes
    pub fn render_to_bytes(&self, report: &Report) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = self.create_formats();
        let table = &report.table;

        self.add_records_sheet(&mut workbook, sheets::CLEANED_DATA, table, &table.records, &formats)?;
        self.add_means_sheet(
            &mut workbook,
            sheets::AVG_SALARY_BY_DEPT,
            columns::SALARY,
            &report.aggregates.avg_salary_by_dept,
            &formats,
        )?;
        self.add_gender_sheet(&mut workbook, &report.aggregates.gender_count_by_dept, &formats)?;
        self.add_means_sheet(
            &mut workbook,
            sheets::AVG_RATING_BY_DEPT,
            columns::PERFORMANCE_RATING,
            &report.aggregates.avg_rating_by_dept,
            &formats,
        )?;
        self.add_records_sheet(
            &mut workbook,
            sheets::LOW_PERFORMERS,
            table,
            &report.aggregates.low_performers,
            &formats,
        )?;

        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }

    /// Write the workbook to `path`. A failed write is not cleaned up.
    pub fn render_to_file(&self, report: &Report, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let bytes = self.render_to_bytes(report)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn create_formats(&self) -> ExcelFormats {
        let header = Format::new()
            .set_bold()
            .set_background_color(0x4472C4)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        ExcelFormats {
            header,
            text: Format::new(),
            number: Format::new().set_num_format(&self.number_format),
            integer: Format::new().set_num_format("0"),
            date: Format::new().set_num_format(&self.date_format),
        }
    }

    /// Add a named sheet with a header row
    fn add_sheet<'a>(
        &self,
        workbook: &'a mut Workbook,
        name: &str,
        headers: &[&str],
        formats: &ExcelFormats,
    ) -> Result<&'a mut Worksheet, RenderError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name).map_err(xlsx_error)?;
        for (col, header) in headers.iter().enumerate() {
            sheet
                .write_string_with_format(0, col as u16, *header, &formats.header)
                .map_err(xlsx_error)?;
        }
        if self.freeze_header {
            sheet.set_freeze_panes(1, 0).map_err(xlsx_error)?;
        }
        Ok(sheet)
    }

    /// Cleaned_Data and Low_Performers share the table's column layout
    fn add_records_sheet(
        &self,
        workbook: &mut Workbook,
        name: &str,
        table: &WorkingTable,
        records: &[EmployeeRecord],
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let layout = table.columns();
        let headers: Vec<&str> = layout.iter().map(|&c| table.header(c)).collect();
        let sheet = self.add_sheet(workbook, name, &headers, formats)?;

        for (i, record) in records.iter().enumerate() {
            let row = i as u32 + 1;
            for (col, &column) in layout.iter().enumerate() {
                write_column(sheet, row, col as u16, record, column, formats)?;
            }
        }

        if self.autofit {
            sheet.autofit();
        }
        Ok(())
    }

    fn add_means_sheet(
        &self,
        workbook: &mut Workbook,
        name: &str,
        value_header: &str,
        means: &[DepartmentMean],
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let sheet = self.add_sheet(workbook, name, &[columns::DEPARTMENT, value_header], formats)?;
        for (i, mean) in means.iter().enumerate() {
            let row = i as u32 + 1;
            sheet
                .write_string_with_format(row, 0, &mean.department, &formats.text)
                .map_err(xlsx_error)?;
            write_opt_decimal(sheet, row, 1, Some(mean.value), formats)?;
        }
        if self.autofit {
            sheet.autofit();
        }
        Ok(())
    }

    fn add_gender_sheet(
        &self,
        workbook: &mut Workbook,
        counts: &[GenderCount],
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let sheet = self.add_sheet(
            workbook,
            sheets::GENDER_COUNT_BY_DEPT,
            &[columns::DEPARTMENT, columns::GENDER, columns::COUNT],
            formats,
        )?;
        for (i, count) in counts.iter().enumerate() {
            let row = i as u32 + 1;
            sheet
                .write_string_with_format(row, 0, &count.department, &formats.text)
                .map_err(xlsx_error)?;
            sheet
                .write_string_with_format(row, 1, &count.gender, &formats.text)
                .map_err(xlsx_error)?;
            sheet
                .write_number_with_format(row, 2, count.count as f64, &formats.integer)
                .map_err(xlsx_error)?;
        }
        if self.autofit {
            sheet.autofit();
        }
        Ok(())
    }
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, report: &Report) -> Result<Vec<u8>, RenderError> {
        self.render_to_bytes(report)
    }
}

fn xlsx_error(e: XlsxError) -> RenderError {
    RenderError::Format(e.to_string())
}

fn write_opt_text(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<&str>,
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    if let Some(value) = value {
        sheet
            .write_string_with_format(row, col, value, &formats.text)
            .map_err(xlsx_error)?;
    }
    Ok(())
}

fn write_opt_decimal(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<Decimal>,
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    if let Some(value) = value.and_then(|v| v.to_f64()) {
        sheet
            .write_number_with_format(row, col, value, &formats.number)
            .map_err(xlsx_error)?;
    }
    Ok(())
}

fn write_opt_date(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<NaiveDate>,
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    if let Some(date) = value {
        sheet
            .write_datetime_with_format(row, col, &date, &formats.date)
            .map_err(xlsx_error)?;
    }
    Ok(())
}

fn write_column(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    record: &EmployeeRecord,
    column: Column,
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    match column {
        Column::Name => write_opt_text(sheet, row, col, record.name.as_deref(), formats),
        Column::Department => write_opt_text(sheet, row, col, record.department.as_deref(), formats),
        Column::Gender => write_opt_text(sheet, row, col, record.gender.as_deref(), formats),
        Column::JoinDate => write_opt_date(sheet, row, col, record.join_date, formats),
        Column::Salary => write_opt_decimal(sheet, row, col, record.salary, formats),
        Column::PerformanceRating => {
            write_opt_decimal(sheet, row, col, record.performance_rating, formats)
        }
        Column::Extra(i) => match record.extra.get(i) {
            Some(cell) => write_cell(sheet, row, col, cell, formats),
            None => Ok(()),
        },
        Column::Tenure => match record.tenure {
            Some(tenure) => sheet
                .write_number_with_format(row, col, f64::from(tenure), &formats.integer)
                .map(|_| ())
                .map_err(xlsx_error),
            None => Ok(()),
        },
        Column::SalaryCategory => {
            let category = record.salary_category.map(|c| c.as_str());
            write_opt_text(sheet, row, col, category, formats)
        }
    }
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    match cell {
        Cell::Empty => Ok(()),
        Cell::Text(s) => write_opt_text(sheet, row, col, Some(s.as_str()), formats),
        Cell::Number(n) => sheet
            .write_number_with_format(row, col, *n, &formats.number)
            .map(|_| ())
            .map_err(xlsx_error),
        Cell::Bool(b) => sheet
            .write_boolean(row, col, *b)
            .map(|_| ())
            .map_err(xlsx_error),
        Cell::Date(d) => write_opt_date(sheet, row, col, Some(*d), formats),
    }
}
