//! # empreport-loader
//!
//! Reads one worksheet of an employee spreadsheet into an untyped [`RawTable`].
//!
//! This crate provides:
//! - Workbook reading via calamine (.xlsx, .xlsm, .xlsb, .xls, .ods)
//! - Header detection from the first row
//! - Cell conversion to the domain [`Cell`] type
//!
//! Typed coercion (dates, numbers) is left to the cleaner so that a bad cell
//! never aborts the load.
//!
//! ## Example
//!
//! ```rust,no_run
//! use empreport_loader::load_workbook;
//!
//! let raw = load_workbook("employee_performance.xlsx", None).unwrap();
//! println!("{} rows, columns: {:?}", raw.len(), raw.headers);
//! ```

use calamine::{open_workbook_auto, Data, DataType, Reader};
use empreport_core::{Cell, LoadError, RawTable};
use std::path::Path;
use tracing::{debug, info};

/// Supported workbook formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    /// Office Open XML (.xlsx, .xlsm)
    Xlsx,
    /// Excel binary workbook (.xlsb)
    Xlsb,
    /// Legacy Excel (.xls)
    Xls,
    /// OpenDocument (.ods)
    Ods,
}

/// Detect workbook format from extension
pub fn detect_format(path: &Path) -> Option<WorkbookFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "xlsx" | "xlsm" => Some(WorkbookFormat::Xlsx),
        "xlsb" => Some(WorkbookFormat::Xlsb),
        "xls" => Some(WorkbookFormat::Xls),
        "ods" => Some(WorkbookFormat::Ods),
        _ => None,
    }
}

/// Load a worksheet into a [`RawTable`].
///
/// Reads `sheet` when given, otherwise the first sheet of the workbook. The
/// first row is the header row. Fully blank data rows are skipped.
///
/// The format is chosen by extension; anything else is rejected before the
/// file is opened.
pub fn load_workbook(path: impl AsRef<Path>, sheet: Option<&str>) -> Result<RawTable, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let format =
        detect_format(path).ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;
    debug!(?format, "Opening workbook");

    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(LoadError::SheetNotFound(name.to_string()));
            }
            name.to_string()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| LoadError::Empty(format!("{} has no sheets", path.display())))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| LoadError::Empty(format!("sheet '{sheet_name}' has no header row")))?;
    let headers = header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| header_text(idx, cell))
        .collect();

    let mut table = RawTable::new(headers);
    let mut skipped = 0usize;
    for row in rows {
        let cells: Vec<Cell> = row.iter().map(convert_cell).collect();
        if cells.iter().all(Cell::is_empty) {
            skipped += 1;
            continue;
        }
        table.push_row(cells);
    }

    if skipped > 0 {
        debug!(skipped, "Skipped blank rows");
    }
    info!(
        path = %path.display(),
        sheet = %sheet_name,
        rows = table.len(),
        columns = table.headers.len(),
        "Loaded worksheet"
    );

    Ok(table)
}

/// Header cell as text; blank headers get a positional placeholder
fn header_text(idx: usize, cell: &Data) -> String {
    convert_cell(cell)
        .to_text()
        .unwrap_or_else(|| format!("Unnamed: {idx}"))
}

/// Convert a calamine cell into the domain cell type
pub fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_date() {
            Some(date) => Cell::Date(date),
            None => Cell::Empty,
        },
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}
