//! Reading source files into loader tables.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use lockaudit_recon::{ReconError, Table};

const SPREADSHEET_EXTENSIONS: [&str; 4] = ["xlsx", "xls", "xlsb", "ods"];

/// Read a CSV or spreadsheet source. Spreadsheets use their first sheet.
pub fn read_table(source: &str, path: &Path) -> Result<Table, ReconError> {
    let is_spreadsheet = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SPREADSHEET_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false);

    if is_spreadsheet {
        log::info!("reading {source} as spreadsheet: {}", path.display());
        read_spreadsheet(source, path)
    } else {
        log::info!("reading {source} as CSV: {}", path.display());
        let content = read_file_as_utf8(path).map_err(|e| ReconError::Io {
            source: source.into(),
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Table::from_csv(source, &content)
    }
}

/// Read file and convert to UTF-8 if needed (Windows-1252 fallback for
/// Excel-exported CSVs).
pub fn read_file_as_utf8(path: &Path) -> Result<String, std::io::Error> {
    let bytes = std::fs::read(path)?;

    match String::from_utf8(bytes) {
        Ok(mut s) => {
            if s.starts_with('\u{feff}') {
                s.remove(0);
            }
            Ok(s)
        }
        Err(e) => {
            let bytes = e.into_bytes();
            log::warn!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn read_spreadsheet(source: &str, path: &Path) -> Result<Table, ReconError> {
    let io_err = |message: String| ReconError::Io { source: source.into(), message };

    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| io_err(format!("cannot open {}: {e}", path.display())))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| io_err(format!("{} contains no sheets", path.display())))?
        .map_err(|e| io_err(format!("cannot read first sheet of {}: {e}", path.display())))?;

    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<String>>());
    let headers = rows.next().unwrap_or_default();
    Ok(Table::new(headers, rows.collect()))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        // Integers without decimals
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Data::Float(n) => format!("{n}"),
        Data::Int(n) => format!("{n}"),
        other => other.to_string(),
    }
}
