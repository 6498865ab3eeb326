// Excel import (xlsx, xls, xlsb, ods) via calamine

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::{Duration, NaiveDate};

use matchbook_recon::{Cell, Table};

/// Import one worksheet as a table. `sheet` picks the worksheet by name;
/// absent means the first one.
pub fn import(path: &Path, sheet: Option<&str>) -> Result<Table, String> {
    let mut workbook: Sheets<_> =
        open_workbook_auto(path).map_err(|e| format!("failed to open Excel file: {}", e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err("Excel file contains no sheets".to_string());
    }

    let sheet_name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(format!(
                    "sheet '{}' not found (available: {})",
                    name,
                    sheet_names.join(", ")
                ));
            }
            name.to_string()
        }
        None => sheet_names[0].clone(),
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("failed to read sheet '{}': {}", sheet_name, e))?;

    let mut rows: Vec<Vec<Cell>> = Vec::new();

    // Range start offset (data may not begin at A1); row/column indices in
    // the table stay faithful to the sheet.
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    for (row_idx, row) in range.rows().enumerate() {
        let target_row = start_row as usize + row_idx;
        for (col_idx, data) in row.iter().enumerate() {
            let target_col = start_col as usize + col_idx;
            let cell = map_cell(data);
            if !matches!(cell, Cell::Empty) {
                set_cell(&mut rows, target_row, target_col, cell);
            }
        }
    }

    Ok(Table::from_rows(rows))
}

fn map_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => {
            if s.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        // TRUE/FALSE text, same rendering Excel shows
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
        Data::DateTime(dt) => Cell::Text(serial_to_iso(dt.as_f64())),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// Render an Excel serial date as ISO text. Serial day 0 is 1899-12-30 in
/// the 1900 date system; a fractional part is the time of day.
fn serial_to_iso(serial: f64) -> String {
    let days = serial.floor() as i64;
    let day_fraction = serial - serial.floor();
    let seconds = (day_fraction * 86_400.0).round() as i64;

    let base = match NaiveDate::from_ymd_opt(1899, 12, 30) {
        Some(d) => d,
        None => return serial.to_string(),
    };
    let date = match base.checked_add_signed(Duration::days(days)) {
        Some(d) => d,
        None => return serial.to_string(),
    };

    if seconds == 0 {
        date.format("%Y-%m-%d").to_string()
    } else {
        let dt = date.and_hms_opt(0, 0, 0).unwrap_or_default() + Duration::seconds(seconds);
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

fn set_cell(rows: &mut Vec<Vec<Cell>>, row: usize, col: usize, cell: Cell) {
    while rows.len() <= row {
        rows.push(Vec::new());
    }
    let r = &mut rows[row];
    while r.len() <= col {
        r.push(Cell::Empty);
    }
    r[col] = cell;
}
