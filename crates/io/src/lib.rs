// File loading and report writing around the reconciliation engine

use std::path::Path;

use matchbook_recon::Table;

pub mod csv;
pub mod report;
pub mod xlsx;

/// Load a table from disk, picking the reader by file extension. Excel
/// formats go through calamine; everything else is parsed as delimited text
/// with a sniffed delimiter. `sheet` selects the Excel worksheet and is
/// ignored for text files.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table, String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);
    match ext.as_deref() {
        Some("xlsx") | Some("xls") | Some("xlsb") | Some("ods") => xlsx::import(path, sheet),
        _ => csv::import(path),
    }
}
