// Report writing: six-bucket CSV directory, single-workbook Excel, JSON

use std::path::Path;

use rust_xlsxwriter::Workbook;

use matchbook_recon::model::{Bucket, Record, ReconcileResult};

/// Write the six output sets as CSV files in `dir` (created if missing):
/// `matched_1.csv` … `unmatched_2.csv`, side 1 left, side 2 right. With
/// `sort` the matched/unmatched files are ordered ascending by amount;
/// potential files always keep pair order so line i of `potential_1` still
/// belongs with line i of `potential_2`.
pub fn write_csv_dir(result: &ReconcileResult, dir: &Path, sort: bool) -> Result<(), String> {
    std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;

    for (bucket, side, records) in result.buckets() {
        let path = dir.join(format!("{}_{}.csv", bucket, side.number()));
        let mut writer = csv::WriterBuilder::new()
            .from_path(&path)
            .map_err(|e| format!("{}: {}", path.display(), e))?;

        let columns = Columns::for_records(records);
        writer
            .write_record(columns.header())
            .map_err(|e| e.to_string())?;
        for record in ordered(records, bucket, sort) {
            writer
                .write_record(columns.fields(record))
                .map_err(|e| e.to_string())?;
        }
        writer.flush().map_err(|e| e.to_string())?;
    }

    Ok(())
}

/// Write one workbook with six sheets (`matched_1` … `unmatched_2`), same
/// columns and ordering rules as the CSV directory.
pub fn write_xlsx_report(result: &ReconcileResult, path: &Path, sort: bool) -> Result<(), String> {
    let mut workbook = Workbook::new();

    for (bucket, side, records) in result.buckets() {
        let name = format!("{}_{}", bucket, side.number());
        let worksheet = workbook
            .add_worksheet()
            .set_name(&name)
            .map_err(|e| format!("failed to create sheet '{}': {}", name, e))?;

        let columns = Columns::for_records(records);
        for (col, title) in columns.header().iter().enumerate() {
            worksheet
                .write_string(0, col as u16, title.as_str())
                .map_err(|e| e.to_string())?;
        }

        for (i, record) in ordered(records, bucket, sort).iter().enumerate() {
            let row = (i + 1) as u32;
            worksheet
                .write_number(row, 0, record.row as f64)
                .map_err(|e| e.to_string())?;
            worksheet
                .write_string(row, 1, &record.sender_name)
                .map_err(|e| e.to_string())?;
            worksheet
                .write_number(row, 2, record.amount.into_inner())
                .map_err(|e| e.to_string())?;
            let mut col = 3u16;
            if columns.code_type {
                let text = record.code_type.as_deref().unwrap_or("");
                worksheet
                    .write_string(row, col, text)
                    .map_err(|e| e.to_string())?;
                col += 1;
            }
            if columns.code_number {
                let text = record.code_number.as_deref().unwrap_or("");
                worksheet
                    .write_string(row, col, text)
                    .map_err(|e| e.to_string())?;
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| format!("failed to save report: {}", e))
}

/// Serialize the whole result as pretty JSON to `path`.
pub fn write_json_file(result: &ReconcileResult, path: &Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(result).map_err(|e| e.to_string())?;
    std::fs::write(path, json).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Which optional code columns a record set carries.
struct Columns {
    code_type: bool,
    code_number: bool,
}

impl Columns {
    fn for_records(records: &[Record]) -> Self {
        Self {
            code_type: records.iter().any(|r| r.code_type.is_some()),
            code_number: records.iter().any(|r| r.code_number.is_some()),
        }
    }

    fn header(&self) -> Vec<String> {
        let mut header = vec!["row".to_string(), "sender_name".to_string(), "amount".to_string()];
        if self.code_type {
            header.push("code_type".to_string());
        }
        if self.code_number {
            header.push("code_number".to_string());
        }
        header
    }

    fn fields(&self, record: &Record) -> Vec<String> {
        let mut fields = vec![
            record.row.to_string(),
            record.sender_name.clone(),
            format_amount(record.amount.into_inner()),
        ];
        if self.code_type {
            fields.push(record.code_type.clone().unwrap_or_default());
        }
        if self.code_number {
            fields.push(record.code_number.clone().unwrap_or_default());
        }
        fields
    }
}

/// Records in display order: ascending by amount when sorting applies,
/// input order otherwise. Potential buckets never reorder (pair alignment).
fn ordered(records: &[Record], bucket: Bucket, sort: bool) -> Vec<&Record> {
    let mut out: Vec<&Record> = records.iter().collect();
    if sort && bucket != Bucket::Potential {
        out.sort_by_key(|r| r.amount);
    }
    out
}

fn format_amount(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
