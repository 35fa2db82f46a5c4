//! CSV出力

use crate::error::Result;
use std::io::Write;
use std::path::Path;
use table_matcher_common::{Cell, Table};

/// 表計算ソフトがUTF-8と認識するためのBOM
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 表をCSVとして保存する（BOM付きUTF-8）
pub fn write_csv(table: &Table, output_path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(field_text))?;
    }
    writer.flush()?;
    Ok(())
}

/// 欠損値（NaN）は空欄として書く
fn field_text(cell: &Cell) -> String {
    match cell {
        Cell::Float(f) if !f.is_finite() => String::new(),
        other => other.to_string(),
    }
}
