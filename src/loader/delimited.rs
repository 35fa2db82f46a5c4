//! CSV読み込み

use super::{header_names, infer_table};
use crate::error::Result;
use std::path::Path;
use table_matcher_common::Table;

/// CSVファイルを読み込む（UTF-8、先頭行ヘッダー）
pub fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let columns = header_names(headers);

    let mut raw_rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        raw_rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(infer_table(columns, raw_rows))
}
