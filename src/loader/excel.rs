//! Excel読み込み（calamine）

use super::{header_names, is_na, narrow_integral_columns};
use crate::error::{Result, TableMatcherError};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use table_matcher_common::{Cell, Table};

/// Excelファイルの指定シート（省略時は先頭シート）を読み込む
pub fn load_excel(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)?;

    let range = match sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|s| s == name) {
                return Err(TableMatcherError::SheetNotFound(format!(
                    "{} ({})",
                    name,
                    path.display()
                )));
            }
            workbook.worksheet_range(name)?
        }
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| TableMatcherError::TableLoad(format!("シートがありません: {}", path.display())))??,
    };

    let mut rows = range.rows();
    let columns = match rows.next() {
        Some(header) => header_names(header.iter().map(header_text).collect()),
        None => return Ok(Table::default()),
    };

    let mut body: Vec<Vec<Cell>> = rows.map(|row| row.iter().map(to_cell).collect()).collect();
    narrow_integral_columns(&mut body, columns.len());

    Ok(Table::from_rows(columns, body))
}

fn header_text(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // 数値ヘッダーは 2024.0 ではなく 2024 と表示
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) if is_na(s) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(n) => Cell::Int(*n),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cell() {
        assert_eq!(to_cell(&Data::Empty), Cell::Empty);
        assert_eq!(to_cell(&Data::String("NA".into())), Cell::Empty);
        assert_eq!(to_cell(&Data::String("ABC".into())), Cell::text("ABC"));
        assert_eq!(to_cell(&Data::Float(2.5)), Cell::Float(2.5));
        assert_eq!(to_cell(&Data::Int(3)), Cell::Int(3));
        assert_eq!(to_cell(&Data::Bool(true)), Cell::Bool(true));
    }

    #[test]
    fn test_header_text() {
        assert_eq!(header_text(&Data::String("名稱".into())), "名稱");
        assert_eq!(header_text(&Data::Float(2024.0)), "2024");
        assert_eq!(header_text(&Data::Empty), "");
    }
}
