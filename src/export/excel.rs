//! Excel生成（rust_xlsxwriter）

use crate::error::Result;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;
use table_matcher_common::{Cell, Table};

/// 表ごとに1シートのワークブックを保存する
pub fn write_workbook(sheets: &[(&str, &Table)], output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for (name, table) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name)?;
        write_table(worksheet, table, &header_format)?;
    }

    workbook.save(output_path)?;
    Ok(())
}

fn write_table(worksheet: &mut Worksheet, table: &Table, header_format: &Format) -> Result<()> {
    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, header_format)?;
    }

    for (r, row) in table.rows().iter().enumerate() {
        let excel_row = (r + 1) as u32;
        for (c, cell) in row.iter().enumerate() {
            let excel_col = c as u16;
            match cell {
                // 欠損値（NaN）は空欄
                Cell::Empty => {}
                Cell::Float(f) if !f.is_finite() => {}
                Cell::Int(n) => {
                    worksheet.write_number(excel_row, excel_col, *n as f64)?;
                }
                Cell::Float(f) => {
                    worksheet.write_number(excel_row, excel_col, *f)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(excel_row, excel_col, *b)?;
                }
                Cell::Text(s) => {
                    worksheet.write_string(excel_row, excel_col, s)?;
                }
            }
        }
    }

    Ok(())
}
