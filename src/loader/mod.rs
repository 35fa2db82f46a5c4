//! 表ファイル読み込みモジュール
//!
//! 拡張子で形式を判定し、Excel（calamine）またはCSVから `Table` を作成する。
//! 先頭行をヘッダーとして扱う。

pub mod excel;
pub mod delimited;

use crate::error::{Result, TableMatcherError};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use table_matcher_common::{Cell, Table};

/// 入力ファイル形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Excel,
    Csv,
}

const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// 欠損値として扱う文字列
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// 拡張子から形式を判定
pub fn detect_format(path: &Path) -> Result<TableFormat> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if EXCEL_EXTENSIONS.contains(&ext.as_str()) {
        Ok(TableFormat::Excel)
    } else if ext == "csv" {
        Ok(TableFormat::Csv)
    } else {
        Err(TableMatcherError::UnsupportedFormat(format!(".{}", ext)))
    }
}

/// 表ファイルを読み込む
///
/// `sheet` はExcelのシート名（省略時は先頭シート）。CSVでは無視する。
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table> {
    if !path.exists() {
        return Err(TableMatcherError::FileNotFound(path.display().to_string()));
    }

    let table = match detect_format(path)? {
        TableFormat::Excel => excel::load_excel(path, sheet)?,
        TableFormat::Csv => {
            if sheet.is_some() {
                log::warn!("CSVファイルではシート指定を無視します: {}", path.display());
            }
            delimited::load_csv(path)?
        }
    };

    log::info!(
        "{} を読み込み: {} 行 × {} 列",
        path.display(),
        table.len(),
        table.width()
    );
    Ok(table)
}

/// ヘッダー名を整える（空欄は `Unnamed: i`、重複は `名前.1` のように連番）
pub(crate) fn header_names(raw: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();

    raw.into_iter()
        .enumerate()
        .map(|(i, name)| {
            let name = name.trim_start_matches('\u{feff}').to_string();
            let name = if name.trim().is_empty() {
                log::warn!("{} 列目のヘッダーが空です", i + 1);
                format!("Unnamed: {}", i)
            } else {
                name
            };

            // 生成した名前が既存の列名と衝突する場合は番号を進める
            let count = counts.entry(name.clone()).or_insert(0);
            let mut unique = name.clone();
            while used.contains(&unique) {
                *count += 1;
                unique = format!("{}.{}", name, count);
            }
            used.insert(unique.clone());
            unique
        })
        .collect()
}

pub(crate) fn is_na(value: &str) -> bool {
    NA_VALUES.contains(&value.trim())
}

/// 列の型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Int,
    Float,
    Text,
}

fn infer_kind<'a>(values: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut kind = ColumnKind::Int;
    for value in values.filter(|v| !is_na(v)) {
        let value = value.trim();
        if kind == ColumnKind::Int && value.parse::<i64>().is_err() {
            kind = ColumnKind::Float;
        }
        if kind == ColumnKind::Float && value.parse::<f64>().is_err() {
            return ColumnKind::Text;
        }
    }
    kind
}

/// 文字列の行から型推定して `Table` を作る（列単位で推定）
pub(crate) fn infer_table(columns: Vec<String>, raw_rows: Vec<Vec<String>>) -> Table {
    let width = columns.len();
    let kinds: Vec<ColumnKind> = (0..width)
        .map(|col| {
            infer_kind(
                raw_rows
                    .iter()
                    .map(|r| r.get(col).map(String::as_str).unwrap_or("")),
            )
        })
        .collect();

    let rows = raw_rows
        .into_iter()
        .map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(col, value)| {
                    if is_na(&value) {
                        return Cell::Empty;
                    }
                    match kinds.get(col).copied().unwrap_or(ColumnKind::Text) {
                        ColumnKind::Int => value.trim().parse().map(Cell::Int).unwrap_or(Cell::Text(value)),
                        ColumnKind::Float => value.trim().parse().map(Cell::Float).unwrap_or(Cell::Text(value)),
                        ColumnKind::Text => Cell::Text(value),
                    }
                })
                .collect()
        })
        .collect();

    Table::from_rows(columns, rows)
}

/// 小数がすべて整数値の数値列を整数列にそろえる
pub(crate) fn narrow_integral_columns(rows: &mut [Vec<Cell>], width: usize) {
    for col in 0..width {
        let mut has_float = false;
        let integral = rows.iter().filter_map(|r| r.get(col)).all(|cell| match cell {
            Cell::Float(f) => {
                has_float = true;
                f.fract() == 0.0 && f.abs() < i64::MAX as f64
            }
            Cell::Int(_) | Cell::Empty => true,
            _ => false,
        });

        if !(integral && has_float) {
            continue;
        }
        for row in rows.iter_mut() {
            if let Some(cell) = row.get_mut(col) {
                if let Cell::Float(f) = *cell {
                    *cell = Cell::Int(f as i64);
                }
            }
        }
    }
}
