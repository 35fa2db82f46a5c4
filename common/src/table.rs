//! 表データモジュール
//!
//! ファイル形式に依存しない最小限の表（列名＋行）を提供する。
//! 行は常に列数と同じ長さに揃えて保持する。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// セル値
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// 欠損値（空セル・NA）
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// 文字列セルを作成
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// 数値セルならf64として返す
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(n) => Some(*n as f64),
            Cell::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Bool(true) => write!(f, "TRUE"),
            Cell::Bool(false) => write!(f, "FALSE"),
            Cell::Int(n) => write!(f, "{}", n),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// 表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// 列名だけの空テーブル
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// 列名と行から作成（行の長さは列数に揃える）
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 列数
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// 列位置を取得（存在しなければスキーマエラー）
    ///
    /// `table` はエラーメッセージ用のテーブル名（"main" / "tag"）
    pub fn require_column(&self, table: &str, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| Error::MissingColumn {
            table: table.to_string(),
            column: name.to_string(),
        })
    }

    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    /// セル参照（範囲外は欠損値）
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(EMPTY)
    }

    /// 行を追加
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        if row.len() > self.columns.len() {
            log::warn!(
                "行の列数({})がヘッダー({})より多いため切り詰めます",
                row.len(),
                self.columns.len()
            );
        }
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: Cell) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(column)) {
            *cell = value;
        }
    }

    /// 列を追加し、全行を `fill` で初期化する
    ///
    /// 同名の列が既にある場合はその列を上書きする。
    pub fn add_column(&mut self, name: &str, fill: Cell) -> usize {
        if let Some(index) = self.column_index(name) {
            for row in &mut self.rows {
                row[index] = fill.clone();
            }
            return index;
        }

        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(fill.clone());
        }
        self.columns.len() - 1
    }

    /// 列の値を上から順に返す
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |r| &r[column])
    }

    /// `keep` が真を返す行だけを残したコピー（行順は維持）
    pub fn filter_rows<F>(&self, keep: F) -> Table
    where
        F: Fn(usize) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .enumerate()
                .filter(|(i, _)| keep(*i))
                .map(|(_, r)| r.clone())
                .collect(),
        }
    }
}
