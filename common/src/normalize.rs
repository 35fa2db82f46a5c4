//! テキスト正規化
//!
//! 照合前にフィールド値を比較可能な形にそろえる:
//! 1. 小文字化
//! 2. 単語文字・空白・CJK漢字以外を除去
//! 3. 連続空白を1つに
//! 4. 前後の空白を除去
//!
//! 記号除去を空白の整理より先に行うため、結果は冪等になる。

use crate::table::Cell;
use regex::Regex;

lazy_static::lazy_static! {
    // \w, \s はUnicode対応（かな・ハングル等も単語文字として残る）
    static ref DISALLOWED_RE: Regex = Regex::new(r"[^\w\s\x{4e00}-\x{9fff}]").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// 文字列を正規化する
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = DISALLOWED_RE.replace_all(&lowered, "");
    let collapsed = WHITESPACE_RE.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}

/// セル値を正規化する（欠損値は空文字）
pub fn normalize_cell(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Text(s) => normalize_text(s),
        other => normalize_text(&other.to_string()),
    }
}
