//! 照合結果の集計
//!
//! 主表の各行に一致タグの合計値・タグ名・類似度・組み合わせ詳細を付与し、
//! どの行にも採用されなかったタグ行を未一致表として返す。

use crate::candidate::{MainKeys, MatchCandidate, MatchColumns, TagKeys};
use crate::error::{Error, Result};
use crate::matcher::{consume, find_matches, ConsumptionSet};
use crate::table::{Cell, Table};
use crate::types::{FieldMapping, MatchParams};
use serde::Serialize;

/// 一致タグの合計値
pub const TOTAL_VALUE_COLUMN: &str = "匹配標籤總數值";
/// 一致タグ名（", " 区切り）
pub const MATCHED_TAGS_COLUMN: &str = "匹配的標籤";
/// 類似度（小数2桁, ", " 区切り）
pub const SIMILARITY_COLUMN: &str = "匹配相似度";
/// 一致した列の組み合わせ（先頭3件）
pub const DETAIL_COLUMN: &str = "匹配詳情";

/// 詳細列に載せる組み合わせの最大数
const MAX_DETAILS: usize = 3;
const JOIN_SEPARATOR: &str = ", ";

/// 一致した1タグ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedTag {
    /// タグ表の行番号
    pub tag_row: usize,
    pub name: String,
    pub score: f64,
    pub label: String,
}

/// 主表1行の照合結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    /// 主表の行番号
    pub main_row: usize,
    pub total: Cell,
    pub matches: Vec<MatchedTag>,
}

impl MatchSummary {
    fn empty(main_row: usize) -> Self {
        Self {
            main_row,
            total: Cell::Int(0),
            matches: Vec::new(),
        }
    }

    /// タグ名の連結
    pub fn tag_names(&self) -> String {
        self.matches
            .iter()
            .map(|m| m.name.as_str())
            .collect::<Vec<_>>()
            .join(JOIN_SEPARATOR)
    }

    /// 類似度の連結（小数2桁）
    pub fn scores(&self) -> String {
        self.matches
            .iter()
            .map(|m| format!("{:.2}", m.score))
            .collect::<Vec<_>>()
            .join(JOIN_SEPARATOR)
    }

    /// 組み合わせ詳細の連結（先頭3件）
    pub fn details(&self) -> String {
        self.matches
            .iter()
            .map(|m| m.label.as_str())
            .filter(|l| !l.is_empty())
            .take(MAX_DETAILS)
            .collect::<Vec<_>>()
            .join(JOIN_SEPARATOR)
    }
}

/// 照合全体の結果
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// 主表のコピー＋集計列
    pub main: Table,
    /// 未一致のタグ行（元の行順・全列）
    pub unmatched: Table,
    /// 主表の行ごとの結果（入力順）
    pub summaries: Vec<MatchSummary>,
    /// 消費済みタグ行
    pub consumed: ConsumptionSet,
}

impl MatchOutcome {
    /// 1件以上一致した主表行の数
    pub fn matched_main_rows(&self) -> usize {
        self.summaries.iter().filter(|s| !s.matches.is_empty()).count()
    }
}

/// 主表とタグ表を照合する
pub fn match_tables(
    main: &Table,
    tags: &Table,
    fields: &FieldMapping,
    params: &MatchParams,
) -> Result<MatchOutcome> {
    match_tables_with_progress(main, tags, fields, params, |_, _| {})
}

/// 主表とタグ表を照合する（主表1行ごとに `(処理済み, 全体)` を通知）
pub fn match_tables_with_progress<F>(
    main: &Table,
    tags: &Table,
    fields: &FieldMapping,
    params: &MatchParams,
    mut progress: F,
) -> Result<MatchOutcome>
where
    F: FnMut(usize, usize),
{
    params.validate()?;

    // スキーマ検証（行を処理する前にすべて確認）
    let columns = MatchColumns {
        main: [
            main.require_column("main", &fields.main_field1)?,
            main.require_column("main", &fields.main_field2)?,
        ],
        tag: [
            tags.require_column("tag", &fields.tag_field1)?,
            tags.require_column("tag", &fields.tag_field2)?,
        ],
        main_names: [fields.main_field1.clone(), fields.main_field2.clone()],
        tag_names: [fields.tag_field1.clone(), fields.tag_field2.clone()],
    };
    let name_col = tags.require_column("tag", &fields.tag_name_field)?;
    let value_col = tags.require_column("tag", &fields.tag_value_field)?;

    let tag_keys = TagKeys::from_table(tags, &columns);
    let mut consumed = ConsumptionSet::new();
    let mut summaries = Vec::with_capacity(main.len());

    for main_row in 0..main.len() {
        let keys = MainKeys::from_row(main, main_row, &columns);
        let found = find_matches(&keys, &tag_keys, &columns, params, &consumed);

        let summary = if found.is_empty() {
            MatchSummary::empty(main_row)
        } else {
            let total = sum_values(tags, &found, value_col, &fields.tag_value_field)?;
            consume(&mut consumed, &found);
            MatchSummary {
                main_row,
                total,
                matches: found
                    .into_iter()
                    .map(|c| MatchedTag {
                        name: tags.cell(c.tag_row, name_col).to_string(),
                        tag_row: c.tag_row,
                        score: c.score,
                        label: c.label,
                    })
                    .collect(),
            }
        };

        if !summary.matches.is_empty() {
            log::debug!(
                "主表 {} 行目: {} 件一致 [{}] ({})",
                main_row + 1,
                summary.matches.len(),
                summary.tag_names(),
                summary.scores()
            );
        }

        summaries.push(summary);
        progress(main_row + 1, main.len());
    }

    let augmented = build_main_table(main, &summaries);
    let unmatched = tags.filter_rows(|i| !consumed.contains(&i));

    log::info!(
        "照合完了: 主表 {} 行中 {} 行一致, タグ {} 件消費, 未一致 {} 件",
        main.len(),
        summaries.iter().filter(|s| !s.matches.is_empty()).count(),
        consumed.len(),
        unmatched.len()
    );

    Ok(MatchOutcome {
        main: augmented,
        unmatched,
        summaries,
        consumed,
    })
}

/// 一致タグの数値列を合計する
///
/// 整数のみなら整数、小数を含めば小数。空セルは欠損値として扱い、
/// 合計は NaN になる。文字列・真偽値はエラー。
fn sum_values(
    tags: &Table,
    matches: &[MatchCandidate],
    value_col: usize,
    value_field: &str,
) -> Result<Cell> {
    let mut int_total: i64 = 0;
    let mut float_total: f64 = 0.0;
    let mut has_float = false;

    for candidate in matches {
        match tags.cell(candidate.tag_row, value_col) {
            Cell::Int(n) => {
                match int_total.checked_add(*n) {
                    Some(sum) => int_total = sum,
                    None => {
                        log::warn!("{} の合計が整数の範囲を超えたため小数で集計します", value_field);
                        has_float = true;
                    }
                }
                float_total += *n as f64;
            }
            Cell::Float(f) => {
                has_float = true;
                float_total += f;
            }
            Cell::Empty => {
                has_float = true;
                float_total = f64::NAN;
            }
            other => {
                return Err(Error::NonNumericValue {
                    row: candidate.tag_row + 1,
                    column: value_field.to_string(),
                    value: other.to_string(),
                });
            }
        }
    }

    Ok(if has_float {
        Cell::Float(float_total)
    } else {
        Cell::Int(int_total)
    })
}

fn build_main_table(main: &Table, summaries: &[MatchSummary]) -> Table {
    let mut table = main.clone();
    let total_col = table.add_column(TOTAL_VALUE_COLUMN, Cell::Int(0));
    let tags_col = table.add_column(MATCHED_TAGS_COLUMN, Cell::text(""));
    let score_col = table.add_column(SIMILARITY_COLUMN, Cell::text(""));
    let detail_col = table.add_column(DETAIL_COLUMN, Cell::text(""));

    for summary in summaries.iter().filter(|s| !s.matches.is_empty()) {
        let row = summary.main_row;
        table.set_cell(row, total_col, summary.total.clone());
        table.set_cell(row, tags_col, Cell::Text(summary.tag_names()));
        table.set_cell(row, score_col, Cell::Text(summary.scores()));
        table.set_cell(row, detail_col, Cell::Text(summary.details()));
    }

    table
}
