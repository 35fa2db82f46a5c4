//! 候補評価
//!
//! 主表1行とタグ表1行について、4通りの列の組み合わせを評価し、
//! 閾値を超えた中で最も類似度の高い組み合わせを選ぶ。

use crate::normalize::normalize_cell;
use crate::similarity::sequence_ratio;
use crate::table::Table;

/// 主表側の照合列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainSide {
    Field1,
    Field2,
}

/// タグ表側の照合列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSide {
    Field1,
    Field2,
}

/// 列の組み合わせ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPair {
    pub main: MainSide,
    pub tag: TagSide,
}

/// 評価順（同点の場合は先頭が優先）
pub const FIELD_PAIRS: [FieldPair; 4] = [
    FieldPair { main: MainSide::Field1, tag: TagSide::Field1 },
    FieldPair { main: MainSide::Field1, tag: TagSide::Field2 },
    FieldPair { main: MainSide::Field2, tag: TagSide::Field1 },
    FieldPair { main: MainSide::Field2, tag: TagSide::Field2 },
];

/// 照合列の位置と名前（スキーマ検証済み）
#[derive(Debug, Clone)]
pub struct MatchColumns {
    pub main: [usize; 2],
    pub tag: [usize; 2],
    pub main_names: [String; 2],
    pub tag_names: [String; 2],
}

impl MatchColumns {
    /// 組み合わせの表示ラベル（例: `公司名稱↔名稱`）
    pub fn label(&self, pair: FieldPair) -> String {
        format!(
            "{}↔{}",
            self.main_names[main_slot(pair.main)],
            self.tag_names[tag_slot(pair.tag)]
        )
    }
}

fn main_slot(side: MainSide) -> usize {
    match side {
        MainSide::Field1 => 0,
        MainSide::Field2 => 1,
    }
}

fn tag_slot(side: TagSide) -> usize {
    match side {
        TagSide::Field1 => 0,
        TagSide::Field2 => 1,
    }
}

/// 主表1行分の正規化済み照合値
#[derive(Debug, Clone)]
pub struct MainKeys {
    values: [String; 2],
}

impl MainKeys {
    pub fn from_row(table: &Table, row: usize, columns: &MatchColumns) -> Self {
        Self {
            values: normalized_pair(table, row, columns.main),
        }
    }

    /// 両方の照合値が空か
    pub fn is_blank(&self) -> bool {
        self.values.iter().all(|v| v.is_empty())
    }
}

/// タグ表1行分の正規化済み照合値
#[derive(Debug, Clone)]
pub struct TagKeys {
    values: [String; 2],
}

impl TagKeys {
    pub fn from_row(table: &Table, row: usize, columns: &MatchColumns) -> Self {
        Self {
            values: normalized_pair(table, row, columns.tag),
        }
    }

    /// タグ表の全行を正規化する（照合1回につき1度だけ）
    pub fn from_table(table: &Table, columns: &MatchColumns) -> Vec<Self> {
        (0..table.len())
            .map(|row| Self::from_row(table, row, columns))
            .collect()
    }
}

fn normalized_pair(table: &Table, row: usize, cols: [usize; 2]) -> [String; 2] {
    [
        normalize_cell(table.cell(row, cols[0])),
        normalize_cell(table.cell(row, cols[1])),
    ]
}

/// 1組の評価結果
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    /// タグ表の行番号
    pub tag_row: usize,
    pub score: f64,
    /// 一致した組み合わせの表示ラベル
    pub label: String,
}

/// 主表1行とタグ表1行を評価する
///
/// どの組み合わせも `similarity_threshold` に届かなければ `None`。
pub fn evaluate_pair(
    main_keys: &MainKeys,
    tag_keys: &TagKeys,
    tag_row: usize,
    columns: &MatchColumns,
    similarity_threshold: f64,
) -> Option<MatchCandidate> {
    let mut best: Option<(FieldPair, f64)> = None;

    for pair in FIELD_PAIRS {
        let main_value = &main_keys.values[main_slot(pair.main)];
        let tag_value = &tag_keys.values[tag_slot(pair.tag)];
        if main_value.is_empty() || tag_value.is_empty() {
            continue;
        }

        let score = sequence_ratio(main_value, tag_value);
        if score < similarity_threshold {
            continue;
        }

        // 厳密に上回った場合のみ更新（同点は先の組み合わせを維持）
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((pair, score));
        }
    }

    best.map(|(pair, score)| MatchCandidate {
        tag_row,
        score,
        label: columns.label(pair),
    })
}
