//! 照合パラメータの型定義
//!
//! - FieldMapping: 照合に使う列名の対応
//! - MatchParams: 閾値・上限件数

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 照合に使う列名
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// 主表の照合列1
    pub main_field1: String,
    /// 主表の照合列2
    pub main_field2: String,
    /// タグ表の照合列1
    pub tag_field1: String,
    /// タグ表の照合列2
    pub tag_field2: String,
    /// タグ名の列
    pub tag_name_field: String,
    /// 集計する数値の列
    pub tag_value_field: String,
}

impl FieldMapping {
    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let mapping: Self = serde_json::from_str(json)?;
        Ok(mapping)
    }
}

/// 照合パラメータ
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchParams {
    /// フィールド組み合わせごとの合格閾値
    pub similarity_threshold: f64,
    /// 主表1行あたりの最大一致件数
    pub max_matches: usize,
    /// 候補として残す最低類似度
    pub min_similarity: f64,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.8,
            max_matches: 5,
            min_similarity: 0.3,
        }
    }
}

impl MatchParams {
    /// 閾値が0.0〜1.0の範囲か検証
    pub fn validate(&self) -> Result<()> {
        check_unit_range("similarity_threshold", self.similarity_threshold)?;
        check_unit_range("min_similarity", self.min_similarity)?;
        Ok(())
    }
}

fn check_unit_range(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "{} は0.0〜1.0で指定してください: {}",
            name, value
        )))
    }
}
