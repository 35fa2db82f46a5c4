//! Table Matcher Common Library
//!
//! 主表とタグ表のあいまい照合エンジン（ファイル入出力を含まない純粋な処理）

pub mod error;
pub mod table;
pub mod types;
pub mod normalize;
pub mod similarity;
pub mod candidate;
pub mod matcher;
pub mod aggregate;

pub use error::{Error, Result};
pub use table::{Cell, Table};
pub use types::{FieldMapping, MatchParams};
pub use normalize::{normalize_cell, normalize_text};
pub use similarity::{sequence_ratio, similarity};
pub use aggregate::{
    match_tables, match_tables_with_progress, MatchOutcome, MatchSummary, MatchedTag,
    DETAIL_COLUMN, MATCHED_TAGS_COLUMN, SIMILARITY_COLUMN, TOTAL_VALUE_COLUMN,
};
