//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 指定された列がテーブルに存在しない
    #[error("{table}テーブルに列 '{column}' がありません")]
    MissingColumn { table: String, column: String },

    /// 数値列に数値以外の値が含まれている
    #[error("{column} の {row} 行目が数値ではありません: '{value}'")]
    NonNumericValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("パラメータエラー: {0}")]
    InvalidParameter(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_display_missing_column() {
        let error = Error::MissingColumn {
            table: "tag".to_string(),
            column: "名稱".to_string(),
        };
        assert_eq!(format!("{}", error), "tagテーブルに列 '名稱' がありません");
    }

    #[test]
    fn test_error_display_non_numeric() {
        let error = Error::NonNumericValue {
            row: 3,
            column: "value".to_string(),
            value: "abc".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("value"));
        assert!(display.contains("3"));
        assert!(display.contains("abc"));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }
}
