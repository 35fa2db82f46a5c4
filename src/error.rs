use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableMatcherError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("未対応のファイル形式です: {0}（.xlsx/.xls/.csv を指定してください）")]
    UnsupportedFormat(String),

    #[error("表の読み込みに失敗: {0}")]
    TableLoad(String),

    #[error("シートが見つかりません: {0}")]
    SheetNotFound(String),

    #[error("照合列が指定されていません: {0}")]
    MissingField(String),

    #[error("照合エラー: {0}")]
    Match(#[from] table_matcher_common::Error),

    #[error("Excel読み込みエラー: {0}")]
    ExcelRead(#[from] calamine::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSVエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, TableMatcherError>;
