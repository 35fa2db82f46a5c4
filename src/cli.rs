use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "table-matcher")]
#[command(about = "主表と標籤表のあいまい照合ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 主表と標籤表を照合して結果を出力
    Match {
        /// 主表ファイル (.xlsx/.xls/.csv)
        #[arg(required = true)]
        main: PathBuf,

        /// 標籤表ファイル (.xlsx/.xls/.csv)
        #[arg(required = true)]
        tags: PathBuf,

        #[command(flatten)]
        fields: FieldArgs,

        /// 列の対応を記述したJSONファイル
        #[arg(long)]
        mapping: Option<PathBuf>,

        /// 列の組み合わせごとの類似度閾値（0.0-1.0、デフォルト0.8）
        #[arg(short, long)]
        threshold: Option<f64>,

        /// 主表1行あたりの最大一致件数（デフォルト5）
        #[arg(short, long)]
        max_matches: Option<usize>,

        /// 候補として残す最低類似度（0.0-1.0、デフォルト0.3）
        #[arg(long)]
        min_similarity: Option<f64>,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (xlsx/csv)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// 主表のシート名（Excelのみ、省略時は先頭シート）
        #[arg(long)]
        main_sheet: Option<String>,

        /// 標籤表のシート名（Excelのみ、省略時は先頭シート）
        #[arg(long)]
        tag_sheet: Option<String>,

        /// 未指定の列を対話的に選択しない
        #[arg(long)]
        no_interactive: bool,
    },

    /// 表の列名と行数を表示
    Columns {
        /// 対象ファイル
        #[arg(required = true)]
        file: PathBuf,

        /// シート名（Excelのみ）
        #[arg(long)]
        sheet: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// 類似度閾値のデフォルトを設定
        #[arg(long)]
        set_threshold: Option<f64>,

        /// 最大一致件数のデフォルトを設定
        #[arg(long)]
        set_max_matches: Option<usize>,

        /// 最低類似度のデフォルトを設定
        #[arg(long)]
        set_min_similarity: Option<f64>,

        /// 出力形式のデフォルトを設定 (xlsx/csv)
        #[arg(long)]
        set_format: Option<OutputFormat>,

        /// 設定を初期値に戻す
        #[arg(long)]
        reset: bool,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 照合列の指定
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FieldArgs {
    /// 主表の照合列1
    #[arg(long)]
    pub main_field1: Option<String>,

    /// 主表の照合列2
    #[arg(long)]
    pub main_field2: Option<String>,

    /// 標籤表の照合列1
    #[arg(long)]
    pub tag_field1: Option<String>,

    /// 標籤表の照合列2
    #[arg(long)]
    pub tag_field2: Option<String>,

    /// 標籤名の列
    #[arg(long)]
    pub tag_name_field: Option<String>,

    /// 合計する数値の列
    #[arg(long)]
    pub tag_value_field: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use xlsx or csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("xlsx".parse::<OutputFormat>().unwrap(), OutputFormat::Xlsx);
        assert_eq!("Excel".parse::<OutputFormat>().unwrap(), OutputFormat::Xlsx);
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("pdf".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_parse_match_command() {
        let cli = Cli::parse_from([
            "table-matcher",
            "match",
            "main.xlsx",
            "tags.csv",
            "--main-field1",
            "公司名稱",
            "--tag-value-field",
            "數值",
            "-t",
            "0.9",
            "-f",
            "csv",
        ]);

        match cli.command {
            Commands::Match { main, tags, fields, threshold, format, .. } => {
                assert_eq!(main, PathBuf::from("main.xlsx"));
                assert_eq!(tags, PathBuf::from("tags.csv"));
                assert_eq!(fields.main_field1.as_deref(), Some("公司名稱"));
                assert_eq!(fields.tag_value_field.as_deref(), Some("數值"));
                assert!(fields.tag_field1.is_none());
                assert_eq!(threshold, Some(0.9));
                assert_eq!(format, Some(OutputFormat::Csv));
            }
            _ => panic!("match コマンドとして解析されていない"),
        }
    }
}
