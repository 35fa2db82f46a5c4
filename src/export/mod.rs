pub mod excel;
pub mod delimited;

use crate::cli::OutputFormat;
use crate::error::Result;
use std::path::{Path, PathBuf};
use table_matcher_common::Table;

/// 照合結果シート名
pub const MATCHED_SHEET: &str = "匹配結果";
/// 未一致タグシート名
pub const UNMATCHED_SHEET: &str = "未匹配標籤";
/// デフォルトの出力名
pub const DEFAULT_TITLE: &str = "匹配結果";

fn output_path_for_format(output: &Path, title: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", title, extension))
    } else {
        output.to_path_buf()
    }
}

fn output_paths_for_csv(output: &Path, title: &str) -> (PathBuf, PathBuf) {
    let (parent, stem) = if output.is_dir() || output.extension().is_none() {
        (output.to_path_buf(), title.to_string())
    } else {
        let parent = output.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(title)
            .to_string();
        (parent, stem)
    };

    (
        parent.join(format!("{}_matched.csv", stem)),
        parent.join(format!("{}_unmatched.csv", stem)),
    )
}

/// 照合結果を書き出し、作成したファイルのパスを返す
pub fn export_results(
    main: &Table,
    unmatched: &Table,
    format: OutputFormat,
    output: &Path,
    title: &str,
) -> Result<Vec<PathBuf>> {
    if output.extension().is_none() && !output.exists() {
        std::fs::create_dir_all(output)?;
    }

    match format {
        OutputFormat::Xlsx => {
            let output_path = output_path_for_format(output, title, format.extension());
            println!("- Excelを生成中...");
            excel::write_workbook(
                &[(MATCHED_SHEET, main), (UNMATCHED_SHEET, unmatched)],
                &output_path,
            )?;
            println!("✔ Excel出力: {}", output_path.display());
            Ok(vec![output_path])
        }
        OutputFormat::Csv => {
            let (matched_path, unmatched_path) = output_paths_for_csv(output, title);

            println!("- CSVを生成中...");
            delimited::write_csv(main, &matched_path)?;
            println!("✔ CSV出力: {}", matched_path.display());
            delimited::write_csv(unmatched, &unmatched_path)?;
            println!("✔ CSV出力: {}", unmatched_path.display());
            Ok(vec![matched_path, unmatched_path])
        }
    }
}
