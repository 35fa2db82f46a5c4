//! 照合列の決定
//!
//! 優先順位: コマンドライン引数 > マッピングJSON > 対話式選択

use crate::cli::FieldArgs;
use crate::error::{Result, TableMatcherError};
use dialoguer::Select;
use std::path::Path;
use table_matcher_common::{FieldMapping, Table};

/// 引数とマッピングファイルを合成する（未指定の列は `None` のまま）
pub fn merge_field_args(args: &FieldArgs, mapping_file: Option<&Path>) -> Result<FieldArgs> {
    let Some(path) = mapping_file else {
        return Ok(args.clone());
    };

    if !path.exists() {
        return Err(TableMatcherError::FileNotFound(path.display().to_string()));
    }
    let file = FieldMapping::from_file(path)?;

    Ok(FieldArgs {
        main_field1: args.main_field1.clone().or(Some(file.main_field1)),
        main_field2: args.main_field2.clone().or(Some(file.main_field2)),
        tag_field1: args.tag_field1.clone().or(Some(file.tag_field1)),
        tag_field2: args.tag_field2.clone().or(Some(file.tag_field2)),
        tag_name_field: args.tag_name_field.clone().or(Some(file.tag_name_field)),
        tag_value_field: args.tag_value_field.clone().or(Some(file.tag_value_field)),
    })
}

/// 未指定の列を対話式で補い、`FieldMapping` を確定する
///
/// `interactive` が偽の場合、未指定の列があればエラー。
pub fn resolve_mapping(
    args: FieldArgs,
    main: &Table,
    tags: &Table,
    interactive: bool,
) -> Result<FieldMapping> {
    let pick = |value: Option<String>, flag: &str, prompt: &str, table: &Table| -> Result<String> {
        match value {
            Some(v) => Ok(v),
            None if interactive => select_column(prompt, table),
            None => Err(TableMatcherError::MissingField(format!("--{}", flag))),
        }
    };

    Ok(FieldMapping {
        main_field1: pick(args.main_field1, "main-field1", "主表の照合列1", main)?,
        main_field2: pick(args.main_field2, "main-field2", "主表の照合列2", main)?,
        tag_field1: pick(args.tag_field1, "tag-field1", "標籤表の照合列1", tags)?,
        tag_field2: pick(args.tag_field2, "tag-field2", "標籤表の照合列2", tags)?,
        tag_name_field: pick(args.tag_name_field, "tag-name-field", "標籤名の列", tags)?,
        tag_value_field: pick(args.tag_value_field, "tag-value-field", "合計する数値の列", tags)?,
    })
}

/// 列一覧から1つ選ばせる
fn select_column(prompt: &str, table: &Table) -> Result<String> {
    if table.columns().is_empty() {
        return Err(TableMatcherError::MissingField(format!(
            "{}（選択できる列がありません）",
            prompt
        )));
    }

    let index = Select::new()
        .with_prompt(prompt)
        .items(table.columns())
        .default(0)
        .interact()
        .map_err(|e| TableMatcherError::Prompt(e.to_string()))?;

    println!("  → {}", table.columns()[index]);
    Ok(table.columns()[index].clone())
}
