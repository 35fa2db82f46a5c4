use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use table_matcher::{cli, config, error, export, field_selector, loader};
use table_matcher_common::match_tables_with_progress;
use cli::{Cli, Commands};
use config::Config;
use error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::init_from_env(env_logger::Env::default().default_filter_or(default_level));

    let config = Config::load()?;

    match cli.command {
        Commands::Match {
            main,
            tags,
            fields,
            mapping,
            threshold,
            max_matches,
            min_similarity,
            output,
            format,
            main_sheet,
            tag_sheet,
            no_interactive,
        } => {
            println!("🔗 table-matcher - 表照合\n");

            let params = config.match_params(threshold, max_matches, min_similarity)?;
            let format = match format {
                Some(f) => f,
                None => config.output_format()?,
            };

            // 1. 読み込み
            println!("[1/3] 表を読み込み中...");
            let main_table = loader::load_table(&main, main_sheet.as_deref())?;
            println!("✔ 主表: {}行 × {}列", main_table.len(), main_table.width());
            let tag_table = loader::load_table(&tags, tag_sheet.as_deref())?;
            println!("✔ 標籤表: {}行 × {}列\n", tag_table.len(), tag_table.width());

            let field_args = field_selector::merge_field_args(&fields, mapping.as_deref())?;
            let mapping = field_selector::resolve_mapping(
                field_args,
                &main_table,
                &tag_table,
                !no_interactive,
            )?;

            // 2. 照合
            println!(
                "[2/3] 照合中... (閾値 {:.2} / 最低類似度 {:.2} / 最大 {}件)",
                params.similarity_threshold, params.min_similarity, params.max_matches
            );
            let bar = ProgressBar::new(main_table.len() as u64);
            bar.set_style(
                ProgressStyle::with_template("{bar:40} {pos}/{len} ({eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            let outcome = match_tables_with_progress(
                &main_table,
                &tag_table,
                &mapping,
                &params,
                |done, _| bar.set_position(done as u64),
            )?;
            bar.finish_and_clear();
            println!(
                "✔ 一致: {}/{}行, 使用タグ: {}件, 未一致タグ: {}件\n",
                outcome.matched_main_rows(),
                main_table.len(),
                outcome.consumed.len(),
                outcome.unmatched.len()
            );

            // 3. 出力
            println!("[3/3] 結果を保存中...");
            let output_dir = output.unwrap_or_else(|| {
                main.parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_else(|| PathBuf::from("."))
            });
            export::export_results(
                &outcome.main,
                &outcome.unmatched,
                format,
                &output_dir,
                export::DEFAULT_TITLE,
            )?;

            println!("\n✅ 照合完了");
        }

        Commands::Columns { file, sheet } => {
            let table = loader::load_table(&file, sheet.as_deref())?;
            println!("{} ({}行)", file.display(), table.len());
            for (i, name) in table.columns().iter().enumerate() {
                println!("  {:>3}) {}", i + 1, name);
            }
        }

        Commands::Config {
            set_threshold,
            set_max_matches,
            set_min_similarity,
            set_format,
            reset,
            show,
        } => {
            let mut config = if reset { Config::default() } else { config };
            let changed = reset
                || set_threshold.is_some()
                || set_max_matches.is_some()
                || set_min_similarity.is_some()
                || set_format.is_some();

            if let Some(value) = set_threshold {
                config.similarity_threshold = value;
            }
            if let Some(value) = set_max_matches {
                config.max_matches = value;
            }
            if let Some(value) = set_min_similarity {
                config.min_similarity = value;
            }
            if let Some(value) = set_format {
                config.default_format = value.to_string();
            }

            if changed {
                config.match_params(None, None, None)?;
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  類似度閾値: {}", config.similarity_threshold);
                println!("  最大一致件数: {}", config.max_matches);
                println!("  最低類似度: {}", config.min_similarity);
                println!("  出力形式: {}", config.default_format);
            }
        }
    }

    Ok(())
}
