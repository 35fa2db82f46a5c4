use crate::cli::OutputFormat;
use crate::error::{Result, TableMatcherError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use table_matcher_common::MatchParams;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub similarity_threshold: f64,
    pub max_matches: usize,
    pub min_similarity: f64,
    /// 出力形式 (xlsx/csv)
    pub default_format: String,
}

impl Default for Config {
    fn default() -> Self {
        let params = MatchParams::default();
        Self {
            similarity_threshold: params.similarity_threshold,
            max_matches: params.max_matches,
            min_similarity: params.min_similarity,
            default_format: "xlsx".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TableMatcherError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("table-matcher").join("config.json"))
    }

    /// 照合パラメータ（コマンドライン指定で上書き）
    pub fn match_params(
        &self,
        threshold: Option<f64>,
        max_matches: Option<usize>,
        min_similarity: Option<f64>,
    ) -> Result<MatchParams> {
        let params = MatchParams {
            similarity_threshold: threshold.unwrap_or(self.similarity_threshold),
            max_matches: max_matches.unwrap_or(self.max_matches),
            min_similarity: min_similarity.unwrap_or(self.min_similarity),
        };
        params.validate()?;
        Ok(params)
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        self.default_format
            .parse()
            .map_err(TableMatcherError::Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_core_defaults() {
        let config = Config::default();
        let params = config.match_params(None, None, None).unwrap();
        assert_eq!(params, MatchParams::default());
        assert!(matches!(config.output_format().unwrap(), OutputFormat::Xlsx));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = Config {
            similarity_threshold: 0.9,
            ..Default::default()
        };
        let params = config.match_params(Some(0.7), Some(2), None).unwrap();
        assert_eq!(params.similarity_threshold, 0.7);
        assert_eq!(params.max_matches, 2);
        assert_eq!(params.min_similarity, 0.3);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let config = Config::default();
        assert!(config.match_params(Some(1.5), None, None).is_err());
    }

    #[test]
    fn test_partial_config_json() {
        let config: Config = serde_json::from_str(r#"{"max_matches": 3}"#).unwrap();
        assert_eq!(config.max_matches, 3);
        assert_eq!(config.default_format, "xlsx");
    }

    #[test]
    fn test_unknown_format_is_config_error() {
        let config = Config {
            default_format: "pdf".into(),
            ..Default::default()
        };
        assert!(matches!(config.output_format(), Err(TableMatcherError::Config(_))));
    }
}
