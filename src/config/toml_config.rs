use crate::domain::model::{RecordKind, SourceKind};
use crate::utils::error::{EtlError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BATCH_SIZE: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    pub backend: BackendConfig,
    #[serde(default)]
    pub tables: TableNames,
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_key: String,
    pub batch_size: Option<usize>,
    pub connect_timeout_seconds: Option<u64>,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableNames {
    pub financial: String,
    pub therapy: String,
    pub inspiration: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            financial: "financial_resources".to_string(),
            therapy: "therapy_services".to_string(),
            inspiration: "inspiration_profiles".to_string(),
        }
    }
}

impl TableNames {
    pub fn for_kind(&self, kind: RecordKind) -> &str {
        match kind {
            RecordKind::Financial => &self.financial,
            RecordKind::Therapy => &self.therapy,
            RecordKind::Inspiration => &self.inspiration,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Csv,
    Json,
    Sheet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub r#type: SourceType,
    /// URL (csv only) or local path
    pub location: String,
    pub kind: SourceKind,
    pub sheet: Option<String>,
    pub positional: Option<bool>,
    pub enabled: Option<bool>,
}

impl SourceConfig {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn is_remote(&self) -> bool {
        let location = self.location.to_ascii_lowercase();
        location.starts_with("http://") || location.starts_with("https://")
    }

    pub fn is_positional(&self) -> bool {
        self.positional.unwrap_or(false)
    }

    fn validate(&self, index: usize) -> Result<()> {
        let field = |name: &str| format!("sources[{}].{}", index, name);

        validation::validate_non_empty_string(&field("name"), &self.name)?;

        if self.is_remote() {
            if self.r#type != SourceType::Csv {
                return Err(EtlError::InvalidConfigValueError {
                    field: field("location"),
                    value: self.location.clone(),
                    reason: "Only csv sources can be fetched over HTTP".to_string(),
                });
            }
            validation::validate_url(&field("location"), &self.location)?;
        } else {
            validation::validate_path(&field("location"), &self.location)?;
            match self.r#type {
                SourceType::Csv => {
                    validation::validate_file_extension(&field("location"), &self.location, &["csv", "txt"])?
                }
                SourceType::Json => {
                    validation::validate_file_extension(&field("location"), &self.location, &["json"])?
                }
                SourceType::Sheet => validation::validate_file_extension(
                    &field("location"),
                    &self.location,
                    &["xlsx", "xlsm", "xls", "ods"],
                )?,
            }
        }

        if self.is_positional() {
            if self.r#type != SourceType::Sheet {
                return Err(EtlError::InvalidConfigValueError {
                    field: field("positional"),
                    value: "true".to_string(),
                    reason: "Positional layout only applies to sheet sources".to_string(),
                });
            }
            if self.kind.fixed_kind().is_none() {
                return Err(EtlError::InvalidConfigValueError {
                    field: field("kind"),
                    value: format!("{:?}", self.kind).to_lowercase(),
                    reason: "Positional sheets need kind = financial, therapy or inspiration"
                        .to_string(),
                });
            }
        }

        Ok(())
    }
}

impl ImportConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SUPABASE_KEY})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn batch_size(&self) -> usize {
        self.backend.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .and_then(LogFormat::parse)
            .unwrap_or_default()
    }

    pub fn enabled_sources(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.iter().filter(|s| s.is_enabled())
    }
}

impl Validate for ImportConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("backend.base_url", &self.backend.base_url)?;

        if self.backend.api_key.trim().is_empty() || self.backend.api_key.starts_with("${") {
            return Err(EtlError::MissingConfigError {
                field: "backend.api_key".to_string(),
            });
        }

        validation::validate_positive_number("backend.batch_size", self.batch_size(), 1)?;

        for (name, table) in [
            ("tables.financial", &self.tables.financial),
            ("tables.therapy", &self.tables.therapy),
            ("tables.inspiration", &self.tables.inspiration),
        ] {
            validation::validate_non_empty_string(name, table)?;
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            if LogFormat::parse(format).is_none() {
                return Err(EtlError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: "Valid formats: compact, json".to_string(),
                });
            }
        }

        if self.sources.is_empty() {
            return Err(EtlError::MissingConfigError {
                field: "sources".to_string(),
            });
        }

        for (index, source) in self.sources.iter().enumerate() {
            source.validate(index)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[backend]
base_url = "https://example.supabase.co"
api_key = "anon-key"

[[sources]]
name = "resources"
type = "csv"
location = "https://docs.example.com/pub?output=csv"
kind = "resources"

[[sources]]
name = "inspiration"
type = "json"
location = "data/inspiration.json"
kind = "inspiration"
enabled = false
"#;

    #[test]
    fn test_parse_basic_config() {
        let config = ImportConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.backend.base_url, "https://example.supabase.co");
        assert_eq!(config.batch_size(), 50);
        assert_eq!(config.tables, TableNames::default());
        assert_eq!(config.log_format(), LogFormat::Compact);
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].kind, SourceKind::Resources);
        assert!(config.sources[0].is_remote());
        assert_eq!(config.enabled_sources().count(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RESOURCE_ETL_TEST_KEY", "service-role-key");

        let content = BASIC.replace("anon-key", "${RESOURCE_ETL_TEST_KEY}");
        let config = ImportConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.backend.api_key, "service-role-key");

        std::env::remove_var("RESOURCE_ETL_TEST_KEY");
    }

    #[test]
    fn test_unresolved_api_key_is_rejected() {
        let content = BASIC.replace("anon-key", "${RESOURCE_ETL_UNSET_VARIABLE}");
        let config = ImportConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.backend.api_key, "${RESOURCE_ETL_UNSET_VARIABLE}");

        let err = config.validate().unwrap_err();
        assert!(matches!(err, EtlError::MissingConfigError { ref field } if field == "backend.api_key"));
    }

    #[test]
    fn test_config_validation_failures() {
        let mut config = ImportConfig::from_toml_str(BASIC).unwrap();
        config.backend.batch_size = Some(0);
        assert!(config.validate().is_err());

        let mut config = ImportConfig::from_toml_str(BASIC).unwrap();
        config.backend.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = ImportConfig::from_toml_str(BASIC).unwrap();
        config.sources[1].r#type = SourceType::Sheet;
        assert!(config.validate().is_err());

        let mut config = ImportConfig::from_toml_str(BASIC).unwrap();
        config.sources[0].positional = Some(true);
        assert!(config.validate().is_err());

        let mut config = ImportConfig::from_toml_str(BASIC).unwrap();
        config.sources.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_positional_sheet_needs_fixed_kind() {
        let content = r#"
[backend]
base_url = "https://example.supabase.co"
api_key = "anon-key"
batch_size = 25

[tables]
therapy = "therapy_services_staging"

[logging]
format = "json"

[[sources]]
name = "legacy-therapy"
type = "sheet"
location = "ds_therapy_services_verified.xlsx"
kind = "auto"
positional = true
"#;
        let mut config = ImportConfig::from_toml_str(content).unwrap();
        assert_eq!(config.batch_size(), 25);
        assert_eq!(config.tables.therapy, "therapy_services_staging");
        assert_eq!(config.tables.financial, "financial_resources");
        assert_eq!(config.log_format(), LogFormat::Json);
        assert!(config.validate().is_err());

        config.sources[0].kind = SourceKind::Therapy;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = ImportConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.sources[0].name, "resources");
    }

    #[test]
    fn test_remote_scheme_is_case_insensitive() {
        let content = BASIC.replace("https://docs.example.com", "HTTPS://docs.example.com");
        let config = ImportConfig::from_toml_str(&content).unwrap();

        assert!(config.sources[0].is_remote());
        assert!(!config.sources[1].is_remote());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_errors_are_classified() {
        let err = ImportConfig::from_toml_str("[backend\nbase_url =").unwrap_err();
        assert!(err.is_config_error());

        let err = ImportConfig::from_file("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, EtlError::IoError(_)));
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_unknown_source_kind_fails_to_parse() {
        let content = BASIC.replace("kind = \"resources\"", "kind = \"events\"");
        assert!(ImportConfig::from_toml_str(&content).is_err());
    }
}
