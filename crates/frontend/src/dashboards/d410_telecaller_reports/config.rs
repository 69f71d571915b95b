use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid reports config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid reports config: {0}")]
    Invalid(String),
}

/// Настройки экрана отчетов
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportsConfig {
    pub api: ApiConfig,
    pub timing: TimingConfig,
    pub paging: PagingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiConfig {
    /// Path prefix appended to the API base URL
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimingConfig {
    pub search_debounce_ms: u32,
    pub filter_debounce_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PagingConfig {
    pub page_size: u32,
    pub page_size_options: Vec<u32>,
    pub detail_page_size: u32,
    pub reference_page_size: u32,
    /// Page size used by exports to fetch the whole dataset
    pub export_limit: u32,
    /// Distance from the end of an option list (px) that triggers load-more
    pub load_more_threshold_px: u32,
}

/// Default configuration embedded in the bundle
const DEFAULT_CONFIG: &str = r#"
[api]
prefix = "/api"

[timing]
search_debounce_ms = 300
filter_debounce_ms = 500

[paging]
page_size = 10
page_size_options = [10, 25, 50, 100]
detail_page_size = 10
reference_page_size = 20
export_limit = 10000
load_more_threshold_px = 40
"#;

impl ReportsConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: ReportsConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let paging = &self.paging;
        if paging.page_size == 0 || paging.detail_page_size == 0 || paging.reference_page_size == 0
        {
            return Err(ConfigError::Invalid("page sizes must be positive".into()));
        }
        if paging.export_limit < paging.page_size {
            return Err(ConfigError::Invalid(
                "export_limit must not be smaller than page_size".into(),
            ));
        }
        if paging.page_size_options.iter().any(|size| *size == 0) {
            return Err(ConfigError::Invalid("page_size_options must be positive".into()));
        }
        Ok(())
    }
}

// Должно совпадать с DEFAULT_CONFIG
impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                prefix: "/api".to_string(),
            },
            timing: TimingConfig {
                search_debounce_ms: 300,
                filter_debounce_ms: 500,
            },
            paging: PagingConfig {
                page_size: 10,
                page_size_options: vec![10, 25, 50, 100],
                detail_page_size: 10,
                reference_page_size: 20,
                export_limit: 10000,
                load_more_threshold_px: 40,
            },
        }
    }
}

/// Load the reports configuration
///
/// An override may be provided as TOML text (e.g. injected by the host page);
/// otherwise the embedded default is used.
pub fn load_config(override_toml: Option<&str>) -> Result<ReportsConfig, ConfigError> {
    match override_toml {
        Some(contents) => {
            log::info!("Loading reports config from override");
            ReportsConfig::from_toml_str(contents)
        }
        None => {
            log::info!("Using default embedded reports configuration");
            ReportsConfig::from_toml_str(DEFAULT_CONFIG)
        }
    }
}
