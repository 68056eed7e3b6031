use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Custom-search provider settings. Search is unavailable until both the key
/// and the engine id are set.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
    pub api_key: Option<String>,
    pub engine_id: Option<String>,
    #[serde(default = "default_results_per_query")]
    pub results_per_query: u8,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            api_key: None,
            engine_id: None,
            results_per_query: default_results_per_query(),
            country: default_country(),
            language: default_language(),
            timeout_secs: default_search_timeout(),
        }
    }
}

impl SearchSettings {
    /// Key and engine id, when both are present and non-blank
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let key = self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        let cx = self.engine_id.as_deref().map(str::trim).filter(|c| !c.is_empty())?;
        Some((key, cx))
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }
}

fn default_search_endpoint() -> String { "https://www.googleapis.com/customsearch/v1".to_string() }
fn default_results_per_query() -> u8 { 10 }
fn default_country() -> String { "us".to_string() }
fn default_language() -> String { "en".to_string() }
fn default_search_timeout() -> u64 { 10 }

/// OpenAI-compatible chat-completions settings
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_results_in_prompt")]
    pub max_results_in_prompt: usize,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_llm_timeout(),
            max_results_in_prompt: default_max_results_in_prompt(),
        }
    }
}

impl LlmSettings {
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }
}

fn default_llm_base_url() -> String { "https://api.openai.com/v1".to_string() }
fn default_model() -> String { "gpt-4o-mini".to_string() }
fn default_max_tokens() -> u32 { 1500 }
fn default_temperature() -> f32 { 0.2 }
fn default_llm_timeout() -> u64 { 30 }
fn default_max_results_in_prompt() -> usize { 40 }

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default = "default_max_reviews")]
    pub max_reviews: usize,
    #[serde(default = "default_parallel_queries")]
    pub parallel_queries: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            max_reviews: default_max_reviews(),
            parallel_queries: default_parallel_queries(),
        }
    }
}

fn default_max_reviews() -> usize { 20 }
fn default_parallel_queries() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

const ENV_PREFIX: &str = "BRANDFIT";

/// Unprefixed variables that override credential fields
const CREDENTIAL_VARS: &[(&str, &str)] = &[
    ("GOOGLE_API_KEY", "search.api_key"),
    ("GOOGLE_SEARCH_ENGINE_ID", "search.engine_id"),
    ("OPENAI_API_KEY", "llm.api_key"),
    ("OPENAI_BASE_URL", "llm.base_url"),
];

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration files (config/default.toml, config/local.toml)
    /// 3. Environment variables (prefixed with BRANDFIT__)
    /// 4. Well-known provider credential variables
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // e.g., BRANDFIT__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        apply_credential_vars(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        apply_credential_vars(settings)?.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Overlay the provider credential variables onto the loaded config
fn apply_credential_vars(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);
    for (var, key) in CREDENTIAL_VARS {
        if let Some(value) = std::env::var(var).ok().filter(|v| !v.trim().is_empty()) {
            builder = builder.set_override(*key, value)?;
        }
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.analysis.max_reviews, 20);
        assert!(settings.analysis.parallel_queries);
        assert_eq!(settings.llm.max_results_in_prompt, 40);
        assert!(!settings.search.is_configured());
        assert!(!settings.llm.is_configured());
    }

    #[test]
    fn test_default_logging() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "json");
    }

    #[test]
    fn test_blank_credentials_are_not_configured() {
        let search = SearchSettings {
            api_key: Some("key".to_string()),
            engine_id: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(!search.is_configured());

        let search = SearchSettings {
            engine_id: Some("cx".to_string()),
            ..search
        };
        assert_eq!(search.credentials(), Some(("key", "cx")));
    }

    #[test]
    fn test_load_from_partial_file() {
        let path = std::env::temp_dir().join(format!("brand-fit-{}.toml", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[server]\nport = 9090\n\n[analysis]\nmax_reviews = 5").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.analysis.max_reviews, 5);
        assert!(settings.analysis.parallel_queries);
    }
}
