use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub assistant: AssistantSettings,
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
fn default_port() -> u16 { 8000 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSettings {
    /// JSON or TOML catalog file; the built-in catalog is used when unset
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_identity_field")]
    pub identity_field: String,
    #[serde(default = "default_identity_documents")]
    pub identity_documents: Vec<String>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            identity_field: default_identity_field(),
            identity_documents: default_identity_documents(),
        }
    }
}

fn default_max_results() -> usize { 3 }
fn default_identity_field() -> String { "has_aadhaar".to_string() }
fn default_identity_documents() -> Vec<String> { vec!["Aadhaar Card".to_string()] }

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_audio_dir")]
    pub audio_dir: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            audio_dir: default_audio_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_upload_dir() -> String { "temp_uploads".to_string() }
fn default_audio_dir() -> String { "temp_audio".to_string() }
fn default_max_upload_bytes() -> usize { 10 * 1024 * 1024 }

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantProvider {
    #[default]
    Keyword,
    Gemini,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantSettings {
    #[serde(default)]
    pub provider: AssistantProvider,
    pub gemini_api_key: Option<String>,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_gemini_endpoint")]
    pub gemini_endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            provider: AssistantProvider::default(),
            gemini_api_key: None,
            gemini_model: default_gemini_model(),
            gemini_endpoint: default_gemini_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_gemini_model() -> String { "gemini-pro".to_string() }
fn default_gemini_endpoint() -> String { "https://generativelanguage.googleapis.com/v1beta".to_string() }
fn default_timeout_secs() -> u64 { 30 }

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

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MAITRI__)
    /// 5. GEMINI_API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MAITRI__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        apply_api_key_override(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        apply_api_key_override(settings)?.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("MAITRI")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Take the Gemini key from the conventional GEMINI_API_KEY variable
fn apply_api_key_override(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(api_key) = std::env::var("GEMINI_API_KEY") {
        if !api_key.trim().is_empty() {
            builder = builder.set_override("assistant.gemini_api_key", api_key)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_matching() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.max_results, 3);
        assert_eq!(matching.identity_field, "has_aadhaar");
        assert_eq!(matching.identity_documents, vec!["Aadhaar Card"]);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_load_from_partial_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9100

[matching]
identity_documents = ["Aadhaar Card", "Voter ID"]

[assistant]
provider = "gemini"
"#
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();

        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.matching.max_results, 3);
        assert_eq!(settings.matching.identity_documents.len(), 2);
        assert_eq!(settings.assistant.provider, AssistantProvider::Gemini);
        assert_eq!(settings.storage.audio_dir, "temp_audio");
    }
}
