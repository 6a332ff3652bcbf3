use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub primary: ProviderConfig,
    /// Optional second backend tried when the primary attempt fails.
    #[serde(default)]
    pub secondary: Option<ProviderConfig>,
    #[serde(default)]
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: String,
    pub model: String,
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>, // For OpenAI-compatible APIs

    /// Optional: Override max_tokens for provider requests
    /// If not specified, uses provider-specific defaults:
    /// - gemini: 8192
    /// - openai: 4096
    /// - openai-compatible: 16384
    #[serde(default)]
    pub max_tokens: Option<u32>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Get max_tokens value, using provider-specific default if not specified
    pub fn get_max_tokens(&self) -> u32 {
        if let Some(tokens) = self.max_tokens {
            return tokens;
        }

        match self.provider.as_str() {
            "gemini" => 8192,
            "openai" => 4096,
            "openai-compatible" => 16384,
            _ => 4096,
        }
    }

    /// Resolve the API key from the environment variable named in config.
    ///
    /// `"none"` means no key is needed (local models). The
    /// `openai-compatible` provider tolerates a missing variable for the
    /// same reason; other providers return an error so a misconfigured
    /// credential is reported instead of silently ignored.
    pub fn resolve_api_key(&self) -> Result<String> {
        match &self.api_key_env {
            Some(env_var) => {
                if env_var.to_lowercase() == "none" {
                    return Ok(String::new());
                }
                if self.provider == "openai-compatible" {
                    return Ok(env::var(env_var).unwrap_or_default());
                }
                env::var(env_var).map_err(|_| {
                    anyhow::anyhow!("API key not found in environment variable: {}", env_var)
                })
            }
            None => Ok(String::new()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Maximum count of live provider invocations per request.
    #[serde(default = "default_call_budget")]
    pub call_budget: u32,

    #[serde(default = "default_max_slides")]
    pub max_slides: usize,

    /// Language hint (uk/en/...) for generated content.
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            call_budget: default_call_budget(),
            max_slides: default_max_slides(),
            language: default_language(),
        }
    }
}

fn default_call_budget() -> u32 {
    3
}

fn default_max_slides() -> usize {
    8
}

fn default_language() -> String {
    "uk".to_string()
}

fn default_timeout() -> u64 {
    60
}

impl Config {
    /// Load config from repo root or user config directory
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// Load configuration from a specific path, or use default search paths
    pub fn load_with_path(path: Option<String>) -> Result<Self> {
        if let Some(config_path) = path {
            debug!("Loading config from explicit path: {}", config_path);
            return Self::load_from_path(&config_path);
        }

        if let Ok(config) = Self::load_from_path("deckgen.toml") {
            debug!("Loaded config from ./deckgen.toml");
            return Ok(config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("deckgen").join("config.toml");
            if let Ok(config) = Self::load_from_path(&config_path) {
                debug!("Loaded config from {:?}", config_path);
                return Ok(config);
            }
        }

        debug!("Using default config");
        Ok(Self::default())
    }

    fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primary: ProviderConfig {
                provider: "gemini".to_string(),
                model: "gemini-1.5-pro".to_string(),
                api_key_env: Some("GOOGLE_API_KEY".to_string()),
                base_url: None,
                max_tokens: None,
                timeout_secs: default_timeout(),
            },
            secondary: None,
            generation: GenerationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.primary.provider, "gemini");
        assert_eq!(config.primary.api_key_env, Some("GOOGLE_API_KEY".to_string()));
        assert!(config.secondary.is_none());
        assert_eq!(config.generation.call_budget, 3);
        assert_eq!(config.generation.max_slides, 8);
        assert_eq!(config.generation.language, "uk");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("provider = \"gemini\""));
        assert!(toml_str.contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_config_with_secondary() {
        let toml_str = r#"
[primary]
provider = "gemini"
model = "gemini-1.5-pro"
api_key_env = "GOOGLE_API_KEY"

[secondary]
provider = "openai"
model = "gpt-4o-mini"
api_key_env = "OPENAI_API_KEY"

[generation]
call_budget = 5
language = "en"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let secondary = config.secondary.unwrap();
        assert_eq!(secondary.provider, "openai");
        assert_eq!(secondary.timeout_secs, 60);
        assert_eq!(config.generation.call_budget, 5);
        assert_eq!(config.generation.language, "en");
        // Unset generation field keeps its default.
        assert_eq!(config.generation.max_slides, 8);
    }

    #[test]
    fn test_max_tokens_provider_defaults() {
        let mut cfg = ProviderConfig {
            provider: "gemini".to_string(),
            model: "gemini-1.5-pro".to_string(),
            api_key_env: None,
            base_url: None,
            max_tokens: None,
            timeout_secs: 60,
        };
        assert_eq!(cfg.get_max_tokens(), 8192);

        cfg.provider = "openai".to_string();
        assert_eq!(cfg.get_max_tokens(), 4096);

        cfg.provider = "openai-compatible".to_string();
        assert_eq!(cfg.get_max_tokens(), 16384);

        // Explicit override wins
        cfg.max_tokens = Some(2000);
        assert_eq!(cfg.get_max_tokens(), 2000);
    }

    #[test]
    #[serial]
    fn test_api_key_from_env() {
        env::set_var("DECKGEN_TEST_API_KEY", "test_key_123");
        let mut cfg = Config::default().primary;
        cfg.api_key_env = Some("DECKGEN_TEST_API_KEY".to_string());

        assert_eq!(cfg.resolve_api_key().unwrap(), "test_key_123");

        env::remove_var("DECKGEN_TEST_API_KEY");
    }

    #[test]
    #[serial]
    fn test_api_key_missing_fails() {
        let mut cfg = Config::default().primary;
        cfg.api_key_env = Some("DECKGEN_NONEXISTENT_KEY_XYZ".to_string());
        assert!(cfg.resolve_api_key().is_err());
    }

    #[test]
    fn test_api_key_none_means_no_key() {
        let mut cfg = Config::default().primary;
        cfg.api_key_env = Some("none".to_string());
        assert_eq!(cfg.resolve_api_key().unwrap(), "");
    }

    #[test]
    #[serial]
    fn test_api_key_openai_compatible_missing_ok() {
        let mut cfg = Config::default().primary;
        cfg.provider = "openai-compatible".to_string();
        cfg.api_key_env = Some("DECKGEN_NONEXISTENT_KEY_OAI_999".to_string());
        assert_eq!(cfg.resolve_api_key().unwrap(), "");
    }

    #[test]
    fn test_load_with_explicit_path() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[primary]\nprovider = \"openai\"\nmodel = \"gpt-4o\"\napi_key_env = \"K\"\n"
        )
        .unwrap();
        let config =
            Config::load_with_path(Some(file.path().to_string_lossy().to_string())).unwrap();
        assert_eq!(config.primary.provider, "openai");
    }
}
