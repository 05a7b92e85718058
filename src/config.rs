use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::host::DEFAULT_HOST;
use crate::license::aliases::Aliases;
use crate::license::tokenizer::DEFAULT_WINDOW;
use crate::registry::npm::DEFAULT_REGISTRY_URL;
use crate::resolver::{Strategy, DEFAULT_ORDER};

/// Root configuration structure, deserialized from `.license-resolver/config.toml`.
///
/// Every key is optional; missing ones take their built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Strategies tried for each package, in order.
    pub order: Vec<Strategy>,
    pub classifier: ClassifierConfig,
    pub registry: RegistryConfig,
    pub host: HostConfig,
    /// Extra alias → canonical name entries, consulted before the built-in table.
    pub aliases: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Tokenizer merge window used for training and queries.
    pub window: usize,
    /// Classifier results below this confidence are treated as absent.
    pub min_confidence: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Host name repository URLs must contain.
    pub name: String,
    pub api_url: String,
    pub raw_url: String,
    pub web_url: String,
    /// API token; `GITHUB_TOKEN` is used when unset.
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            order: DEFAULT_ORDER.to_vec(),
            classifier: ClassifierConfig::default(),
            registry: RegistryConfig::default(),
            host: HostConfig::default(),
            aliases: HashMap::new(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            window: DEFAULT_WINDOW,
            min_confidence: 0.0,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            url: DEFAULT_REGISTRY_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            name: DEFAULT_HOST.to_string(),
            api_url: "https://api.github.com".to_string(),
            raw_url: "https://raw.githubusercontent.com".to_string(),
            web_url: "https://github.com".to_string(),
            token: None,
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Built-in aliases extended with the configured ones.
    pub fn aliases(&self) -> Aliases {
        Aliases::with_extra(&self.aliases)
    }

    fn validate(self) -> Result<Self> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.classifier.min_confidence),
            "classifier.min_confidence must be within 0.0..=1.0, got {}",
            self.classifier.min_confidence
        );
        anyhow::ensure!(self.classifier.window > 0, "classifier.window must be at least 1");
        Ok(self)
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<base_dir>/.license-resolver/config.toml`
/// 3. `~/.config/license-resolver/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(base_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = base_dir.join(".license-resolver").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("license-resolver")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("invalid config {}", path.display()))?;
    config.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.order, DEFAULT_ORDER.to_vec());
        assert_eq!(config.classifier.window, 1);
        assert_eq!(config.classifier.min_confidence, 0.0);
        assert_eq!(config.registry.url, "https://registry.npmjs.org");
        assert_eq!(config.registry.timeout_secs, 10);
        assert_eq!(config.host.name, "github.com");
        assert_eq!(config.host.timeout_secs, 10);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            order = ["github", "registry"]

            [classifier]
            min_confidence = 0.5

            [aliases]
            "Apache Software License" = "Apache 2.0"
            "#,
        )
        .unwrap();

        assert_eq!(config.order, vec![Strategy::Github, Strategy::Registry]);
        assert_eq!(config.classifier.window, 1);
        assert_eq!(config.classifier.min_confidence, 0.5);
        assert_eq!(config.host.api_url, "https://api.github.com");
        assert_eq!(
            config.aliases().canonical("apache software license"),
            Some("Apache 2.0")
        );
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        assert!(toml::from_str::<Config>(r#"order = ["npm"]"#).is_err());
    }

    #[test]
    fn test_load_override() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "[registry]\nurl = \"http://localhost:4873\"\n").unwrap();

        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path(), Some(f.path())).unwrap();
        assert_eq!(config.registry.url, "http://localhost:4873");
    }

    #[test]
    fn test_load_local_config() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join(".license-resolver");
        std::fs::create_dir(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            "[host]\ntoken = \"abc\"\ntimeout_secs = 3\n",
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.host.token.as_deref(), Some("abc"));
        assert_eq!(config.host.timeout_secs, 3);
        assert_eq!(config.registry.timeout_secs, 10);
    }

    #[test]
    fn test_registry_timeout_independent_of_host() {
        let config: Config = toml::from_str(
            r#"
            [registry]
            timeout_secs = 30

            [host]
            timeout_secs = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.registry.timeout_secs, 30);
        assert_eq!(config.host.timeout_secs, 2);
        assert_eq!(config.registry.url, "https://registry.npmjs.org");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "[classifier]\nmin_confidence = 1.5\n").unwrap();
        let dir = TempDir::new().unwrap();
        assert!(load_config(dir.path(), Some(f.path())).is_err());

        let mut f = NamedTempFile::new().unwrap();
        write!(f, "[classifier]\nwindow = 0\n").unwrap();
        assert!(load_config(dir.path(), Some(f.path())).is_err());
    }

    #[test]
    fn test_missing_override_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(dir.path(), Some(&missing)).is_err());
    }
}
