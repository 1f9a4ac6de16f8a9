use std::{fs, io::ErrorKind, path::Path};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_API_ORIGIN: &str = "https://larek-api.nomoreparties.co";
const API_PATH: &str = "/api/weblarek";
const CDN_PATH: &str = "/content/weblarek";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_origin: String,
    pub api_url: String,
    pub cdn_url: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_origin: DEFAULT_API_ORIGIN.into(),
            api_url: format!("{DEFAULT_API_ORIGIN}{API_PATH}"),
            cdn_url: format!("{DEFAULT_API_ORIGIN}{CDN_PATH}"),
            log_filter: "info".into(),
        }
    }
}

/// One layer of configuration. Later layers win field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsOverrides {
    pub api_origin: Option<String>,
    pub api_url: Option<String>,
    pub cdn_url: Option<String>,
    pub log_filter: Option<String>,
}

impl SettingsOverrides {
    pub fn merge(self, later: SettingsOverrides) -> Self {
        Self {
            api_origin: later.api_origin.or(self.api_origin),
            api_url: later.api_url.or(self.api_url),
            cdn_url: later.cdn_url.or(self.cdn_url),
            log_filter: later.log_filter.or(self.log_filter),
        }
    }

    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        toml::from_str(raw).context("invalid storefront config file")
    }

    /// Missing file means no overrides.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_toml(&raw)
                .with_context(|| format!("failed to load config '{}'", path.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err)
                .with_context(|| format!("failed to read config '{}'", path.display())),
        }
    }

    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_origin: lookup("API_ORIGIN").or_else(|| lookup("APP__API_ORIGIN")),
            api_url: lookup("APP__API_URL"),
            cdn_url: lookup("APP__CDN_URL"),
            log_filter: lookup("APP__LOG_FILTER"),
        }
    }

    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok().filter(|value| !value.is_empty()))
    }
}

impl Settings {
    /// API and CDN urls default to the well-known paths under the origin.
    pub fn resolve(overrides: SettingsOverrides) -> anyhow::Result<Self> {
        let defaults = Settings::default();
        let api_origin = overrides
            .api_origin
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_origin);
        let settings = Self {
            api_url: overrides
                .api_url
                .unwrap_or_else(|| format!("{api_origin}{API_PATH}")),
            cdn_url: overrides
                .cdn_url
                .unwrap_or_else(|| format!("{api_origin}{CDN_PATH}")),
            log_filter: overrides.log_filter.unwrap_or(defaults.log_filter),
            api_origin,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("api_origin", &self.api_origin),
            ("api_url", &self.api_url),
            ("cdn_url", &self.cdn_url),
        ] {
            let url = Url::parse(value).with_context(|| format!("{name} '{value}' is not a valid url"))?;
            if !matches!(url.scheme(), "http" | "https") {
                bail!("{name} '{value}' must use http or https");
            }
        }
        Ok(())
    }
}

/// File, then environment, then command line.
pub fn load_settings(path: &Path, cli: SettingsOverrides) -> anyhow::Result<Settings> {
    let overrides = SettingsOverrides::from_file(path)?
        .merge(SettingsOverrides::from_env())
        .merge(cli);
    Settings::resolve(overrides)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
