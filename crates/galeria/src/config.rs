//! Configuration file loading (galeria.toml).

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use galeria_server::{FeaturedItem, KioskConfig, ProxyConfig, SiteConfig};

/// Configuration file structure (galeria.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub kiosk: KioskSection,
}

#[derive(Debug, Deserialize)]
pub struct SiteSection {
    /// Site title
    #[serde(default = "default_title")]
    pub title: String,
    /// Custom element tag of the embedded viewer widget
    #[serde(default = "default_viewer_tag")]
    pub viewer_tag: String,
    /// Extra stylesheet links (fonts, overrides)
    #[serde(default)]
    pub styles: Vec<String>,
    /// Artworks pinned to the attract screen
    #[serde(default)]
    pub featured: Vec<FeaturedSection>,
}

#[derive(Debug, Deserialize)]
pub struct FeaturedSection {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served under /static (font files etc)
    pub assets_dir: Option<PathBuf>,
    #[serde(default)]
    pub open: bool,
    #[serde(default = "default_minify")]
    pub minify: bool,
}

#[derive(Debug, Deserialize)]
pub struct ApiSection {
    /// Path prefix the proxy is mounted under
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Upstream origin requests are forwarded to
    #[serde(default = "default_upstream")]
    pub upstream: String,
    /// Seconds a cached response counts as fresh
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
    /// Maximum number of cached responses
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Deserialize)]
pub struct KioskSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Inactivity window in milliseconds
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
}

fn default_title() -> String {
    "Galéria".to_string()
}
fn default_viewer_tag() -> String {
    "micr-io".to_string()
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_minify() -> bool {
    true
}
fn default_prefix() -> String {
    "/api".to_string()
}
fn default_upstream() -> String {
    "https://www.webumenia.sk/api".to_string()
}
fn default_max_age_secs() -> u64 {
    60
}
fn default_capacity() -> usize {
    256
}
fn default_true() -> bool {
    true
}
fn default_idle_timeout_ms() -> u64 {
    90_000
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: default_title(),
            viewer_tag: default_viewer_tag(),
            styles: Vec::new(),
            featured: Vec::new(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            assets_dir: None,
            open: false,
            minify: default_minify(),
        }
    }
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            upstream: default_upstream(),
            max_age_secs: default_max_age_secs(),
            capacity: default_capacity(),
        }
    }
}

impl Default for KioskSection {
    fn default() -> Self {
        Self {
            enabled: true,
            idle_timeout_ms: default_idle_timeout_ms(),
        }
    }
}

/// Load configuration from the given path if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

impl ConfigFile {
    /// Resolve the file into the server's runtime configuration.
    pub fn site_config(&self) -> SiteConfig {
        SiteConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            site_title: self.site.title.clone(),
            viewer_tag: self.site.viewer_tag.clone(),
            styles: self.site.styles.clone(),
            featured: self
                .site
                .featured
                .iter()
                .map(|entry| FeaturedItem {
                    id: entry.id.clone(),
                    title: if entry.title.is_empty() {
                        entry.id.clone()
                    } else {
                        entry.title.clone()
                    },
                })
                .collect(),
            assets_dir: self.server.assets_dir.clone(),
            minify_css: self.server.minify,
            open: self.server.open,
            proxy: ProxyConfig {
                prefix: self.api.prefix.clone(),
                upstream: self.api.upstream.clone(),
                max_age: Duration::from_secs(self.api.max_age_secs),
                capacity: NonZeroUsize::new(self.api.capacity).unwrap_or(NonZeroUsize::MIN),
            },
            kiosk: KioskConfig {
                enabled: self.kiosk.enabled,
                idle_timeout: Duration::from_millis(self.kiosk.idle_timeout_ms),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = ConfigFile::default().site_config();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.viewer_tag, "micr-io");
        assert_eq!(config.proxy.prefix, "/api");
        assert_eq!(config.proxy.upstream, "https://www.webumenia.sk/api");
        assert_eq!(config.proxy.max_age, Duration::from_secs(60));
        assert_eq!(config.kiosk.idle_timeout, Duration::from_millis(90_000));
        assert!(config.kiosk.enabled);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let parsed: ConfigFile = toml::from_str(
            r#"
[server]
port = 8080

[kiosk]
idle_timeout_ms = 5000

[[site.featured]]
id = "SVK:SNG.O_184"
title = "Pltník"
"#,
        )
        .unwrap();
        let config = parsed.site_config();

        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.kiosk.idle_timeout, Duration::from_millis(5000));
        assert_eq!(config.featured.len(), 1);
        assert_eq!(config.featured[0].title, "Pltník");
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let parsed: ConfigFile = toml::from_str("[api]\ncapacity = 0\n").unwrap();

        assert_eq!(parsed.site_config().proxy.capacity.get(), 1);
    }
}
