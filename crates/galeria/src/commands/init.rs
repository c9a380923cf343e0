//! Write a default configuration file.

use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(force: bool) -> Result<()> {
    write_config(Path::new("galeria.toml"), force)
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        tracing::warn!("{} already exists. Use --force to overwrite.", path.display());
        return Ok(());
    }

    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());
    tracing::info!("Run 'galeria serve' to start the site server.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Galeria Configuration

[site]
# Site title, shown in page heads and on the attract screen
title = "Galéria"

# Custom element tag of the embedded viewer widget
viewer_tag = "micr-io"

# Extra stylesheet links (fonts, overrides)
styles = []

# Artworks pinned to the attract screen
# [[site.featured]]
# id = "SVK:SNG.O_184"
# title = "Pltník"

[server]
host = "127.0.0.1"
port = 3000

# Directory served under /static (font files etc)
# assets_dir = "static"

# Open the site in a browser on start
open = false

# Minify the generated stylesheet
minify = true

[api]
# Requests under this prefix are proxied to the upstream origin,
# serving stale cached responses while refreshing in the background
prefix = "/api"
upstream = "https://www.webumenia.sk/api"

# Seconds a cached response counts as fresh
max_age_secs = 60

# Maximum number of cached responses
capacity = 256

[kiosk]
# Idle displays return to the attract screen after this window
enabled = true
idle_timeout_ms = 90000
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_a_parseable_default_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("galeria.toml");

        write_config(&path, false).unwrap();

        let config = crate::config::load_config(&path).unwrap();
        assert_eq!(config.site_config().port, 3000);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("galeria.toml");
        std::fs::write(&path, "# custom").unwrap();

        write_config(&path, false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# custom");

        write_config(&path, true).unwrap();
        assert_ne!(std::fs::read_to_string(&path).unwrap(), "# custom");
    }
}
