//! Site server command.

use std::path::Path;

use anyhow::Result;
use galeria_server::SiteServer;

use crate::config::load_config;

/// Run the serve command.
pub async fn run(config_path: &Path, port: Option<u16>, no_open: bool) -> Result<()> {
    let mut config = load_config(config_path)?.site_config();

    if let Some(port) = port {
        config.port = port;
    }
    if no_open {
        config.open = false;
    }

    SiteServer::new(config).start().await?;

    Ok(())
}
