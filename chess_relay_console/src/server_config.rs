use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::network;


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    // Served under "/static". Usually contains the web client.
    pub static_content_dir: String,
    pub page_title: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: network::DEFAULT_PORT,
            static_content_dir: "public".to_owned(),
            page_title: "Chess Game".to_owned(),
        }
    }
}

impl ServerConfig {
    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(contents).context("Parsing config file")
    }

    pub fn read_file(filename: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(filename)
            .with_context(|| format!("Reading config file '{filename}'"))?;
        Self::from_yaml(&contents)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config = ServerConfig::from_yaml("port: 8080\n").unwrap();
        assert_eq!(config, ServerConfig { port: 8080, ..ServerConfig::default() });
    }

    #[test]
    fn full_config() {
        let config = ServerConfig::from_yaml(
            "port: 4000\nstatic_content_dir: /srv/chess\npage_title: Friday chess\n",
        )
        .unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.static_content_dir, "/srv/chess");
        assert_eq!(config.page_title, "Friday chess");
    }

    #[test]
    fn invalid_port_is_an_error() {
        assert!(ServerConfig::from_yaml("port: 70000\n").is_err());
    }
}
