use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AltinkaynakProviderConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub timeout_secs: u64,
    pub ttl_secs: u64,
}

impl Default for AltinkaynakProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://data.altinkaynak.com".to_string(),
            username: "AltinkaynakWebServis".to_string(),
            password: "AltinkaynakWebServis".to_string(),
            timeout_secs: 10,
            ttl_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TruncgilProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub ttl_secs: u64,
}

impl Default for TruncgilProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://finans.truncgil.com".to_string(),
            timeout_secs: 5,
            ttl_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BinanceProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub ttl_secs: u64,
}

impl Default for BinanceProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            timeout_secs: 10,
            ttl_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub altinkaynak: AltinkaynakProviderConfig,
    #[serde(default)]
    pub truncgil: TruncgilProviderConfig,
    #[serde(default)]
    pub binance: BinanceProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl AppConfig {
    /// Loads the config from the default location, or built-in defaults if none exists.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "piyasa", "piyasa")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

impl AltinkaynakProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl TruncgilProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl BinanceProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}
