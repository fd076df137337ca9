//! Server configuration from environment variables

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = ".taskdesk-data";
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory holding tasks.json, notes.json and categories.json
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    /// Write the default categories when categories.json is missing
    pub seed_categories: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            seed_categories: true,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let data_dir = lookup("TASKDESK_DATA_DIR")
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let host = match lookup("TASKDESK_HOST") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid TASKDESK_HOST {:?}", raw);
                defaults.bind_addr.ip()
            }),
            None => defaults.bind_addr.ip(),
        };
        let port = match lookup("TASKDESK_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid TASKDESK_PORT {:?}", raw);
                defaults.bind_addr.port()
            }),
            None => defaults.bind_addr.port(),
        };

        Self {
            data_dir,
            bind_addr: SocketAddr::new(host, port),
            seed_categories: env_flag(
                lookup("TASKDESK_SEED_CATEGORIES"),
                defaults.seed_categories,
            ),
        }
    }
}

fn env_flag(raw: Option<String>, default: bool) -> bool {
    match raw {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                tracing::warn!("Ignoring invalid boolean flag {:?}", raw);
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_without_env() {
        let config = config_from(&[]);
        assert_eq!(config.data_dir, PathBuf::from(".taskdesk-data"));
        assert_eq!(config.bind_addr.port(), 5000);
        assert!(config.seed_categories);
    }

    #[test]
    fn env_overrides_defaults() {
        let config = config_from(&[
            ("TASKDESK_DATA_DIR", "/var/lib/taskdesk"),
            ("TASKDESK_HOST", "127.0.0.1"),
            ("TASKDESK_PORT", "8081"),
            ("TASKDESK_SEED_CATEGORIES", "off"),
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/taskdesk"));
        assert_eq!(config.bind_addr, "127.0.0.1:8081".parse().unwrap());
        assert!(!config.seed_categories);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config_from(&[
            ("TASKDESK_PORT", "eighty"),
            ("TASKDESK_HOST", "not-an-ip"),
            ("TASKDESK_SEED_CATEGORIES", "maybe"),
        ]);
        assert_eq!(config.bind_addr.port(), 5000);
        assert!(config.bind_addr.ip().is_unspecified());
        assert!(config.seed_categories);
    }
}
