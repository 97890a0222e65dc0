use crate::message::NetworkAddress;
use crate::p2p::SeedEndpoint;
use crate::session::Timeouts;
use crate::Result;

use config::{Config, Environment, File};
use serde::Deserialize;

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

// For explanation, see issue: https://github.com/serde-rs/serde/issues/368
fn default_network() -> Network {
    Network::Mainnet
}
fn default_host_capacity() -> usize {
    1000
}
fn default_listener_ip() -> String {
    "0.0.0.0:8333".to_string()
}
fn default_db_path() -> String {
    "zfx-seed-db".to_string()
}

const ENV_PREFIX: &str = "ZFX";

/// The network whose built-in seeds are used when none are configured.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutSettings {
    pub connect_ms: u64,
    pub handshake_ms: u64,
    pub heartbeat_ms: u64,
    pub germination_ms: u64,
    /// Base delay between seeding attempts.
    pub backoff_ms: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        let defaults = Timeouts::default();
        TimeoutSettings {
            connect_ms: defaults.connect.as_millis() as u64,
            handshake_ms: defaults.handshake.as_millis() as u64,
            heartbeat_ms: defaults.heartbeat.as_millis() as u64,
            germination_ms: defaults.germination.as_millis() as u64,
            backoff_ms: 1000,
        }
    }
}

impl TimeoutSettings {
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_millis(self.connect_ms),
            handshake: Duration::from_millis(self.handshake_ms),
            heartbeat: Duration::from_millis(self.heartbeat_ms),
            germination: Duration::from_millis(self.germination_ms),
        }
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_network")]
    pub network: Network,
    /// `HOST:PORT` seeds replacing the network's built-in list when non-empty.
    #[serde(default)]
    pub seeds: Vec<String>,
    #[serde(default = "default_host_capacity")]
    pub host_capacity: usize,
    #[serde(default = "default_listener_ip")]
    pub listener_ip: String,
    /// The address announced to seeds, defaulting to the listener address.
    #[serde(default)]
    pub self_address: Option<String>,
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// Maximum number of seeding attempts, unbounded when absent.
    #[serde(default)]
    pub seeding_attempts: Option<u32>,
    #[serde(default)]
    pub timeouts: TimeoutSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            network: default_network(),
            seeds: vec![],
            host_capacity: default_host_capacity(),
            listener_ip: default_listener_ip(),
            self_address: None,
            db_path: default_db_path(),
            seeding_attempts: None,
            timeouts: TimeoutSettings::default(),
        }
    }
}

impl Settings {
    /// Loads settings from an optional file, overridden by `ZFX_` prefixed environment variables
    /// (nested keys are separated by `__`, as in `ZFX_TIMEOUTS__CONNECT_MS`).
    pub fn new(config_file: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = config_file {
            builder = builder.add_source(File::with_name(path));
        }
        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).prefix_separator("_").separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// The configured seeds, or the network's built-in list when none are configured.
    pub fn seed_endpoints(&self) -> Result<Vec<SeedEndpoint>> {
        if self.seeds.is_empty() {
            return Ok(match self.network {
                Network::Mainnet => SeedEndpoint::mainnet(),
                Network::Testnet => SeedEndpoint::testnet(),
            });
        }
        self.seeds.iter().map(|seed| seed.parse()).collect()
    }

    pub fn listener(&self) -> Result<SocketAddr> {
        self.listener_ip.parse().map_err(|_| crate::Error::PeerParseError)
    }

    pub fn self_network_address(&self) -> Result<NetworkAddress> {
        let ip = match &self.self_address {
            Some(address) => address.parse().map_err(|_| crate::Error::PeerParseError)?,
            None => self.listener()?,
        };
        Ok(NetworkAddress::new(ip, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.network, Network::Mainnet);
        assert_eq!(settings.seed_endpoints().unwrap(), SeedEndpoint::mainnet());
        assert_eq!(settings.timeouts.timeouts(), Timeouts::default());
        assert_eq!(settings.timeouts.backoff(), Duration::from_secs(1));
        assert_eq!(settings.self_network_address().unwrap().ip, "0.0.0.0:8333".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("zfx-seed-settings-{}.json", rand::random::<u64>()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{
                "network": "testnet",
                "seeds": ["127.0.0.1:18444", "seed.example.org:18333"],
                "host_capacity": 50,
                "self_address": "10.0.0.1:18333",
                "timeouts": {{ "connect_ms": 250, "backoff_ms": 20 }}
            }}"#
        )
        .unwrap();
        let settings = Settings::new(path.to_str()).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(settings.network, Network::Testnet);
        assert_eq!(settings.host_capacity, 50);
        assert_eq!(
            settings.seed_endpoints().unwrap(),
            vec![SeedEndpoint::new("127.0.0.1", 18444), SeedEndpoint::new("seed.example.org", 18333)]
        );
        assert_eq!(settings.timeouts.timeouts().connect, Duration::from_millis(250));
        assert_eq!(settings.timeouts.timeouts().handshake, Timeouts::default().handshake);
        assert_eq!(settings.timeouts.backoff(), Duration::from_millis(20));
        assert_eq!(settings.self_network_address().unwrap().ip, "10.0.0.1:18333".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_invalid_seed() {
        let settings = Settings { seeds: vec!["no-port".to_string()], ..Settings::default() };
        assert!(settings.seed_endpoints().is_err());
    }
}
