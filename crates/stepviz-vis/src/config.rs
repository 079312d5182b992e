//! Server configuration.

use std::net::SocketAddr;

use crate::error::{Error, Result};
use crate::playback::Speed;
use crate::session::OperationValue;

/// Configuration for the visualization server.
#[derive(Debug, Clone, PartialEq)]
pub struct VisConfig {
    /// HTTP listen address
    pub addr: SocketAddr,

    /// Initial playback speed
    pub speed: Speed,

    /// Initial operation value
    pub value: OperationValue,

    /// Reject operations the algorithm's category does not offer
    pub strict: bool,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            speed: Speed::default(),
            value: OperationValue::default(),
            strict: true,
        }
    }
}

impl VisConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let addr = match lookup("STEPVIZ_ADDR") {
            Some(raw) => raw
                .parse()
                .map_err(|_| Error::Config(format!("Invalid STEPVIZ_ADDR: {raw}")))?,
            None => defaults.addr,
        };

        let speed = match lookup("STEPVIZ_SPEED") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(level) if (1..=5).contains(&level) => Speed::new(level),
                _ => return Err(Error::Config(format!("Invalid STEPVIZ_SPEED: {raw}"))),
            },
            None => defaults.speed,
        };

        let value = match lookup("STEPVIZ_VALUE") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(v) if (OperationValue::MIN..=OperationValue::MAX).contains(&v) => {
                    OperationValue::new(v)
                }
                _ => return Err(Error::Config(format!("Invalid STEPVIZ_VALUE: {raw}"))),
            },
            None => defaults.value,
        };

        let strict = match lookup("STEPVIZ_STRICT") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(Error::Config(format!("Invalid STEPVIZ_STRICT: {raw}"))),
            },
            None => defaults.strict,
        };

        Ok(Self {
            addr,
            speed,
            value,
            strict,
        })
    }

    /// Override the listen port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr.set_port(port);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = VisConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, VisConfig::default());
        assert_eq!(config.addr.port(), 3000);
        assert!(config.strict);
    }

    #[test]
    fn reads_all_variables() {
        let config = VisConfig::from_lookup(lookup(&[
            ("STEPVIZ_ADDR", "127.0.0.1:8080"),
            ("STEPVIZ_SPEED", "5"),
            ("STEPVIZ_VALUE", "7"),
            ("STEPVIZ_STRICT", "off"),
        ]))
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.speed, Speed::MAX);
        assert_eq!(config.value.get(), 7);
        assert!(!config.strict);
    }

    #[test]
    fn rejects_bad_values() {
        for (key, raw) in [
            ("STEPVIZ_ADDR", "nowhere"),
            ("STEPVIZ_SPEED", "9"),
            ("STEPVIZ_VALUE", "abc"),
            ("STEPVIZ_STRICT", "maybe"),
        ] {
            let err = VisConfig::from_lookup(lookup(&[(key, raw)])).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{key}");
        }
    }

    #[test]
    fn port_override() {
        let config = VisConfig::default().with_port(4100);
        assert_eq!(config.addr.port(), 4100);
    }
}
