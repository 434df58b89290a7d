use thiserror::Error;

use crate::AssembleOptions;

pub const MAX_DEPTH_VAR: &str = "PROOFBLOCKS_MAX_DEPTH";
pub const STRICT_FIELDS_VAR: &str = "PROOFBLOCKS_STRICT_FIELDS";
pub const LOG_VAR: &str = "RUST_LOG";

pub const DEFAULT_LOG_FILTER: &str = "proofblocks=info";

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({expected})")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Runtime settings, read from the environment
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Config {
    pub options: AssembleOptions,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            options: AssembleOptions::default(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from `lookup`, which maps a variable name to its value if it is set
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(value) = lookup(MAX_DEPTH_VAR) {
            config.options.max_depth =
                value.trim().parse().map_err(|_| ConfigError::Invalid {
                    var: MAX_DEPTH_VAR,
                    value: value.clone(),
                    expected: "a non-negative integer",
                })?;
        }
        if let Some(value) = lookup(STRICT_FIELDS_VAR) {
            config.options.strict_fields = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: STRICT_FIELDS_VAR,
                        value,
                        expected: "true or false",
                    })
                }
            };
        }
        if let Some(value) = lookup(LOG_VAR).filter(|v| !v.trim().is_empty()) {
            config.log_filter = value;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        Config::from_lookup(|var| {
            vars.iter()
                .find(|(name, _)| *name == var)
                .map(|(_, value)| (*value).to_owned())
        })
    }

    #[test]
    fn defaults() {
        let config = from(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.options.max_depth, 64);
        assert!(config.options.strict_fields);
        assert_eq!(config.log_filter, "proofblocks=info");
    }

    #[test]
    fn overrides() {
        let config = from(&[
            ("PROOFBLOCKS_MAX_DEPTH", " 3"),
            ("PROOFBLOCKS_STRICT_FIELDS", "Off"),
            ("RUST_LOG", "proofblocks=trace"),
        ])
        .unwrap();
        assert_eq!(config.options.max_depth, 3);
        assert!(!config.options.strict_fields);
        assert_eq!(config.log_filter, "proofblocks=trace");
        assert_eq!(from(&[("RUST_LOG", "")]).unwrap().log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn invalid_values() {
        assert_eq!(
            from(&[("PROOFBLOCKS_MAX_DEPTH", "-1")]),
            Err(ConfigError::Invalid {
                var: MAX_DEPTH_VAR,
                value: "-1".to_owned(),
                expected: "a non-negative integer",
            })
        );
        assert!(from(&[("PROOFBLOCKS_STRICT_FIELDS", "maybe")]).is_err());
    }
}
