use crate::debugger::error::Error;
use crate::{muted_error, weak_error};
use log::error;
use serde::Deserialize;
use std::fs::read_to_string;

/// Tuning of step-into disambiguation for a particular toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Package whose unexported functions are compiler housekeeping calls.
    pub runtime_package: String,
    /// Mnemonic prefix of a call instruction.
    pub call_mnemonic: String,
    /// Display width of a callee expression.
    pub expr_width: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            runtime_package: "runtime".to_string(),
            call_mnemonic: "call".to_string(),
            expr_width: 20,
        }
    }
}

impl EngineConfig {
    const DEFAULT_PATH: &'static str = ".config/seer/config.toml";

    pub fn from_toml(data: &str) -> Result<Self, Error> {
        Ok(toml::de::from_str(data)?)
    }

    /// Load configuration from file. Return [`None`] on errors.
    /// Without explicit path a file from user home directory is used.
    pub fn from_file(path: Option<&str>) -> Option<Self> {
        let data = match path {
            None => {
                let path = home::home_dir()?;
                let path = path.join(Self::DEFAULT_PATH);
                muted_error!(read_to_string(path))?
            }
            Some(path) => match read_to_string(path) {
                Ok(data) => data,
                Err(err) => {
                    error!("Error while load config file: {err}");
                    return None;
                }
            },
        };

        weak_error!(Self::from_toml(&data))
    }

    /// Load configuration from file, fallback to defaults.
    pub fn load(path: Option<&str>) -> Self {
        Self::from_file(path).unwrap_or_default()
    }
}
