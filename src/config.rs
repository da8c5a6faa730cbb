// Configuration: prompt defaults, the scenario grid and the gateway
// location. Built-in values match the analyzer's historical defaults and
// can be overridden by a JSON file and then by environment variables.

use crate::error::{RiskError, RiskResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:3000/api/analyze_portfolio";
const CONFIG_FILE_NAME: &str = ".riskgo.json";
const CONFIG_PATH_VAR: &str = "RISKGO_CONFIG";
const GATEWAY_URL_VAR: &str = "RISKGO_GATEWAY_URL";

/// Values offered to the operator when a prompt is left empty.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PromptDefaults {
    pub ticker: String,
    pub quantity: f64,
    pub beta: f64,
    pub volatility: f64,
    pub option_kind: String,
    pub strike: f64,
    pub expiry: String,
}

impl Default for PromptDefaults {
    fn default() -> Self {
        PromptDefaults {
            ticker: "AAPL".into(),
            quantity: 100.0,
            beta: 1.0,
            volatility: 0.3,
            option_kind: "CALL".into(),
            strike: 180.0,
            expiry: "2026-06-19".into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub gateway_url: String,
    pub defaults: PromptDefaults,
    /// Fractional price shocks sent with every request.
    pub scenario_range: Vec<f64>,
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gateway_url: DEFAULT_GATEWAY_URL.into(),
            defaults: PromptDefaults::default(),
            scenario_range: vec![-0.10, -0.05, 0.0, 0.05, 0.10],
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Resolve the configuration for this process: `.env`, then the config
    /// file (`RISKGO_CONFIG` or `~/.riskgo.json`), then `RISKGO_GATEWAY_URL`.
    pub fn load() -> RiskResult<Self> {
        dotenv::dotenv().ok();
        let home = dirs::home_dir();
        let config = Self::resolve(|key| std::env::var(key).ok(), home.as_deref())?;
        log::debug!("resolved config: {:?}", config);
        Ok(config)
    }

    /// Layer the config file and environment over the built-in values.
    /// `env` looks up a variable; `home` is where `.riskgo.json` may live.
    pub fn resolve<F>(env: F, home: Option<&Path>) -> RiskResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match env(CONFIG_PATH_VAR) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => match home.map(|dir| dir.join(CONFIG_FILE_NAME)) {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Config::default(),
            },
        };
        if let Some(url) = env(GATEWAY_URL_VAR) {
            config.gateway_url = url;
        }
        Ok(config)
    }

    /// Read a JSON config file. Fields absent from the file keep their
    /// built-in values.
    pub fn from_file(path: &Path) -> RiskResult<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| RiskError::config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&data)
            .map_err(|e| RiskError::config(format!("{}: {}", path.display(), e)))
    }
}
