use alloy_primitives::Address;
use serde_json::{Map, Value};
use std::env;
use std::fs;
use std::time::Duration;
use thiserror::Error;

/// Polygon deployment of the Open Markets Oracle
pub const POLYGON_ORACLE_ADDRESS: &str = "0x454F9C0ab3119f8B9209B52A3f0191268e2b8812";
/// Mumbai deployment of the Open Markets Oracle
pub const MUMBAI_ORACLE_ADDRESS: &str = "0x1C60320EF9aeD1ad1edf25afD82596167832F557";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Kind of run, with the version each run type reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    /// Multi-provider market-cap consensus
    Mashup,
    /// Single-collection floor price
    Floor,
}

impl RunKind {
    pub fn name(&self) -> &'static str {
        match self {
            RunKind::Mashup => "Mimicry Mashup",
            RunKind::Floor => "Mimicry Kaleidoscope",
        }
    }

    pub fn version(&self) -> &'static str {
        match self {
            RunKind::Mashup => "2.1.0",
            RunKind::Floor => "1.0.0",
        }
    }

    /// Environment variable holding inline JSON run arguments
    pub fn args_env_var(&self) -> &'static str {
        match self {
            RunKind::Mashup => "MASHUP_ARGS",
            RunKind::Floor => "FLOOR_ARGS",
        }
    }
}

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub rpc_url: String,
    pub oracle_address: Address,
    pub chain_id: u64,
    pub provider_timeout_ms: u64,
    pub floor_timeout_ms: u64,
}

impl RuntimeConfig {
    /// Load configuration from environment variables
    ///
    /// - `RPC_URL` (required)
    /// - `ORACLE_ADDRESS` (default: Polygon oracle)
    /// - `CHAIN_ID` (default: 137)
    /// - `PROVIDER_TIMEOUT_MS` (default: 5000)
    /// - `FLOOR_TIMEOUT_MS` (default: 10000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let rpc_url =
            env::var("RPC_URL").map_err(|_| ConfigError::MissingVariable("RPC_URL".to_string()))?;

        if !rpc_url.starts_with("http://") && !rpc_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "RPC_URL must start with http:// or https://".to_string(),
            ));
        }

        let oracle_raw =
            env::var("ORACLE_ADDRESS").unwrap_or_else(|_| POLYGON_ORACLE_ADDRESS.to_string());
        let oracle_address = oracle_raw.parse::<Address>().map_err(|e| {
            ConfigError::InvalidValue(format!("ORACLE_ADDRESS {}: {}", oracle_raw, e))
        })?;

        let chain_id = env::var("CHAIN_ID")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(137);

        let provider_timeout_ms = env::var("PROVIDER_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5_000);

        let floor_timeout_ms = env::var("FLOOR_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10_000);

        Ok(Self {
            rpc_url,
            oracle_address,
            chain_id,
            provider_timeout_ms,
            floor_timeout_ms,
        })
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    pub fn floor_timeout(&self) -> Duration {
        Duration::from_millis(self.floor_timeout_ms)
    }
}

/// Read the JSON run arguments
///
/// `--args <path>` on the command line wins; otherwise the run kind's
/// environment variable must hold the JSON object inline.
pub fn load_run_args(kind: RunKind) -> Result<Map<String, Value>, ConfigError> {
    let args: Vec<String> = env::args().collect();

    let raw = match args.iter().position(|a| a == "--args") {
        Some(idx) => {
            let path = args
                .get(idx + 1)
                .ok_or_else(|| ConfigError::InvalidValue("--args needs a file path".to_string()))?;
            fs::read_to_string(path)
                .map_err(|e| ConfigError::InvalidValue(format!("cannot read {}: {}", path, e)))?
        }
        None => env::var(kind.args_env_var())
            .map_err(|_| ConfigError::MissingVariable(kind.args_env_var().to_string()))?,
    };

    parse_run_args(&raw)
}

/// Parse run arguments, which must be a JSON object
pub fn parse_run_args(raw: &str) -> Result<Map<String, Value>, ConfigError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ConfigError::InvalidValue(
            "run arguments must be a JSON object".to_string(),
        )),
        Err(e) => Err(ConfigError::InvalidValue(format!("run arguments: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_config_from_env() {
        // Single test so env mutations don't race between tests
        env::remove_var("RPC_URL");
        assert!(matches!(
            RuntimeConfig::from_env(),
            Err(ConfigError::MissingVariable(_))
        ));

        env::set_var("RPC_URL", "ws://localhost:8546");
        assert!(matches!(
            RuntimeConfig::from_env(),
            Err(ConfigError::InvalidValue(_))
        ));

        env::set_var("RPC_URL", "https://polygon-rpc.com");
        env::remove_var("ORACLE_ADDRESS");
        env::remove_var("CHAIN_ID");
        env::remove_var("PROVIDER_TIMEOUT_MS");
        env::remove_var("FLOOR_TIMEOUT_MS");
        let config = RuntimeConfig::from_env().unwrap();
        assert_eq!(config.rpc_url, "https://polygon-rpc.com");
        assert_eq!(
            config.oracle_address,
            POLYGON_ORACLE_ADDRESS.parse::<Address>().unwrap()
        );
        assert_eq!(config.chain_id, 137);
        assert_eq!(config.provider_timeout(), Duration::from_secs(5));
        assert_eq!(config.floor_timeout(), Duration::from_secs(10));

        env::set_var("ORACLE_ADDRESS", MUMBAI_ORACLE_ADDRESS);
        env::set_var("CHAIN_ID", "80001");
        env::set_var("PROVIDER_TIMEOUT_MS", "2500");
        let config = RuntimeConfig::from_env().unwrap();
        assert_eq!(
            config.oracle_address,
            MUMBAI_ORACLE_ADDRESS.parse::<Address>().unwrap()
        );
        assert_eq!(config.chain_id, 80001);
        assert_eq!(config.provider_timeout_ms, 2_500);

        env::set_var("ORACLE_ADDRESS", "not-an-address");
        assert!(matches!(
            RuntimeConfig::from_env(),
            Err(ConfigError::InvalidValue(_))
        ));

        // Cleanup
        env::remove_var("RPC_URL");
        env::remove_var("ORACLE_ADDRESS");
        env::remove_var("CHAIN_ID");
        env::remove_var("PROVIDER_TIMEOUT_MS");
    }

    #[test]
    fn test_parse_run_args() {
        let args = parse_run_args(r#"{"nickname": "n", "providers": ["NftGo"]}"#).unwrap();
        assert_eq!(args["nickname"], "n");

        assert!(parse_run_args("[1, 2]").is_err());
        assert!(parse_run_args("{").is_err());
    }

    #[test]
    fn test_run_kind_metadata() {
        assert_eq!(RunKind::Mashup.version(), "2.1.0");
        assert_eq!(RunKind::Floor.version(), "1.0.0");
        assert_eq!(RunKind::Floor.args_env_var(), "FLOOR_ARGS");
    }
}
