//! Floor price keeper run
//!
//! Publishes one collection's Kaleidoscope floor price to its own feed and
//! prints the resulting `ExecResult` as JSON on stdout.
//!
//! Usage:
//!   floor_watch --args floor.json
//!   FLOOR_ARGS='{"nickname": "Punks", "address": "0x..."}' floor_watch
//!
//! Environment variables:
//!   RPC_URL - JSON-RPC endpoint of the oracle's chain (required)
//!   ORACLE_ADDRESS - Oracle contract (default: Polygon deployment)
//!   FLOOR_TIMEOUT_MS - Floor request timeout (default: 10000)
//!   AUTHORIZED_SENDER - Secret (required)
//!   KALEIDOSCOPE_KEY - Secret (optional)

use dotenv::dotenv;
use log::{error, info};
use mashup_keeper::{
    config::{load_run_args, RunKind, RuntimeConfig},
    floor,
    ledger::JsonRpcLedger,
    providers::kaleidoscope::Kaleidoscope,
    secrets::{EnvSecrets, SecretStore, KALEIDOSCOPE_KEY},
    ExecResult,
};

fn fail(message: String) -> Result<(), Box<dyn std::error::Error>> {
    error!("❌ Startup failed: {}", message);
    println!("{}", serde_json::to_string(&ExecResult::skip(message))?);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let kind = RunKind::Floor;

    let config = match RuntimeConfig::from_env() {
        Ok(config) => config,
        Err(e) => return fail(e.to_string()),
    };
    let args = match load_run_args(kind) {
        Ok(args) => args,
        Err(e) => return fail(e.to_string()),
    };

    info!("🔧 {} configuration", kind.name());
    info!("   ├─ RPC: {}", config.rpc_url);
    info!("   ├─ Chain ID: {}", config.chain_id);
    info!("   ├─ Oracle: {}", config.oracle_address);
    info!("   └─ Floor timeout: {}ms", config.floor_timeout_ms);

    let ledger = match JsonRpcLedger::new(&config.rpc_url, config.oracle_address, config.provider_timeout()) {
        Ok(ledger) => ledger,
        Err(e) => return fail(e.to_string()),
    };
    let key = EnvSecrets.get(KALEIDOSCOPE_KEY).unwrap_or_default();
    let source = match Kaleidoscope::new(&key, config.floor_timeout()) {
        Ok(source) => source,
        Err(e) => return fail(e.to_string()),
    };

    let result = floor::run(&args, &EnvSecrets, &ledger, &source, config.oracle_address).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
