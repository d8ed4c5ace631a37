//! Mashup keeper run
//!
//! Values a basket of NFT collections and tokens across providers and prints
//! the resulting `ExecResult` as JSON on stdout. Logs go to stderr.
//!
//! Usage:
//!   mashup --args mashup.json
//!   MASHUP_ARGS='{"nickname": ...}' mashup
//!
//! Environment variables:
//!   RPC_URL - JSON-RPC endpoint of the oracle's chain (required)
//!   ORACLE_ADDRESS - Oracle contract (default: Polygon deployment)
//!   PROVIDER_TIMEOUT_MS - Per-request provider timeout (default: 5000)
//!   AUTHORIZED_SENDER, NFTGO_API_KEY, CENTER_API_KEY, COINGECKO_API_KEY - Secrets

use dotenv::dotenv;
use log::{error, info};
use mashup_keeper::{
    config::{load_run_args, RunKind, RuntimeConfig},
    ledger::JsonRpcLedger,
    mashup::{self, HttpValuationSource},
    secrets::EnvSecrets,
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

    let kind = RunKind::Mashup;

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
    info!("   └─ Provider timeout: {}ms", config.provider_timeout_ms);

    let ledger = match JsonRpcLedger::new(&config.rpc_url, config.oracle_address, config.provider_timeout()) {
        Ok(ledger) => ledger,
        Err(e) => return fail(e.to_string()),
    };
    let source = HttpValuationSource::new(config.provider_timeout());

    let result = mashup::run(&args, &EnvSecrets, &ledger, &source, config.oracle_address).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
