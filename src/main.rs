mod abi;
mod address;
mod chain;
mod config;
mod creation;
mod error;
mod inspector;
mod report;
mod units;

use anyhow::{Context, Result};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    chain::RpcChain,
    config::Config,
    inspector::TokenInspector,
    report::{generate, ReportOptions},
};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    dotenv().ok();

    // Logs go to stderr, stdout carries the report only
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        rpc = %config.rpc_url,
        token = %config.token_address,
        anchor = ?config.scan_anchor,
        window = config.scan_window,
        "⚙️  Config loaded"
    );

    // 2. Connect and bind the token
    let chain = RpcChain::connect(config.rpc_url.clone());
    let inspector = TokenInspector::new(chain, &config.token_address)
        .context("Cannot inspect token")?;

    let options = ReportOptions {
        scan_anchor: config.scan_anchor,
        scan_window: config.scan_window,
        explorer_url: config.explorer_url.clone(),
    };

    // 3. Produce the report
    let report = generate(&inspector, &options)
        .await
        .with_context(|| format!("Token report for {} failed", inspector.checksummed()))?;

    println!("{}", report);
    Ok(())
}
