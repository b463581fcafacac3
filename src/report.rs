use std::fmt;

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::{
    chain::ChainReader,
    creation::{find_creation, resolve_window, CreationRecord, ScanAnchor, ScanWindow},
    error::Result,
    inspector::{TokenInspector, TokenSnapshot},
};

/// Source verification status on a block explorer.
///
/// No explorer API is queried yet, so the only state is `NotImplemented`,
/// carrying the page a reader can check by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    NotImplemented { url: String },
}

pub fn check_verification(explorer_url: &str, address: &str) -> Verification {
    Verification::NotImplemented {
        url: format!("{}/address/{}#code", explorer_url.trim_end_matches('/'), address),
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verification::NotImplemented { url } => {
                write!(f, "not checked (explorer lookup not implemented, see {})", url)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub scan_anchor: ScanAnchor,
    pub scan_window: u64,
    pub explorer_url: String,
}

#[derive(Debug, Clone)]
pub struct TokenReport {
    pub address: String,
    pub chain_id: u64,
    pub generated_at: DateTime<Local>,
    pub code_size: usize,
    pub snapshot: TokenSnapshot,
    pub verification: Verification,
    pub window: ScanWindow,
    pub creation: Option<CreationRecord>,
}

/// Collects everything the report prints. Fails on the first fatal RPC error.
pub async fn generate<C: ChainReader>(
    inspector: &TokenInspector<C>,
    options: &ReportOptions,
) -> Result<TokenReport> {
    let chain = inspector.chain();
    let address = inspector.address();

    let chain_id = chain.chain_id().await?;
    info!(chain_id, token = %inspector.checksummed(), "🔗 Connected");

    let code_size = chain.code_size(address).await?;
    if code_size == 0 {
        warn!(token = %inspector.checksummed(), "⚠️ No contract code at address");
    }

    let snapshot = inspector.snapshot().await?;
    let verification = check_verification(&options.explorer_url, inspector.checksummed());

    let window = resolve_window(chain, address, options.scan_anchor, options.scan_window).await?;
    let creation = find_creation(chain, address, window).await?;

    Ok(TokenReport {
        address: inspector.checksummed().to_string(),
        chain_id,
        generated_at: Local::now(),
        code_size,
        snapshot,
        verification,
        window,
        creation,
    })
}

impl fmt::Display for TokenReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.snapshot;

        writeln!(f, "Analyzing token at address: {}", self.address)?;
        writeln!(f, "Chain ID: {}", self.chain_id)?;
        writeln!(f, "Report time: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S"))?;
        if self.code_size == 0 {
            writeln!(f, "Bytecode: no contract code")?;
        } else {
            writeln!(f, "Bytecode: {} bytes", self.code_size)?;
        }
        writeln!(f, "Name: {}", s.name)?;
        writeln!(f, "Symbol: {}", s.symbol)?;
        writeln!(f, "Decimals: {}", s.decimals)?;
        writeln!(f, "Total Supply: {} {}", s.display_total_supply(), s.symbol)?;
        match s.owner {
            Some(owner) => writeln!(f, "Contract Owner: {}", owner)?,
            None => writeln!(f, "Contract Owner: unavailable (no owner() function)")?,
        }
        writeln!(f, "Contract Verified: {}", self.verification)?;
        writeln!(f, "Token Balance of Contract: {} {}", s.display_self_balance(), s.symbol)?;

        match &self.creation {
            Some(record) => {
                match record.creator {
                    Some(creator) => writeln!(f, "Contract Creator: {}", creator)?,
                    None => writeln!(f, "Contract Creator: unknown")?,
                }
                write!(
                    f,
                    "Creation Transaction: {} (block {})",
                    record.tx_hash, record.block_number
                )
            }
            None => {
                writeln!(f, "Contract Creator: not found")?;
                write!(
                    f,
                    "Creation Transaction: not found in blocks {}..={}",
                    self.window.lower(),
                    self.window.upper
                )
            }
        }
    }
}
