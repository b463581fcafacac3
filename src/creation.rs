//! Best-effort search for the transaction that deployed a contract.
//!
//! The search walks a bounded window of blocks from the top down and matches
//! CREATE transactions by deriving the deployed address from the sender and
//! its nonce. Contracts deployed by other contracts (internal CREATE/CREATE2)
//! or outside the window are reported as not found.

use std::str::FromStr;

use alloy::primitives::{Address, B256};
use tracing::{debug, info};

use crate::{
    chain::ChainReader,
    error::{InspectorError, Result},
};

pub const DEFAULT_SCAN_WINDOW: u64 = 1000;

/// Where the descending scan starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanAnchor {
    /// Current head of the chain.
    #[default]
    Latest,
    /// Fixed block height, e.g. a known deployment era.
    Block(u64),
    /// Transaction count of the target address, read as a block height.
    ///
    /// This is only an approximation: a nonce counts transactions sent by an
    /// address and has no fixed relation to chain height. It is kept for
    /// parity with older tooling and must be opted into.
    TargetNonce,
}

impl FromStr for ScanAnchor {
    type Err = InspectorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "latest" => Ok(ScanAnchor::Latest),
            "nonce" => Ok(ScanAnchor::TargetNonce),
            other => other
                .parse::<u64>()
                .map(ScanAnchor::Block)
                .map_err(|_| InspectorError::Config {
                    key: "SCAN_ANCHOR",
                    message: format!("expected 'latest', 'nonce' or a block number, got '{}'", s),
                }),
        }
    }
}

/// Inclusive, descending range of block heights `[upper - span + 1, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub upper: u64,
    pub span: u64,
}

impl ScanWindow {
    pub fn new(upper: u64, span: u64) -> Self {
        Self { upper, span }
    }

    pub fn lower(&self) -> u64 {
        self.upper.saturating_sub(self.span.saturating_sub(1))
    }

    /// Heights from `upper` down to `lower()`, never below genesis.
    pub fn heights(&self) -> impl Iterator<Item = u64> {
        let lower = self.lower();
        let upper = self.upper;
        (lower..=upper).rev().take(self.span as usize)
    }
}

/// Located deployment of the target contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationRecord {
    pub tx_hash: B256,
    pub block_number: u64,
    pub creator: Option<Address>,
}

/// Turns an anchor into a concrete window ending at the anchor height.
pub async fn resolve_window<C: ChainReader + ?Sized>(
    chain: &C,
    target: Address,
    anchor: ScanAnchor,
    span: u64,
) -> Result<ScanWindow> {
    let upper = match anchor {
        ScanAnchor::Latest => chain.block_number().await?,
        ScanAnchor::Block(n) => n,
        ScanAnchor::TargetNonce => chain.transaction_count(target).await?,
    };
    Ok(ScanWindow::new(upper, span))
}

/// Scans `window` top-down for the CREATE transaction that deployed `target`.
///
/// Returns the transaction hash and its block, or `None` once the window is
/// exhausted. Blocks the node does not know are skipped.
pub async fn locate_creation_tx<C: ChainReader + ?Sized>(
    chain: &C,
    target: Address,
    window: ScanWindow,
) -> Result<Option<(B256, u64)>> {
    info!(
        contract = %target,
        from = window.upper,
        to = window.lower(),
        "🔎 Scanning blocks for creation transaction"
    );

    for height in window.heights() {
        let Some(txs) = chain.block_transactions(height).await? else {
            debug!(height, "block not available, skipping");
            continue;
        };

        if let Some(tx) = txs
            .iter()
            .find(|tx| tx.created_address() == Some(target))
        {
            info!(height, tx = %tx.hash, "✅ Creation transaction found");
            return Ok(Some((tx.hash, height)));
        }
    }

    debug!(contract = %target, "no creation transaction in window");
    Ok(None)
}

/// Sender of the creation transaction, re-read from the node by hash.
pub async fn resolve_creator<C: ChainReader + ?Sized>(
    chain: &C,
    creation_tx: Option<B256>,
) -> Result<Option<Address>> {
    let Some(hash) = creation_tx else {
        return Ok(None);
    };

    match chain.transaction_by_hash(hash).await? {
        Some(tx) => Ok(Some(tx.from)),
        None => {
            debug!(tx = %hash, "creation transaction no longer known to node");
            Ok(None)
        }
    }
}

/// Locates the creation transaction and resolves its sender.
pub async fn find_creation<C: ChainReader + ?Sized>(
    chain: &C,
    target: Address,
    window: ScanWindow,
) -> Result<Option<CreationRecord>> {
    let Some((tx_hash, block_number)) = locate_creation_tx(chain, target, window).await? else {
        return Ok(None);
    };
    let creator = resolve_creator(chain, Some(tx_hash)).await?;
    Ok(Some(CreationRecord {
        tx_hash,
        block_number,
        creator,
    }))
}
