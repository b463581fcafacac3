use alloy::{
    consensus::Transaction as _,
    primitives::{Address, Bytes, B256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::{BlockTransactionsKind, Transaction, TransactionRequest},
    transports::BoxTransport,
};
use async_trait::async_trait;
use url::Url;

use crate::error::{InspectorError, Result};

/// The parts of a transaction the inspector looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRecord {
    pub hash: B256,
    pub from: Address,
    pub to: Option<Address>,
    pub nonce: u64,
}

impl TxRecord {
    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }

    /// Address deployed by a CREATE transaction: keccak(rlp([sender, nonce]))[12..].
    pub fn created_address(&self) -> Option<Address> {
        self.is_contract_creation()
            .then(|| self.from.create(self.nonce))
    }
}

impl From<&Transaction> for TxRecord {
    fn from(tx: &Transaction) -> Self {
        Self {
            hash: *tx.inner.tx_hash(),
            from: tx.from,
            to: tx.to(),
            nonce: tx.nonce(),
        }
    }
}

/// Read-only view of a JSON-RPC chain client.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn chain_id(&self) -> Result<u64>;

    async fn block_number(&self) -> Result<u64>;

    async fn transaction_count(&self, address: Address) -> Result<u64>;

    async fn code_size(&self, address: Address) -> Result<usize>;

    /// `eth_call` against the latest block, returning raw ABI-encoded output.
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes>;

    /// Full transaction bodies of block `number`, `None` if the node does not have it.
    async fn block_transactions(&self, number: u64) -> Result<Option<Vec<TxRecord>>>;

    async fn transaction_by_hash(&self, hash: B256) -> Result<Option<TxRecord>>;
}

/// `ChainReader` backed by an alloy HTTP provider.
pub struct RpcChain {
    provider: RootProvider<BoxTransport>,
}

impl RpcChain {
    pub fn connect(rpc_url: Url) -> Self {
        let provider = ProviderBuilder::new().on_http(rpc_url).boxed();
        Self { provider }
    }
}

#[async_trait]
impl ChainReader for RpcChain {
    async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| InspectorError::rpc("eth_chainId", e))
    }

    async fn block_number(&self) -> Result<u64> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| InspectorError::rpc("eth_blockNumber", e))
    }

    async fn transaction_count(&self, address: Address) -> Result<u64> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(|e| InspectorError::rpc("eth_getTransactionCount", e))
    }

    async fn code_size(&self, address: Address) -> Result<usize> {
        let code = self
            .provider
            .get_code_at(address)
            .await
            .map_err(|e| InspectorError::rpc("eth_getCode", e))?;
        Ok(code.len())
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes> {
        let request = TransactionRequest::default().to(to).input(input.into());
        self.provider
            .call(&request)
            .await
            .map_err(|e| InspectorError::rpc("eth_call", e))
    }

    async fn block_transactions(&self, number: u64) -> Result<Option<Vec<TxRecord>>> {
        let block = self
            .provider
            .get_block_by_number(number.into(), BlockTransactionsKind::Full)
            .await
            .map_err(|e| InspectorError::rpc("eth_getBlockByNumber", e))?;

        let Some(block) = block else {
            return Ok(None);
        };

        let txs = block.transactions.as_transactions().ok_or_else(|| {
            InspectorError::rpc(
                "eth_getBlockByNumber",
                format!("block {} returned without transaction bodies", number),
            )
        })?;

        Ok(Some(txs.iter().map(TxRecord::from).collect()))
    }

    async fn transaction_by_hash(&self, hash: B256) -> Result<Option<TxRecord>> {
        let tx = self
            .provider
            .get_transaction_by_hash(hash)
            .await
            .map_err(|e| InspectorError::rpc("eth_getTransactionByHash", e))?;
        Ok(tx.as_ref().map(TxRecord::from))
    }
}
