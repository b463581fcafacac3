use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::SolCall,
};
use tracing::{debug, info};

use crate::{
    abi::IERC20,
    address::normalize_address,
    chain::ChainReader,
    error::{InspectorError, Result},
    units::format_units,
};

/// Values read from a token contract at one point in time.
///
/// Supply and balance are raw amounts in the token's smallest unit; use the
/// `display_*` helpers for human-readable values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSnapshot {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
    /// `None` when the contract has no `owner()` function.
    pub owner: Option<Address>,
    /// Tokens held by the contract itself.
    pub self_balance: U256,
}

impl TokenSnapshot {
    pub fn display_total_supply(&self) -> String {
        format_units(self.total_supply, self.decimals)
    }

    pub fn display_self_balance(&self) -> String {
        format_units(self.self_balance, self.decimals)
    }
}

/// A token contract bound to a chain client.
pub struct TokenInspector<C> {
    chain: C,
    address: Address,
    checksummed: String,
}

impl<C: ChainReader> TokenInspector<C> {
    pub fn new(chain: C, token_address: &str) -> Result<Self> {
        let (address, checksummed) = normalize_address(token_address)?;
        Ok(Self {
            chain,
            address,
            checksummed,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn checksummed(&self) -> &str {
        &self.checksummed
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    /// Reads name, symbol, decimals, supply, owner and self-balance.
    ///
    /// Every read except `owner()` is required; a missing `owner()` leaves
    /// `TokenSnapshot::owner` empty.
    pub async fn snapshot(&self) -> Result<TokenSnapshot> {
        info!(token = %self.checksummed, "📊 Reading token attributes");

        let required = async {
            tokio::try_join!(
                self.read(IERC20::nameCall {}),
                self.read(IERC20::symbolCall {}),
                self.read(IERC20::decimalsCall {}),
                self.read(IERC20::totalSupplyCall {}),
                self.read(IERC20::balanceOfCall {
                    account: self.address,
                }),
            )
        };
        let (required, owner) = tokio::join!(required, self.read(IERC20::ownerCall {}));
        let (name, symbol, decimals, total_supply, balance) = required?;

        let owner = match owner {
            Ok(ret) => Some(ret._0),
            Err(e) => {
                debug!(error = %e, "owner() not available");
                None
            }
        };

        Ok(TokenSnapshot {
            name: name._0,
            symbol: symbol._0,
            decimals: decimals._0,
            total_supply: total_supply._0,
            owner,
            self_balance: balance._0,
        })
    }

    async fn read<T: SolCall>(&self, call: T) -> Result<T::Return> {
        let input = Bytes::from(call.abi_encode());
        let output = self
            .chain
            .call(self.address, input)
            .await
            .map_err(|e| match e {
                InspectorError::Rpc { message, .. } => InspectorError::Rpc {
                    method: T::SIGNATURE,
                    message,
                },
                other => other,
            })?;

        T::abi_decode_returns(&output, true).map_err(|e| InspectorError::decode(T::SIGNATURE, e))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::chain::scripted::ScriptedChain;
    use alloy::sol_types::SolValue;

    pub const TOKEN: &str = "0xe9e7CEA3DedcA5984780Bafc599bD69ADd087D56";

    /// Scripted chain answering the standard token reads; `owner()` only if given.
    pub fn token_chain(decimals: u8, supply: U256, balance: U256, owner: Option<Address>) -> ScriptedChain {
        let mut chain = ScriptedChain {
            chain_id: 56,
            head: 1_000,
            ..Default::default()
        };
        chain
            .respond(IERC20::nameCall::SELECTOR, "Binance USD".to_string().abi_encode())
            .respond(IERC20::symbolCall::SELECTOR, "BUSD".to_string().abi_encode())
            .respond(IERC20::decimalsCall::SELECTOR, U256::from(decimals).abi_encode())
            .respond(IERC20::totalSupplyCall::SELECTOR, supply.abi_encode())
            .respond(IERC20::balanceOfCall::SELECTOR, balance.abi_encode());
        if let Some(owner) = owner {
            chain.respond(IERC20::ownerCall::SELECTOR, owner.abi_encode());
        }
        chain
    }

    fn units(whole: u64, decimals: u8) -> U256 {
        U256::from(whole) * U256::from(10u64).pow(U256::from(decimals))
    }

    #[tokio::test]
    async fn test_snapshot_reads_all_attributes() {
        let owner = Address::repeat_byte(0x0e);
        let chain = token_chain(18, units(1_000_000, 18), units(25, 18), Some(owner));
        let inspector = TokenInspector::new(chain, &TOKEN.to_lowercase()).unwrap();
        assert_eq!(inspector.checksummed(), TOKEN);

        let snapshot = inspector.snapshot().await.unwrap();
        assert_eq!(snapshot.name, "Binance USD");
        assert_eq!(snapshot.symbol, "BUSD");
        assert_eq!(snapshot.decimals, 18);
        assert_eq!(snapshot.owner, Some(owner));
        assert_eq!(snapshot.display_total_supply(), "1000000");
        assert_eq!(snapshot.display_self_balance(), "25");
        // raw values are kept as-is
        assert_eq!(snapshot.total_supply, units(1_000_000, 18));
    }

    #[tokio::test]
    async fn test_missing_owner_is_tolerated() {
        let chain = token_chain(6, U256::from(123_456_789u64), U256::ZERO, None);
        let inspector = TokenInspector::new(chain, TOKEN).unwrap();

        let snapshot = inspector.snapshot().await.unwrap();
        assert_eq!(snapshot.owner, None);
        assert_eq!(snapshot.display_total_supply(), "123.456789");
    }

    #[tokio::test]
    async fn test_balance_is_read_for_token_itself() {
        let chain = token_chain(18, U256::ZERO, U256::ZERO, None);
        let inspector = TokenInspector::new(chain, TOKEN).unwrap();
        inspector.snapshot().await.unwrap();

        let calls = inspector.chain().calls.lock().unwrap().clone();
        let balance_calls: Vec<_> = calls
            .iter()
            .filter(|(_, input)| input.starts_with(&IERC20::balanceOfCall::SELECTOR))
            .collect();
        assert_eq!(balance_calls.len(), 1);

        let (to, input) = balance_calls[0];
        assert_eq!(*to, inspector.address());
        let decoded = IERC20::balanceOfCall::abi_decode(input, true).unwrap();
        assert_eq!(decoded.account, inspector.address());
        // transfer() is never sent
        assert!(!calls
            .iter()
            .any(|(_, input)| input.starts_with(&IERC20::transferCall::SELECTOR)));
    }

    #[tokio::test]
    async fn test_missing_required_function_is_fatal() {
        let mut chain = token_chain(18, U256::ZERO, U256::ZERO, None);
        chain.responses.remove(&IERC20::decimalsCall::SELECTOR);
        let inspector = TokenInspector::new(chain, TOKEN).unwrap();

        let err = inspector.snapshot().await.unwrap_err();
        match err {
            InspectorError::Rpc { method, .. } => assert_eq!(method, "decimals()"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_non_standard_encoding_is_fatal() {
        let mut chain = token_chain(18, U256::ZERO, U256::ZERO, None);
        // bytes32-style name as returned by some legacy tokens
        chain.respond(IERC20::nameCall::SELECTOR, vec![0x4d; 32]);
        let inspector = TokenInspector::new(chain, TOKEN).unwrap();

        let err = inspector.snapshot().await.unwrap_err();
        assert!(matches!(err, InspectorError::Decode { method: "name()", .. }));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_fatal() {
        let mut chain = token_chain(18, U256::ZERO, U256::ZERO, None);
        chain.unreachable = true;
        let inspector = TokenInspector::new(chain, TOKEN).unwrap();
        assert!(matches!(
            inspector.snapshot().await,
            Err(InspectorError::Rpc { .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_token_address() {
        let result = TokenInspector::new(ScriptedChain::default(), "0xnot-an-address");
        assert!(matches!(result, Err(InspectorError::InvalidAddress { .. })));
    }
}
