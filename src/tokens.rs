//! ERC-20 metadata resolution with an in-process cache.

use std::collections::HashMap;

use alloy::primitives::Address;
use alloy::providers::DynProvider;
use dashmap::DashMap;
use tracing::debug;

use crate::contracts::IERC20Metadata;
use crate::types::TokenInfo;

/// Decimal counts past this are treated as corrupt metadata and replaced
/// with the default of 18.
const MAX_REASONABLE_DECIMALS: u8 = 30;

/// Resolves token symbol and decimals on chain, caching successes.
///
/// Configured decimal overrides replace only the decimals() read; the
/// symbol is still resolved on chain. Resolution never fails: a token
/// whose contract reverts or whose RPC read errors degrades to
/// `"Unknown"` / 18 decimals (or the override, when configured).
/// Degraded results are not cached so a later lookup can recover.
pub struct TokenMetadataResolver {
    provider: DynProvider,
    cache: DashMap<Address, TokenInfo>,
    decimal_overrides: HashMap<Address, u8>,
}

impl TokenMetadataResolver {
    pub fn new(provider: DynProvider, overrides: &[(Address, u8)]) -> Self {
        Self {
            provider,
            cache: DashMap::new(),
            decimal_overrides: overrides.iter().copied().collect(),
        }
    }

    pub async fn resolve(&self, address: Address) -> TokenInfo {
        if let Some(info) = self.cache.get(&address) {
            return info.clone();
        }

        let token = IERC20Metadata::new(address, self.provider.clone());

        let symbol = match token.symbol().call().await {
            Ok(symbol) => Some(symbol),
            Err(err) => {
                debug!(token = %address, error = %err, "symbol() lookup failed");
                None
            }
        };
        let decimals = match self.decimal_overrides.get(&address) {
            Some(&decimals) => Some(decimals),
            None => match token.decimals().call().await {
                Ok(decimals) if decimals <= MAX_REASONABLE_DECIMALS => Some(decimals),
                Ok(decimals) => {
                    debug!(token = %address, decimals, "implausible decimals, using default");
                    None
                }
                Err(err) => {
                    debug!(token = %address, error = %err, "decimals() lookup failed");
                    None
                }
            },
        };

        match (symbol, decimals) {
            (Some(symbol), Some(decimals)) => {
                let info = TokenInfo {
                    address,
                    symbol,
                    decimals,
                };
                self.cache.insert(address, info.clone());
                info
            }
            (symbol, decimals) => TokenInfo {
                address,
                symbol: symbol.unwrap_or_else(|| "Unknown".to_string()),
                decimals: decimals.unwrap_or(18),
            },
        }
    }
}
