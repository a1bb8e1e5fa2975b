//! On-chain liquidity reads.
//!
//! Looks up the pair for a token couple across the configured exchanges
//! and reads its reserves, normalized so callers always see them as
//! (base, target) regardless of the pair's internal token ordering.

use alloy::primitives::{Address, U256};
use alloy::providers::DynProvider;
use tracing::debug;

use crate::config::ExchangeConfig;
use crate::contracts::{IUniswapV2Factory, IUniswapV2Pair, IUniswapV2Router02};
use crate::error::EvalError;
use crate::pool::calculator;
use crate::report::ExchangeQuote;
use crate::types::LiquiditySnapshot;

pub struct LiquiditySnapshotProvider {
    provider: DynProvider,
    exchanges: Vec<ExchangeConfig>,
}

impl LiquiditySnapshotProvider {
    pub fn new(provider: DynProvider, exchanges: Vec<ExchangeConfig>) -> Self {
        Self {
            provider,
            exchanges,
        }
    }

    /// Find the first configured exchange with a deployed pair for the
    /// couple and read its reserves.
    ///
    /// Factory lookups that error are logged and skipped so one flaky
    /// exchange cannot mask a pair on another. Ok(None) means no exchange
    /// has the pair at all; reserve reads on a selected pair propagate as
    /// errors since at that point the pair is known to exist.
    pub async fn snapshot(
        &self,
        base: Address,
        target: Address,
    ) -> Result<Option<LiquiditySnapshot>, EvalError> {
        for exchange in &self.exchanges {
            let factory = IUniswapV2Factory::new(exchange.factory, self.provider.clone());
            let pair = match factory.getPair(base, target).call().await {
                Ok(pair) => pair,
                Err(err) => {
                    debug!(exchange = %exchange.name, error = %err, "getPair failed, trying next exchange");
                    continue;
                }
            };
            if pair == Address::ZERO {
                continue;
            }

            let contract = IUniswapV2Pair::new(pair, self.provider.clone());
            let reserves = contract.getReserves().call().await?;
            let token0 = contract.token0().call().await?;

            let (reserve_target, reserve_base) = if token0 == target {
                (reserves.reserve0, reserves.reserve1)
            } else {
                (reserves.reserve1, reserves.reserve0)
            };

            return Ok(Some(LiquiditySnapshot {
                pair,
                exchange: exchange.name.clone(),
                reserve_base: U256::from(reserve_base),
                reserve_target: U256::from(reserve_target),
            }));
        }
        Ok(None)
    }

    /// Router quote for the victim's exact path, through the first
    /// configured exchange.
    pub async fn amounts_out(
        &self,
        amount_in: U256,
        path: Vec<Address>,
    ) -> Result<Vec<U256>, EvalError> {
        let router = IUniswapV2Router02::new(self.exchanges[0].router, self.provider.clone());
        let amounts = router.getAmountsOut(amount_in, path).call().await?;
        Ok(amounts)
    }

    /// Per-exchange spot price (base per target) for the report's
    /// comparison table. An exchange without the pair, or whose reads
    /// fail, contributes a quote of None rather than sinking the report.
    pub async fn price_quotes(
        &self,
        target: Address,
        base: Address,
        target_decimals: u8,
        base_decimals: u8,
    ) -> Vec<ExchangeQuote> {
        let mut quotes = Vec::with_capacity(self.exchanges.len());
        for exchange in &self.exchanges {
            let price = self
                .spot_price(exchange, target, base, target_decimals, base_decimals)
                .await;
            quotes.push(ExchangeQuote {
                exchange: exchange.name.clone(),
                price,
            });
        }
        quotes
    }

    async fn spot_price(
        &self,
        exchange: &ExchangeConfig,
        target: Address,
        base: Address,
        target_decimals: u8,
        base_decimals: u8,
    ) -> Option<f64> {
        let factory = IUniswapV2Factory::new(exchange.factory, self.provider.clone());
        let pair = match factory.getPair(base, target).call().await {
            Ok(pair) if pair != Address::ZERO => pair,
            Ok(_) => return None,
            Err(err) => {
                debug!(exchange = %exchange.name, error = %err, "price quote getPair failed");
                return None;
            }
        };

        let contract = IUniswapV2Pair::new(pair, self.provider.clone());
        let reserves = contract.getReserves().call().await.ok()?;
        let token0 = contract.token0().call().await.ok()?;

        let (reserve_target, reserve_base) = if token0 == target {
            (reserves.reserve0, reserves.reserve1)
        } else {
            (reserves.reserve1, reserves.reserve0)
        };

        let rt = calculator::scale(U256::from(reserve_target), target_decimals);
        let rb = calculator::scale(U256::from(reserve_base), base_decimals);
        if rt <= 0.0 {
            return None;
        }
        Some(rb / rt)
    }
}
