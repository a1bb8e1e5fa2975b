//! Per-transaction evaluation pipeline.
//!
//! Takes one pending transaction from decode through classification,
//! liquidity reads, impact simulation, sizing and profit estimation, and
//! produces either a report or a skip reason. Retryable RPC failures
//! surface as errors; every expected dead end is a [`SkipReason`].

use std::sync::Arc;

use alloy::providers::DynProvider;

use crate::config::BotConfig;
use crate::error::{EvalError, SkipReason};
use crate::mempool::decoder;
use crate::pool::calculator;
use crate::pool::LiquiditySnapshotProvider;
use crate::report::{EvaluationReport, PathLeg};
use crate::tokens::TokenMetadataResolver;
use crate::types::PendingTx;

pub enum Evaluation {
    Skipped(SkipReason),
    Report(Box<EvaluationReport>),
}

pub struct Evaluator {
    config: Arc<BotConfig>,
    tokens: TokenMetadataResolver,
    pools: LiquiditySnapshotProvider,
}

impl Evaluator {
    pub fn new(provider: DynProvider, config: Arc<BotConfig>) -> Self {
        let tokens = TokenMetadataResolver::new(provider.clone(), &config.known_decimals);
        let pools = LiquiditySnapshotProvider::new(provider, config.exchanges.clone());
        Self {
            config,
            tokens,
            pools,
        }
    }

    pub async fn evaluate(&self, tx: &PendingTx) -> Result<Evaluation, EvalError> {
        let routers = self.config.router_set();
        let intent = match decoder::decode_swap(tx, &routers) {
            Ok(intent) => intent,
            Err(reason) => return Ok(Evaluation::Skipped(reason)),
        };

        let base_tokens = self.config.base_token_set();
        if !intent.is_buy(&base_tokens) {
            return Ok(Evaluation::Skipped(SkipReason::NotBuyOrder));
        }
        let (Some(base_address), Some(target_address)) = (intent.token_in(), intent.token_out())
        else {
            return Ok(Evaluation::Skipped(SkipReason::Invalid));
        };

        let base = self.tokens.resolve(base_address).await;
        let target = self.tokens.resolve(target_address).await;

        let snapshot = match self.pools.snapshot(base_address, target_address).await? {
            Some(snapshot) => snapshot,
            None => return Ok(Evaluation::Skipped(SkipReason::NoPair)),
        };

        let impact = match calculator::simulate_buy_impact(
            snapshot.reserve_base,
            snapshot.reserve_target,
            base.decimals,
            target.decimals,
            intent.amount_in,
        ) {
            Some(impact) => impact,
            None => return Ok(Evaluation::Skipped(SkipReason::DegeneratePool)),
        };

        // Quote the victim's exact path so the report shows what the
        // router itself would promise them right now.
        let amounts = self
            .pools
            .amounts_out(intent.amount_in, intent.path.clone())
            .await?;
        let mut path = Vec::with_capacity(intent.path.len());
        for (token, amount) in intent.path.iter().zip(&amounts) {
            let info = self.tokens.resolve(*token).await;
            path.push(PathLeg {
                token: *token,
                symbol: info.symbol.clone(),
                amount: calculator::scale(*amount, info.decimals),
            });
        }

        let expected_output = amounts
            .last()
            .map(|out| calculator::scale(*out, target.decimals))
            .unwrap_or(0.0);
        let slippage_pct = calculator::slippage_tolerance(
            expected_output,
            calculator::scale(intent.amount_out_min, target.decimals),
        );

        let reserve_base = calculator::u256_to_f64(snapshot.reserve_base);
        let reserve_target = calculator::u256_to_f64(snapshot.reserve_target);
        let gas_price = calculator::frontrun_gas_price(tx.gas_price, self.config.gas_overpayment);

        // Sizing works in raw units so reserve and amount scales cancel.
        let plan = calculator::optimal_dx(
            calculator::u256_to_f64(intent.amount_in),
            calculator::u256_to_f64(intent.amount_out_min),
            reserve_base,
            reserve_target,
            self.config.dex_fee,
            self.config.safety_margin,
        )
        .and_then(|dx| {
            calculator::estimate_profit(
                dx,
                reserve_base,
                reserve_target,
                base.decimals,
                target.decimals,
                tx.gas_limit,
                gas_price,
            )
        });

        let quotes = self
            .pools
            .price_quotes(target_address, base_address, target.decimals, base.decimals)
            .await;

        let amount_in = calculator::scale(intent.amount_in, base.decimals);
        let amount_out_min = calculator::scale(intent.amount_out_min, target.decimals);

        Ok(Evaluation::Report(Box::new(EvaluationReport {
            tx_hash: tx.hash,
            function: intent.function,
            exchange: snapshot.exchange.clone(),
            pair: snapshot.pair,
            intent,
            base,
            target,
            amount_in,
            amount_out_min,
            path,
            impact,
            slippage_pct,
            quotes,
            victim_gas_price: tx.gas_price,
            plan,
        })))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use alloy::primitives::{Address, Bytes, TxHash, U256};
    use alloy::sol_types::SolCall;

    use crate::contracts::IUniswapV2Router02 as Router;
    use crate::mempool::decoder::decode_swap;
    use crate::pool::calculator;
    use crate::types::PendingTx;

    const BASE: Address = Address::repeat_byte(0xaa);
    const TARGET: Address = Address::repeat_byte(0xbb);
    const ROUTER: Address = Address::repeat_byte(0xcc);

    // A full synthetic scenario through the pure pipeline stages: a
    // native-coin buy against a 500/10000 pool must classify as a buy,
    // raise the price, and admit a margined front-run size.
    #[test]
    fn native_buy_flows_through_pipeline() {
        let value = U256::from(10u64).pow(U256::from(18u64));
        let min_out = U256::from(50u64) * U256::from(10u64).pow(U256::from(18u64));

        let calldata = Router::swapExactETHForTokensCall {
            amountOutMin: min_out,
            path: vec![BASE, TARGET],
            to: Address::repeat_byte(0x01),
            deadline: U256::from(2_000_000_000u64),
        }
        .abi_encode();

        let tx = PendingTx {
            hash: TxHash::repeat_byte(0x42),
            to: Some(ROUTER),
            input: Bytes::from(calldata),
            value,
            gas_price: 30_000_000_000,
            gas_limit: 250_000,
        };

        let routers = HashSet::from([ROUTER]);
        let intent = decode_swap(&tx, &routers).unwrap();

        let base_tokens = HashSet::from([BASE]);
        assert!(intent.is_buy(&base_tokens));
        assert_eq!(intent.token_in(), Some(BASE));
        assert_eq!(intent.token_out(), Some(TARGET));
        assert_eq!(intent.amount_in, value);

        let reserve_base = U256::from(500u64) * U256::from(10u64).pow(U256::from(18u64));
        let reserve_target = U256::from(10_000u64) * U256::from(10u64).pow(U256::from(18u64));

        let impact = calculator::simulate_buy_impact(
            reserve_base,
            reserve_target,
            18,
            18,
            intent.amount_in,
        )
        .unwrap();
        assert!(impact.price_after > impact.price_before);
        assert!(impact.impact_pct > 0.0);

        let dx = calculator::optimal_dx(
            calculator::u256_to_f64(intent.amount_in),
            calculator::u256_to_f64(intent.amount_out_min),
            calculator::u256_to_f64(reserve_base),
            calculator::u256_to_f64(reserve_target),
            0.9975,
            0.85,
        )
        .unwrap();
        assert!(dx > 0.0);

        let gas_price = calculator::frontrun_gas_price(tx.gas_price, 0.5);
        assert_eq!(gas_price, 45_000_000_000);

        let plan = calculator::estimate_profit(
            dx,
            calculator::u256_to_f64(reserve_base),
            calculator::u256_to_f64(reserve_target),
            18,
            18,
            tx.gas_limit,
            gas_price,
        )
        .unwrap();
        assert!(plan.optimal_input > 0.0);
        assert!(plan.tokens_received > 0.0);
        assert!(plan.gas_cost > 0.0);
    }

    // A swap landing in a base token is a sell from our perspective and
    // must never reach the liquidity stages.
    #[test]
    fn sell_order_is_classified_out() {
        let calldata = Router::swapExactTokensForETHCall {
            amountIn: U256::from(1000u64),
            amountOutMin: U256::from(1u64),
            path: vec![TARGET, BASE],
            to: Address::repeat_byte(0x01),
            deadline: U256::from(2_000_000_000u64),
        }
        .abi_encode();

        let tx = PendingTx {
            hash: TxHash::repeat_byte(0x43),
            to: Some(ROUTER),
            input: Bytes::from(calldata),
            value: U256::ZERO,
            gas_price: 30_000_000_000,
            gas_limit: 250_000,
        };

        let intent = decode_swap(&tx, &HashSet::from([ROUTER])).unwrap();
        assert!(!intent.is_buy(&HashSet::from([BASE])));
    }
}
