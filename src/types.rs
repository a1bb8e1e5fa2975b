// Core data structures for the evaluation pipeline.

use std::collections::HashSet;

use alloy::consensus::Transaction as _;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use serde::Serialize;

/// A pending transaction as observed from the node's transaction pool.
/// Immutable once built; everything downstream derives from this.
#[derive(Debug, Clone)]
pub struct PendingTx {
    pub hash: TxHash,
    pub to: Option<Address>,
    pub input: Bytes,
    pub value: U256,
    /// Effective gas price in wei. EIP-1559 transactions carry no legacy
    /// gasPrice; fall back to maxFeePerGas, which upper-bounds the cost.
    pub gas_price: u128,
    pub gas_limit: u64,
}

impl PendingTx {
    /// Build from the RPC transaction object returned by the node.
    pub fn from_rpc(hash: TxHash, tx: &alloy::rpc::types::Transaction) -> Self {
        Self {
            hash,
            to: tx.to(),
            input: tx.input().clone(),
            value: tx.value(),
            gas_price: tx.gas_price().unwrap_or_else(|| tx.max_fee_per_gas()),
            gas_limit: tx.gas_limit(),
        }
    }
}

/// Canonical form of a decoded router swap call. Exact-output variants are
/// normalized here: max-input (or native value) becomes `amount_in`, the
/// desired exact output stands in for `amount_out_min`.
///
/// Decoder-enforced invariants: amount_in > 0, amount_out_min > 0,
/// path.len() >= 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapIntent {
    /// Name of the matched router function.
    pub function: &'static str,
    pub amount_in: U256,
    pub amount_out_min: U256,
    /// Ordered token path; path[0] is spent, path[last] is received.
    pub path: Vec<Address>,
}

impl SwapIntent {
    /// A buy order spends a base token and receives a non-base token.
    /// Anything else is out of scope for the front-run model.
    pub fn is_buy(&self, base_tokens: &HashSet<Address>) -> bool {
        match (self.path.first(), self.path.last()) {
            (Some(first), Some(last)) => {
                base_tokens.contains(first) && !base_tokens.contains(last)
            }
            _ => false,
        }
    }

    /// Token spent by the victim (buy orders: a base token).
    pub fn token_in(&self) -> Option<Address> {
        self.path.first().copied()
    }

    /// Token received by the victim.
    pub fn token_out(&self) -> Option<Address> {
        self.path.last().copied()
    }
}

/// Token metadata, resolved on-chain once and cached for the process
/// lifetime (token metadata is immutable on-chain).
#[derive(Debug, Clone, Serialize)]
pub struct TokenInfo {
    pub address: Address,
    pub symbol: String,
    /// Decimal precision, valid range 0–30. 18 when unknown.
    pub decimals: u8,
}

impl TokenInfo {
    /// Degraded fallback used when metadata reads fail. Resolution failure
    /// must never abort an evaluation.
    pub fn unknown(address: Address) -> Self {
        Self {
            address,
            symbol: "Unknown".to_string(),
            decimals: 18,
        }
    }
}

/// Reserves of the selected pair, normalized to (base, target) order via
/// token0() regardless of on-chain storage order. Read fresh per
/// evaluation; never mutated or persisted.
#[derive(Debug, Clone)]
pub struct LiquiditySnapshot {
    pub pair: Address,
    pub exchange: String,
    pub reserve_base: U256,
    pub reserve_target: U256,
}

/// Result of simulating the victim's buy under the constant-product
/// invariant. Prices are in base-token units per target token, scaled to
/// human units.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PriceImpact {
    pub price_before: f64,
    pub price_after: f64,
    pub impact_pct: f64,
}

/// A sized front-run candidate with its expected economics. `net_profit`
/// is signed; a plan with net_profit <= 0 is reported as unprofitable
/// rather than discarded, so the reader can see how close it was.
#[derive(Debug, Clone, Serialize)]
pub struct FrontrunPlan {
    /// Optimal input in raw base-token units.
    pub optimal_input_raw: f64,
    /// Optimal input scaled to human base-token units.
    pub optimal_input: f64,
    /// Simulated target tokens received, scaled to human units.
    pub tokens_received: f64,
    /// Gas price to submit at (victim price + overpayment), wei.
    pub gas_price: u128,
    /// Gross proceeds minus the input itself, base-token units.
    pub gross_profit: f64,
    /// gas_limit × gas_price, converted to base-token units.
    pub gas_cost: f64,
    /// gross_profit − gas_cost.
    pub net_profit: f64,
}

impl FrontrunPlan {
    pub fn is_profitable(&self) -> bool {
        self.net_profit > 0.0
    }
}
