//! Error taxonomy for the evaluation pipeline.
//!
//! Two disjoint kinds of "this evaluation produced nothing":
//! `EvalError` covers retryable faults (RPC/transport) — the transaction
//! may well be evaluable, we just failed to talk to the node. `SkipReason`
//! covers definitive non-matches — the transaction is simply not an
//! opportunity, and retrying would change nothing. Callers must be able to
//! tell the two apart, so they are separate types rather than variants of
//! one error.

use std::fmt;

use thiserror::Error;

/// Retryable fault while evaluating a single pending transaction.
/// Never fatal: the worker logs it and the poll loop keeps going.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("contract call failed: {0}")]
    Contract(#[from] alloy::contract::Error),

    #[error("transport error: {0}")]
    Transport(#[from] alloy::transports::TransportError),
}

/// Expected terminal outcome for a pending transaction that is not a
/// front-run candidate. Not an error — logged at debug at most.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Destination is not a configured router.
    NotRouter,
    /// Selector is not a recognized swap variant.
    Unsupported,
    /// Recognized swap with unusable parameters (zero amounts, short path).
    Invalid,
    /// Sell or token-to-token order — only buys of a non-base token are
    /// in scope for the opportunity model.
    NotBuyOrder,
    /// No configured exchange has a pair for this token combination.
    NoPair,
    /// Pool reserves degenerate to zero once scaled — AMM math undefined.
    DegeneratePool,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkipReason::NotRouter => "not-router",
            SkipReason::Unsupported => "unsupported",
            SkipReason::Invalid => "invalid",
            SkipReason::NotBuyOrder => "not-buy-order",
            SkipReason::NoPair => "no-pair",
            SkipReason::DegeneratePool => "degenerate-pool",
        };
        f.write_str(label)
    }
}
