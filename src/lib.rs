//! Mempool front-run opportunity monitor for V2-style DEXes.
//!
//! Watches a node's pending-transaction pool, decodes router swap calls,
//! classifies buy orders, and for each one simulates the constant-product
//! price impact, sizes a hypothetical front-run, and reports whether it
//! would clear gas. Observation only — nothing here signs or submits a
//! transaction.

pub mod config;
pub mod contracts;
pub mod error;
pub mod evaluator;
pub mod mempool;
pub mod pool;
pub mod report;
pub mod tokens;
pub mod types;

pub use config::{load_config, BotConfig, ExchangeConfig};
pub use error::{EvalError, SkipReason};
pub use evaluator::{Evaluation, Evaluator};
pub use types::{FrontrunPlan, LiquiditySnapshot, PendingTx, PriceImpact, SwapIntent, TokenInfo};
