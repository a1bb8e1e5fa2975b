//! Opportunity reports.
//!
//! The evaluation pipeline produces one [`EvaluationReport`] per pending
//! buy it fully analyzes. Reports render either as a human-readable text
//! block or as a single JSON line, selected by configuration.

use alloy::primitives::{Address, TxHash};
use serde::Serialize;
use tracing::info;

use crate::types::{FrontrunPlan, PriceImpact, SwapIntent, TokenInfo};

/// One hop of the victim's quoted path.
#[derive(Debug, Clone, Serialize)]
pub struct PathLeg {
    pub token: Address,
    pub symbol: String,
    pub amount: f64,
}

/// Spot price on one configured exchange, None when the pair is missing
/// or unreadable there.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeQuote {
    pub exchange: String,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub tx_hash: TxHash,
    pub function: &'static str,
    pub exchange: String,
    pub pair: Address,
    #[serde(skip)]
    pub intent: SwapIntent,
    pub base: TokenInfo,
    pub target: TokenInfo,
    pub amount_in: f64,
    pub amount_out_min: f64,
    pub path: Vec<PathLeg>,
    pub impact: PriceImpact,
    pub slippage_pct: Option<f64>,
    pub quotes: Vec<ExchangeQuote>,
    pub victim_gas_price: u128,
    pub plan: Option<FrontrunPlan>,
}

/// Format a token amount with precision banded by magnitude, trailing
/// zeros stripped. Large amounts get few decimals, dust gets many.
pub fn format_amount(amount: f64) -> String {
    let magnitude = amount.abs();
    let precision = if magnitude >= 1000.0 {
        2
    } else if magnitude >= 1.0 {
        4
    } else if magnitude >= 0.0001 {
        6
    } else {
        10
    };
    let formatted = format!("{amount:.precision$}");
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}

impl EvaluationReport {
    pub fn render(&self, json: bool) {
        if json {
            match serde_json::to_string(self) {
                Ok(line) => info!(target: "report", "{line}"),
                Err(err) => tracing::warn!(error = %err, "failed to serialize report"),
            }
            return;
        }
        info!(target: "report", "{}", self.render_text());
    }

    fn render_text(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "\n=== pending buy {} ===\n",
            self.tx_hash
        ));
        out.push_str(&format!(
            "{} on {} (pair {})\n",
            self.function, self.exchange, self.pair
        ));
        out.push_str(&format!(
            "victim: {} {} -> min {} {}\n",
            format_amount(self.amount_in),
            self.base.symbol,
            format_amount(self.amount_out_min),
            self.target.symbol,
        ));

        if !self.path.is_empty() {
            out.push_str("quoted path:\n");
            for leg in &self.path {
                out.push_str(&format!(
                    "  {} {} ({})\n",
                    format_amount(leg.amount),
                    leg.symbol,
                    leg.token
                ));
            }
        }

        out.push_str(&format!(
            "price impact: {} -> {} ({:+.4}%)\n",
            format_amount(self.impact.price_before),
            format_amount(self.impact.price_after),
            self.impact.impact_pct,
        ));
        match self.slippage_pct {
            Some(slippage) => {
                out.push_str(&format!("victim slippage tolerance: {slippage:.4}%\n"))
            }
            None => out.push_str("victim slippage tolerance: n/a\n"),
        }

        if !self.quotes.is_empty() {
            out.push_str("exchange prices:\n");
            for quote in &self.quotes {
                match quote.price {
                    Some(price) => out.push_str(&format!(
                        "  {}: {} {}/{}\n",
                        quote.exchange,
                        format_amount(price),
                        self.base.symbol,
                        self.target.symbol
                    )),
                    None => out.push_str(&format!("  {}: no pair\n", quote.exchange)),
                }
            }
        }

        match &self.plan {
            Some(plan) => {
                out.push_str(&format!(
                    "front-run: spend {} {} -> {} {} at gas {} wei\n",
                    format_amount(plan.optimal_input),
                    self.base.symbol,
                    format_amount(plan.tokens_received),
                    self.target.symbol,
                    plan.gas_price,
                ));
                out.push_str(&format!(
                    "profit: gross {} gas {} net {} {} ({})\n",
                    format_amount(plan.gross_profit),
                    format_amount(plan.gas_cost),
                    format_amount(plan.net_profit),
                    self.base.symbol,
                    if plan.is_profitable() {
                        "PROFITABLE"
                    } else {
                        "unprofitable"
                    },
                ));
            }
            None => out.push_str("front-run: no viable input size\n"),
        }

        out
    }
}
