//! AMM math
//!
//! Pure constant-product (x * y = k) calculations for the evaluation
//! pipeline: victim price impact, slippage tolerance, optimal front-run
//! input, and profit estimation. Everything here is f64 on top of raw or
//! scaled reserve values; nothing touches the network.

use alloy::primitives::U256;

use crate::types::{FrontrunPlan, PriceImpact};

/// Lossy U256 → f64. Splits at 128 bits so reserves beyond u128 still
/// convert instead of panicking.
pub fn u256_to_f64(value: U256) -> f64 {
    let hi = (value >> 128usize).to::<u128>() as f64;
    let lo = (value & U256::from(u128::MAX)).to::<u128>() as f64;
    hi * 2f64.powi(128) + lo
}

/// Scale a raw token amount to human units by its decimal precision.
pub fn scale(value: U256, decimals: u8) -> f64 {
    u256_to_f64(value) / 10f64.powi(decimals as i32)
}

/// Simulate the victim's buy against the pool and compute price impact.
///
/// The victim's `amount_in` (base token, raw units) is added to the base
/// reserve with no fee deduction — a conservative approximation that
/// slightly overstates impact. Prices are base-per-target in human units.
///
/// Returns None when the target reserve scales to zero before or after
/// the trade (the math is undefined on a degenerate pool); an empty base
/// reserve lands here too, since it forces the post-trade target reserve
/// to zero.
pub fn simulate_buy_impact(
    reserve_base: U256,
    reserve_target: U256,
    base_decimals: u8,
    target_decimals: u8,
    amount_in: U256,
) -> Option<PriceImpact> {
    let rb = scale(reserve_base, base_decimals);
    let rt = scale(reserve_target, target_decimals);
    if rt <= 0.0 {
        return None;
    }
    let price_before = rb / rt;

    // Constant product: k = rb * rt stays fixed while base flows in.
    let rb_after = rb + scale(amount_in, base_decimals);
    let rt_after = rb * rt / rb_after;
    if rt_after <= 0.0 {
        return None;
    }
    let price_after = rb_after / rt_after;

    let impact_pct = if price_before > 0.0 {
        (price_after - price_before) / price_before * 100.0
    } else {
        0.0
    };

    Some(PriceImpact {
        price_before,
        price_after,
        impact_pct,
    })
}

/// Victim's slippage tolerance from their declared out-minimum, as a
/// percentage of the currently quoted output. Clamped at zero: an
/// out-minimum above the quote means no tolerance, not negative
/// tolerance. Descriptive only — never gates evaluation.
pub fn slippage_tolerance(expected_output: f64, amount_out_min: f64) -> Option<f64> {
    if expected_output <= 0.0 {
        return None;
    }
    Some(((expected_output - amount_out_min) / expected_output * 100.0).max(0.0))
}

/// Analytically derive a front-run input size from the victim's trade
/// parameters and current reserves (raw units throughout).
///
/// `reserve_x` is the base-token reserve, `reserve_y` the target-token
/// reserve, `fee` the DEX fee multiplier (e.g. 0.9975 for 0.25%).
///
/// Returns None when no viable size exists: degenerate inputs, a victim
/// whose declared minimum is already unfavorable versus pool pricing, or
/// an algebraically undefined solution. The returned size is
/// `safety_margin` of the algebraic total — deliberately undershooting to
/// absorb estimation error in the victim's actual tolerance.
pub fn optimal_dx(
    victim_input: f64,
    min_tokens_out: f64,
    reserve_x: f64,
    reserve_y: f64,
    fee: f64,
    safety_margin: f64,
) -> Option<f64> {
    if victim_input <= 0.0
        || min_tokens_out <= 0.0
        || reserve_x <= 0.0
        || reserve_y <= 0.0
        || fee <= 0.0
    {
        return None;
    }

    let effective_price = reserve_y / reserve_x;
    let victim_price = victim_input / min_tokens_out;

    // The victim's floor price is already at or past the pool price:
    // there is no room to push the price and still clear their minimum.
    if victim_price >= effective_price {
        return None;
    }

    let denominator = (reserve_y / min_tokens_out) * fee - 1.0;
    if denominator <= 0.0 {
        return None;
    }

    let total_dx = victim_input / denominator;
    if total_dx <= 0.0 {
        return None;
    }

    Some(safety_margin * total_dx)
}

/// Gas price needed to (probabilistically) outbid the victim: their price
/// plus a configured overpayment fraction. A cost assumption only — the
/// node's actual ordering policy is not modeled.
pub fn frontrun_gas_price(victim_gas_price: u128, overpayment: f64) -> u128 {
    (victim_gas_price as f64 * (1.0 + overpayment)) as u128
}

/// Simulate the front-run trade of `dx` raw base units against the
/// current reserves and net the proceeds against gas.
///
/// Tokens received are valued at the post-front-run pool price; gross
/// profit subtracts the input itself, net profit subtracts gas at the
/// overbid price. Returns None only when the shifted pool degenerates.
#[allow(clippy::too_many_arguments)]
pub fn estimate_profit(
    dx: f64,
    reserve_base: f64,
    reserve_target: f64,
    base_decimals: u8,
    target_decimals: u8,
    gas_limit: u64,
    gas_price: u128,
) -> Option<FrontrunPlan> {
    if dx <= 0.0 || reserve_base <= 0.0 || reserve_target <= 0.0 {
        return None;
    }

    let new_reserve_base = reserve_base + dx;
    let new_reserve_target = reserve_target * reserve_base / new_reserve_base;
    let tokens_received = reserve_target - new_reserve_target;

    let base_unit = 10f64.powi(base_decimals as i32);
    let target_unit = 10f64.powi(target_decimals as i32);

    let new_base_scaled = new_reserve_base / base_unit;
    let new_target_scaled = new_reserve_target / target_unit;
    if new_target_scaled <= 0.0 {
        return None;
    }
    let price_after_frontrun = new_base_scaled / new_target_scaled;

    let tokens_received_scaled = tokens_received / target_unit;
    let value_received = tokens_received_scaled * price_after_frontrun;

    let dx_scaled = dx / base_unit;
    let gross_profit = value_received - dx_scaled;

    // Gas is paid in the native token; the base token is assumed to be
    // its wrapped form, so both sides of the subtraction share units.
    let gas_cost = gas_limit as f64 * gas_price as f64 / base_unit;
    let net_profit = gross_profit - gas_cost;

    Some(FrontrunPlan {
        optimal_input_raw: dx,
        optimal_input: dx_scaled,
        tokens_received: tokens_received_scaled,
        gas_price,
        gross_profit,
        gas_cost,
        net_profit,
    })
}
