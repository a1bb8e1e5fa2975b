//! Calldata Decoder
//!
//! Purpose:
//!     Match a pending transaction against the known V2 router swap
//!     variants and extract a canonical SwapIntent.
//!
//! Notes:
//!     - The `sol!`-generated calls enum is the whole signature table:
//!       the match below is exhaustive, so an unrecognized selector can
//!       only surface as a decode error (→ `unsupported`), never as a
//!       silent fallthrough.
//!     - ETH-input variants take amount_in from the transaction value;
//!       exact-output variants substitute the desired output for the
//!       out-minimum and the max-input (or value) for the input.

use std::collections::HashSet;

use alloy::primitives::Address;
use alloy::sol_types::SolInterface;

use crate::contracts::IUniswapV2Router02::IUniswapV2Router02Calls;
use crate::error::SkipReason;
use crate::types::{PendingTx, SwapIntent};

/// Decode a pending transaction into a swap intent.
///
/// `routers` is the configured router address set; transactions to any
/// other destination are `not-router`. All failure modes are expected
/// terminal outcomes, reported as `SkipReason`.
pub fn decode_swap(tx: &PendingTx, routers: &HashSet<Address>) -> Result<SwapIntent, SkipReason> {
    let to = tx.to.ok_or(SkipReason::NotRouter)?;
    if !routers.contains(&to) {
        return Err(SkipReason::NotRouter);
    }

    let call =
        IUniswapV2Router02Calls::abi_decode(&tx.input).map_err(|_| SkipReason::Unsupported)?;

    use IUniswapV2Router02Calls as C;
    let (function, amount_in, amount_out_min, path) = match call {
        // Exact-input, native in: amount_in is the transaction value.
        C::swapExactETHForTokens(c) => {
            ("swapExactETHForTokens", tx.value, c.amountOutMin, c.path)
        }
        C::swapExactETHForTokensSupportingFeeOnTransferTokens(c) => (
            "swapExactETHForTokensSupportingFeeOnTransferTokens",
            tx.value,
            c.amountOutMin,
            c.path,
        ),
        // Exact-output, native in: desired output proxies the out-minimum.
        C::swapETHForExactTokens(c) => ("swapETHForExactTokens", tx.value, c.amountOut, c.path),

        // Exact-input, token in.
        C::swapExactTokensForETH(c) => {
            ("swapExactTokensForETH", c.amountIn, c.amountOutMin, c.path)
        }
        C::swapExactTokensForETHSupportingFeeOnTransferTokens(c) => (
            "swapExactTokensForETHSupportingFeeOnTransferTokens",
            c.amountIn,
            c.amountOutMin,
            c.path,
        ),
        C::swapExactTokensForTokens(c) => {
            ("swapExactTokensForTokens", c.amountIn, c.amountOutMin, c.path)
        }
        C::swapExactTokensForTokensSupportingFeeOnTransferTokens(c) => (
            "swapExactTokensForTokensSupportingFeeOnTransferTokens",
            c.amountIn,
            c.amountOutMin,
            c.path,
        ),

        // Exact-output, token in: max-input is the input bound.
        C::swapTokensForExactETH(c) => {
            ("swapTokensForExactETH", c.amountInMax, c.amountOut, c.path)
        }
        C::swapTokensForExactTokens(c) => {
            ("swapTokensForExactTokens", c.amountInMax, c.amountOut, c.path)
        }

        // Router function, but not a swap.
        C::getAmountsOut(_) => return Err(SkipReason::Unsupported),
    };

    if amount_in.is_zero() || amount_out_min.is_zero() || path.len() < 2 {
        return Err(SkipReason::Invalid);
    }

    Ok(SwapIntent {
        function,
        amount_in,
        amount_out_min,
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, Bytes, TxHash, U256};
    use alloy::sol_types::SolCall;

    use crate::contracts::IUniswapV2Router02 as Router;

    const ROUTER: Address = address!("10ED43C718714eb63d5aA57B78B54704E256024E");
    const WBNB: Address = address!("BB4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c");
    const TOKEN: Address = address!("1111111111111111111111111111111111111111");
    const TRADER: Address = address!("2222222222222222222222222222222222222222");

    fn routers() -> HashSet<Address> {
        [ROUTER].into_iter().collect()
    }

    fn pending(to: Option<Address>, input: Vec<u8>, value: U256) -> PendingTx {
        PendingTx {
            hash: TxHash::ZERO,
            to,
            input: Bytes::from(input),
            value,
            gas_price: 5_000_000_000,
            gas_limit: 300_000,
        }
    }

    #[test]
    fn decodes_swap_exact_eth_for_tokens() {
        let calldata = Router::swapExactETHForTokensCall {
            amountOutMin: U256::from(50u64),
            path: vec![WBNB, TOKEN],
            to: TRADER,
            deadline: U256::from(1u64),
        }
        .abi_encode();

        let tx = pending(Some(ROUTER), calldata, U256::from(1000u64));
        let intent = decode_swap(&tx, &routers()).unwrap();

        assert_eq!(intent.function, "swapExactETHForTokens");
        assert_eq!(intent.amount_in, U256::from(1000u64));
        assert_eq!(intent.amount_out_min, U256::from(50u64));
        assert_eq!(intent.path, vec![WBNB, TOKEN]);
    }

    #[test]
    fn decodes_swap_exact_tokens_for_tokens() {
        let calldata = Router::swapExactTokensForTokensCall {
            amountIn: U256::from(777u64),
            amountOutMin: U256::from(42u64),
            path: vec![TOKEN, WBNB],
            to: TRADER,
            deadline: U256::from(1u64),
        }
        .abi_encode();

        let tx = pending(Some(ROUTER), calldata, U256::ZERO);
        let intent = decode_swap(&tx, &routers()).unwrap();

        assert_eq!(intent.function, "swapExactTokensForTokens");
        assert_eq!(intent.amount_in, U256::from(777u64));
        assert_eq!(intent.amount_out_min, U256::from(42u64));
    }

    #[test]
    fn decodes_swap_exact_tokens_for_eth_fee_on_transfer() {
        let calldata = Router::swapExactTokensForETHSupportingFeeOnTransferTokensCall {
            amountIn: U256::from(9u64),
            amountOutMin: U256::from(3u64),
            path: vec![TOKEN, WBNB],
            to: TRADER,
            deadline: U256::from(1u64),
        }
        .abi_encode();

        let tx = pending(Some(ROUTER), calldata, U256::ZERO);
        let intent = decode_swap(&tx, &routers()).unwrap();

        assert_eq!(
            intent.function,
            "swapExactTokensForETHSupportingFeeOnTransferTokens"
        );
        assert_eq!(intent.amount_in, U256::from(9u64));
        assert_eq!(intent.amount_out_min, U256::from(3u64));
    }

    #[test]
    fn decodes_swap_exact_eth_for_tokens_fee_on_transfer() {
        let calldata = Router::swapExactETHForTokensSupportingFeeOnTransferTokensCall {
            amountOutMin: U256::from(70u64),
            path: vec![WBNB, TOKEN],
            to: TRADER,
            deadline: U256::from(1u64),
        }
        .abi_encode();

        let tx = pending(Some(ROUTER), calldata, U256::from(2000u64));
        let intent = decode_swap(&tx, &routers()).unwrap();

        assert_eq!(
            intent.function,
            "swapExactETHForTokensSupportingFeeOnTransferTokens"
        );
        assert_eq!(intent.amount_in, U256::from(2000u64));
        assert_eq!(intent.amount_out_min, U256::from(70u64));
        assert_eq!(intent.path, vec![WBNB, TOKEN]);
    }

    #[test]
    fn decodes_swap_exact_tokens_for_tokens_fee_on_transfer() {
        let calldata = Router::swapExactTokensForTokensSupportingFeeOnTransferTokensCall {
            amountIn: U256::from(13u64),
            amountOutMin: U256::from(4u64),
            path: vec![WBNB, TOKEN],
            to: TRADER,
            deadline: U256::from(1u64),
        }
        .abi_encode();

        let tx = pending(Some(ROUTER), calldata, U256::ZERO);
        let intent = decode_swap(&tx, &routers()).unwrap();

        assert_eq!(
            intent.function,
            "swapExactTokensForTokensSupportingFeeOnTransferTokens"
        );
        assert_eq!(intent.amount_in, U256::from(13u64));
        assert_eq!(intent.amount_out_min, U256::from(4u64));
    }

    #[test]
    fn exact_output_variants_normalize_fields() {
        // swapTokensForExactTokens: amountInMax → amount_in, amountOut → amount_out_min
        let calldata = Router::swapTokensForExactTokensCall {
            amountOut: U256::from(100u64),
            amountInMax: U256::from(250u64),
            path: vec![TOKEN, WBNB],
            to: TRADER,
            deadline: U256::from(1u64),
        }
        .abi_encode();

        let tx = pending(Some(ROUTER), calldata, U256::ZERO);
        let intent = decode_swap(&tx, &routers()).unwrap();
        assert_eq!(intent.amount_in, U256::from(250u64));
        assert_eq!(intent.amount_out_min, U256::from(100u64));

        // swapETHForExactTokens: value → amount_in, amountOut → amount_out_min
        let calldata = Router::swapETHForExactTokensCall {
            amountOut: U256::from(60u64),
            path: vec![WBNB, TOKEN],
            to: TRADER,
            deadline: U256::from(1u64),
        }
        .abi_encode();

        let tx = pending(Some(ROUTER), calldata, U256::from(31u64));
        let intent = decode_swap(&tx, &routers()).unwrap();
        assert_eq!(intent.function, "swapETHForExactTokens");
        assert_eq!(intent.amount_in, U256::from(31u64));
        assert_eq!(intent.amount_out_min, U256::from(60u64));
    }

    #[test]
    fn decodes_swap_tokens_for_exact_eth() {
        let calldata = Router::swapTokensForExactETHCall {
            amountOut: U256::from(5u64),
            amountInMax: U256::from(11u64),
            path: vec![TOKEN, WBNB],
            to: TRADER,
            deadline: U256::from(1u64),
        }
        .abi_encode();

        let tx = pending(Some(ROUTER), calldata, U256::ZERO);
        let intent = decode_swap(&tx, &routers()).unwrap();
        assert_eq!(intent.function, "swapTokensForExactETH");
        assert_eq!(intent.amount_in, U256::from(11u64));
        assert_eq!(intent.amount_out_min, U256::from(5u64));
    }

    #[test]
    fn rejects_non_router_destination() {
        let tx = pending(Some(TOKEN), vec![0x7f, 0xf3, 0x6a, 0xb5], U256::from(1u64));
        assert_eq!(decode_swap(&tx, &routers()), Err(SkipReason::NotRouter));

        let tx = pending(None, vec![], U256::from(1u64));
        assert_eq!(decode_swap(&tx, &routers()), Err(SkipReason::NotRouter));
    }

    #[test]
    fn rejects_unknown_selector() {
        let tx = pending(Some(ROUTER), vec![0xde, 0xad, 0xbe, 0xef], U256::ZERO);
        assert_eq!(decode_swap(&tx, &routers()), Err(SkipReason::Unsupported));
    }

    #[test]
    fn rejects_non_swap_router_call() {
        let calldata = Router::getAmountsOutCall {
            amountIn: U256::from(1u64),
            path: vec![WBNB, TOKEN],
        }
        .abi_encode();
        let tx = pending(Some(ROUTER), calldata, U256::ZERO);
        assert_eq!(decode_swap(&tx, &routers()), Err(SkipReason::Unsupported));
    }

    #[test]
    fn rejects_zero_value_eth_swap() {
        let calldata = Router::swapExactETHForTokensCall {
            amountOutMin: U256::from(50u64),
            path: vec![WBNB, TOKEN],
            to: TRADER,
            deadline: U256::from(1u64),
        }
        .abi_encode();

        let tx = pending(Some(ROUTER), calldata, U256::ZERO);
        assert_eq!(decode_swap(&tx, &routers()), Err(SkipReason::Invalid));
    }

    #[test]
    fn rejects_zero_out_minimum() {
        let calldata = Router::swapExactTokensForTokensCall {
            amountIn: U256::from(5u64),
            amountOutMin: U256::ZERO,
            path: vec![TOKEN, WBNB],
            to: TRADER,
            deadline: U256::from(1u64),
        }
        .abi_encode();

        let tx = pending(Some(ROUTER), calldata, U256::ZERO);
        assert_eq!(decode_swap(&tx, &routers()), Err(SkipReason::Invalid));
    }

    #[test]
    fn rejects_short_path() {
        let calldata = Router::swapExactTokensForTokensCall {
            amountIn: U256::from(5u64),
            amountOutMin: U256::from(2u64),
            path: vec![TOKEN],
            to: TRADER,
            deadline: U256::from(1u64),
        }
        .abi_encode();

        let tx = pending(Some(ROUTER), calldata, U256::ZERO);
        assert_eq!(decode_swap(&tx, &routers()), Err(SkipReason::Invalid));
    }
}
