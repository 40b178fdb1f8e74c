use alloy::primitives::{utils, U256};
use anyhow::anyhow;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::error::ToolError;

pub const ETHER_DECIMALS: u8 = 18;
pub const GWEI_DECIMALS: u8 = 9;

/// Scales an integer amount down by `10^decimals` and renders it as an exact
/// decimal string with trailing fractional zeros removed.
pub fn format_units(value: U256, decimals: u8) -> anyhow::Result<String> {
    let formatted = utils::format_units(value, decimals).map_err(|e| anyhow!("{e}"))?;
    Ok(match formatted.split_once('.') {
        Some((integer, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                integer.to_string()
            } else {
                format!("{integer}.{fraction}")
            }
        }
        None => formatted,
    })
}

pub fn format_ether(wei: U256) -> anyhow::Result<String> {
    format_units(wei, ETHER_DECIMALS)
}

pub fn format_gwei(wei: U256) -> anyhow::Result<String> {
    format_units(wei, GWEI_DECIMALS)
}

/// Parses a human-readable amount such as `"0.25"` into base units.
/// Digits beyond `decimals` are rounded half away from zero.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, ToolError> {
    let parsed = Decimal::from_str(amount.trim())
        .map_err(|e| ToolError::invalid(format!("invalid amount {amount:?}: {e}")))?;
    if parsed.is_sign_negative() && !parsed.is_zero() {
        return Err(ToolError::invalid(format!("amount {amount:?} is negative")));
    }

    let mut rounded = parsed.abs();
    if rounded.scale() > u32::from(decimals) {
        rounded = rounded
            .round_dp_with_strategy(u32::from(decimals), RoundingStrategy::MidpointAwayFromZero);
    }

    let mantissa = u128::try_from(rounded.mantissa())
        .map_err(|_| ToolError::invalid(format!("amount {amount:?} is out of range")))?;
    let shift = u32::from(decimals) - rounded.scale();
    let scale = U256::from(10u64).pow(U256::from(shift));
    U256::from(mantissa)
        .checked_mul(scale)
        .ok_or_else(|| ToolError::invalid(format!("amount {amount:?} overflows")))
}

pub fn parse_ether(amount: &str) -> Result<U256, ToolError> {
    parse_units(amount, ETHER_DECIMALS)
}
