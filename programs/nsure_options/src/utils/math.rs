use anchor_lang::prelude::*;
use crate::errors::ErrorCode;

/// Every option series and LP ledger is denominated in 18 decimals,
/// whatever the decimals of the assets backing it.
pub const OPTION_DECIMALS: u8 = 18;

/// 1.0 in 18-decimal fixed point
pub const WAD: u128 = 1_000_000_000_000_000_000;

pub const BPS_DENOMINATOR: u128 = 10_000;

/// 0.3% swap fee
pub const DEFAULT_FEE_BPS: u16 = 30;

/// Which way a division result is rounded.
/// Amounts taken from a caller round up, amounts paid out round down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    Down,
    Up,
}

/// Full 256-bit product of two u128 values, returned as (high, low)
fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = u64::MAX as u128;

    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let lo_lo = a_lo * b_lo;
    let hi_lo = a_hi * b_lo;
    let lo_hi = a_lo * b_hi;
    let hi_hi = a_hi * b_hi;

    let cross = (lo_lo >> 64) + (hi_lo & MASK) + (lo_hi & MASK);
    let low = (cross << 64) | (lo_lo & MASK);
    let high = hi_hi + (hi_lo >> 64) + (lo_hi >> 64) + (cross >> 64);

    (high, low)
}

/// Divides the 256-bit value (high, low) by `divisor`.
/// Returns None when the quotient does not fit in u128.
fn div_wide(high: u128, low: u128, divisor: u128) -> Option<(u128, u128)> {
    if divisor == 0 || high >= divisor {
        return None;
    }

    let mut remainder = high;
    let mut quotient = 0u128;
    for bit in (0..128).rev() {
        let carry = remainder >> 127;
        remainder = (remainder << 1) | ((low >> bit) & 1);
        quotient <<= 1;
        if carry == 1 || remainder >= divisor {
            remainder = remainder.wrapping_sub(divisor);
            quotient |= 1;
        }
    }

    Some((quotient, remainder))
}

/// Computes `a × b / denominator` with a 256-bit intermediate product
///
/// Errors with MathOverflow if the denominator is zero or the result
/// does not fit in u128.
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> Result<u128> {
    require!(denominator > 0, ErrorCode::MathOverflow);

    let (high, low) = widening_mul(a, b);
    let (quotient, remainder) = if high == 0 {
        (low / denominator, low % denominator)
    } else {
        div_wide(high, low, denominator).ok_or(ErrorCode::MathOverflow)?
    };

    match rounding {
        Rounding::Up if remainder > 0 => Ok(quotient
            .checked_add(1)
            .ok_or(ErrorCode::MathOverflow)?),
        _ => Ok(quotient),
    }
}

/// Scale factor between the 18-decimal ledger and an asset with `decimals`
fn decimal_scale(decimals: u8) -> Result<u128> {
    require!(decimals <= OPTION_DECIMALS, ErrorCode::InvalidDecimals);
    Ok(10_u128.pow((OPTION_DECIMALS - decimals) as u32))
}

/// Converts an 18-decimal ledger amount into raw units of an SPL mint.
///
/// Example: 1.5 units (1_500_000_000_000_000_000) of a 6-decimal mint
/// is 1_500_000 raw units.
pub fn to_native(amount: u128, decimals: u8, rounding: Rounding) -> Result<u64> {
    let scale = decimal_scale(decimals)?;
    let native = mul_div(amount, 1, scale, rounding)?;
    u64::try_from(native).map_err(|_| error!(ErrorCode::MathOverflow))
}

/// Converts raw SPL units into the 18-decimal ledger denomination
pub fn from_native(amount: u64, decimals: u8) -> Result<u128> {
    let scale = decimal_scale(decimals)?;
    Ok((amount as u128)
        .checked_mul(scale)
        .ok_or(ErrorCode::MathOverflow)?)
}

/// Rounds an 18-decimal amount onto the grid of a mint's native decimals,
/// so that it converts to raw units without remainder
pub fn align_to_decimals(amount: u128, decimals: u8, rounding: Rounding) -> Result<u128> {
    let scale = decimal_scale(decimals)?;
    Ok(mul_div(amount, 1, scale, rounding)?
        .checked_mul(scale)
        .ok_or(ErrorCode::MathOverflow)?)
}

/// Calculates pro-rata share using the formula:
/// payout = (balance × part) / whole
///
/// Returns 0 if balance is 0 (nothing to distribute)
pub fn calculate_pro_rata_share(balance: u128, part: u128, whole: u128) -> Result<u128> {
    if balance == 0 || part == 0 {
        return Ok(0);
    }
    mul_div(balance, part, whole, Rounding::Down)
}

/// Strike-asset amount for `units` of underlying at a WAD-scaled strike price
/// Formula: units × strike_price / 10^18
pub fn calculate_strike_amount(units: u128, strike_price: u128, rounding: Rounding) -> Result<u128> {
    mul_div(units, strike_price, WAD, rounding)
}

/// Integer square root, rounded down (Newton's method)
pub fn isqrt(value: u128) -> u128 {
    if value < 2 {
        return value;
    }

    let bits = 128 - value.leading_zeros();
    let mut x = 1u128 << ((bits + 1) / 2);
    let mut y = (x + value / x) / 2;
    while y < x {
        x = y;
        y = (x + value / x) / 2;
    }
    x
}

/// floor(sqrt(a × b)) without materializing the 256-bit product
pub fn sqrt_product(a: u128, b: u128) -> Result<u128> {
    if a == 0 || b == 0 {
        return Ok(0);
    }

    // Starts at or above the root so Newton's iteration descends onto it
    let mut x = (isqrt(a) + 1)
        .checked_mul(isqrt(b) + 1)
        .unwrap_or_else(|| a.max(b));
    loop {
        let q = mul_div(a, b, x, Rounding::Down)?;
        let y = x / 2 + q / 2 + ((x & 1) + (q & 1)) / 2;
        if y >= x {
            return Ok(x);
        }
        x = y;
    }
}
