use cosmwasm_std::{Decimal, StdError, StdResult, Uint128};

/// Upper bound for the house fee: 50%.
pub const MAX_HOUSE_FEE_BPS: u16 = 5_000;

const BPS_DENOMINATOR: u128 = 10_000;

/// Result of splitting a prize pool between the winner and the house.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrizeSplit {
    pub payout: Uint128,
    pub house_cut: Uint128,
}

/// Split `prize_pool` into the winner payout and the house cut.
///
/// `house_cut = floor(prize_pool * fee_bps / 10000)`; the remainder goes to
/// the winner, so rounding always favours the winner.
pub fn split_prize(prize_pool: Uint128, fee_bps: u16) -> StdResult<PrizeSplit> {
    if fee_bps > MAX_HOUSE_FEE_BPS {
        return Err(StdError::generic_err(format!(
            "house fee {} bps exceeds maximum {}",
            fee_bps, MAX_HOUSE_FEE_BPS
        )));
    }
    let house_cut = prize_pool.multiply_ratio(fee_bps as u128, BPS_DENOMINATOR);
    let payout = prize_pool.checked_sub(house_cut)?;
    Ok(PrizeSplit { payout, house_cut })
}

/// Render a base-unit amount as a decimal string, e.g. `25_000_000` with 9
/// decimals becomes `"0.025"`.
pub fn format_units(amount: Uint128, decimals: u8) -> StdResult<String> {
    if decimals as u32 > Decimal::DECIMAL_PLACES {
        return Err(StdError::generic_err(format!(
            "cannot format amount with {} decimals",
            decimals
        )));
    }
    let value = Decimal::from_atomics(amount, decimals as u32)
        .map_err(|e| StdError::generic_err(format!("cannot format amount: {}", e)))?;
    Ok(value.to_string())
}
