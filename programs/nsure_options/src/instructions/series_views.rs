use anchor_lang::prelude::*;

use crate::instructions::SeriesView;
use crate::utils::math::OPTION_DECIMALS;

/// True once the current slot reaches the series' expiration slot
pub fn has_expired(ctx: Context<SeriesView>) -> Result<bool> {
    let current_slot = Clock::get()?.slot;
    Ok(ctx.accounts.series.has_expired(current_slot))
}

/// Option units are always 18-decimal, whatever the backing assets use
pub fn decimals(_ctx: Context<SeriesView>) -> Result<u8> {
    Ok(OPTION_DECIMALS)
}
