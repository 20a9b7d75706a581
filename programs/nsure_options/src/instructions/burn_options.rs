use anchor_lang::prelude::*;

use crate::events::OptionsBurned;
use crate::instructions::SeriesContext;
use crate::utils::{
    math::{to_native, Rounding},
    pda::SeriesSignerSeeds,
    token::pay_out,
};

/// Burns units the caller holds and returns the collateral they locked for
/// them. Only available before expiration; afterwards writers redeem.
pub fn handler(mut ctx: Context<SeriesContext>, amount: u128) -> Result<()> {
    let current_slot = Clock::get()?.slot;
    ctx.accounts
        .bind_caller(ctx.bumps.writer_position, ctx.bumps.holding)?;

    let accounts = &mut ctx.accounts;

    // 1. Bookkeeping first: writer share, locked collateral, supply, holding
    let collateral = accounts.series.burn(
        &mut accounts.writer_position,
        &mut accounts.holding,
        amount,
        current_slot,
    )?;
    if amount == 0 {
        return Ok(());
    }

    // 2. Release the collateral (series PDA signs for its vault)
    let native_collateral = to_native(
        collateral,
        accounts.series.collateral_decimals(),
        Rounding::Down,
    )?;
    let seeds = SeriesSignerSeeds::new(&accounts.series);
    let series_seeds = seeds.as_seeds();
    pay_out(
        &accounts.token_program,
        accounts.collateral_vault.to_account_info(),
        &accounts.collateral_mint,
        &accounts.user_collateral_account,
        accounts.series.to_account_info(),
        &[&series_seeds[..]],
        native_collateral,
    )?;

    msg!(
        "Burned {} options. Released collateral: {}. Writer share left: {}",
        amount,
        native_collateral,
        accounts.writer_position.collateral
    );

    emit!(OptionsBurned {
        series: accounts.series.key(),
        writer: accounts.user.key(),
        units: amount,
        collateral,
    });

    Ok(())
}
