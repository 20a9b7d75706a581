use anchor_lang::prelude::*;

use crate::events::CollateralRedeemed;
use crate::instructions::SeriesContext;
use crate::utils::{
    math::{to_native, Rounding},
    pda::SeriesSignerSeeds,
    token::pay_out,
};

/// Post-expiry: pays the caller their pro-rata share of the remaining
/// collateral and of the counter asset collected through exercise
///
/// Share = writer collateral / total writer collateral. The caller's claim
/// is cleared, so a second call pays nothing.
pub fn handler(mut ctx: Context<SeriesContext>) -> Result<()> {
    let current_slot = Clock::get()?.slot;
    ctx.accounts
        .bind_caller(ctx.bumps.writer_position, ctx.bumps.holding)?;

    let accounts = &mut ctx.accounts;

    // 1. Clear the claim and shrink the totals
    let redemption = accounts
        .series
        .redeem(&mut accounts.writer_position, current_slot)?;

    let collateral_out = to_native(
        redemption.collateral_out,
        accounts.series.collateral_decimals(),
        Rounding::Down,
    )?;
    let counter_out = to_native(
        redemption.counter_out,
        accounts.series.counter_decimals(),
        Rounding::Down,
    )?;
    let seeds = SeriesSignerSeeds::new(&accounts.series);
    let series_seeds = seeds.as_seeds();

    // 2. Pay both sides out of the vaults
    pay_out(
        &accounts.token_program,
        accounts.collateral_vault.to_account_info(),
        &accounts.collateral_mint,
        &accounts.user_collateral_account,
        accounts.series.to_account_info(),
        &[&series_seeds[..]],
        collateral_out,
    )?;
    pay_out(
        &accounts.token_program,
        accounts.counter_vault.to_account_info(),
        &accounts.counter_mint,
        &accounts.user_counter_account,
        accounts.series.to_account_info(),
        &[&series_seeds[..]],
        counter_out,
    )?;

    msg!(
        "Redeemed {} collateral and {} counter asset. Locked collateral left: {}",
        collateral_out,
        counter_out,
        accounts.series.locked_collateral_total
    );

    emit!(CollateralRedeemed {
        series: accounts.series.key(),
        writer: accounts.user.key(),
        collateral_out: redemption.collateral_out,
        counter_out: redemption.counter_out,
    });

    Ok(())
}
