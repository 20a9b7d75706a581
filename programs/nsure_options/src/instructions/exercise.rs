use anchor_lang::prelude::*;

use crate::events::OptionsExercised;
use crate::instructions::SeriesContext;
use crate::utils::{
    math::{to_native, Rounding},
    pda::SeriesSignerSeeds,
    token::{pay_out, pull_from},
};

/// Exercises `amount` units at the strike
///
/// Put: holder delivers underlying, receives amount × strike of the strike
/// asset. Call: holder pays amount × strike of the strike asset, receives
/// underlying. Any holder may exercise, whoever wrote the units.
pub fn handler(mut ctx: Context<SeriesContext>, amount: u128) -> Result<()> {
    let current_slot = Clock::get()?.slot;
    ctx.accounts
        .bind_caller(ctx.bumps.writer_position, ctx.bumps.holding)?;

    let accounts = &mut ctx.accounts;

    // 1. Burn the units and move the series totals
    let exercise = accounts
        .series
        .exercise(&mut accounts.holding, amount, current_slot)?;
    if amount == 0 {
        return Ok(());
    }

    let counter_in = to_native(
        exercise.counter_in,
        accounts.series.counter_decimals(),
        Rounding::Up,
    )?;
    let collateral_out = to_native(
        exercise.collateral_out,
        accounts.series.collateral_decimals(),
        Rounding::Down,
    )?;
    let seeds = SeriesSignerSeeds::new(&accounts.series);
    let series_seeds = seeds.as_seeds();

    // 2. Pull the counter asset from the holder (series PDA signs as delegate)
    pull_from(
        &accounts.token_program,
        &accounts.user_counter_account,
        &accounts.user.key(),
        &accounts.counter_mint,
        accounts.counter_vault.to_account_info(),
        accounts.series.to_account_info(),
        &[&series_seeds[..]],
        counter_in,
    )?;

    // 3. Pay the collateral out of the vault
    pay_out(
        &accounts.token_program,
        accounts.collateral_vault.to_account_info(),
        &accounts.collateral_mint,
        &accounts.user_collateral_account,
        accounts.series.to_account_info(),
        &[&series_seeds[..]],
        collateral_out,
    )?;

    msg!(
        "Exercised {} options. Paid in: {}. Received: {}. Total supply: {}",
        amount,
        counter_in,
        collateral_out,
        accounts.series.total_supply
    );

    emit!(OptionsExercised {
        series: accounts.series.key(),
        holder: accounts.user.key(),
        units: amount,
        counter_in: exercise.counter_in,
        collateral_out: exercise.collateral_out,
    });

    Ok(())
}
