use anchor_lang::prelude::*;

use crate::events::OptionsMinted;
use crate::instructions::SeriesContext;
use crate::utils::{
    math::{to_native, Rounding},
    pda::SeriesSignerSeeds,
    token::pull_from,
};

/// Writes `amount` option units against freshly locked collateral
///
/// The caller must have approved the series PDA as delegate on their
/// collateral token account for at least the required collateral.
pub fn handler(mut ctx: Context<SeriesContext>, amount: u128) -> Result<()> {
    let current_slot = Clock::get()?.slot;
    ctx.accounts
        .bind_caller(ctx.bumps.writer_position, ctx.bumps.holding)?;

    let accounts = &mut ctx.accounts;

    // 1. Bookkeeping: writer share, locked collateral, supply, holding
    let collateral = accounts.series.mint(
        &mut accounts.writer_position,
        &mut accounts.holding,
        amount,
        current_slot,
    )?;
    if amount == 0 {
        return Ok(());
    }

    // 2. Pull the collateral into the vault (series PDA signs as delegate)
    let native_collateral = to_native(
        collateral,
        accounts.series.collateral_decimals(),
        Rounding::Up,
    )?;
    let seeds = SeriesSignerSeeds::new(&accounts.series);
    let series_seeds = seeds.as_seeds();
    pull_from(
        &accounts.token_program,
        &accounts.user_collateral_account,
        &accounts.user.key(),
        &accounts.collateral_mint,
        accounts.collateral_vault.to_account_info(),
        accounts.series.to_account_info(),
        &[&series_seeds[..]],
        native_collateral,
    )?;

    msg!(
        "Minted {} options for {} collateral. Writer share: {}. Total supply: {}",
        amount,
        native_collateral,
        accounts.writer_position.collateral,
        accounts.series.total_supply
    );

    emit!(OptionsMinted {
        series: accounts.series.key(),
        writer: accounts.user.key(),
        units: amount,
        collateral,
    });

    Ok(())
}
