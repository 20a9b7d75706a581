use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::events::SeriesCreated;
use crate::state::{OptionKind, OptionSeries, SeriesInit};
use crate::utils::pda::{SERIES_SEED, STRIKE_VAULT_SEED, UNDERLYING_VAULT_SEED};

/// Terms of a standalone Put or Call series
#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct SeriesParams {
    pub kind: OptionKind,
    pub name: String,
    pub symbol: String,
    pub strike_price: u128,
    pub expiration_slot: u64,
    /// Controller/target address carried by calls
    pub target: Pubkey,
}

#[derive(Accounts)]
#[instruction(params: SeriesParams)]
pub struct CreateSeries<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    pub underlying_mint: Box<InterfaceAccount<'info, Mint>>,

    pub strike_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        payer = authority,
        space = 8 + OptionSeries::INIT_SPACE,
        seeds = [
            SERIES_SEED,
            authority.key().as_ref(),
            underlying_mint.key().as_ref(),
            strike_mint.key().as_ref(),
            params.strike_price.to_le_bytes().as_ref(),
            params.expiration_slot.to_le_bytes().as_ref(),
            &[params.kind as u8],
        ],
        bump
    )]
    pub series: Box<Account<'info, OptionSeries>>,

    #[account(
        init,
        payer = authority,
        seeds = [UNDERLYING_VAULT_SEED, series.key().as_ref()],
        bump,
        token::mint = underlying_mint,
        token::authority = series,
        token::token_program = token_program,
    )]
    pub underlying_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init,
        payer = authority,
        seeds = [STRIKE_VAULT_SEED, series.key().as_ref()],
        bump,
        token::mint = strike_mint,
        token::authority = series,
        token::token_program = token_program,
    )]
    pub strike_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<CreateSeries>, params: SeriesParams) -> Result<()> {
    let current_slot = Clock::get()?.slot;
    let series_key = ctx.accounts.series.key();

    let series = &mut ctx.accounts.series;
    series.initialize(
        SeriesInit {
            authority: ctx.accounts.authority.key(),
            kind: params.kind,
            name: params.name,
            symbol: params.symbol,
            underlying_mint: ctx.accounts.underlying_mint.key(),
            underlying_decimals: ctx.accounts.underlying_mint.decimals,
            strike_mint: ctx.accounts.strike_mint.key(),
            strike_decimals: ctx.accounts.strike_mint.decimals,
            strike_price: params.strike_price,
            expiration_slot: params.expiration_slot,
            issuance_rate: 1,
            target: params.target,
            underlying_vault: ctx.accounts.underlying_vault.key(),
            strike_vault: ctx.accounts.strike_vault.key(),
            bump: ctx.bumps.series,
        },
        current_slot,
    )?;

    msg!(
        "Created {:?} series {} ({}): {} @ {} in {} expiring at slot {}",
        series.kind,
        series.name,
        series.symbol,
        series.underlying_mint,
        series.strike_price,
        series.strike_mint,
        series.expiration_slot
    );

    emit!(SeriesCreated {
        series: series_key,
        authority: series.authority,
        kind: series.kind,
        underlying_mint: series.underlying_mint,
        strike_mint: series.strike_mint,
        strike_price: series.strike_price,
        expiration_slot: series.expiration_slot,
        issuance_rate: series.issuance_rate,
    });

    Ok(())
}
