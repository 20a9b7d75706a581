use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::errors::ErrorCode;
use crate::events::{MarketListed, OptionsMinted, SeriesCreated};
use crate::state::{
    Holding, OptionController, OptionKind, OptionMarket, OptionSeries, SeriesInit, WriterPosition,
};
use crate::utils::{
    math::{to_native, Rounding},
    pda::{
        SeriesSignerSeeds, HOLDING_SEED, MARKET_SEED, SERIES_SEED, STRIKE_VAULT_SEED,
        UNDERLYING_VAULT_SEED, WRITER_SEED,
    },
    token::pull_from,
};

pub const LISTED_SERIES_NAME: &str = "NsureCallToken";
pub const LISTED_SERIES_SYMBOL: &str = "NCALL";

#[derive(Accounts)]
#[instruction(expiration_slot: u64, strike_price: u128)]
pub struct CreateOption<'info> {
    #[account(mut)]
    pub writer: Signer<'info>,

    #[account(mut)]
    pub controller: Box<Account<'info, OptionController>>,

    /// Registry entry, created by the first caller for this key
    #[account(
        init_if_needed,
        payer = writer,
        space = 8 + OptionMarket::INIT_SPACE,
        seeds = [
            MARKET_SEED,
            controller.key().as_ref(),
            expiration_slot.to_le_bytes().as_ref(),
            strike_price.to_le_bytes().as_ref(),
        ],
        bump
    )]
    pub market: Box<Account<'info, OptionMarket>>,

    /// Controller's underlying when the series is first created; the
    /// series' own underlying afterwards
    pub underlying_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(address = controller.settlement_mint @ ErrorCode::InvalidSettlementMint)]
    pub settlement_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = writer,
        space = 8 + OptionSeries::INIT_SPACE,
        seeds = [
            SERIES_SEED,
            controller.key().as_ref(),
            underlying_mint.key().as_ref(),
            settlement_mint.key().as_ref(),
            strike_price.to_le_bytes().as_ref(),
            expiration_slot.to_le_bytes().as_ref(),
            &[OptionKind::Call as u8],
        ],
        bump
    )]
    pub series: Box<Account<'info, OptionSeries>>,

    #[account(
        init_if_needed,
        payer = writer,
        seeds = [UNDERLYING_VAULT_SEED, series.key().as_ref()],
        bump,
        token::mint = underlying_mint,
        token::authority = series,
        token::token_program = token_program,
    )]
    pub underlying_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = writer,
        seeds = [STRIKE_VAULT_SEED, series.key().as_ref()],
        bump,
        token::mint = settlement_mint,
        token::authority = series,
        token::token_program = token_program,
    )]
    pub strike_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = writer,
        space = 8 + WriterPosition::INIT_SPACE,
        seeds = [WRITER_SEED, series.key().as_ref(), writer.key().as_ref()],
        bump
    )]
    pub writer_position: Box<Account<'info, WriterPosition>>,

    #[account(
        init_if_needed,
        payer = writer,
        space = 8 + Holding::INIT_SPACE,
        seeds = [HOLDING_SEED, series.key().as_ref(), writer.key().as_ref()],
        bump
    )]
    pub holding: Box<Account<'info, Holding>>,

    #[account(
        mut,
        constraint = writer_underlying_account.mint == underlying_mint.key() @ ErrorCode::InvalidUnderlyingMint,
        constraint = writer_underlying_account.owner == writer.key() @ ErrorCode::InvalidTokenOwner
    )]
    pub writer_underlying_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

/// Writes call options on a grid key, listing the key and creating its
/// series on first use
///
/// `collateral` is the amount of underlying locked (18-decimal); the writer
/// receives `collateral × issuance_rate` option units. The writer must have
/// approved the series PDA as delegate on their underlying account.
pub fn handler(
    mut ctx: Context<CreateOption>,
    expiration_slot: u64,
    strike_price: u128,
    collateral: u128,
) -> Result<()> {
    let current_slot = Clock::get()?.slot;
    let accounts = &mut ctx.accounts;
    let controller_key = accounts.controller.key();
    let market_key = accounts.market.key();
    let series_key = accounts.series.key();
    let writer_key = accounts.writer.key();

    accounts.controller.validate_key(expiration_slot, strike_price)?;

    // Registry entry and series are created once per key
    let listed = accounts
        .market
        .bind(controller_key, expiration_slot, strike_price, ctx.bumps.market)?;
    if accounts.series.authority == Pubkey::default() {
        require_keys_eq!(
            accounts.underlying_mint.key(),
            accounts.controller.underlying_mint,
            ErrorCode::InvalidUnderlyingMint
        );
        accounts.series.initialize(
            SeriesInit {
                authority: controller_key,
                kind: OptionKind::Call,
                name: LISTED_SERIES_NAME.to_string(),
                symbol: LISTED_SERIES_SYMBOL.to_string(),
                underlying_mint: accounts.underlying_mint.key(),
                underlying_decimals: accounts.underlying_mint.decimals,
                strike_mint: accounts.settlement_mint.key(),
                strike_decimals: accounts.settlement_mint.decimals,
                strike_price,
                expiration_slot,
                issuance_rate: accounts.controller.issuance_rate,
                target: accounts.controller.price_reference,
                underlying_vault: accounts.underlying_vault.key(),
                strike_vault: accounts.strike_vault.key(),
                bump: ctx.bumps.series,
            },
            current_slot,
        )?;

        msg!(
            "Created call series {} for slot {} @ {}",
            series_key,
            expiration_slot,
            strike_price
        );
        emit!(SeriesCreated {
            series: series_key,
            authority: controller_key,
            kind: OptionKind::Call,
            underlying_mint: accounts.series.underlying_mint,
            strike_mint: accounts.series.strike_mint,
            strike_price,
            expiration_slot,
            issuance_rate: accounts.series.issuance_rate,
        });
    }
    accounts.market.record_series(series_key)?;

    if listed {
        accounts.controller.market_count = accounts
            .controller
            .market_count
            .checked_add(1)
            .ok_or(ErrorCode::MathOverflow)?;

        msg!("Listed market {} ({} markets)", market_key, accounts.controller.market_count);
        emit!(MarketListed {
            controller: controller_key,
            market: market_key,
            series: series_key,
            expiration_slot,
            strike_price,
        });
    }

    // 1. Mint through the series path: writer share, locked collateral, supply
    accounts
        .writer_position
        .bind(series_key, writer_key, ctx.bumps.writer_position)?;
    accounts
        .holding
        .bind(series_key, writer_key, ctx.bumps.holding)?;

    let units = accounts.series.units_for_collateral(collateral)?;
    let locked = accounts.series.mint(
        &mut accounts.writer_position,
        &mut accounts.holding,
        units,
        current_slot,
    )?;
    if units == 0 {
        return Ok(());
    }

    // 2. Pull the underlying (series PDA signs as delegate)
    let native_collateral = to_native(
        locked,
        accounts.series.collateral_decimals(),
        Rounding::Up,
    )?;
    let seeds = SeriesSignerSeeds::new(&accounts.series);
    let series_seeds = seeds.as_seeds();
    pull_from(
        &accounts.token_program,
        &accounts.writer_underlying_account,
        &writer_key,
        &accounts.underlying_mint,
        accounts.underlying_vault.to_account_info(),
        accounts.series.to_account_info(),
        &[&series_seeds[..]],
        native_collateral,
    )?;

    msg!(
        "Created {} options on {} for {} collateral",
        units,
        series_key,
        native_collateral
    );

    emit!(OptionsMinted {
        series: series_key,
        writer: writer_key,
        units,
        collateral: locked,
    });

    Ok(())
}
