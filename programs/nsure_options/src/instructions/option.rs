use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::errors::ErrorCode;
use crate::state::{Holding, OptionSeries, WriterPosition};
use crate::utils::pda::{HOLDING_SEED, WRITER_SEED};

/// Unified accounts struct for the series operations (mint, burn, exercise, redeem)
///
/// The client sends the OptionSeries PDA; mints and vaults are validated
/// against the values stored in it. The caller's writer position and
/// holding are created on first use.
#[derive(Accounts)]
pub struct SeriesContext<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(mut)]
    pub series: Box<Account<'info, OptionSeries>>,

    #[account(
        init_if_needed,
        payer = user,
        space = 8 + WriterPosition::INIT_SPACE,
        seeds = [WRITER_SEED, series.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub writer_position: Box<Account<'info, WriterPosition>>,

    #[account(
        init_if_needed,
        payer = user,
        space = 8 + Holding::INIT_SPACE,
        seeds = [HOLDING_SEED, series.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub holding: Box<Account<'info, Holding>>,

    /// Strike mint for puts, underlying mint for calls
    #[account(address = series.collateral_mint() @ ErrorCode::InvalidMint)]
    pub collateral_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Underlying mint for puts, strike mint for calls
    #[account(address = series.counter_mint() @ ErrorCode::InvalidMint)]
    pub counter_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, address = series.collateral_vault() @ ErrorCode::InvalidVault)]
    pub collateral_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = series.counter_vault() @ ErrorCode::InvalidVault)]
    pub counter_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = user_collateral_account.mint == collateral_mint.key() @ ErrorCode::InvalidMint,
        constraint = user_collateral_account.owner == user.key() @ ErrorCode::InvalidTokenOwner
    )]
    pub user_collateral_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = user_counter_account.mint == counter_mint.key() @ ErrorCode::InvalidMint,
        constraint = user_counter_account.owner == user.key() @ ErrorCode::InvalidTokenOwner
    )]
    pub user_counter_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

impl<'info> SeriesContext<'info> {
    /// Binds freshly created writer/holding accounts to this series and caller
    pub fn bind_caller(&mut self, writer_bump: u8, holding_bump: u8) -> Result<()> {
        let series = self.series.key();
        let user = self.user.key();
        self.writer_position.bind(series, user, writer_bump)?;
        self.holding.bind(series, user, holding_bump)
    }
}

/// Read-only access to a series for the view instructions
#[derive(Accounts)]
pub struct SeriesView<'info> {
    pub series: Box<Account<'info, OptionSeries>>,
}
