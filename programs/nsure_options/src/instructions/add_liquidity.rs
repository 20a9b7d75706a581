use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::errors::ErrorCode;
use crate::events::LiquidityAdded;
use crate::state::{move_units, Holding, LiquidityPool, OptionController, OptionMarket, OptionSeries};
use crate::utils::{
    math::{to_native, Rounding},
    pda::{HOLDING_SEED, MARKET_SEED, POOL_SEED, POOL_VAULT_SEED},
    token::pull_from,
};

#[derive(Accounts)]
#[instruction(expiration_slot: u64, strike_price: u128)]
pub struct AddLiquidity<'info> {
    #[account(mut)]
    pub provider: Signer<'info>,

    pub controller: Box<Account<'info, OptionController>>,

    /// CHECK: registry entry for the key; loaded in the handler so an
    /// unlisted key reports UnknownMarket
    #[account(
        mut,
        seeds = [
            MARKET_SEED,
            controller.key().as_ref(),
            expiration_slot.to_le_bytes().as_ref(),
            strike_price.to_le_bytes().as_ref(),
        ],
        bump
    )]
    pub market: UncheckedAccount<'info>,

    pub series: Box<Account<'info, OptionSeries>>,

    #[account(
        init_if_needed,
        payer = provider,
        space = 8 + LiquidityPool::INIT_SPACE,
        seeds = [POOL_SEED, market.key().as_ref()],
        bump
    )]
    pub pool: Box<Account<'info, LiquidityPool>>,

    #[account(address = controller.settlement_mint @ ErrorCode::InvalidSettlementMint)]
    pub settlement_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = provider,
        seeds = [POOL_VAULT_SEED, pool.key().as_ref()],
        bump,
        token::mint = settlement_mint,
        token::authority = pool,
        token::token_program = token_program,
    )]
    pub pool_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Provider's option units in the series ledger
    #[account(
        mut,
        seeds = [HOLDING_SEED, series.key().as_ref(), provider.key().as_ref()],
        bump = provider_units.bump,
    )]
    pub provider_units: Box<Account<'info, Holding>>,

    /// Pool's option reserve in the series ledger
    #[account(
        init_if_needed,
        payer = provider,
        space = 8 + Holding::INIT_SPACE,
        seeds = [HOLDING_SEED, series.key().as_ref(), pool.key().as_ref()],
        bump
    )]
    pub pool_units: Box<Account<'info, Holding>>,

    /// Provider's LP shares in the pool ledger
    #[account(
        init_if_needed,
        payer = provider,
        space = 8 + Holding::INIT_SPACE,
        seeds = [HOLDING_SEED, pool.key().as_ref(), provider.key().as_ref()],
        bump
    )]
    pub provider_shares: Box<Account<'info, Holding>>,

    #[account(
        mut,
        constraint = provider_settlement_account.mint == settlement_mint.key() @ ErrorCode::InvalidSettlementMint,
        constraint = provider_settlement_account.owner == provider.key() @ ErrorCode::InvalidTokenOwner
    )]
    pub provider_settlement_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

/// Deposits option units and settlement asset into the key's pool,
/// creating the pool on first use
#[allow(clippy::too_many_arguments)]
pub fn handler(
    mut ctx: Context<AddLiquidity>,
    _expiration_slot: u64,
    _strike_price: u128,
    option_amount: u128,
    settlement_amount: u128,
    min_option: u128,
    min_settlement: u128,
) -> Result<()> {
    let accounts = &mut ctx.accounts;
    let market_key = accounts.market.key();
    let series_key = accounts.series.key();
    let pool_key = accounts.pool.key();
    let provider_key = accounts.provider.key();

    let mut market = OptionMarket::load(&accounts.market)?;
    require_keys_eq!(market.series, series_key, ErrorCode::InvalidOptionSeries);
    if market.pool == Pubkey::default() {
        market.record_pool(pool_key)?;
        market.store(&accounts.market)?;
    }
    require_keys_eq!(market.pool, pool_key, ErrorCode::UnknownMarket);

    accounts.pool.bind(
        market_key,
        series_key,
        accounts.settlement_mint.key(),
        accounts.settlement_mint.decimals,
        accounts.pool_vault.key(),
        ctx.bumps.pool,
    )?;
    accounts.pool_units.bind(series_key, pool_key, ctx.bumps.pool_units)?;
    accounts
        .provider_shares
        .bind(pool_key, provider_key, ctx.bumps.provider_shares)?;

    // 1. Reserves, LP shares and the option-unit leg
    let deposit = accounts.pool.add_liquidity(
        &mut accounts.provider_shares,
        option_amount,
        settlement_amount,
        min_option,
        min_settlement,
    )?;
    move_units(&mut accounts.provider_units, &mut accounts.pool_units, deposit.option_in)?;

    // 2. Settlement leg (pool PDA signs as delegate)
    let settlement_in = to_native(
        deposit.settlement_in,
        accounts.pool.settlement_decimals,
        Rounding::Up,
    )?;
    let bump = [accounts.pool.bump];
    let signer_seeds: &[&[&[u8]]] = &[&[POOL_SEED, market_key.as_ref(), &bump]];
    pull_from(
        &accounts.token_program,
        &accounts.provider_settlement_account,
        &provider_key,
        &accounts.settlement_mint,
        accounts.pool_vault.to_account_info(),
        accounts.pool.to_account_info(),
        signer_seeds,
        settlement_in,
    )?;

    msg!(
        "Added liquidity: {} options, {} settlement for {} shares. Reserves: {} / {}",
        deposit.option_in,
        settlement_in,
        deposit.shares,
        accounts.pool.reserve_option,
        accounts.pool.reserve_settlement
    );

    emit!(LiquidityAdded {
        pool: pool_key,
        provider: provider_key,
        option_in: deposit.option_in,
        settlement_in: deposit.settlement_in,
        shares: deposit.shares,
    });

    Ok(())
}
