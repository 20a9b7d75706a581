use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::errors::ErrorCode;
use crate::events::LiquidityRemoved;
use crate::state::{move_units, Holding, LiquidityPool, OptionController, OptionMarket};
use crate::utils::{
    account,
    math::{to_native, Rounding},
    pda::{HOLDING_SEED, MARKET_SEED, POOL_SEED, POOL_VAULT_SEED},
    token::pay_out,
};

#[derive(Accounts)]
#[instruction(expiration_slot: u64, strike_price: u128)]
pub struct RemoveLiquidity<'info> {
    #[account(mut)]
    pub provider: Signer<'info>,

    pub controller: Box<Account<'info, OptionController>>,

    /// CHECK: registry entry for the key; loaded in the handler so an
    /// unlisted key reports UnknownMarket
    #[account(
        seeds = [
            MARKET_SEED,
            controller.key().as_ref(),
            expiration_slot.to_le_bytes().as_ref(),
            strike_price.to_le_bytes().as_ref(),
        ],
        bump
    )]
    pub market: UncheckedAccount<'info>,

    /// CHECK: the key's pool; loaded in the handler
    #[account(
        mut,
        seeds = [POOL_SEED, market.key().as_ref()],
        bump
    )]
    pub pool: UncheckedAccount<'info>,

    /// CHECK: matched against the pool's series in the handler
    pub series: UncheckedAccount<'info>,

    #[account(address = controller.settlement_mint @ ErrorCode::InvalidSettlementMint)]
    pub settlement_mint: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: pool's settlement vault; matched against the pool in the handler
    #[account(
        mut,
        seeds = [POOL_VAULT_SEED, pool.key().as_ref()],
        bump
    )]
    pub pool_vault: UncheckedAccount<'info>,

    /// CHECK: provider's LP shares; loaded in the handler
    #[account(
        mut,
        seeds = [HOLDING_SEED, pool.key().as_ref(), provider.key().as_ref()],
        bump
    )]
    pub provider_shares: UncheckedAccount<'info>,

    /// CHECK: pool's option reserve in the series ledger; loaded in the handler
    #[account(
        mut,
        seeds = [HOLDING_SEED, series.key().as_ref(), pool.key().as_ref()],
        bump
    )]
    pub pool_units: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = provider,
        space = 8 + Holding::INIT_SPACE,
        seeds = [HOLDING_SEED, series.key().as_ref(), provider.key().as_ref()],
        bump
    )]
    pub provider_units: Box<Account<'info, Holding>>,

    #[account(
        mut,
        constraint = provider_settlement_account.mint == settlement_mint.key() @ ErrorCode::InvalidSettlementMint
    )]
    pub provider_settlement_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

/// Burns LP shares for a pro-rata slice of both reserves
pub fn handler(
    mut ctx: Context<RemoveLiquidity>,
    _expiration_slot: u64,
    _strike_price: u128,
    shares: u128,
) -> Result<()> {
    let accounts = &mut ctx.accounts;
    let market_key = accounts.market.key();
    let pool_key = accounts.pool.key();
    let series_key = accounts.series.key();
    let provider_key = accounts.provider.key();

    let market = OptionMarket::load(&accounts.market)?;
    if shares == 0 {
        return Ok(());
    }

    // Nobody holds shares in a pool that was never funded
    let Some(mut pool) = account::load_optional::<LiquidityPool>(&accounts.pool)? else {
        return err!(ErrorCode::InsufficientShares);
    };
    require_keys_eq!(market.pool, pool_key, ErrorCode::UnknownMarket);
    pool.validate_accounts(
        series_key,
        accounts.settlement_mint.key(),
        accounts.pool_vault.key(),
    )?;
    let mut provider_shares = account::load_optional::<Holding>(&accounts.provider_shares)?
        .ok_or_else(|| error!(ErrorCode::InsufficientShares))?;
    let mut pool_units = account::load_optional::<Holding>(&accounts.pool_units)?
        .ok_or_else(|| error!(ErrorCode::InvalidHolding))?;

    accounts
        .provider_units
        .bind(series_key, provider_key, ctx.bumps.provider_units)?;

    // 1. Reserves, LP shares and the option-unit leg
    let withdrawal = pool.remove_liquidity(&mut provider_shares, shares)?;
    move_units(
        &mut pool_units,
        &mut accounts.provider_units,
        withdrawal.option_out,
    )?;
    account::store(&pool, &accounts.pool)?;
    account::store(&provider_shares, &accounts.provider_shares)?;
    account::store(&pool_units, &accounts.pool_units)?;

    // 2. Settlement leg out of the pool vault
    let settlement_out = to_native(
        withdrawal.settlement_out,
        pool.settlement_decimals,
        Rounding::Down,
    )?;
    let bump = [pool.bump];
    let signer_seeds: &[&[&[u8]]] = &[&[POOL_SEED, market_key.as_ref(), &bump]];
    pay_out(
        &accounts.token_program,
        accounts.pool_vault.to_account_info(),
        &accounts.settlement_mint,
        &accounts.provider_settlement_account,
        accounts.pool.to_account_info(),
        signer_seeds,
        settlement_out,
    )?;

    msg!(
        "Removed {} shares for {} options, {} settlement. LP supply: {}",
        shares,
        withdrawal.option_out,
        settlement_out,
        pool.lp_total_supply
    );

    emit!(LiquidityRemoved {
        pool: pool_key,
        provider: provider_key,
        option_out: withdrawal.option_out,
        settlement_out: withdrawal.settlement_out,
        shares,
    });

    Ok(())
}
