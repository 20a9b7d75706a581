use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::errors::ErrorCode;
use crate::events::Swapped;
use crate::state::{move_units, Holding, LiquidityPool, OptionController, OptionMarket, PoolAsset};
use crate::utils::{
    account,
    math::{to_native, Rounding},
    pda::{HOLDING_SEED, MARKET_SEED, POOL_SEED, POOL_VAULT_SEED},
    token::{pay_out, pull_from},
};

/// The pool side is passed unchecked and loaded in the handler, so a key
/// that was never listed reports UnknownMarket before anything else.
#[derive(Accounts)]
#[instruction(expiration_slot: u64, strike_price: u128)]
pub struct Swap<'info> {
    #[account(mut)]
    pub trader: Signer<'info>,

    pub controller: Box<Account<'info, OptionController>>,

    /// CHECK: registry entry for the key; loaded in the handler
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

    /// CHECK: pool's option reserve in the series ledger; loaded in the handler
    #[account(
        mut,
        seeds = [HOLDING_SEED, series.key().as_ref(), pool.key().as_ref()],
        bump
    )]
    pub pool_units: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = trader,
        space = 8 + Holding::INIT_SPACE,
        seeds = [HOLDING_SEED, series.key().as_ref(), trader.key().as_ref()],
        bump
    )]
    pub trader_units: Box<Account<'info, Holding>>,

    #[account(
        mut,
        constraint = trader_settlement_account.mint == settlement_mint.key() @ ErrorCode::InvalidSettlementMint,
        constraint = trader_settlement_account.owner == trader.key() @ ErrorCode::InvalidTokenOwner
    )]
    pub trader_settlement_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

/// Trades option units for settlement asset or the reverse against the
/// key's pool
pub fn handler(
    mut ctx: Context<Swap>,
    _expiration_slot: u64,
    _strike_price: u128,
    asset_in: PoolAsset,
    amount_in: u128,
    min_amount_out: u128,
) -> Result<()> {
    let accounts = &mut ctx.accounts;
    let market_key = accounts.market.key();
    let pool_key = accounts.pool.key();
    let series_key = accounts.series.key();
    let trader_key = accounts.trader.key();

    let market = OptionMarket::load(&accounts.market)?;

    // A listed key whose pool was never funded has nothing to trade against
    let Some(mut pool) = account::load_optional::<LiquidityPool>(&accounts.pool)? else {
        return err!(ErrorCode::InsufficientLiquidity);
    };
    require_keys_eq!(market.pool, pool_key, ErrorCode::UnknownMarket);
    pool.validate_accounts(
        series_key,
        accounts.settlement_mint.key(),
        accounts.pool_vault.key(),
    )?;
    let mut pool_units = account::load_optional::<Holding>(&accounts.pool_units)?
        .ok_or_else(|| error!(ErrorCode::InvalidHolding))?;

    accounts
        .trader_units
        .bind(series_key, trader_key, ctx.bumps.trader_units)?;

    // 1. Reserves and the option-unit leg
    let trade = pool.swap(asset_in, amount_in, min_amount_out)?;
    match trade.asset_in {
        PoolAsset::OptionUnits => {
            move_units(&mut accounts.trader_units, &mut pool_units, trade.amount_in)?
        }
        PoolAsset::Settlement => {
            move_units(&mut pool_units, &mut accounts.trader_units, trade.amount_out)?
        }
    }
    account::store(&pool, &accounts.pool)?;
    account::store(&pool_units, &accounts.pool_units)?;

    // 2. Settlement leg through the pool vault (pool PDA signs)
    let bump = [pool.bump];
    let signer_seeds: &[&[&[u8]]] = &[&[POOL_SEED, market_key.as_ref(), &bump]];
    match trade.asset_in {
        PoolAsset::OptionUnits => {
            let settlement_out =
                to_native(trade.amount_out, pool.settlement_decimals, Rounding::Down)?;
            pay_out(
                &accounts.token_program,
                accounts.pool_vault.to_account_info(),
                &accounts.settlement_mint,
                &accounts.trader_settlement_account,
                accounts.pool.to_account_info(),
                signer_seeds,
                settlement_out,
            )?;
        }
        PoolAsset::Settlement => {
            let settlement_in = to_native(trade.amount_in, pool.settlement_decimals, Rounding::Up)?;
            pull_from(
                &accounts.token_program,
                &accounts.trader_settlement_account,
                &trader_key,
                &accounts.settlement_mint,
                accounts.pool_vault.to_account_info(),
                accounts.pool.to_account_info(),
                signer_seeds,
                settlement_in,
            )?;
        }
    }

    msg!(
        "Swapped {} {:?} for {}. Reserves: {} / {}",
        trade.amount_in,
        trade.asset_in,
        trade.amount_out,
        pool.reserve_option,
        pool.reserve_settlement
    );

    emit!(Swapped {
        pool: pool_key,
        trader: trader_key,
        asset_in: trade.asset_in,
        amount_in: trade.amount_in,
        amount_out: trade.amount_out,
    });

    Ok(())
}
