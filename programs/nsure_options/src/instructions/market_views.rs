use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::state::{Holding, OptionController, OptionMarket};
use crate::utils::pda::{find_holding, MARKET_SEED};

/// Controller configuration reads
#[derive(Accounts)]
pub struct ControllerView<'info> {
    pub controller: Box<Account<'info, OptionController>>,
}

/// Registry reads for one (expiration, strike) key
#[derive(Accounts)]
#[instruction(expiration_slot: u64, strike_price: u128)]
pub struct MarketView<'info> {
    pub controller: Box<Account<'info, OptionController>>,

    /// CHECK: registry entry; an unlisted key has no account here
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
}

/// Registry reads of one wallet's balance under a key
#[derive(Accounts)]
#[instruction(expiration_slot: u64, strike_price: u128)]
pub struct MarketBalanceView<'info> {
    pub controller: Box<Account<'info, OptionController>>,

    /// CHECK: registry entry; an unlisted key has no account here
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

    /// CHECK: holding PDA of the queried wallet, checked against the ledger
    /// recorded in the market
    pub holding: UncheckedAccount<'info>,
}

/// Series listed for the key, or the default address if none
pub fn option_address(
    ctx: Context<MarketView>,
    _expiration_slot: u64,
    _strike_price: u128,
) -> Result<Pubkey> {
    Ok(OptionMarket::load_optional(&ctx.accounts.market)?
        .map(|market| market.series)
        .unwrap_or_default())
}

fn ledger_balance(holding: &AccountInfo, ledger: Pubkey, account: &Pubkey) -> Result<u128> {
    if ledger == Pubkey::default() {
        return Ok(0);
    }
    let (expected, _) = find_holding(&ledger, account);
    require_keys_eq!(*holding.key, expected, ErrorCode::InvalidHolding);
    Holding::balance_at(holding)
}

/// Option units `account` holds in the key's series
pub fn option_balance(
    ctx: Context<MarketBalanceView>,
    _expiration_slot: u64,
    _strike_price: u128,
    account: Pubkey,
) -> Result<u128> {
    let series = OptionMarket::load_optional(&ctx.accounts.market)?
        .map(|market| market.series)
        .unwrap_or_default();
    ledger_balance(&ctx.accounts.holding, series, &account)
}

/// LP shares `account` holds in the key's pool
pub fn option_lp_balance(
    ctx: Context<MarketBalanceView>,
    _expiration_slot: u64,
    _strike_price: u128,
    account: Pubkey,
) -> Result<u128> {
    let pool = OptionMarket::load_optional(&ctx.accounts.market)?
        .map(|market| market.pool)
        .unwrap_or_default();
    ledger_balance(&ctx.accounts.holding, pool, &account)
}

pub fn deadlines(ctx: Context<ControllerView>) -> Result<Vec<u64>> {
    Ok(ctx.accounts.controller.expirations.clone())
}

pub fn targets(ctx: Context<ControllerView>) -> Result<Vec<u128>> {
    Ok(ctx.accounts.controller.strikes.clone())
}

pub fn option_rate(ctx: Context<ControllerView>) -> Result<u64> {
    Ok(ctx.accounts.controller.issuance_rate)
}

pub fn price_reference(ctx: Context<ControllerView>) -> Result<Pubkey> {
    Ok(ctx.accounts.controller.price_reference)
}
