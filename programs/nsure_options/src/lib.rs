use anchor_lang::prelude::*;

use instructions::*;
use state::PoolAsset;

pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

declare_id!("D89wehdREG4Y4QGRGazd7ZPzh7kgPsnC6bnhkE2mTNPT");

#[program]
pub mod nsure_options {
    use super::*;

    // === OPTION SERIES ===

    /// CreateSeries: standalone Put or Call series + its two vaults
    pub fn create_series(ctx: Context<CreateSeries>, params: SeriesParams) -> Result<()> {
        instructions::create_series::handler(ctx, params)
    }

    /// Mint: lock collateral → credit option units
    pub fn mint(ctx: Context<SeriesContext>, amount: u128) -> Result<()> {
        instructions::mint_options::handler(ctx, amount)
    }

    /// Burn: writer burns held units → collateral back (before expiry)
    pub fn burn(ctx: Context<SeriesContext>, amount: u128) -> Result<()> {
        instructions::burn_options::handler(ctx, amount)
    }

    /// Exercise: burn units, deliver counter asset → receive collateral
    pub fn exercise(ctx: Context<SeriesContext>, amount: u128) -> Result<()> {
        instructions::exercise::handler(ctx, amount)
    }

    /// Redeem: post-expiry pro-rata of remaining collateral + counter asset
    pub fn redeem(ctx: Context<SeriesContext>) -> Result<()> {
        instructions::redeem::handler(ctx)
    }

    pub fn has_expired(ctx: Context<SeriesView>) -> Result<bool> {
        instructions::series_views::has_expired(ctx)
    }

    pub fn decimals(ctx: Context<SeriesView>) -> Result<u8> {
        instructions::series_views::decimals(ctx)
    }

    // === LEDGER (option units and LP shares) ===

    pub fn transfer(ctx: Context<TransferUnits>, amount: u128) -> Result<()> {
        instructions::transfer::handler(ctx, amount)
    }

    pub fn approve(ctx: Context<ApproveUnits>, amount: u128) -> Result<()> {
        instructions::approve::handler(ctx, amount)
    }

    pub fn transfer_from(ctx: Context<TransferUnitsFrom>, amount: u128) -> Result<()> {
        instructions::transfer::transfer_from_handler(ctx, amount)
    }

    // === CONTROLLER ===

    pub fn initialize_controller(
        ctx: Context<InitializeController>,
        issuance_rate: u64,
    ) -> Result<()> {
        instructions::initialize_controller::handler(ctx, issuance_rate)
    }

    /// Replaces the allowed expiration slots (admin only)
    pub fn set_deadline(ctx: Context<Configure>, expirations: Vec<u64>) -> Result<()> {
        instructions::configure::set_deadline(ctx, expirations)
    }

    /// Replaces the allowed strike prices (admin only)
    pub fn set_target(ctx: Context<Configure>, strikes: Vec<u128>) -> Result<()> {
        instructions::configure::set_target(ctx, strikes)
    }

    pub fn set_underlying_asset(ctx: Context<SetUnderlyingAsset>) -> Result<()> {
        instructions::configure::set_underlying_asset(ctx)
    }

    pub fn set_option_rate(ctx: Context<Configure>, issuance_rate: u64) -> Result<()> {
        instructions::configure::set_option_rate(ctx, issuance_rate)
    }

    pub fn set_price_reference(ctx: Context<SetPriceReference>) -> Result<()> {
        instructions::configure::set_price_reference(ctx)
    }

    /// CreateOption: list the key if needed, then write calls on it
    pub fn create_option(
        ctx: Context<CreateOption>,
        expiration_slot: u64,
        strike_price: u128,
        collateral: u128,
    ) -> Result<()> {
        instructions::create_option::handler(ctx, expiration_slot, strike_price, collateral)
    }

    pub fn add_liquidity(
        ctx: Context<AddLiquidity>,
        expiration_slot: u64,
        strike_price: u128,
        option_amount: u128,
        settlement_amount: u128,
        min_option: u128,
        min_settlement: u128,
    ) -> Result<()> {
        instructions::add_liquidity::handler(
            ctx,
            expiration_slot,
            strike_price,
            option_amount,
            settlement_amount,
            min_option,
            min_settlement,
        )
    }

    pub fn remove_liquidity(
        ctx: Context<RemoveLiquidity>,
        expiration_slot: u64,
        strike_price: u128,
        shares: u128,
    ) -> Result<()> {
        instructions::remove_liquidity::handler(ctx, expiration_slot, strike_price, shares)
    }

    pub fn swap(
        ctx: Context<Swap>,
        expiration_slot: u64,
        strike_price: u128,
        asset_in: PoolAsset,
        amount_in: u128,
        min_amount_out: u128,
    ) -> Result<()> {
        instructions::swap::handler(
            ctx,
            expiration_slot,
            strike_price,
            asset_in,
            amount_in,
            min_amount_out,
        )
    }

    // === VIEWS ===

    pub fn get_option_address(
        ctx: Context<MarketView>,
        expiration_slot: u64,
        strike_price: u128,
    ) -> Result<Pubkey> {
        instructions::market_views::option_address(ctx, expiration_slot, strike_price)
    }

    pub fn get_option_balance(
        ctx: Context<MarketBalanceView>,
        expiration_slot: u64,
        strike_price: u128,
        account: Pubkey,
    ) -> Result<u128> {
        instructions::market_views::option_balance(ctx, expiration_slot, strike_price, account)
    }

    pub fn get_option_lp_balance(
        ctx: Context<MarketBalanceView>,
        expiration_slot: u64,
        strike_price: u128,
        account: Pubkey,
    ) -> Result<u128> {
        instructions::market_views::option_lp_balance(ctx, expiration_slot, strike_price, account)
    }

    pub fn get_deadlines(ctx: Context<ControllerView>) -> Result<Vec<u64>> {
        instructions::market_views::deadlines(ctx)
    }

    pub fn get_targets(ctx: Context<ControllerView>) -> Result<Vec<u128>> {
        instructions::market_views::targets(ctx)
    }

    pub fn get_option_rate(ctx: Context<ControllerView>) -> Result<u64> {
        instructions::market_views::option_rate(ctx)
    }

    pub fn get_price_reference(ctx: Context<ControllerView>) -> Result<Pubkey> {
        instructions::market_views::price_reference(ctx)
    }
}
