use anchor_lang::prelude::*;

use crate::state::{OptionKind, PoolAsset};

#[event]
pub struct SeriesCreated {
    pub series: Pubkey,
    pub authority: Pubkey,
    pub kind: OptionKind,
    pub underlying_mint: Pubkey,
    pub strike_mint: Pubkey,
    pub strike_price: u128,
    pub expiration_slot: u64,
    pub issuance_rate: u64,
}

#[event]
pub struct OptionsMinted {
    pub series: Pubkey,
    pub writer: Pubkey,
    pub units: u128,
    pub collateral: u128,
}

#[event]
pub struct OptionsBurned {
    pub series: Pubkey,
    pub writer: Pubkey,
    pub units: u128,
    pub collateral: u128,
}

#[event]
pub struct OptionsExercised {
    pub series: Pubkey,
    pub holder: Pubkey,
    pub units: u128,
    pub counter_in: u128,
    pub collateral_out: u128,
}

#[event]
pub struct CollateralRedeemed {
    pub series: Pubkey,
    pub writer: Pubkey,
    pub collateral_out: u128,
    pub counter_out: u128,
}

#[event]
pub struct UnitsTransferred {
    pub ledger: Pubkey,
    pub from: Pubkey,
    pub to: Pubkey,
    pub amount: u128,
}

#[event]
pub struct AllowanceSet {
    pub ledger: Pubkey,
    pub owner: Pubkey,
    pub spender: Pubkey,
    pub amount: u128,
}

/// Emitted by every admin setter on the controller
#[event]
pub struct GridUpdated {
    pub controller: Pubkey,
    pub expirations: Vec<u64>,
    pub strikes: Vec<u128>,
    pub underlying_mint: Pubkey,
    pub issuance_rate: u64,
    pub price_reference: Pubkey,
}

#[event]
pub struct MarketListed {
    pub controller: Pubkey,
    pub market: Pubkey,
    pub series: Pubkey,
    pub expiration_slot: u64,
    pub strike_price: u128,
}

#[event]
pub struct LiquidityAdded {
    pub pool: Pubkey,
    pub provider: Pubkey,
    pub option_in: u128,
    pub settlement_in: u128,
    pub shares: u128,
}

#[event]
pub struct LiquidityRemoved {
    pub pool: Pubkey,
    pub provider: Pubkey,
    pub option_out: u128,
    pub settlement_out: u128,
    pub shares: u128,
}

#[event]
pub struct Swapped {
    pub pool: Pubkey,
    pub trader: Pubkey,
    pub asset_in: PoolAsset,
    pub amount_in: u128,
    pub amount_out: u128,
}
