use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::utils::account;
use crate::utils::validation::{validate_grid_len, validate_issuance_rate, validate_strike_price};

/// Admin-owned factory configuration
///
/// PDA Seeds: "controller", admin
///
/// The grids start empty; `create_option` only accepts keys found in both.
/// Changing the underlying, rate or price reference only affects series
/// created afterwards.
#[account]
#[derive(Default, InitSpace)]
pub struct OptionController {
    pub admin: Pubkey,
    pub settlement_mint: Pubkey,
    pub underlying_mint: Pubkey,
    pub issuance_rate: u64,
    pub price_reference: Pubkey,
    #[max_len(16)]
    pub expirations: Vec<u64>,
    #[max_len(16)]
    pub strikes: Vec<u128>,
    pub market_count: u64,
    pub bump: u8,
}

impl OptionController {
    pub fn initialize(
        &mut self,
        admin: Pubkey,
        settlement_mint: Pubkey,
        underlying_mint: Pubkey,
        price_reference: Pubkey,
        issuance_rate: u64,
        bump: u8,
    ) -> Result<()> {
        validate_issuance_rate(issuance_rate)?;

        self.admin = admin;
        self.settlement_mint = settlement_mint;
        self.underlying_mint = underlying_mint;
        self.issuance_rate = issuance_rate;
        self.price_reference = price_reference;
        self.expirations = Vec::new();
        self.strikes = Vec::new();
        self.market_count = 0;
        self.bump = bump;
        Ok(())
    }

    pub fn require_admin(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(self.admin, *signer, ErrorCode::Unauthorized);
        Ok(())
    }

    pub fn set_expirations(&mut self, expirations: Vec<u64>) -> Result<()> {
        validate_grid_len(expirations.len())?;
        self.expirations = expirations;
        Ok(())
    }

    pub fn set_strikes(&mut self, strikes: Vec<u128>) -> Result<()> {
        validate_grid_len(strikes.len())?;
        for strike in &strikes {
            validate_strike_price(*strike)?;
        }
        self.strikes = strikes;
        Ok(())
    }

    pub fn set_issuance_rate(&mut self, issuance_rate: u64) -> Result<()> {
        validate_issuance_rate(issuance_rate)?;
        self.issuance_rate = issuance_rate;
        Ok(())
    }

    /// Validates that (expiration, strike) sits on the configured grid
    pub fn validate_key(&self, expiration_slot: u64, strike_price: u128) -> Result<()> {
        require!(
            self.expirations.contains(&expiration_slot) && self.strikes.contains(&strike_price),
            ErrorCode::GridMismatch
        );
        Ok(())
    }
}

/// Registry entry for one (expiration, strike) key
///
/// PDA Seeds: "market", controller, expiration_slot, strike_price
///
/// Append-only: the series and pool are each recorded once and never
/// reassigned.
#[account]
#[derive(Debug, Default, InitSpace)]
pub struct OptionMarket {
    pub controller: Pubkey,
    pub expiration_slot: u64,
    pub strike_price: u128,
    pub series: Pubkey,
    pub pool: Pubkey,
    pub bump: u8,
}

impl OptionMarket {
    /// Fills in a freshly created entry. Returns true if this call listed it.
    pub fn bind(
        &mut self,
        controller: Pubkey,
        expiration_slot: u64,
        strike_price: u128,
        bump: u8,
    ) -> Result<bool> {
        if self.controller == Pubkey::default() {
            self.controller = controller;
            self.expiration_slot = expiration_slot;
            self.strike_price = strike_price;
            self.series = Pubkey::default();
            self.pool = Pubkey::default();
            self.bump = bump;
            return Ok(true);
        }

        require_keys_eq!(self.controller, controller, ErrorCode::UnknownMarket);
        require!(
            self.expiration_slot == expiration_slot && self.strike_price == strike_price,
            ErrorCode::UnknownMarket
        );
        Ok(false)
    }

    /// Reads the entry at `info`. A key that was never listed has no account
    /// behind its address and fails with UnknownMarket.
    pub fn load(info: &AccountInfo) -> Result<Self> {
        OptionMarket::load_optional(info)?.ok_or_else(|| error!(ErrorCode::UnknownMarket))
    }

    /// Like `load`, but an unlisted key reads as `None`
    pub fn load_optional(info: &AccountInfo) -> Result<Option<Self>> {
        account::load_optional(info)
    }

    pub fn store(&self, info: &AccountInfo) -> Result<()> {
        account::store(self, info)
    }

    pub fn record_series(&mut self, series: Pubkey) -> Result<()> {
        if self.series == Pubkey::default() {
            self.series = series;
            return Ok(());
        }
        require_keys_eq!(self.series, series, ErrorCode::InvalidOptionSeries);
        Ok(())
    }

    pub fn record_pool(&mut self, pool: Pubkey) -> Result<()> {
        if self.pool == Pubkey::default() {
            self.pool = pool;
            return Ok(());
        }
        require_keys_eq!(self.pool, pool, ErrorCode::UnknownMarket);
        Ok(())
    }
}
