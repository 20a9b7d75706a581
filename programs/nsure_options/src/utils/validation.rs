use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

use crate::errors::ErrorCode;
use crate::utils::math::OPTION_DECIMALS;

pub const MAX_NAME_LEN: usize = 32;
pub const MAX_SYMBOL_LEN: usize = 10;
pub const MAX_GRID_LEN: usize = 16;

/// Validates that expiration lies after the current slot
pub fn validate_expiration(expiration_slot: u64, current_slot: u64) -> Result<()> {
    require!(expiration_slot > current_slot, ErrorCode::ExpirationInPast);
    Ok(())
}

/// Validates that strike price is non-zero
pub fn validate_strike_price(strike_price: u128) -> Result<()> {
    require!(strike_price > 0, ErrorCode::InvalidStrikePrice);
    Ok(())
}

pub fn validate_issuance_rate(issuance_rate: u64) -> Result<()> {
    require!(issuance_rate >= 1, ErrorCode::InvalidIssuanceRate);
    Ok(())
}

/// Assets must not be finer-grained than the option ledger
pub fn validate_decimals(decimals: u8) -> Result<()> {
    require!(decimals <= OPTION_DECIMALS, ErrorCode::InvalidDecimals);
    Ok(())
}

pub fn validate_metadata(name: &str, symbol: &str) -> Result<()> {
    require!(name.len() <= MAX_NAME_LEN, ErrorCode::InvalidName);
    require!(symbol.len() <= MAX_SYMBOL_LEN, ErrorCode::InvalidName);
    Ok(())
}

pub fn validate_grid_len(len: usize) -> Result<()> {
    require!(len <= MAX_GRID_LEN, ErrorCode::GridTooLarge);
    Ok(())
}

/// Validates that the option has not expired (for pre-expiry operations)
pub fn validate_not_expired(expiration_slot: u64, current_slot: u64) -> Result<()> {
    require!(current_slot < expiration_slot, ErrorCode::OptionExpired);
    Ok(())
}

/// Validates that the option has expired (for post-expiry operations)
pub fn validate_expired(expiration_slot: u64, current_slot: u64) -> Result<()> {
    require!(current_slot >= expiration_slot, ErrorCode::OptionNotExpired);
    Ok(())
}

/// Checks that `spender` may pull `required` raw units out of `account` on
/// behalf of `holder`.
///
/// The program pulls external assets as the account's SPL delegate, so an
/// approval for the spender PDA must be in place before the call. The
/// delegate is shared by every caller, so the account must also belong to
/// the signer the pull is credited to.
pub fn validate_pull(
    account: &TokenAccount,
    holder: &Pubkey,
    spender: &Pubkey,
    required: u64,
) -> Result<()> {
    validate_token_owner(&account.owner, holder)?;
    validate_delegated_funds(
        Option::<Pubkey>::from(account.delegate),
        account.delegated_amount,
        account.amount,
        spender,
        required,
    )
}

pub fn validate_token_owner(owner: &Pubkey, holder: &Pubkey) -> Result<()> {
    require_keys_eq!(*owner, *holder, ErrorCode::InvalidTokenOwner);
    Ok(())
}

/// Allowance is checked before balance, as an ERC-20 style transferFrom would.
pub fn validate_delegated_funds(
    delegate: Option<Pubkey>,
    delegated_amount: u64,
    balance: u64,
    spender: &Pubkey,
    required: u64,
) -> Result<()> {
    if required == 0 {
        return Ok(());
    }

    require!(
        delegate == Some(*spender) && delegated_amount >= required,
        ErrorCode::InsufficientAllowance
    );
    require!(balance >= required, ErrorCode::InsufficientBalance);
    Ok(())
}

/// Units held by a ledger itself or by the ledger's pool outside a deposit
/// would sit in no reserve and could never move again
pub fn validate_recipient(recipient: &Pubkey, ledger: &Pubkey, pool: Option<&Pubkey>) -> Result<()> {
    require_keys_neq!(*recipient, *ledger, ErrorCode::InvalidRecipient);
    if let Some(pool) = pool {
        require_keys_neq!(*recipient, *pool, ErrorCode::InvalidRecipient);
    }
    Ok(())
}

/// Validates sufficient vault balance for a payout
pub fn validate_vault_balance(vault_balance: u64, required: u64) -> Result<()> {
    require!(vault_balance >= required, ErrorCode::InsufficientCollateral);
    Ok(())
}
