use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::utils::account;

/// One owner's balance in a fungible ledger
///
/// The ledger key is the option series for option units and the pool for LP
/// shares. Balances are 18-decimal fixed point.
///
/// PDA Seeds: "holding", ledger, owner
#[account]
#[derive(Default, InitSpace)]
pub struct Holding {
    pub ledger: Pubkey,
    pub owner: Pubkey,
    pub balance: u128,
    pub bump: u8,
}

impl Holding {
    /// Fills in a freshly created holding, or checks an existing one belongs
    /// to `ledger` and `owner`.
    pub fn bind(&mut self, ledger: Pubkey, owner: Pubkey, bump: u8) -> Result<()> {
        if self.ledger == Pubkey::default() {
            self.ledger = ledger;
            self.owner = owner;
            self.balance = 0;
            self.bump = bump;
            return Ok(());
        }

        require_keys_eq!(self.ledger, ledger, ErrorCode::InvalidHolding);
        require_keys_eq!(self.owner, owner, ErrorCode::InvalidHolding);
        Ok(())
    }

    /// Balance stored at `info`; a holding that was never created reads as zero
    pub fn balance_at(info: &AccountInfo) -> Result<u128> {
        Ok(account::load_optional::<Holding>(info)?.map_or(0, |holding| holding.balance))
    }

    pub fn credit(&mut self, amount: u128) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: u128) -> Result<()> {
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(ErrorCode::InsufficientBalance)?;
        Ok(())
    }
}

/// Moves `amount` between two holdings of the same ledger
pub fn move_units(from: &mut Holding, to: &mut Holding, amount: u128) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    require_keys_eq!(from.ledger, to.ledger, ErrorCode::InvalidHolding);

    from.debit(amount)?;
    to.credit(amount)
}

/// Adds freshly issued units to a holding and to the ledger's supply
pub fn issue(supply: &mut u128, to: &mut Holding, amount: u128) -> Result<()> {
    *supply = supply.checked_add(amount).ok_or(ErrorCode::MathOverflow)?;
    to.credit(amount)
}

/// Destroys units held in `from`, shrinking the ledger's supply
pub fn retire(supply: &mut u128, from: &mut Holding, amount: u128) -> Result<()> {
    from.debit(amount)?;
    *supply = supply.checked_sub(amount).ok_or(ErrorCode::MathOverflow)?;
    Ok(())
}

/// Amount `spender` may move out of `holding` on the owner's behalf
///
/// PDA Seeds: "allowance", holding, spender
#[account]
#[derive(Default, InitSpace)]
pub struct Allowance {
    pub holding: Pubkey,
    pub spender: Pubkey,
    pub amount: u128,
    pub bump: u8,
}

impl Allowance {
    pub fn spend(&mut self, amount: u128) -> Result<()> {
        self.amount = self
            .amount
            .checked_sub(amount)
            .ok_or(ErrorCode::InsufficientAllowance)?;
        Ok(())
    }
}
