use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::events::UnitsTransferred;
use crate::state::{move_units, Allowance, Holding, OptionSeries};
use crate::utils::{
    account,
    pda::{find_listed_pool, ALLOWANCE_SEED, HOLDING_SEED},
    validation::validate_recipient,
};

#[derive(Accounts)]
pub struct TransferUnits<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    /// CHECK: series or pool key the holdings belong to; only used as a seed
    pub ledger: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [HOLDING_SEED, ledger.key().as_ref(), owner.key().as_ref()],
        bump = from_holding.bump,
    )]
    pub from_holding: Box<Account<'info, Holding>>,

    /// CHECK: receiving wallet; only used as a seed
    pub recipient: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + Holding::INIT_SPACE,
        seeds = [HOLDING_SEED, ledger.key().as_ref(), recipient.key().as_ref()],
        bump
    )]
    pub to_holding: Box<Account<'info, Holding>>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct TransferUnitsFrom<'info> {
    #[account(mut)]
    pub spender: Signer<'info>,

    /// CHECK: series or pool key the holdings belong to; only used as a seed
    pub ledger: UncheckedAccount<'info>,

    /// CHECK: owner of the debited holding; only used as a seed
    pub owner: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [HOLDING_SEED, ledger.key().as_ref(), owner.key().as_ref()],
        bump = from_holding.bump,
    )]
    pub from_holding: Box<Account<'info, Holding>>,

    #[account(
        mut,
        seeds = [ALLOWANCE_SEED, from_holding.key().as_ref(), spender.key().as_ref()],
        bump = allowance.bump,
    )]
    pub allowance: Box<Account<'info, Allowance>>,

    /// CHECK: receiving wallet; only used as a seed
    pub recipient: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = spender,
        space = 8 + Holding::INIT_SPACE,
        seeds = [HOLDING_SEED, ledger.key().as_ref(), recipient.key().as_ref()],
        bump
    )]
    pub to_holding: Box<Account<'info, Holding>>,

    pub system_program: Program<'info, System>,
}

/// Pool whose reserve lives in a series ledger; LP ledgers have none
fn ledger_pool(ledger: &AccountInfo) -> Option<Pubkey> {
    account::load_optional::<OptionSeries>(ledger)
        .ok()
        .flatten()
        .map(|series| find_listed_pool(&series))
}

/// Moves option units or LP shares to another wallet. Never expiration-gated.
pub fn handler(mut ctx: Context<TransferUnits>, amount: u128) -> Result<()> {
    let ledger = ctx.accounts.ledger.key();
    let from = ctx.accounts.owner.key();
    let to = ctx.accounts.recipient.key();
    validate_recipient(&to, &ledger, ledger_pool(&ctx.accounts.ledger).as_ref())?;
    ctx.accounts
        .to_holding
        .bind(ledger, to, ctx.bumps.to_holding)?;

    if from == to {
        require!(
            ctx.accounts.from_holding.balance >= amount,
            ErrorCode::InsufficientBalance
        );
        return Ok(());
    }

    let accounts = &mut ctx.accounts;
    move_units(&mut accounts.from_holding, &mut accounts.to_holding, amount)?;

    msg!("Transferred {} units of {} from {} to {}", amount, ledger, from, to);

    emit!(UnitsTransferred {
        ledger,
        from,
        to,
        amount,
    });

    Ok(())
}

/// Moves units out of `owner`'s holding on the strength of an allowance
pub fn transfer_from_handler(mut ctx: Context<TransferUnitsFrom>, amount: u128) -> Result<()> {
    let ledger = ctx.accounts.ledger.key();
    let from = ctx.accounts.owner.key();
    let to = ctx.accounts.recipient.key();
    validate_recipient(&to, &ledger, ledger_pool(&ctx.accounts.ledger).as_ref())?;
    ctx.accounts
        .to_holding
        .bind(ledger, to, ctx.bumps.to_holding)?;

    let accounts = &mut ctx.accounts;
    accounts.allowance.spend(amount)?;
    require!(
        accounts.from_holding.balance >= amount,
        ErrorCode::InsufficientBalance
    );
    if from == to {
        return Ok(());
    }
    move_units(&mut accounts.from_holding, &mut accounts.to_holding, amount)?;

    msg!(
        "{} transferred {} units of {} from {} to {}. Allowance left: {}",
        accounts.spender.key(),
        amount,
        ledger,
        from,
        to,
        accounts.allowance.amount
    );

    emit!(UnitsTransferred {
        ledger,
        from,
        to,
        amount,
    });

    Ok(())
}
