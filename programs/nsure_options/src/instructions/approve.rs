use anchor_lang::prelude::*;

use crate::events::AllowanceSet;
use crate::state::{Allowance, Holding};
use crate::utils::pda::{ALLOWANCE_SEED, HOLDING_SEED};

#[derive(Accounts)]
pub struct ApproveUnits<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    /// CHECK: series or pool key the holding belongs to; only used as a seed
    pub ledger: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + Holding::INIT_SPACE,
        seeds = [HOLDING_SEED, ledger.key().as_ref(), owner.key().as_ref()],
        bump
    )]
    pub holding: Box<Account<'info, Holding>>,

    /// CHECK: wallet or program address being approved; only used as a seed
    pub spender: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + Allowance::INIT_SPACE,
        seeds = [ALLOWANCE_SEED, holding.key().as_ref(), spender.key().as_ref()],
        bump
    )]
    pub allowance: Box<Account<'info, Allowance>>,

    pub system_program: Program<'info, System>,
}

/// Sets (replaces) how many units `spender` may move out of the caller's holding
pub fn handler(ctx: Context<ApproveUnits>, amount: u128) -> Result<()> {
    let ledger = ctx.accounts.ledger.key();
    let owner = ctx.accounts.owner.key();
    let spender = ctx.accounts.spender.key();
    let holding_key = ctx.accounts.holding.key();

    ctx.accounts
        .holding
        .bind(ledger, owner, ctx.bumps.holding)?;

    let allowance = &mut ctx.accounts.allowance;
    allowance.holding = holding_key;
    allowance.spender = spender;
    allowance.amount = amount;
    allowance.bump = ctx.bumps.allowance;

    msg!("Approved {} to move {} units of {} for {}", spender, amount, ledger, owner);

    emit!(AllowanceSet {
        ledger,
        owner,
        spender,
        amount,
    });

    Ok(())
}
