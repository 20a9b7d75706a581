use anchor_lang::prelude::*;
use anchor_spl::token_interface::Mint;

use crate::state::OptionController;
use crate::utils::pda::CONTROLLER_SEED;

#[derive(Accounts)]
pub struct InitializeController<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        init,
        payer = admin,
        space = 8 + OptionController::INIT_SPACE,
        seeds = [CONTROLLER_SEED, admin.key().as_ref()],
        bump
    )]
    pub controller: Box<Account<'info, OptionController>>,

    /// Asset option units trade against in the pools
    pub settlement_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Collateral for the call series this controller lists
    pub underlying_mint: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: external price reference, stored as an address only
    pub price_reference: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitializeController>, issuance_rate: u64) -> Result<()> {
    let controller = &mut ctx.accounts.controller;
    controller.initialize(
        ctx.accounts.admin.key(),
        ctx.accounts.settlement_mint.key(),
        ctx.accounts.underlying_mint.key(),
        ctx.accounts.price_reference.key(),
        issuance_rate,
        ctx.bumps.controller,
    )?;

    msg!(
        "Initialized controller {} (admin {}): underlying {}, settlement {}, rate {}",
        controller.key(),
        controller.admin,
        controller.underlying_mint,
        controller.settlement_mint,
        controller.issuance_rate
    );

    Ok(())
}
