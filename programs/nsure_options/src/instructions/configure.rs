use anchor_lang::prelude::*;
use anchor_spl::token_interface::Mint;

use crate::events::GridUpdated;
use crate::state::OptionController;
use crate::utils::pda::CONTROLLER_SEED;

/// Admin-only access to the controller configuration
#[derive(Accounts)]
pub struct Configure<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [CONTROLLER_SEED, controller.admin.as_ref()],
        bump = controller.bump,
    )]
    pub controller: Box<Account<'info, OptionController>>,
}

#[derive(Accounts)]
pub struct SetUnderlyingAsset<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [CONTROLLER_SEED, controller.admin.as_ref()],
        bump = controller.bump,
    )]
    pub controller: Box<Account<'info, OptionController>>,

    pub underlying_mint: Box<InterfaceAccount<'info, Mint>>,
}

#[derive(Accounts)]
pub struct SetPriceReference<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [CONTROLLER_SEED, controller.admin.as_ref()],
        bump = controller.bump,
    )]
    pub controller: Box<Account<'info, OptionController>>,

    /// CHECK: external price reference, stored as an address only
    pub price_reference: UncheckedAccount<'info>,
}

fn emit_grid(controller: &Account<OptionController>) {
    emit!(GridUpdated {
        controller: controller.key(),
        expirations: controller.expirations.clone(),
        strikes: controller.strikes.clone(),
        underlying_mint: controller.underlying_mint,
        issuance_rate: controller.issuance_rate,
        price_reference: controller.price_reference,
    });
}

/// Replaces the allowed expiration slots
pub fn set_deadline(ctx: Context<Configure>, expirations: Vec<u64>) -> Result<()> {
    let controller = &mut ctx.accounts.controller;
    controller.require_admin(&ctx.accounts.admin.key())?;
    controller.set_expirations(expirations)?;

    msg!("Expirations set: {:?}", controller.expirations);
    emit_grid(controller);
    Ok(())
}

/// Replaces the allowed strike prices
pub fn set_target(ctx: Context<Configure>, strikes: Vec<u128>) -> Result<()> {
    let controller = &mut ctx.accounts.controller;
    controller.require_admin(&ctx.accounts.admin.key())?;
    controller.set_strikes(strikes)?;

    msg!("Strikes set: {:?}", controller.strikes);
    emit_grid(controller);
    Ok(())
}

pub fn set_option_rate(ctx: Context<Configure>, issuance_rate: u64) -> Result<()> {
    let controller = &mut ctx.accounts.controller;
    controller.require_admin(&ctx.accounts.admin.key())?;
    controller.set_issuance_rate(issuance_rate)?;

    msg!("Issuance rate set: {}", controller.issuance_rate);
    emit_grid(controller);
    Ok(())
}

/// Series already listed keep the underlying they were created with
pub fn set_underlying_asset(ctx: Context<SetUnderlyingAsset>) -> Result<()> {
    let controller = &mut ctx.accounts.controller;
    controller.require_admin(&ctx.accounts.admin.key())?;
    controller.underlying_mint = ctx.accounts.underlying_mint.key();

    msg!("Underlying asset set: {}", controller.underlying_mint);
    emit_grid(controller);
    Ok(())
}

pub fn set_price_reference(ctx: Context<SetPriceReference>) -> Result<()> {
    let controller = &mut ctx.accounts.controller;
    controller.require_admin(&ctx.accounts.admin.key())?;
    controller.price_reference = ctx.accounts.price_reference.key();

    msg!("Price reference set: {}", controller.price_reference);
    emit_grid(controller);
    Ok(())
}
