use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Mint, TokenAccount, TokenInterface, TransferChecked};

use crate::utils::validation::{validate_pull, validate_vault_balance};

/// Pulls `amount` raw units from `from` into a program vault.
///
/// `from` must be owned by `holder`, the signer being credited, who must
/// first approve `spender` (the series or pool PDA) as SPL delegate. The
/// PDA then signs the transfer as that delegate.
#[allow(clippy::too_many_arguments)]
pub fn pull_from<'info>(
    token_program: &Interface<'info, TokenInterface>,
    from: &InterfaceAccount<'info, TokenAccount>,
    holder: &Pubkey,
    mint: &InterfaceAccount<'info, Mint>,
    to: AccountInfo<'info>,
    spender: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    validate_pull(from, holder, spender.key, amount)?;

    token_interface::transfer_checked(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            TransferChecked {
                from: from.to_account_info(),
                mint: mint.to_account_info(),
                to,
                authority: spender,
            },
            signer_seeds,
        ),
        amount,
        mint.decimals,
    )
}

/// Pays `amount` raw units out of a vault owned by `vault_authority`
pub fn pay_out<'info>(
    token_program: &Interface<'info, TokenInterface>,
    vault: AccountInfo<'info>,
    mint: &InterfaceAccount<'info, Mint>,
    to: &InterfaceAccount<'info, TokenAccount>,
    vault_authority: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    validate_vault_balance(vault_balance(&vault)?, amount)?;

    token_interface::transfer_checked(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            TransferChecked {
                from: vault,
                mint: mint.to_account_info(),
                to: to.to_account_info(),
                authority: vault_authority,
            },
            signer_seeds,
        ),
        amount,
        mint.decimals,
    )
}

/// Raw balance of a token account the program only holds as `AccountInfo`
pub fn vault_balance(vault: &AccountInfo) -> Result<u64> {
    let data = vault.try_borrow_data()?;
    Ok(TokenAccount::try_deserialize(&mut &data[..])?.amount)
}
