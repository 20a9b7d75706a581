use anchor_lang::prelude::*;

use crate::state::OptionSeries;

pub const SERIES_SEED: &[u8] = b"option_series";
pub const UNDERLYING_VAULT_SEED: &[u8] = b"underlying_vault";
pub const STRIKE_VAULT_SEED: &[u8] = b"strike_vault";
pub const WRITER_SEED: &[u8] = b"writer";
pub const HOLDING_SEED: &[u8] = b"holding";
pub const ALLOWANCE_SEED: &[u8] = b"allowance";
pub const CONTROLLER_SEED: &[u8] = b"controller";
pub const MARKET_SEED: &[u8] = b"market";
pub const POOL_SEED: &[u8] = b"pool";
pub const POOL_VAULT_SEED: &[u8] = b"pool_vault";

/// Owned copies of an OptionSeries' seed components
///
/// The series PDA signs for its vaults and as SPL delegate, so handlers
/// build this once and borrow `as_seeds()` for each CPI.
pub struct SeriesSignerSeeds {
    authority: [u8; 32],
    underlying_mint: [u8; 32],
    strike_mint: [u8; 32],
    strike_price: [u8; 16],
    expiration_slot: [u8; 8],
    kind: [u8; 1],
    bump: [u8; 1],
}

impl SeriesSignerSeeds {
    pub fn new(series: &OptionSeries) -> Self {
        Self {
            authority: series.authority.to_bytes(),
            underlying_mint: series.underlying_mint.to_bytes(),
            strike_mint: series.strike_mint.to_bytes(),
            strike_price: series.strike_price.to_le_bytes(),
            expiration_slot: series.expiration_slot.to_le_bytes(),
            kind: [series.kind.seed()],
            bump: [series.bump],
        }
    }

    pub fn as_seeds(&self) -> [&[u8]; 8] {
        [
            SERIES_SEED,
            &self.authority,
            &self.underlying_mint,
            &self.strike_mint,
            &self.strike_price,
            &self.expiration_slot,
            &self.kind,
            &self.bump,
        ]
    }
}

/// Address of `owner`'s holding in a series or LP ledger
pub fn find_holding(ledger: &Pubkey, owner: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[HOLDING_SEED, ledger.as_ref(), owner.as_ref()], &crate::ID)
}

pub fn find_market(controller: &Pubkey, expiration_slot: u64, strike_price: u128) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            MARKET_SEED,
            controller.as_ref(),
            expiration_slot.to_le_bytes().as_ref(),
            strike_price.to_le_bytes().as_ref(),
        ],
        &crate::ID,
    )
}

pub fn find_pool(market: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[POOL_SEED, market.as_ref()], &crate::ID)
}

/// Pool that trades `series` once a controller authority lists it. Whether
/// or not the pool exists yet, its holding in the series ledger is the
/// pool's option reserve.
pub fn find_listed_pool(series: &OptionSeries) -> Pubkey {
    let (market, _) = find_market(&series.authority, series.expiration_slot, series.strike_price);
    find_pool(&market).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::OptionKind;
    use crate::utils::math::WAD;

    #[test]
    fn signer_seeds_rederive_the_series_address() {
        let authority = Pubkey::new_unique();
        let underlying = Pubkey::new_unique();
        let settlement = Pubkey::new_unique();
        let (address, bump) = Pubkey::find_program_address(
            &[
                SERIES_SEED,
                authority.as_ref(),
                underlying.as_ref(),
                settlement.as_ref(),
                (2 * WAD).to_le_bytes().as_ref(),
                500u64.to_le_bytes().as_ref(),
                &[OptionKind::Call.seed()],
            ],
            &crate::ID,
        );

        let series = OptionSeries {
            authority,
            kind: OptionKind::Call,
            underlying_mint: underlying,
            strike_mint: settlement,
            strike_price: 2 * WAD,
            expiration_slot: 500,
            bump,
            ..OptionSeries::default()
        };
        let seeds = SeriesSignerSeeds::new(&series);
        let derived = Pubkey::create_program_address(&seeds.as_seeds(), &crate::ID).unwrap();
        assert_eq!(derived, address);
    }

    #[test]
    fn listed_pool_follows_the_series_key() {
        let controller = Pubkey::new_unique();
        let series = OptionSeries {
            authority: controller,
            expiration_slot: 500,
            strike_price: 2 * WAD,
            ..OptionSeries::default()
        };

        let (market, _) = Pubkey::find_program_address(
            &[
                MARKET_SEED,
                controller.as_ref(),
                500u64.to_le_bytes().as_ref(),
                (2 * WAD).to_le_bytes().as_ref(),
            ],
            &crate::ID,
        );
        let (pool, _) = Pubkey::find_program_address(&[POOL_SEED, market.as_ref()], &crate::ID);
        assert_eq!(find_listed_pool(&series), pool);

        let other_strike = OptionSeries {
            strike_price: 3 * WAD,
            ..series
        };
        assert_ne!(find_listed_pool(&other_strike), pool);
    }

    #[test]
    fn holdings_are_scoped_by_ledger() {
        let owner = Pubkey::new_unique();
        let (a, _) = find_holding(&Pubkey::new_unique(), &owner);
        let (b, _) = find_holding(&Pubkey::new_unique(), &owner);
        assert_ne!(a, b);
    }
}
