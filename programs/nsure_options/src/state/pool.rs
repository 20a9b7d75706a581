use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::state::holding::{issue, retire, Holding};
use crate::utils::math::{
    align_to_decimals, mul_div, sqrt_product, Rounding, BPS_DENOMINATOR, DEFAULT_FEE_BPS,
};

/// Side of a pool a swap pays in
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolAsset {
    OptionUnits,
    Settlement,
}

/// Constant-product pool between one option series and the settlement asset
///
/// PDA Seeds: "pool", market
///
/// The option reserve sits in the series ledger under the pool's own
/// holding; the settlement reserve sits in the pool vault. LP shares form a
/// ledger keyed by this account.
#[account]
#[derive(Default, InitSpace)]
pub struct LiquidityPool {
    pub market: Pubkey,
    pub series: Pubkey,
    pub settlement_mint: Pubkey,
    pub settlement_decimals: u8,
    pub settlement_vault: Pubkey,
    pub reserve_option: u128,
    pub reserve_settlement: u128,
    pub lp_total_supply: u128,
    pub fee_bps: u16,
    pub bump: u8,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Deposit {
    pub option_in: u128,
    pub settlement_in: u128,
    pub shares: u128,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Withdrawal {
    pub option_out: u128,
    pub settlement_out: u128,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Trade {
    pub asset_in: PoolAsset,
    pub amount_in: u128,
    pub amount_out: u128,
}

impl LiquidityPool {
    /// Fills in a freshly created pool, or checks an existing one serves
    /// `market` and `series`
    pub fn bind(
        &mut self,
        market: Pubkey,
        series: Pubkey,
        settlement_mint: Pubkey,
        settlement_decimals: u8,
        settlement_vault: Pubkey,
        bump: u8,
    ) -> Result<()> {
        if self.market == Pubkey::default() {
            self.market = market;
            self.series = series;
            self.settlement_mint = settlement_mint;
            self.settlement_decimals = settlement_decimals;
            self.settlement_vault = settlement_vault;
            self.reserve_option = 0;
            self.reserve_settlement = 0;
            self.lp_total_supply = 0;
            self.fee_bps = DEFAULT_FEE_BPS;
            self.bump = bump;
            return Ok(());
        }

        require_keys_eq!(self.market, market, ErrorCode::UnknownMarket);
        require_keys_eq!(self.series, series, ErrorCode::InvalidOptionSeries);
        require_keys_eq!(
            self.settlement_mint,
            settlement_mint,
            ErrorCode::InvalidSettlementMint
        );
        Ok(())
    }

    /// Checks the series, settlement mint and vault a caller passed in
    /// alongside this pool
    pub fn validate_accounts(
        &self,
        series: Pubkey,
        settlement_mint: Pubkey,
        settlement_vault: Pubkey,
    ) -> Result<()> {
        require_keys_eq!(self.series, series, ErrorCode::InvalidOptionSeries);
        require_keys_eq!(
            self.settlement_mint,
            settlement_mint,
            ErrorCode::InvalidSettlementMint
        );
        require_keys_eq!(self.settlement_vault, settlement_vault, ErrorCode::InvalidVault);
        Ok(())
    }

    fn has_liquidity(&self) -> bool {
        self.lp_total_supply > 0 && self.reserve_option > 0 && self.reserve_settlement > 0
    }

    /// Deposits both sides at the current ratio and credits LP shares.
    ///
    /// An empty pool takes both amounts in full and mints sqrt(option ×
    /// settlement) shares. Otherwise the side in excess is trimmed to the
    /// reserve ratio, rounding the amount taken up.
    pub fn add_liquidity(
        &mut self,
        provider_shares: &mut Holding,
        option_amount: u128,
        settlement_amount: u128,
        min_option: u128,
        min_settlement: u128,
    ) -> Result<Deposit> {
        let settlement_amount =
            align_to_decimals(settlement_amount, self.settlement_decimals, Rounding::Down)?;
        if option_amount == 0 && settlement_amount == 0 {
            return Ok(Deposit::default());
        }

        let deposit = if self.lp_total_supply == 0 {
            Deposit {
                option_in: option_amount,
                settlement_in: settlement_amount,
                shares: sqrt_product(option_amount, settlement_amount)?,
            }
        } else {
            require!(self.has_liquidity(), ErrorCode::InsufficientLiquidity);

            let settlement_needed = align_to_decimals(
                mul_div(option_amount, self.reserve_settlement, self.reserve_option, Rounding::Up)?,
                self.settlement_decimals,
                Rounding::Up,
            )?;
            let (option_in, settlement_in) = if settlement_needed <= settlement_amount {
                (option_amount, settlement_needed)
            } else {
                (
                    mul_div(settlement_amount, self.reserve_option, self.reserve_settlement, Rounding::Up)?,
                    settlement_amount,
                )
            };

            let shares = mul_div(option_in, self.lp_total_supply, self.reserve_option, Rounding::Down)?
                .min(mul_div(
                    settlement_in,
                    self.lp_total_supply,
                    self.reserve_settlement,
                    Rounding::Down,
                )?);

            Deposit {
                option_in,
                settlement_in,
                shares,
            }
        };

        require!(
            deposit.option_in >= min_option && deposit.settlement_in >= min_settlement,
            ErrorCode::SlippageExceeded
        );
        require!(deposit.shares > 0, ErrorCode::InsufficientLiquidity);

        self.reserve_option = self
            .reserve_option
            .checked_add(deposit.option_in)
            .ok_or(ErrorCode::MathOverflow)?;
        self.reserve_settlement = self
            .reserve_settlement
            .checked_add(deposit.settlement_in)
            .ok_or(ErrorCode::MathOverflow)?;
        issue(&mut self.lp_total_supply, provider_shares, deposit.shares)?;

        Ok(deposit)
    }

    /// Burns LP shares for a pro-rata slice of both reserves
    pub fn remove_liquidity(&mut self, provider_shares: &mut Holding, shares: u128) -> Result<Withdrawal> {
        if shares == 0 {
            return Ok(Withdrawal::default());
        }
        require!(provider_shares.balance >= shares, ErrorCode::InsufficientShares);

        let option_out = mul_div(self.reserve_option, shares, self.lp_total_supply, Rounding::Down)?;
        let settlement_out = align_to_decimals(
            mul_div(self.reserve_settlement, shares, self.lp_total_supply, Rounding::Down)?,
            self.settlement_decimals,
            Rounding::Down,
        )?;

        self.reserve_option = self
            .reserve_option
            .checked_sub(option_out)
            .ok_or(ErrorCode::InsufficientLiquidity)?;
        self.reserve_settlement = self
            .reserve_settlement
            .checked_sub(settlement_out)
            .ok_or(ErrorCode::InsufficientLiquidity)?;
        retire(&mut self.lp_total_supply, provider_shares, shares)?;

        Ok(Withdrawal {
            option_out,
            settlement_out,
        })
    }

    /// Swaps `amount_in` of one side for the other at the constant-product
    /// price after fee. The whole `amount_in` joins the reserve, so the
    /// product of the reserves never shrinks.
    pub fn swap(&mut self, asset_in: PoolAsset, amount_in: u128, min_amount_out: u128) -> Result<Trade> {
        require!(self.has_liquidity(), ErrorCode::InsufficientLiquidity);

        let amount_in = match asset_in {
            PoolAsset::OptionUnits => amount_in,
            PoolAsset::Settlement => {
                align_to_decimals(amount_in, self.settlement_decimals, Rounding::Down)?
            }
        };
        let (reserve_in, reserve_out) = match asset_in {
            PoolAsset::OptionUnits => (self.reserve_option, self.reserve_settlement),
            PoolAsset::Settlement => (self.reserve_settlement, self.reserve_option),
        };

        let fee_keep = BPS_DENOMINATOR
            .checked_sub(self.fee_bps as u128)
            .ok_or(ErrorCode::MathOverflow)?;
        let in_after_fee = mul_div(amount_in, fee_keep, BPS_DENOMINATOR, Rounding::Down)?;
        let amount_out = mul_div(
            reserve_out,
            in_after_fee,
            reserve_in
                .checked_add(in_after_fee)
                .ok_or(ErrorCode::MathOverflow)?,
            Rounding::Down,
        )?;
        let amount_out = match asset_in {
            PoolAsset::OptionUnits => {
                align_to_decimals(amount_out, self.settlement_decimals, Rounding::Down)?
            }
            PoolAsset::Settlement => amount_out,
        };
        require!(amount_out >= min_amount_out, ErrorCode::SlippageExceeded);

        let reserve_in = reserve_in
            .checked_add(amount_in)
            .ok_or(ErrorCode::MathOverflow)?;
        let reserve_out = reserve_out
            .checked_sub(amount_out)
            .ok_or(ErrorCode::InsufficientLiquidity)?;
        match asset_in {
            PoolAsset::OptionUnits => {
                self.reserve_option = reserve_in;
                self.reserve_settlement = reserve_out;
            }
            PoolAsset::Settlement => {
                self.reserve_settlement = reserve_in;
                self.reserve_option = reserve_out;
            }
        }

        Ok(Trade {
            asset_in,
            amount_in,
            amount_out,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::math::WAD;
    use anchor_lang::error::Error;

    fn pool(settlement_decimals: u8) -> LiquidityPool {
        let mut pool = LiquidityPool::default();
        pool.bind(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            settlement_decimals,
            Pubkey::new_unique(),
            255,
        )
        .unwrap();
        pool
    }

    fn provider(pool_key: Pubkey) -> Holding {
        let mut holding = Holding::default();
        holding.bind(pool_key, Pubkey::new_unique(), 1).unwrap();
        holding
    }

    #[test]
    fn first_and_proportional_deposits_mint_matching_shares() {
        let mut pool = pool(18);
        let mut lp = provider(Pubkey::new_unique());

        let first = pool.add_liquidity(&mut lp, 5, 500, 0, 0).unwrap();
        assert_eq!(first.shares, 50);
        assert_eq!(pool.lp_total_supply, 50);

        let second = pool.add_liquidity(&mut lp, 5, 500, 0, 0).unwrap();
        assert_eq!(
            second,
            Deposit {
                option_in: 5,
                settlement_in: 500,
                shares: 50
            }
        );
        assert_eq!(pool.lp_total_supply, 100);
        assert_eq!(lp.balance, 100);
        assert_eq!((pool.reserve_option, pool.reserve_settlement), (10, 1_000));
    }

    #[test]
    fn first_deposit_at_full_precision() {
        let mut pool = pool(18);
        let mut lp = provider(Pubkey::new_unique());

        let deposit = pool.add_liquidity(&mut lp, 5 * WAD, 500 * WAD, 0, 0).unwrap();
        assert_eq!(deposit.shares, 50 * WAD);
    }

    #[test]
    fn unbalanced_deposit_is_trimmed_to_the_reserve_ratio() {
        let mut pool = pool(18);
        let mut lp = provider(Pubkey::new_unique());
        pool.add_liquidity(&mut lp, 10, 1_000, 0, 0).unwrap();

        // Too much settlement: only what matches 2 option units is taken
        let deposit = pool.add_liquidity(&mut lp, 2, 900, 0, 0).unwrap();
        assert_eq!((deposit.option_in, deposit.settlement_in), (2, 200));

        // Too many option units: the option side is trimmed, rounding up
        let deposit = pool.add_liquidity(&mut lp, 50, 150, 0, 0).unwrap();
        assert_eq!((deposit.option_in, deposit.settlement_in), (2, 150));
    }

    #[test]
    fn deposit_below_minimums_is_rejected() {
        let mut pool = pool(18);
        let mut lp = provider(Pubkey::new_unique());
        pool.add_liquidity(&mut lp, 10, 1_000, 0, 0).unwrap();

        assert_eq!(
            pool.add_liquidity(&mut lp, 2, 900, 0, 300).unwrap_err(),
            Error::from(ErrorCode::SlippageExceeded)
        );
        assert_eq!(pool.lp_total_supply, 100);
    }

    #[test]
    fn one_sided_first_deposit_mints_nothing() {
        let mut pool = pool(18);
        let mut lp = provider(Pubkey::new_unique());
        assert_eq!(
            pool.add_liquidity(&mut lp, 5, 0, 0, 0).unwrap_err(),
            Error::from(ErrorCode::InsufficientLiquidity)
        );
        assert_eq!(pool.add_liquidity(&mut lp, 0, 0, 0, 0).unwrap(), Deposit::default());
    }

    #[test]
    fn swap_on_empty_pool_fails() {
        let mut pool = pool(18);
        assert_eq!(
            pool.swap(PoolAsset::OptionUnits, 10, 0).unwrap_err(),
            Error::from(ErrorCode::InsufficientLiquidity)
        );
    }

    #[test]
    fn swap_charges_fee_and_rounds_output_down() {
        let mut pool = pool(18);
        let mut lp = provider(Pubkey::new_unique());
        pool.add_liquidity(&mut lp, 1_000, 100_000, 0, 0).unwrap();

        // 10 in, 9 after the 0.3% fee, floor(100_000 × 9 / 1_009) out
        let trade = pool.swap(PoolAsset::OptionUnits, 10, 0).unwrap();
        assert_eq!(trade.amount_in, 10);
        assert_eq!(trade.amount_out, 891);
        assert_eq!(pool.reserve_option, 1_010);
        assert_eq!(pool.reserve_settlement, 99_109);
    }

    #[test]
    fn swap_respects_min_amount_out() {
        let mut pool = pool(18);
        let mut lp = provider(Pubkey::new_unique());
        pool.add_liquidity(&mut lp, 5, 500, 0, 0).unwrap();

        assert_eq!(
            pool.swap(PoolAsset::Settlement, 100, 1).unwrap_err(),
            Error::from(ErrorCode::SlippageExceeded)
        );
        assert_eq!((pool.reserve_option, pool.reserve_settlement), (5, 500));
    }

    #[test]
    fn reserve_product_never_decreases_across_swaps() {
        let mut pool = pool(6);
        let mut lp = provider(Pubkey::new_unique());
        pool.add_liquidity(&mut lp, 300 * WAD, 7_000 * WAD, 0, 0).unwrap();

        let trades = [
            (PoolAsset::OptionUnits, 3 * WAD + 17),
            (PoolAsset::Settlement, 250 * WAD + 999),
            (PoolAsset::OptionUnits, 1),
            (PoolAsset::Settlement, 1_000_000_000_000),
            (PoolAsset::OptionUnits, 120 * WAD),
        ];
        for (asset_in, amount_in) in trades {
            let before = sqrt_product(pool.reserve_option, pool.reserve_settlement).unwrap();
            let option_before = pool.reserve_option;
            let settlement_before = pool.reserve_settlement;

            pool.swap(asset_in, amount_in, 0).unwrap();

            let after = sqrt_product(pool.reserve_option, pool.reserve_settlement).unwrap();
            assert!(after >= before);
            // One side grows, the other does not
            match asset_in {
                PoolAsset::OptionUnits => {
                    assert!(pool.reserve_option >= option_before);
                    assert!(pool.reserve_settlement <= settlement_before);
                }
                PoolAsset::Settlement => {
                    assert!(pool.reserve_settlement >= settlement_before);
                    assert!(pool.reserve_option <= option_before);
                }
            }
            // Settlement reserve stays on the mint's raw-unit grid
            assert_eq!(pool.reserve_settlement % 1_000_000_000_000, 0);
        }
    }

    #[test]
    fn remove_liquidity_returns_pro_rata_and_last_out_takes_all() {
        let mut pool = pool(18);
        let pool_key = Pubkey::new_unique();
        let mut alice = provider(pool_key);
        let mut bob = provider(pool_key);
        pool.add_liquidity(&mut alice, 5, 500, 0, 0).unwrap();
        pool.add_liquidity(&mut bob, 5, 500, 0, 0).unwrap();
        pool.swap(PoolAsset::OptionUnits, 4, 0).unwrap();

        assert_eq!(
            pool.remove_liquidity(&mut alice, 51).unwrap_err(),
            Error::from(ErrorCode::InsufficientShares)
        );

        let alice_out = pool.remove_liquidity(&mut alice, 50).unwrap();
        assert_eq!(alice_out.option_out, 7);
        assert_eq!(alice.balance, 0);

        let bob_out = pool.remove_liquidity(&mut bob, 50).unwrap();
        assert_eq!(pool.lp_total_supply, 0);
        assert_eq!((pool.reserve_option, pool.reserve_settlement), (0, 0));
        assert_eq!(alice_out.option_out + bob_out.option_out, 14);
    }

    #[test]
    fn bind_rejects_a_different_market() {
        let mut pool = pool(18);
        let series = pool.series;
        let mint = pool.settlement_mint;
        assert_eq!(
            pool.bind(Pubkey::new_unique(), series, mint, 18, Pubkey::new_unique(), 1)
                .unwrap_err(),
            Error::from(ErrorCode::UnknownMarket)
        );
        assert_eq!(pool.fee_bps, 30);
    }

    #[test]
    fn passed_accounts_must_match_the_pool() {
        let pool = pool(6);
        assert!(pool
            .validate_accounts(pool.series, pool.settlement_mint, pool.settlement_vault)
            .is_ok());
        assert_eq!(
            pool.validate_accounts(Pubkey::new_unique(), pool.settlement_mint, pool.settlement_vault)
                .unwrap_err(),
            Error::from(ErrorCode::InvalidOptionSeries)
        );
        assert_eq!(
            pool.validate_accounts(pool.series, Pubkey::new_unique(), pool.settlement_vault)
                .unwrap_err(),
            Error::from(ErrorCode::InvalidSettlementMint)
        );
        assert_eq!(
            pool.validate_accounts(pool.series, pool.settlement_mint, Pubkey::new_unique())
                .unwrap_err(),
            Error::from(ErrorCode::InvalidVault)
        );
    }
}
