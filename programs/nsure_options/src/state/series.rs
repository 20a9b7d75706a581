use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::state::holding::{issue, retire, Holding};
use crate::utils::math::{
    align_to_decimals, calculate_pro_rata_share, calculate_strike_amount, mul_div, Rounding,
};
use crate::utils::validation::{
    validate_decimals, validate_expiration, validate_expired, validate_issuance_rate,
    validate_metadata, validate_not_expired, validate_strike_price,
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub enum OptionKind {
    /// Right to sell underlying at the strike; collateral is the strike asset
    #[default]
    Put,
    /// Right to buy underlying at the strike; collateral is the underlying
    Call,
}

impl OptionKind {
    pub fn seed(&self) -> u8 {
        *self as u8
    }
}

/// Core data struct stored on-chain representing an option series
///
/// PDA Seeds (used to derive the OptionSeries address):
/// - "option_series"
/// - authority (creator, or the controller for listed markets)
/// - underlying_mint
/// - strike_mint
/// - strike_price
/// - expiration_slot
/// - kind
///
/// Amounts are 18-decimal fixed point. Every collateral and counter-asset
/// amount recorded here is representable in its asset's native decimals, so
/// the totals match the vault balances exactly.
#[account]
#[derive(Default, InitSpace)]
pub struct OptionSeries {
    // === CORE PARAMETERS (immutable after creation) ===
    pub authority: Pubkey,
    pub kind: OptionKind,
    #[max_len(32)]
    pub name: String,
    #[max_len(10)]
    pub symbol: String,
    pub underlying_mint: Pubkey,
    pub underlying_decimals: u8,
    pub strike_mint: Pubkey,
    pub strike_decimals: u8,
    pub strike_price: u128,           // strike units per underlying unit, WAD-scaled
    pub expiration_slot: u64,
    pub issuance_rate: u64,           // option units per unit of collateral base amount
    pub target: Pubkey,               // controller/target address carried by calls
    pub bump: u8,

    // === VAULTS (owned by the series PDA) ===
    pub underlying_vault: Pubkey,
    pub strike_vault: Pubkey,

    // === RUNTIME DATA ===
    pub total_supply: u128,
    pub locked_collateral_total: u128,
    pub counter_asset_total: u128,
    pub writer_collateral_total: u128,
}

/// Everything needed to bring a freshly allocated series account to life
pub struct SeriesInit {
    pub authority: Pubkey,
    pub kind: OptionKind,
    pub name: String,
    pub symbol: String,
    pub underlying_mint: Pubkey,
    pub underlying_decimals: u8,
    pub strike_mint: Pubkey,
    pub strike_decimals: u8,
    pub strike_price: u128,
    pub expiration_slot: u64,
    pub issuance_rate: u64,
    pub target: Pubkey,
    pub underlying_vault: Pubkey,
    pub strike_vault: Pubkey,
    pub bump: u8,
}

/// Result of an exercise: what the holder pays in and receives
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Exercise {
    pub counter_in: u128,
    pub collateral_out: u128,
}

/// A writer's post-expiry payout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Redemption {
    pub collateral_out: u128,
    pub counter_out: u128,
}

/// Collateral a writer has personally locked in one series
///
/// PDA Seeds: "writer", series, writer
#[account]
#[derive(Default, InitSpace)]
pub struct WriterPosition {
    pub series: Pubkey,
    pub writer: Pubkey,
    pub collateral: u128,
    pub bump: u8,
}

impl WriterPosition {
    pub fn bind(&mut self, series: Pubkey, writer: Pubkey, bump: u8) -> Result<()> {
        if self.series == Pubkey::default() {
            self.series = series;
            self.writer = writer;
            self.collateral = 0;
            self.bump = bump;
            return Ok(());
        }

        require_keys_eq!(self.series, series, ErrorCode::InvalidOptionSeries);
        require_keys_eq!(self.writer, writer, ErrorCode::Unauthorized);
        Ok(())
    }
}

impl OptionSeries {
    pub fn initialize(&mut self, init: SeriesInit, current_slot: u64) -> Result<()> {
        validate_metadata(&init.name, &init.symbol)?;
        validate_strike_price(init.strike_price)?;
        validate_expiration(init.expiration_slot, current_slot)?;
        validate_issuance_rate(init.issuance_rate)?;
        validate_decimals(init.underlying_decimals)?;
        validate_decimals(init.strike_decimals)?;

        self.authority = init.authority;
        self.kind = init.kind;
        self.name = init.name;
        self.symbol = init.symbol;
        self.underlying_mint = init.underlying_mint;
        self.underlying_decimals = init.underlying_decimals;
        self.strike_mint = init.strike_mint;
        self.strike_decimals = init.strike_decimals;
        self.strike_price = init.strike_price;
        self.expiration_slot = init.expiration_slot;
        self.issuance_rate = init.issuance_rate;
        self.target = init.target;
        self.bump = init.bump;

        self.underlying_vault = init.underlying_vault;
        self.strike_vault = init.strike_vault;

        self.total_supply = 0;
        self.locked_collateral_total = 0;
        self.counter_asset_total = 0;
        self.writer_collateral_total = 0;
        Ok(())
    }

    /// Active while the current slot is below the expiration slot
    pub fn has_expired(&self, current_slot: u64) -> bool {
        current_slot >= self.expiration_slot
    }

    pub fn collateral_mint(&self) -> Pubkey {
        match self.kind {
            OptionKind::Put => self.strike_mint,
            OptionKind::Call => self.underlying_mint,
        }
    }

    pub fn collateral_decimals(&self) -> u8 {
        match self.kind {
            OptionKind::Put => self.strike_decimals,
            OptionKind::Call => self.underlying_decimals,
        }
    }

    pub fn collateral_vault(&self) -> Pubkey {
        match self.kind {
            OptionKind::Put => self.strike_vault,
            OptionKind::Call => self.underlying_vault,
        }
    }

    pub fn counter_mint(&self) -> Pubkey {
        match self.kind {
            OptionKind::Put => self.underlying_mint,
            OptionKind::Call => self.strike_mint,
        }
    }

    pub fn counter_decimals(&self) -> u8 {
        match self.kind {
            OptionKind::Put => self.underlying_decimals,
            OptionKind::Call => self.strike_decimals,
        }
    }

    pub fn counter_vault(&self) -> Pubkey {
        match self.kind {
            OptionKind::Put => self.underlying_vault,
            OptionKind::Call => self.strike_vault,
        }
    }

    /// Collateral backing `units`, on the collateral asset's native grid
    pub fn collateral_for(&self, units: u128, rounding: Rounding) -> Result<u128> {
        let base = match self.kind {
            OptionKind::Put => calculate_strike_amount(units, self.strike_price, rounding)?,
            OptionKind::Call => units,
        };
        let amount = mul_div(base, 1, self.issuance_rate as u128, rounding)?;
        align_to_decimals(amount, self.collateral_decimals(), rounding)
    }

    /// Counter asset an exerciser supplies for `units`, on its native grid
    pub fn counter_for(&self, units: u128, rounding: Rounding) -> Result<u128> {
        let base = match self.kind {
            OptionKind::Put => units,
            OptionKind::Call => calculate_strike_amount(units, self.strike_price, rounding)?,
        };
        let amount = mul_div(base, 1, self.issuance_rate as u128, rounding)?;
        align_to_decimals(amount, self.counter_decimals(), rounding)
    }

    /// Option units written against `collateral` at the series' issuance rate
    pub fn units_for_collateral(&self, collateral: u128) -> Result<u128> {
        Ok(collateral
            .checked_mul(self.issuance_rate as u128)
            .ok_or(ErrorCode::MathOverflow)?)
    }

    /// Locks collateral for `units` and credits them to `holding`.
    /// Returns the collateral the caller must pay in.
    pub fn mint(
        &mut self,
        writer: &mut WriterPosition,
        holding: &mut Holding,
        units: u128,
        current_slot: u64,
    ) -> Result<u128> {
        validate_not_expired(self.expiration_slot, current_slot)?;
        if units == 0 {
            return Ok(0);
        }

        let collateral = self.collateral_for(units, Rounding::Up)?;

        writer.collateral = writer
            .collateral
            .checked_add(collateral)
            .ok_or(ErrorCode::MathOverflow)?;
        self.writer_collateral_total = self
            .writer_collateral_total
            .checked_add(collateral)
            .ok_or(ErrorCode::MathOverflow)?;
        self.locked_collateral_total = self
            .locked_collateral_total
            .checked_add(collateral)
            .ok_or(ErrorCode::MathOverflow)?;
        issue(&mut self.total_supply, holding, units)?;

        Ok(collateral)
    }

    /// Burns `units` and releases their collateral back to the writer who
    /// locked it. Units acquired by transfer alone cannot reach collateral
    /// through here. Returns the collateral to pay out.
    pub fn burn(
        &mut self,
        writer: &mut WriterPosition,
        holding: &mut Holding,
        units: u128,
        current_slot: u64,
    ) -> Result<u128> {
        validate_not_expired(self.expiration_slot, current_slot)?;
        if units == 0 {
            return Ok(0);
        }
        require!(holding.balance >= units, ErrorCode::InsufficientBalance);

        let collateral = self.collateral_for(units, Rounding::Down)?;
        require!(
            writer.collateral >= collateral,
            ErrorCode::InsufficientMinterShare
        );

        writer.collateral -= collateral;
        self.writer_collateral_total = self
            .writer_collateral_total
            .checked_sub(collateral)
            .ok_or(ErrorCode::MathOverflow)?;
        self.locked_collateral_total = self
            .locked_collateral_total
            .checked_sub(collateral)
            .ok_or(ErrorCode::InsufficientCollateral)?;
        retire(&mut self.total_supply, holding, units)?;

        Ok(collateral)
    }

    /// Burns `units` from any holder against the counter asset at the strike
    pub fn exercise(
        &mut self,
        holding: &mut Holding,
        units: u128,
        current_slot: u64,
    ) -> Result<Exercise> {
        validate_not_expired(self.expiration_slot, current_slot)?;
        if units == 0 {
            return Ok(Exercise::default());
        }
        require!(holding.balance >= units, ErrorCode::InsufficientBalance);

        let collateral_out = self.collateral_for(units, Rounding::Down)?;
        let counter_in = self.counter_for(units, Rounding::Up)?;

        self.locked_collateral_total = self
            .locked_collateral_total
            .checked_sub(collateral_out)
            .ok_or(ErrorCode::InsufficientCollateral)?;
        self.counter_asset_total = self
            .counter_asset_total
            .checked_add(counter_in)
            .ok_or(ErrorCode::MathOverflow)?;
        retire(&mut self.total_supply, holding, units)?;

        Ok(Exercise {
            counter_in,
            collateral_out,
        })
    }

    /// Pays a writer their share of whatever collateral and counter asset
    /// remain, then clears their claim
    pub fn redeem(&mut self, writer: &mut WriterPosition, current_slot: u64) -> Result<Redemption> {
        validate_expired(self.expiration_slot, current_slot)?;

        let claim = writer.collateral;
        if claim == 0 {
            return Ok(Redemption::default());
        }

        let collateral_out = align_to_decimals(
            calculate_pro_rata_share(self.locked_collateral_total, claim, self.writer_collateral_total)?,
            self.collateral_decimals(),
            Rounding::Down,
        )?;
        let counter_out = align_to_decimals(
            calculate_pro_rata_share(self.counter_asset_total, claim, self.writer_collateral_total)?,
            self.counter_decimals(),
            Rounding::Down,
        )?;

        writer.collateral = 0;
        self.writer_collateral_total = self
            .writer_collateral_total
            .checked_sub(claim)
            .ok_or(ErrorCode::MathOverflow)?;
        self.locked_collateral_total = self
            .locked_collateral_total
            .checked_sub(collateral_out)
            .ok_or(ErrorCode::InsufficientCollateral)?;
        self.counter_asset_total = self
            .counter_asset_total
            .checked_sub(counter_out)
            .ok_or(ErrorCode::InsufficientCollateral)?;

        Ok(Redemption {
            collateral_out,
            counter_out,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::holding::move_units;
    use crate::utils::math::{to_native, WAD};
    use anchor_lang::error::Error;

    const EXPIRATION: u64 = 50;

    fn series(kind: OptionKind, strike_price: u128, decimals: (u8, u8)) -> OptionSeries {
        series_at_rate(kind, strike_price, decimals, 1)
    }

    fn series_at_rate(
        kind: OptionKind,
        strike_price: u128,
        decimals: (u8, u8),
        issuance_rate: u64,
    ) -> OptionSeries {
        let mut series = OptionSeries::default();
        series
            .initialize(
                SeriesInit {
                    authority: Pubkey::new_unique(),
                    kind,
                    name: "NsurePutToken".to_string(),
                    symbol: "PUT".to_string(),
                    underlying_mint: Pubkey::new_unique(),
                    underlying_decimals: decimals.0,
                    strike_mint: Pubkey::new_unique(),
                    strike_decimals: decimals.1,
                    strike_price,
                    expiration_slot: EXPIRATION,
                    issuance_rate,
                    target: Pubkey::default(),
                    underlying_vault: Pubkey::new_unique(),
                    strike_vault: Pubkey::new_unique(),
                    bump: 255,
                },
                10,
            )
            .unwrap();
        series
    }

    fn writer(series: Pubkey) -> (WriterPosition, Holding) {
        let owner = Pubkey::new_unique();
        let mut position = WriterPosition::default();
        position.bind(series, owner, 1).unwrap();
        let mut holding = Holding::default();
        holding.bind(series, owner, 1).unwrap();
        (position, holding)
    }

    fn holder(series: Pubkey) -> Holding {
        let mut holding = Holding::default();
        holding.bind(series, Pubkey::new_unique(), 1).unwrap();
        holding
    }

    #[test]
    fn initialize_rejects_bad_terms() {
        let mut series = OptionSeries::default();
        let init = |strike_price, expiration_slot, issuance_rate| SeriesInit {
            authority: Pubkey::new_unique(),
            kind: OptionKind::Call,
            name: "NsureCallToken".to_string(),
            symbol: "CALL".to_string(),
            underlying_mint: Pubkey::new_unique(),
            underlying_decimals: 18,
            strike_mint: Pubkey::new_unique(),
            strike_decimals: 18,
            strike_price,
            expiration_slot,
            issuance_rate,
            target: Pubkey::new_unique(),
            underlying_vault: Pubkey::new_unique(),
            strike_vault: Pubkey::new_unique(),
            bump: 255,
        };

        assert_eq!(
            series.initialize(init(0, 50, 1), 10).unwrap_err(),
            Error::from(ErrorCode::InvalidStrikePrice)
        );
        assert_eq!(
            series.initialize(init(WAD, 10, 1), 10).unwrap_err(),
            Error::from(ErrorCode::ExpirationInPast)
        );
        assert_eq!(
            series.initialize(init(WAD, 50, 0), 10).unwrap_err(),
            Error::from(ErrorCode::InvalidIssuanceRate)
        );
        series.initialize(init(WAD, 50, 1), 10).unwrap();
        assert_eq!(series.kind, OptionKind::Call);
    }

    #[test]
    fn kind_seed_keeps_puts_and_calls_apart() {
        assert_eq!(OptionKind::Put.seed(), 0);
        assert_eq!(OptionKind::Call.seed(), 1);
    }

    #[test]
    fn has_expired_flips_at_expiration_slot() {
        let series = series(OptionKind::Call, WAD, (18, 18));
        assert!(!series.has_expired(0));
        assert!(!series.has_expired(EXPIRATION - 1));
        assert!(series.has_expired(EXPIRATION));
        assert!(series.has_expired(52));
    }

    #[test]
    fn put_mint_locks_strike_collateral() {
        // One unit at strike 1.0 locks one unit of the strike asset
        let mut series = series(OptionKind::Put, WAD, (18, 18));
        let (mut position, mut holding) = writer(Pubkey::new_unique());

        let collateral = series.mint(&mut position, &mut holding, WAD, 10).unwrap();

        assert_eq!(collateral, WAD);
        assert_eq!(to_native(collateral, series.strike_decimals, Rounding::Down).unwrap(), 1_000_000_000_000_000_000);
        assert_eq!(holding.balance, 1_000_000_000_000_000_000);
        assert_eq!(position.collateral, WAD);
        assert_eq!(series.locked_collateral_total, WAD);
        assert_eq!(series.writer_collateral_total, WAD);
        assert_eq!(series.total_supply, WAD);
        assert_eq!(series.collateral_mint(), series.strike_mint);
        assert_eq!(series.collateral_vault(), series.strike_vault);
    }

    #[test]
    fn mint_scales_with_strike_and_asset_decimals() {
        // 2 puts at strike 1500.0 against a 6-decimal strike asset
        let mut series = series(OptionKind::Put, 1_500 * WAD, (9, 6));
        let (mut position, mut holding) = writer(Pubkey::new_unique());

        let collateral = series.mint(&mut position, &mut holding, 2 * WAD, 10).unwrap();
        assert_eq!(collateral, 3_000 * WAD);
        assert_eq!(to_native(collateral, 6, Rounding::Down).unwrap(), 3_000_000_000);
    }

    #[test]
    fn mint_rounds_collateral_up_onto_the_asset_grid() {
        // A sliver of a unit still costs one raw unit of a 6-decimal asset
        let mut series = series(OptionKind::Call, WAD, (6, 18));
        let (mut position, mut holding) = writer(Pubkey::new_unique());

        let collateral = series.mint(&mut position, &mut holding, 1, 10).unwrap();
        assert_eq!(collateral, 1_000_000_000_000);
        assert_eq!(holding.balance, 1);
    }

    #[test]
    fn mint_and_exercise_fail_once_expired() {
        let mut series = series(OptionKind::Put, WAD, (18, 18));
        let (mut position, mut holding) = writer(Pubkey::new_unique());
        series.mint(&mut position, &mut holding, WAD, 10).unwrap();

        assert_eq!(
            series.mint(&mut position, &mut holding, WAD, 52).unwrap_err(),
            Error::from(ErrorCode::OptionExpired)
        );
        assert_eq!(
            series.exercise(&mut holding, WAD, 52).unwrap_err(),
            Error::from(ErrorCode::OptionExpired)
        );
        assert_eq!(
            series.burn(&mut position, &mut holding, WAD, EXPIRATION).unwrap_err(),
            Error::from(ErrorCode::OptionExpired)
        );
        assert_eq!(series.total_supply, WAD);
    }

    #[test]
    fn expired_series_redeems_and_clears_writer_claim() {
        let mut series = series(OptionKind::Put, WAD, (18, 18));
        let (mut position, mut holding) = writer(Pubkey::new_unique());
        series.mint(&mut position, &mut holding, WAD, 10).unwrap();

        assert_eq!(
            series.redeem(&mut position, 49).unwrap_err(),
            Error::from(ErrorCode::OptionNotExpired)
        );

        assert!(series.has_expired(52));
        let payout = series.redeem(&mut position, 52).unwrap();
        assert_eq!(
            payout,
            Redemption {
                collateral_out: WAD,
                counter_out: 0
            }
        );
        assert_eq!(position.collateral, 0);
        assert_eq!(series.locked_collateral_total, 0);

        // A second redemption finds nothing left to claim
        assert_eq!(series.redeem(&mut position, 53).unwrap(), Redemption::default());
    }

    #[test]
    fn transferred_units_can_be_exercised_by_a_third_party() {
        let mut series = series(OptionKind::Put, 2 * WAD, (18, 18));
        let (mut position, mut holding) = writer(Pubkey::new_unique());
        let mut third_party = holder(holding.ledger);

        series.mint(&mut position, &mut holding, WAD, 10).unwrap();
        move_units(&mut holding, &mut third_party, WAD).unwrap();

        let exercise = series.exercise(&mut third_party, WAD, 20).unwrap();

        // Put holder delivers one underlying and receives amount × strike
        assert_eq!(exercise.counter_in, WAD);
        assert_eq!(exercise.collateral_out, 2 * WAD);
        assert_eq!(third_party.balance, 0);
        assert_eq!(series.counter_asset_total, WAD);
        assert_eq!(series.locked_collateral_total, 0);
        assert_eq!(series.total_supply, 0);
    }

    #[test]
    fn call_exercise_pays_strike_for_underlying() {
        let mut series = series(OptionKind::Call, 3 * WAD, (18, 6));
        let (mut position, mut holding) = writer(Pubkey::new_unique());
        series.mint(&mut position, &mut holding, 5 * WAD, 10).unwrap();
        assert_eq!(series.locked_collateral_total, 5 * WAD);

        let exercise = series.exercise(&mut holding, 2 * WAD, 20).unwrap();
        assert_eq!(exercise.counter_in, 6 * WAD);
        assert_eq!(exercise.collateral_out, 2 * WAD);
        assert_eq!(series.locked_collateral_total, 3 * WAD);
    }

    #[test]
    fn exercise_requires_held_units() {
        let mut series = series(OptionKind::Call, WAD, (18, 18));
        let (mut position, mut holding) = writer(Pubkey::new_unique());
        series.mint(&mut position, &mut holding, WAD, 10).unwrap();

        let mut empty = holder(holding.ledger);
        assert_eq!(
            series.exercise(&mut empty, WAD, 20).unwrap_err(),
            Error::from(ErrorCode::InsufficientBalance)
        );
    }

    #[test]
    fn burn_is_gated_by_minter_share() {
        let mut series = series(OptionKind::Call, WAD, (18, 18));
        let (mut position, mut holding) = writer(Pubkey::new_unique());
        series.mint(&mut position, &mut holding, 2 * WAD, 10).unwrap();

        // Someone who only bought units cannot reach the writer's collateral
        let mut buyer = holder(holding.ledger);
        let mut buyer_position = WriterPosition::default();
        move_units(&mut holding, &mut buyer, WAD).unwrap();
        assert_eq!(
            series.burn(&mut buyer_position, &mut buyer, WAD, 20).unwrap_err(),
            Error::from(ErrorCode::InsufficientMinterShare)
        );

        // The writer can burn what they still hold
        assert_eq!(
            series.burn(&mut position, &mut holding, 2 * WAD, 20).unwrap_err(),
            Error::from(ErrorCode::InsufficientBalance)
        );
        let released = series.burn(&mut position, &mut holding, WAD, 20).unwrap();
        assert_eq!(released, WAD);
        assert_eq!(position.collateral, WAD);
        assert_eq!(series.locked_collateral_total, WAD);
        assert_eq!(series.total_supply, WAD);
    }

    #[test]
    fn zero_amounts_are_no_ops() {
        let mut series = series(OptionKind::Put, WAD, (18, 18));
        let (mut position, mut holding) = writer(Pubkey::new_unique());

        assert_eq!(series.mint(&mut position, &mut holding, 0, 10).unwrap(), 0);
        assert_eq!(series.burn(&mut position, &mut holding, 0, 10).unwrap(), 0);
        assert_eq!(series.exercise(&mut holding, 0, 10).unwrap(), Exercise::default());
        assert_eq!(series.redeem(&mut position, 60).unwrap(), Redemption::default());
        assert_eq!(series.total_supply, 0);
        assert_eq!(series.locked_collateral_total, 0);
    }

    #[test]
    fn redemption_splits_remaining_assets_pro_rata() {
        let mut series = series(OptionKind::Put, WAD, (18, 18));
        let ledger = Pubkey::new_unique();
        let (mut alice, mut alice_units) = writer(ledger);
        let (mut bob, mut bob_units) = writer(ledger);
        let mut carol = holder(ledger);

        series.mint(&mut alice, &mut alice_units, 3 * WAD, 10).unwrap();
        series.mint(&mut bob, &mut bob_units, WAD, 10).unwrap();

        // Carol exercises two of Alice's units before expiry
        move_units(&mut alice_units, &mut carol, 2 * WAD).unwrap();
        series.exercise(&mut carol, 2 * WAD, 30).unwrap();
        assert_eq!(series.locked_collateral_total, 2 * WAD);
        assert_eq!(series.counter_asset_total, 2 * WAD);

        let alice_payout = series.redeem(&mut alice, 60).unwrap();
        assert_eq!(alice_payout.collateral_out, 3 * WAD / 2);
        assert_eq!(alice_payout.counter_out, 3 * WAD / 2);

        let bob_payout = series.redeem(&mut bob, 60).unwrap();
        assert_eq!(bob_payout.collateral_out, WAD / 2);
        assert_eq!(bob_payout.counter_out, WAD / 2);

        assert_eq!(series.locked_collateral_total, 0);
        assert_eq!(series.counter_asset_total, 0);
        assert_eq!(series.writer_collateral_total, 0);
    }

    #[test]
    fn collateral_is_conserved_across_any_sequence() {
        // Vault balances are tracked independently and compared after every call
        let mut series = series(OptionKind::Call, 7 * WAD / 3, (8, 6));
        let ledger = Pubkey::new_unique();
        let (mut a, mut a_units) = writer(ledger);
        let (mut b, mut b_units) = writer(ledger);
        let mut collateral_vault = 0u128;
        let mut counter_vault = 0u128;
        let check = |series: &OptionSeries, collateral_vault: u128, counter_vault: u128| {
            assert_eq!(series.locked_collateral_total, collateral_vault);
            assert_eq!(series.counter_asset_total, counter_vault);
        };

        collateral_vault += series.mint(&mut a, &mut a_units, 10 * WAD + 7, 10).unwrap();
        check(&series, collateral_vault, counter_vault);
        collateral_vault += series.mint(&mut b, &mut b_units, 4 * WAD, 11).unwrap();
        check(&series, collateral_vault, counter_vault);

        let exercise = series.exercise(&mut a_units, 3 * WAD + 1, 12).unwrap();
        collateral_vault -= exercise.collateral_out;
        counter_vault += exercise.counter_in;
        check(&series, collateral_vault, counter_vault);

        collateral_vault -= series.burn(&mut b, &mut b_units, WAD, 13).unwrap();
        check(&series, collateral_vault, counter_vault);

        let mut paid_collateral = 0u128;
        let mut paid_counter = 0u128;
        let locked_at_expiry = series.locked_collateral_total;
        let counter_at_expiry = series.counter_asset_total;
        for position in [&mut a, &mut b] {
            let payout = series.redeem(position, EXPIRATION).unwrap();
            collateral_vault -= payout.collateral_out;
            counter_vault -= payout.counter_out;
            paid_collateral += payout.collateral_out;
            paid_counter += payout.counter_out;
            check(&series, collateral_vault, counter_vault);
        }

        assert!(paid_collateral <= locked_at_expiry);
        assert!(paid_counter <= counter_at_expiry);
        assert_eq!(series.writer_collateral_total, 0);
    }

    #[test]
    fn issuance_rate_divides_collateral_and_counter_asset() {
        let mut series = series_at_rate(OptionKind::Call, 2 * WAD, (18, 18), 5);
        let ledger = Pubkey::new_unique();
        let (mut writer_position, mut writer_units) = writer(ledger);
        let mut taker = holder(ledger);
        let mut collateral_vault = 0u128;
        let mut counter_vault = 0u128;

        // 10 units lock 10 / 5 = 2 underlying
        collateral_vault += series
            .mint(&mut writer_position, &mut writer_units, 10 * WAD, 10)
            .unwrap();
        assert_eq!(collateral_vault, 2 * WAD);
        assert_eq!(writer_position.collateral, 2 * WAD);

        // 5 units exercise for 1 underlying against 5 × 2 / 5 = 2 strike asset
        move_units(&mut writer_units, &mut taker, 5 * WAD).unwrap();
        let exercise = series.exercise(&mut taker, 5 * WAD, 20).unwrap();
        assert_eq!(exercise.collateral_out, WAD);
        assert_eq!(exercise.counter_in, 2 * WAD);
        collateral_vault -= exercise.collateral_out;
        counter_vault += exercise.counter_in;

        // Burning 2.5 units releases 0.5 underlying
        let released = series
            .burn(&mut writer_position, &mut writer_units, 5 * WAD / 2, 30)
            .unwrap();
        assert_eq!(released, WAD / 2);
        collateral_vault -= released;
        assert_eq!(series.locked_collateral_total, collateral_vault);
        assert_eq!(series.total_supply, 5 * WAD / 2);

        let payout = series.redeem(&mut writer_position, EXPIRATION).unwrap();
        assert_eq!(payout.collateral_out, collateral_vault);
        assert_eq!(payout.counter_out, counter_vault);
        assert_eq!(series.locked_collateral_total, 0);
        assert_eq!(series.counter_asset_total, 0);
        assert_eq!(series.writer_collateral_total, 0);
    }

    #[test]
    fn put_at_issuance_rate_scales_strike_collateral() {
        let mut series = series_at_rate(OptionKind::Put, 1_500 * WAD, (9, 6), 5);
        let (mut position, mut holding) = writer(Pubkey::new_unique());

        let collateral = series.mint(&mut position, &mut holding, 5 * WAD, 10).unwrap();
        assert_eq!(collateral, 1_500 * WAD);
        assert_eq!(to_native(collateral, 6, Rounding::Up).unwrap(), 1_500_000_000);

        let exercise = series.exercise(&mut holding, 5 * WAD, 20).unwrap();
        assert_eq!(exercise.counter_in, WAD);
        assert_eq!(exercise.collateral_out, 1_500 * WAD);
    }

    #[test]
    fn issuance_rate_rounding_favours_the_vault() {
        let mut series = series_at_rate(OptionKind::Call, WAD, (18, 18), 5);
        let (mut position, mut holding) = writer(Pubkey::new_unique());

        // 7 raw units lock ceil(7 / 5) but release only floor(7 / 5)
        assert_eq!(series.mint(&mut position, &mut holding, 7, 10).unwrap(), 2);
        assert_eq!(series.burn(&mut position, &mut holding, 7, 10).unwrap(), 1);
        assert_eq!(series.locked_collateral_total, 1);
        assert_eq!(position.collateral, 1);
    }

    #[test]
    fn collateral_round_trips_through_the_issuance_rate() {
        let mut series = series_at_rate(OptionKind::Call, 2 * WAD, (18, 6), 5);
        let (mut position, mut holding) = writer(Pubkey::new_unique());

        let units = series.units_for_collateral(3 * WAD).unwrap();
        assert_eq!(units, 15 * WAD);
        assert_eq!(series.mint(&mut position, &mut holding, units, 10).unwrap(), 3 * WAD);
        assert_eq!(holding.balance, 15 * WAD);

        series.issuance_rate = u64::MAX;
        assert_eq!(
            series.units_for_collateral(u128::MAX / 2).unwrap_err(),
            Error::from(ErrorCode::MathOverflow)
        );
    }
}
