use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    // Ledger errors
    #[msg("Insufficient balance for transfer")]
    InsufficientBalance,

    #[msg("Insufficient allowance for transfer")]
    InsufficientAllowance,

    #[msg("Holding does not belong to this ledger or owner")]
    InvalidHolding,

    #[msg("Math operation overflow")]
    MathOverflow,

    // Series state machine errors
    #[msg("Option has expired")]
    OptionExpired,

    #[msg("Option has not expired yet")]
    OptionNotExpired,

    #[msg("Burn exceeds the collateral this writer has locked")]
    InsufficientMinterShare,

    #[msg("Insufficient collateral in vault")]
    InsufficientCollateral,

    // Series creation errors
    #[msg("Strike price must be greater than zero")]
    InvalidStrikePrice,

    #[msg("Expiration must be in the future")]
    ExpirationInPast,

    #[msg("Issuance rate must be at least one")]
    InvalidIssuanceRate,

    #[msg("Asset decimals must not exceed 18")]
    InvalidDecimals,

    #[msg("Series name or symbol too long")]
    InvalidName,

    #[msg("Invalid underlying mint")]
    InvalidUnderlyingMint,

    #[msg("Invalid settlement mint")]
    InvalidSettlementMint,

    #[msg("Mint does not match the option series")]
    InvalidMint,

    #[msg("Invalid option series")]
    InvalidOptionSeries,

    #[msg("Invalid vault")]
    InvalidVault,

    #[msg("Token account is not owned by the signer")]
    InvalidTokenOwner,

    #[msg("Units cannot be sent to their own ledger or its pool")]
    InvalidRecipient,

    // Controller errors
    #[msg("Expiration or strike not in the allowed grid")]
    GridMismatch,

    #[msg("No option market listed for this expiration and strike")]
    UnknownMarket,

    #[msg("Grid exceeds the maximum number of entries")]
    GridTooLarge,

    #[msg("Unauthorized access")]
    Unauthorized,

    // Pool errors
    #[msg("Executed amount is below the accepted minimum")]
    SlippageExceeded,

    #[msg("Insufficient LP shares")]
    InsufficientShares,

    #[msg("Pool has insufficient liquidity")]
    InsufficientLiquidity,
}
