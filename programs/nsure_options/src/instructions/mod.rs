pub mod add_liquidity;
pub mod approve;
pub mod burn_options;
pub mod configure;
pub mod create_option;
pub mod create_series;
pub mod exercise;
pub mod initialize_controller;
pub mod market_views;
pub mod mint_options;
pub mod option;
pub mod redeem;
pub mod remove_liquidity;
pub mod series_views;
pub mod swap;
pub mod transfer;

// Note: Glob imports are required for Anchor's #[program] macro
// The handler name collision is intentional - each module's handler is accessed via module path
#[allow(ambiguous_glob_reexports)]
pub use add_liquidity::*;
#[allow(ambiguous_glob_reexports)]
pub use approve::*;
#[allow(ambiguous_glob_reexports)]
pub use burn_options::*;
#[allow(ambiguous_glob_reexports)]
pub use configure::*;
#[allow(ambiguous_glob_reexports)]
pub use create_option::*;
#[allow(ambiguous_glob_reexports)]
pub use create_series::*;
#[allow(ambiguous_glob_reexports)]
pub use exercise::*;
#[allow(ambiguous_glob_reexports)]
pub use initialize_controller::*;
#[allow(ambiguous_glob_reexports)]
pub use market_views::*;
#[allow(ambiguous_glob_reexports)]
pub use mint_options::*;
#[allow(ambiguous_glob_reexports)]
pub use option::*;
#[allow(ambiguous_glob_reexports)]
pub use redeem::*;
#[allow(ambiguous_glob_reexports)]
pub use remove_liquidity::*;
#[allow(ambiguous_glob_reexports)]
pub use series_views::*;
#[allow(ambiguous_glob_reexports)]
pub use swap::*;
#[allow(ambiguous_glob_reexports)]
pub use transfer::*;
