pub mod account;
pub mod math;
pub mod pda;
pub mod token;
pub mod validation;

pub use account::*;
pub use math::*;
pub use pda::*;
pub use token::*;
pub use validation::*;
