pub mod controller;
pub mod holding;
pub mod pool;
pub mod series;

pub use controller::*;
pub use holding::*;
pub use pool::*;
pub use series::*;
