pub mod addresses;
pub mod blocks;
pub mod chain;
pub mod error;
pub mod quantity;

pub use addresses::*;
pub use chain::*;
pub use error::TesterError;
