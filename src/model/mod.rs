pub mod balance;
pub mod chain;
pub mod token;

pub use balance::{BalanceRecord, TokenType};
pub use chain::ChainDescriptor;
pub use token::TokenDescriptor;
