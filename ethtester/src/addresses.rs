use alloy::primitives::address;
use alloy::primitives::{Address, U256};

pub const CHAIN_ID: u64 = 61;

pub const COINBASE: Address = address!("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
pub const ACCOUNT_1: Address = address!("0x2B5AD5c4795c026514f8317c7a215E218DcCD6cF");
pub const ACCOUNT_2: Address = address!("0x6813Eb9362372EEF6200f3b1dbC3f819671cBA69");

pub const FUNDED_ACCOUNTS: [Address; 3] = [COINBASE, ACCOUNT_1, ACCOUNT_2];

/// 1,000,000 ether in wei, credited to every funded account at genesis.
pub fn genesis_balance() -> U256 {
    U256::from(10u64).pow(U256::from(24u64))
}
