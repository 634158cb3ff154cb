pub mod config;
pub mod rpc;
pub mod trail;
pub mod writing;
