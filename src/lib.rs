pub mod catalog;
pub mod chains;
pub mod cli;
pub mod clients;
pub mod model;
pub mod pacing;
pub mod probe;
pub mod run;
pub mod sink;
pub mod wallets;
