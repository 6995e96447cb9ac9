//! Domain models shared by the exposure engine and the command line.

pub mod asset;
pub mod config;
pub mod network;
pub mod scan;
