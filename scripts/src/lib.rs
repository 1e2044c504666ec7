//! Scripts for deploying the real estate tokenization contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
mod commands;
pub mod constants;
pub mod errors;
pub mod networks;
#[cfg(test)]
mod test_helpers;
pub mod types;
pub mod utils;
