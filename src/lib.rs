#![no_std]

pub mod storage;
pub mod types;
mod validation;
pub mod rounds;
pub mod pricing;
pub mod oracle;
mod payments;
mod vesting;
mod events;
mod admin;
pub mod presale;

// ============================================================================
// CONTRATO PRINCIPAL
// ============================================================================

pub use presale::{BrazaPresale, BrazaPresaleClient};
pub use oracle::{OracleAsset, PriceData};
pub use types::*;
