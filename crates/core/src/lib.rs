//! The core public types shared across the Tessera ledger.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod chain;
pub mod ethereum;
pub mod voting_power;
