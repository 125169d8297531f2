//! Shims insulating the shell from any particular consensus engine's
//! request and response encodings.

pub mod abci_types;
