//! Error types for ildis-core.

use thiserror::Error;

/// Core error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No opcode carries the given mnemonic.
    #[error("no opcode named {0:?}")]
    UnknownMnemonic(String),
}
