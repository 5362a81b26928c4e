//! Disassembly error types.

use ildis_core::{MetadataToken, TokenKind};
use thiserror::Error;

use crate::method::MethodImplFlags;

/// Error type for instruction decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A two-byte opcode prefix was the last byte of the stream.
    #[error("malformed stream at {offset:#x}: body ends after prefix byte {prefix:#04x}")]
    MalformedStream { offset: u32, prefix: u8 },

    /// Unknown opcode encountered.
    #[error("unknown opcode {value:#06x} at {offset:#x}")]
    UnknownOpcode { offset: u32, value: u16 },

    /// The requested window does not fit in the buffer.
    #[error("window of {length} bytes at index {start} exceeds buffer of {available} bytes")]
    WindowOutOfBounds {
        start: usize,
        length: usize,
        available: usize,
    },
}

impl DecodeError {
    /// Creates a new MalformedStream error.
    pub fn malformed_stream(offset: u32, prefix: u8) -> Self {
        Self::MalformedStream { offset, prefix }
    }

    /// Creates a new UnknownOpcode error.
    pub fn unknown_opcode(offset: u32, value: u16) -> Self {
        Self::UnknownOpcode { offset, value }
    }

    /// Creates a new WindowOutOfBounds error.
    pub fn window_out_of_bounds(start: usize, length: usize, available: usize) -> Self {
        Self::WindowOutOfBounds {
            start,
            length,
            available,
        }
    }
}

/// Error type for a whole disassembly call.
#[derive(Error, Debug)]
pub enum DisassembleError {
    /// The method has no CIL body to decode.
    #[error("only IL methods are supported (implementation flags {flags})")]
    NotDecodable { flags: MethodImplFlags },

    /// Decoding the instruction stream failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The symbol resolver has no entry for an operand token.
    #[error("unresolved {kind} token {token}")]
    UnresolvedToken {
        kind: TokenKind,
        token: MetadataToken,
    },

    /// Writing to the output sink failed.
    #[error("failed to write disassembly: {0}")]
    Format(#[from] std::fmt::Error),
}

impl DisassembleError {
    /// Creates a new NotDecodable error.
    pub fn not_decodable(flags: MethodImplFlags) -> Self {
        Self::NotDecodable { flags }
    }

    /// Creates a new UnresolvedToken error.
    pub fn unresolved(kind: TokenKind, token: MetadataToken) -> Self {
        Self::UnresolvedToken { kind, token }
    }
}
