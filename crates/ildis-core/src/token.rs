//! Metadata tokens carried as instruction operands.

use std::fmt;

/// A metadata token: the high byte selects a metadata table, the low 24
/// bits are a 1-based row index into it.
///
/// The disassembler never interprets tokens itself; they are handed to a
/// symbol resolver unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetadataToken(pub u32);

impl MetadataToken {
    /// TypeRef table.
    pub const TYPE_REF: u8 = 0x01;
    /// MemberRef table.
    pub const MEMBER_REF: u8 = 0x0A;
    /// User string heap (not a real table).
    pub const USER_STRING: u8 = 0x70;

    /// Builds a token from a table id and row index.
    pub const fn new(table: u8, row: u32) -> Self {
        Self(((table as u32) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the metadata table id.
    pub const fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Returns the row index within the table.
    pub const fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns the raw token value.
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for MetadataToken {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for MetadataToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Which kind of symbol a token is expected to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// A method definition, reference or instantiation.
    Method,
    /// A field definition or reference.
    Field,
    /// A type definition, reference or specification.
    Type,
    /// A user string literal.
    String,
}

impl TokenKind {
    /// Returns the name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Field => "field",
            Self::Type => "type",
            Self::String => "string",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
