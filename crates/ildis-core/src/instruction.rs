//! Decoded CIL instruction representation.

use crate::opcode::{OpcodeDescriptor, OperandType};
use crate::MetadataToken;

/// A decoded instruction.
///
/// `offset` is relative to the start of the logical instruction stream, not
/// to the raw buffer the instruction was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// Offset of the first opcode byte.
    pub offset: u32,
    /// Catalog entry for the opcode.
    pub opcode: &'static OpcodeDescriptor,
    /// Width of the trailing operand in bytes.
    pub operand_size: u8,
    /// Raw little-endian operand bits, zero-extended.
    pub operand: i64,
}

impl Instruction {
    /// Creates an instruction with the catalog's operand width and no operand.
    pub fn new(offset: u32, opcode: &'static OpcodeDescriptor) -> Self {
        Self {
            offset,
            opcode,
            operand_size: opcode.operand_size(),
            operand: 0,
        }
    }

    /// Sets the operand value.
    pub fn with_operand(mut self, operand: i64) -> Self {
        self.operand = operand;
        self
    }

    /// Returns the mnemonic.
    pub fn mnemonic(&self) -> &'static str {
        self.opcode.name
    }

    /// Returns the operand classification.
    pub fn operand_type(&self) -> OperandType {
        self.opcode.operand_type
    }

    /// Encoded size: opcode bytes plus operand width.
    pub fn byte_size(&self) -> u32 {
        u32::from(self.opcode.opcode_size()) + u32::from(self.operand_size)
    }

    /// Returns the offset just past this instruction.
    pub fn end_offset(&self) -> u32 {
        self.offset.wrapping_add(self.byte_size())
    }

    /// Returns true if the operand is a relative branch target.
    pub fn is_branch(&self) -> bool {
        self.operand_type().is_branch_target()
    }

    /// Returns the absolute branch destination for branch instructions.
    ///
    /// Short forms sign-extend their 8-bit displacement, long forms their
    /// 32-bit displacement. The result wraps into `u32`.
    pub fn branch_target(&self) -> Option<u32> {
        let displacement = match self.operand_type() {
            OperandType::ShortInlineBrTarget => self.operand as i8 as i32,
            OperandType::InlineBrTarget => self.operand as i32,
            _ => return None,
        };
        Some(self.end_offset().wrapping_add(displacement as u32))
    }

    /// Returns the operand as a metadata token.
    pub fn token(&self) -> Option<MetadataToken> {
        self.operand_type()
            .is_token()
            .then(|| MetadataToken(self.operand as u32))
    }

    /// Returns the little-endian operand bytes (empty without operand).
    pub fn operand_bytes(&self) -> Vec<u8> {
        self.operand.to_le_bytes()[..self.operand_size as usize].to_vec()
    }
}
