//! Mnemonic text rendering.
//!
//! Output is byte-exact and matches conventional CIL disassembly:
//!
//! ```text
//! IL_001f:
//! ldc.i4.2
//! call         System.Threading.Thread.Sleep
//! blt.s        IL_001f
//! ```
//!
//! Lines end with `\n` only. Offsets and opcode bytes use lowercase hex,
//! escaped control characters in string literals use uppercase hex.

use std::fmt::{self, Write};
use std::ops::{BitOr, BitOrAssign};

use ildis_core::{Instruction, MetadataToken, OperandType, TokenKind};

use crate::labels::LabelSet;
use crate::resolver::SymbolResolver;
use crate::DisassembleError;

/// Column operands are aligned to with [`DisassemblerOptions::ALIGN_OPERAND`].
pub const ALIGN_COLUMN: usize = 13;

/// Rendering flags. Flags combine with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisassemblerOptions(u32);

impl DisassemblerOptions {
    /// Plain output.
    pub const NONE: Self = Self(0);
    /// Prefix every instruction with `ADDR_xxxx:  `.
    pub const ADDRESS_LABEL: Self = Self(1 << 0);
    /// Append a `// 0x..` comment with the opcode and operand bytes.
    pub const BYTES_COMMENT: Self = Self(1 << 1);
    /// Pad mnemonics so operands start at [`ALIGN_COLUMN`].
    pub const ALIGN_OPERAND: Self = Self(1 << 2);
    /// Address labels with aligned operands.
    pub const RESHARPER_LIKE: Self = Self(Self::ADDRESS_LABEL.0 | Self::ALIGN_OPERAND.0);
    /// Aligned operands only.
    pub const DEFAULT: Self = Self::ALIGN_OPERAND;
    /// Every flag.
    pub const ALL: Self = Self(i32::MAX as u32);

    /// Builds options from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Returns true if every flag in `other` is set.
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for DisassemblerOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BitOr for DisassemblerOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for DisassemblerOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Writes `IL_xxxx` (no colon) for an offset.
pub fn write_label<W: Write + ?Sized>(out: &mut W, offset: u32) -> fmt::Result {
    write!(out, "IL_{offset:04x}")
}

/// Writes `value` as a double-quoted literal.
///
/// `\n \r \t \\ \"` get their usual escapes, other characters below 0x20
/// become `\xHH`.
pub fn write_string_literal<W: Write + ?Sized>(out: &mut W, value: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in value.chars() {
        match c {
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            '\\' => out.write_str("\\\\")?,
            '"' => out.write_str("\\\"")?,
            c if (c as u32) < 0x20 => write!(out, "\\x{:02X}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

/// Renders one instruction, preceded by a label line when its offset is in
/// `labels`, and terminated by `\n`.
pub fn render<W, R>(
    instruction: &Instruction,
    labels: &LabelSet,
    resolver: &R,
    options: DisassemblerOptions,
    out: &mut W,
) -> Result<(), DisassembleError>
where
    W: Write + ?Sized,
    R: SymbolResolver + ?Sized,
{
    if labels.contains(&instruction.offset) {
        write_label(out, instruction.offset)?;
        out.write_str(":\n")?;
    }

    if options.contains(DisassemblerOptions::ADDRESS_LABEL) {
        write!(out, "ADDR_{:04x}:  ", instruction.offset)?;
    }

    let name = instruction.mnemonic();
    out.write_str(name)?;

    if instruction.operand_size > 0 {
        let padding = if options.contains(DisassemblerOptions::ALIGN_OPERAND) {
            ALIGN_COLUMN.saturating_sub(name.len()).max(1)
        } else {
            1
        };
        write!(out, "{:padding$}", "")?;
        write_operand(instruction, resolver, out)?;
    }

    if options.contains(DisassemblerOptions::BYTES_COMMENT) {
        write_bytes_comment(instruction, out)?;
    }

    out.write_char('\n')?;
    Ok(())
}

fn write_operand<W, R>(
    instruction: &Instruction,
    resolver: &R,
    out: &mut W,
) -> Result<(), DisassembleError>
where
    W: Write + ?Sized,
    R: SymbolResolver + ?Sized,
{
    let token = MetadataToken(instruction.operand as u32);

    match instruction.operand_type() {
        OperandType::InlineMethod => {
            let method = resolver
                .resolve_method(token)
                .ok_or_else(|| DisassembleError::unresolved(TokenKind::Method, token))?;
            write!(out, "{}.{}", method.declaring_type, method.name)?;
        }
        OperandType::InlineField => {
            let field = resolver
                .resolve_field(token)
                .ok_or_else(|| DisassembleError::unresolved(TokenKind::Field, token))?;
            write!(out, "{}.{}", field.declaring_type, field.name)?;
        }
        OperandType::InlineString => {
            let value = resolver
                .resolve_string(token)
                .ok_or_else(|| DisassembleError::unresolved(TokenKind::String, token))?;
            write_string_literal(out, &value)?;
        }
        OperandType::InlineTok | OperandType::InlineType => {
            let full_name = resolver
                .resolve_type(token)
                .ok_or_else(|| DisassembleError::unresolved(TokenKind::Type, token))?;
            out.write_str(&full_name)?;
        }
        OperandType::InlineBrTarget | OperandType::ShortInlineBrTarget => {
            if let Some(target) = instruction.branch_target() {
                write_label(out, target)?;
            }
        }
        _ => write!(out, "{}", instruction.operand)?,
    }

    Ok(())
}

fn write_bytes_comment<W: Write + ?Sized>(instruction: &Instruction, out: &mut W) -> fmt::Result {
    let value = instruction.opcode.value;
    if instruction.opcode.is_two_byte() {
        write!(out, "\t// 0x{value:04x}")?;
    } else {
        write!(out, "\t// 0x{value:02x}")?;
    }

    if instruction.operand_size > 0 {
        let width = instruction.operand_size as usize * 2;
        write!(out, " 0x{:0width$x}", instruction.operand)?;
    }
    Ok(())
}
