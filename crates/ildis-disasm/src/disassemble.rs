//! Decode, label and render a whole method body.

use std::fmt::Write;

use ildis_core::Instruction;

use crate::labels::resolve_labels;
use crate::method::MethodBody;
use crate::render::{render, DisassemblerOptions};
use crate::resolver::SymbolResolver;
use crate::{decode, DisassembleError};

/// Disassembles `length` bytes of `bytes` starting at index `start`,
/// appending text to `out`.
///
/// Returns the number of instructions rendered. On error, text already
/// appended to `out` is left in place.
pub fn disassemble<W, R>(
    bytes: &[u8],
    start: usize,
    length: usize,
    resolver: &R,
    options: DisassemblerOptions,
    out: &mut W,
) -> Result<usize, DisassembleError>
where
    W: Write + ?Sized,
    R: SymbolResolver + ?Sized,
{
    // Labels may point forward, so the whole stream is decoded first.
    let instructions = decode(bytes, start, length)?.collect::<Result<Vec<Instruction>, _>>()?;
    let labels = resolve_labels(&instructions);

    for instruction in &instructions {
        render(instruction, &labels, resolver, options, out)?;
    }

    log::debug!(
        "disassembled {} instructions ({} labels) from {} bytes",
        instructions.len(),
        labels.len(),
        length
    );
    Ok(instructions.len())
}

/// Disassembles the CIL body of a method.
///
/// Fails with [`DisassembleError::NotDecodable`] before reading any bytes
/// when the method is not implemented in CIL or has no body.
pub fn disassemble_method<M, W>(
    method: &M,
    options: DisassemblerOptions,
    out: &mut W,
) -> Result<usize, DisassembleError>
where
    M: MethodBody + ?Sized,
    W: Write + ?Sized,
{
    let flags = method.impl_flags();
    if !flags.is_il() {
        return Err(DisassembleError::not_decodable(flags));
    }

    let bytes = method
        .il_bytes()
        .ok_or_else(|| DisassembleError::not_decodable(flags))?;

    disassemble(bytes, 0, bytes.len(), method.resolver(), options, out)
}

/// Disassembles a whole buffer into a new string.
pub fn disassemble_to_string<R>(
    bytes: &[u8],
    resolver: &R,
    options: DisassemblerOptions,
) -> Result<String, DisassembleError>
where
    R: SymbolResolver + ?Sized,
{
    // Rough guess at the text produced per byte.
    let mut out = String::with_capacity(bytes.len() * 5);
    disassemble(bytes, 0, bytes.len(), resolver, options, &mut out)?;
    Ok(out)
}
