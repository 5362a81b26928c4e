//! CIL instruction stream decoder.
//!
//! Decoding is a single forward pass over a byte window. Prefix bytes in
//! `0xF8..=0xFE` are folded into the following byte to form a two-byte
//! opcode; they do not advance the logical offset on their own. Operands are
//! read little-endian at the width given by the opcode catalog.

use std::iter::FusedIterator;

use ildis_core::opcode::{self, OpcodeDescriptor};
use ildis_core::Instruction;

use crate::DecodeError;

/// Decodes the `length` bytes of `bytes` starting at index `start`.
///
/// The returned [`Decoder`] yields instructions lazily and can be consumed
/// only once. Offsets are relative to `start`.
pub fn decode(bytes: &[u8], start: usize, length: usize) -> Result<Decoder<'_>, DecodeError> {
    let window = start
        .checked_add(length)
        .and_then(|end| bytes.get(start..end))
        .ok_or_else(|| DecodeError::window_out_of_bounds(start, length, bytes.len()))?;
    Ok(Decoder::new(window))
}

/// Decodes a whole method body into a vector.
pub fn decode_all(bytes: &[u8]) -> Result<Vec<Instruction>, DecodeError> {
    Decoder::new(bytes).collect()
}

/// Iterator over the instructions of a byte window.
///
/// Yields `Err` at most once; the iterator is exhausted afterwards.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    /// The raw window being decoded.
    bytes: &'a [u8],
    /// Index of the next raw byte.
    position: usize,
    /// Logical offset of the next instruction.
    offset: u32,
    /// Prefix byte waiting for its second opcode byte.
    pending_prefix: Option<u8>,
    finished: bool,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder over the entire slice.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            position: 0,
            offset: 0,
            pending_prefix: None,
            finished: false,
        }
    }

    /// Number of raw bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Logical offset the next instruction will get.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    fn fail(&mut self, error: DecodeError) -> Option<Result<Instruction, DecodeError>> {
        self.finished = true;
        self.pending_prefix = None;
        Some(Err(error))
    }

    /// Reads up to `size` operand bytes, packing them little-endian.
    ///
    /// Stops early at the end of the window; missing high bytes stay zero.
    fn read_operand(&mut self, opcode: &OpcodeDescriptor, size: usize) -> i64 {
        let available = size.min(self.bytes.len() - self.position);
        if available < size {
            log::warn!(
                "operand of {} at {:#x} truncated: need {} bytes, have {}",
                opcode.name,
                self.offset,
                size,
                available
            );
        }

        let operand = self.bytes[self.position..self.position + available]
            .iter()
            .enumerate()
            .fold(0i64, |acc, (i, &byte)| acc | (i64::from(byte) << (i * 8)));
        self.position += available;
        operand
    }
}

impl Iterator for Decoder<'_> {
    type Item = Result<Instruction, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        while let Some(&byte) = self.bytes.get(self.position) {
            self.position += 1;

            if opcode::is_prefix(byte) {
                self.pending_prefix = Some(byte);
                continue;
            }

            let key = match self.pending_prefix.take() {
                Some(prefix) => u16::from_be_bytes([prefix, byte]),
                None => u16::from(byte),
            };

            let Some(descriptor) = opcode::lookup(key) else {
                return self.fail(DecodeError::unknown_opcode(self.offset, key));
            };

            let operand_size = descriptor.operand_size();
            let operand = self.read_operand(descriptor, operand_size as usize);
            let instruction = Instruction {
                offset: self.offset,
                opcode: descriptor,
                operand_size,
                operand,
            };

            log::trace!(
                "IL_{:04x}: {} (size {})",
                instruction.offset,
                descriptor.name,
                instruction.byte_size()
            );

            self.offset = self.offset.wrapping_add(instruction.byte_size());
            return Some(Ok(instruction));
        }

        self.finished = true;
        match self.pending_prefix.take() {
            Some(prefix) => Some(Err(DecodeError::malformed_stream(self.offset, prefix))),
            None => None,
        }
    }
}

impl FusedIterator for Decoder<'_> {}
