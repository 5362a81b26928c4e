//! # ildis-core
//!
//! Core abstractions for the ildis CIL disassembler. This crate defines the
//! opcode catalog for the ECMA-335 instruction set, the decoded instruction
//! record, and metadata tokens.

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod token;

pub use error::Error;
pub use instruction::Instruction;
pub use opcode::{OpcodeDescriptor, OperandType};
pub use token::{MetadataToken, TokenKind};
