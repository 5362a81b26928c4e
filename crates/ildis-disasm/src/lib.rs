//! # ildis-disasm
//!
//! Disassembler for CIL method bodies.
//!
//! The pipeline has three stages:
//! - [`decoder`] turns raw bytes into [`Instruction`] records
//! - [`labels`] collects the offsets targeted by branches
//! - [`render`] prints each instruction, resolving metadata tokens through a
//!   [`SymbolResolver`]
//!
//! [`disassemble()`] runs all three over a byte window.
//!
//! ```
//! use ildis_disasm::{disassemble_to_string, DisassemblerOptions, MetadataMap};
//!
//! let text = disassemble_to_string(
//!     &[0x00, 0x2A],
//!     &MetadataMap::new(),
//!     DisassemblerOptions::DEFAULT,
//! )?;
//! assert_eq!(text, "nop\nret\n");
//! # Ok::<(), ildis_disasm::DisassembleError>(())
//! ```

pub mod decoder;
pub mod disassemble;
pub mod error;
pub mod labels;
pub mod method;
pub mod render;
pub mod resolver;

pub use decoder::{decode, decode_all, Decoder};
pub use disassemble::{disassemble, disassemble_method, disassemble_to_string};
pub use error::{DecodeError, DisassembleError};
pub use labels::{resolve_labels, LabelSet};
pub use method::{MethodBody, MethodImplFlags, OwnedMethod};
pub use render::{render, DisassemblerOptions, ALIGN_COLUMN};
pub use resolver::{MemberRef, MetadataMap, SymbolResolver};

pub use ildis_core::{Instruction, MetadataToken, OpcodeDescriptor, OperandType};
