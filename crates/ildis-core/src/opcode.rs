//! CIL opcode definitions and lookup.
//!
//! The catalog covers the ECMA-335 base instruction set as exposed by the
//! CLR: 199 one-byte opcodes (including the `prefix1`..`prefix7` and
//! `prefixref` pseudo-opcodes) and 28 two-byte opcodes behind the `0xFE`
//! prefix. Two-byte opcodes are keyed as `(prefix << 8) | second_byte`.

use crate::Error;

/// Lowest reserved prefix byte (`prefix7`).
pub const PREFIX_FIRST: u8 = 0xF8;
/// Highest reserved prefix byte (`prefix1`), the only one in use.
pub const PREFIX_LAST: u8 = 0xFE;

/// Operand classification of an opcode.
///
/// Discriminants follow the CLR's numbering; 8 is unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum OperandType {
    /// 32-bit relative branch target.
    InlineBrTarget = 0,
    /// Field token.
    InlineField = 1,
    /// 32-bit integer.
    InlineI = 2,
    /// 64-bit integer.
    InlineI8 = 3,
    /// Method token.
    InlineMethod = 4,
    /// No operand.
    InlineNone = 5,
    /// Reserved, never emitted.
    InlinePhi = 6,
    /// 64-bit float.
    InlineR = 7,
    /// Stand-alone signature token.
    InlineSig = 9,
    /// User string token.
    InlineString = 10,
    /// Jump table count. Target entries are not part of the operand.
    InlineSwitch = 11,
    /// Type, method or field token (`ldtoken`).
    InlineTok = 12,
    /// Type token.
    InlineType = 13,
    /// 16-bit local or argument index.
    InlineVar = 14,
    /// 8-bit relative branch target.
    ShortInlineBrTarget = 15,
    /// 8-bit integer.
    ShortInlineI = 16,
    /// 32-bit float.
    ShortInlineR = 17,
    /// 8-bit local or argument index.
    ShortInlineVar = 18,
}

/// Operand width in bytes, indexed by `OperandType` discriminant.
static OPERAND_SIZE: [u8; 19] = {
    let mut sizes = [0u8; 19];
    sizes[OperandType::InlineBrTarget as usize] = 4;
    sizes[OperandType::InlineField as usize] = 4;
    sizes[OperandType::InlineI as usize] = 4;
    sizes[OperandType::InlineI8 as usize] = 8;
    sizes[OperandType::InlineMethod as usize] = 4;
    sizes[OperandType::InlineNone as usize] = 0;
    sizes[OperandType::InlinePhi as usize] = 0;
    sizes[OperandType::InlineR as usize] = 8;
    sizes[OperandType::InlineSig as usize] = 4;
    sizes[OperandType::InlineString as usize] = 4;
    sizes[OperandType::InlineSwitch as usize] = 4;
    sizes[OperandType::InlineTok as usize] = 4;
    sizes[OperandType::InlineType as usize] = 4;
    sizes[OperandType::InlineVar as usize] = 2;
    sizes[OperandType::ShortInlineBrTarget as usize] = 1;
    sizes[OperandType::ShortInlineI as usize] = 1;
    sizes[OperandType::ShortInlineR as usize] = 4;
    sizes[OperandType::ShortInlineVar as usize] = 1;
    sizes
};

impl OperandType {
    /// Returns the fixed operand width in bytes (0, 1, 2, 4 or 8).
    pub fn size(self) -> u8 {
        OPERAND_SIZE[self as usize]
    }

    /// Returns true for the relative branch target classifications.
    pub fn is_branch_target(self) -> bool {
        matches!(self, Self::InlineBrTarget | Self::ShortInlineBrTarget)
    }

    /// Returns true if the operand is a metadata token.
    pub fn is_token(self) -> bool {
        matches!(
            self,
            Self::InlineField
                | Self::InlineMethod
                | Self::InlineSig
                | Self::InlineString
                | Self::InlineTok
                | Self::InlineType
        )
    }

    /// Returns the CLR name of this classification.
    pub fn name(self) -> &'static str {
        match self {
            Self::InlineBrTarget => "InlineBrTarget",
            Self::InlineField => "InlineField",
            Self::InlineI => "InlineI",
            Self::InlineI8 => "InlineI8",
            Self::InlineMethod => "InlineMethod",
            Self::InlineNone => "InlineNone",
            Self::InlinePhi => "InlinePhi",
            Self::InlineR => "InlineR",
            Self::InlineSig => "InlineSig",
            Self::InlineString => "InlineString",
            Self::InlineSwitch => "InlineSwitch",
            Self::InlineTok => "InlineTok",
            Self::InlineType => "InlineType",
            Self::InlineVar => "InlineVar",
            Self::ShortInlineBrTarget => "ShortInlineBrTarget",
            Self::ShortInlineI => "ShortInlineI",
            Self::ShortInlineR => "ShortInlineR",
            Self::ShortInlineVar => "ShortInlineVar",
        }
    }
}

/// Opcode catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpcodeDescriptor {
    /// Mnemonic, e.g. `ldc.i4.s`.
    pub name: &'static str,
    /// Raw value; two-byte opcodes carry their prefix in the high byte.
    pub value: u16,
    /// Operand classification.
    pub operand_type: OperandType,
}

impl OpcodeDescriptor {
    pub const fn new(name: &'static str, value: u16, operand_type: OperandType) -> Self {
        Self {
            name,
            value,
            operand_type,
        }
    }

    /// Returns true if the opcode is encoded with a prefix byte.
    pub const fn is_two_byte(&self) -> bool {
        self.value > 0xFF
    }

    /// Number of bytes taken by the opcode itself.
    pub const fn opcode_size(&self) -> u8 {
        if self.is_two_byte() {
            2
        } else {
            1
        }
    }

    /// Operand width in bytes.
    pub fn operand_size(&self) -> u8 {
        self.operand_type.size()
    }
}

use OperandType::*;

const fn op(name: &'static str, value: u16, operand_type: OperandType) -> OpcodeDescriptor {
    OpcodeDescriptor::new(name, value, operand_type)
}

const ONE_BYTE: [OpcodeDescriptor; 199] = [
    op("nop", 0x00, InlineNone),
    op("break", 0x01, InlineNone),
    op("ldarg.0", 0x02, InlineNone),
    op("ldarg.1", 0x03, InlineNone),
    op("ldarg.2", 0x04, InlineNone),
    op("ldarg.3", 0x05, InlineNone),
    op("ldloc.0", 0x06, InlineNone),
    op("ldloc.1", 0x07, InlineNone),
    op("ldloc.2", 0x08, InlineNone),
    op("ldloc.3", 0x09, InlineNone),
    op("stloc.0", 0x0A, InlineNone),
    op("stloc.1", 0x0B, InlineNone),
    op("stloc.2", 0x0C, InlineNone),
    op("stloc.3", 0x0D, InlineNone),
    op("ldarg.s", 0x0E, ShortInlineVar),
    op("ldarga.s", 0x0F, ShortInlineVar),
    op("starg.s", 0x10, ShortInlineVar),
    op("ldloc.s", 0x11, ShortInlineVar),
    op("ldloca.s", 0x12, ShortInlineVar),
    op("stloc.s", 0x13, ShortInlineVar),
    op("ldnull", 0x14, InlineNone),
    op("ldc.i4.m1", 0x15, InlineNone),
    op("ldc.i4.0", 0x16, InlineNone),
    op("ldc.i4.1", 0x17, InlineNone),
    op("ldc.i4.2", 0x18, InlineNone),
    op("ldc.i4.3", 0x19, InlineNone),
    op("ldc.i4.4", 0x1A, InlineNone),
    op("ldc.i4.5", 0x1B, InlineNone),
    op("ldc.i4.6", 0x1C, InlineNone),
    op("ldc.i4.7", 0x1D, InlineNone),
    op("ldc.i4.8", 0x1E, InlineNone),
    op("ldc.i4.s", 0x1F, ShortInlineI),
    op("ldc.i4", 0x20, InlineI),
    op("ldc.i8", 0x21, InlineI8),
    op("ldc.r4", 0x22, ShortInlineR),
    op("ldc.r8", 0x23, InlineR),
    op("dup", 0x25, InlineNone),
    op("pop", 0x26, InlineNone),
    op("jmp", 0x27, InlineMethod),
    op("call", 0x28, InlineMethod),
    op("calli", 0x29, InlineSig),
    op("ret", 0x2A, InlineNone),
    op("br.s", 0x2B, ShortInlineBrTarget),
    op("brfalse.s", 0x2C, ShortInlineBrTarget),
    op("brtrue.s", 0x2D, ShortInlineBrTarget),
    op("beq.s", 0x2E, ShortInlineBrTarget),
    op("bge.s", 0x2F, ShortInlineBrTarget),
    op("bgt.s", 0x30, ShortInlineBrTarget),
    op("ble.s", 0x31, ShortInlineBrTarget),
    op("blt.s", 0x32, ShortInlineBrTarget),
    op("bne.un.s", 0x33, ShortInlineBrTarget),
    op("bge.un.s", 0x34, ShortInlineBrTarget),
    op("bgt.un.s", 0x35, ShortInlineBrTarget),
    op("ble.un.s", 0x36, ShortInlineBrTarget),
    op("blt.un.s", 0x37, ShortInlineBrTarget),
    op("br", 0x38, InlineBrTarget),
    op("brfalse", 0x39, InlineBrTarget),
    op("brtrue", 0x3A, InlineBrTarget),
    op("beq", 0x3B, InlineBrTarget),
    op("bge", 0x3C, InlineBrTarget),
    op("bgt", 0x3D, InlineBrTarget),
    op("ble", 0x3E, InlineBrTarget),
    op("blt", 0x3F, InlineBrTarget),
    op("bne.un", 0x40, InlineBrTarget),
    op("bge.un", 0x41, InlineBrTarget),
    op("bgt.un", 0x42, InlineBrTarget),
    op("ble.un", 0x43, InlineBrTarget),
    op("blt.un", 0x44, InlineBrTarget),
    op("switch", 0x45, InlineSwitch),
    op("ldind.i1", 0x46, InlineNone),
    op("ldind.u1", 0x47, InlineNone),
    op("ldind.i2", 0x48, InlineNone),
    op("ldind.u2", 0x49, InlineNone),
    op("ldind.i4", 0x4A, InlineNone),
    op("ldind.u4", 0x4B, InlineNone),
    op("ldind.i8", 0x4C, InlineNone),
    op("ldind.i", 0x4D, InlineNone),
    op("ldind.r4", 0x4E, InlineNone),
    op("ldind.r8", 0x4F, InlineNone),
    op("ldind.ref", 0x50, InlineNone),
    op("stind.ref", 0x51, InlineNone),
    op("stind.i1", 0x52, InlineNone),
    op("stind.i2", 0x53, InlineNone),
    op("stind.i4", 0x54, InlineNone),
    op("stind.i8", 0x55, InlineNone),
    op("stind.r4", 0x56, InlineNone),
    op("stind.r8", 0x57, InlineNone),
    op("add", 0x58, InlineNone),
    op("sub", 0x59, InlineNone),
    op("mul", 0x5A, InlineNone),
    op("div", 0x5B, InlineNone),
    op("div.un", 0x5C, InlineNone),
    op("rem", 0x5D, InlineNone),
    op("rem.un", 0x5E, InlineNone),
    op("and", 0x5F, InlineNone),
    op("or", 0x60, InlineNone),
    op("xor", 0x61, InlineNone),
    op("shl", 0x62, InlineNone),
    op("shr", 0x63, InlineNone),
    op("shr.un", 0x64, InlineNone),
    op("neg", 0x65, InlineNone),
    op("not", 0x66, InlineNone),
    op("conv.i1", 0x67, InlineNone),
    op("conv.i2", 0x68, InlineNone),
    op("conv.i4", 0x69, InlineNone),
    op("conv.i8", 0x6A, InlineNone),
    op("conv.r4", 0x6B, InlineNone),
    op("conv.r8", 0x6C, InlineNone),
    op("conv.u4", 0x6D, InlineNone),
    op("conv.u8", 0x6E, InlineNone),
    op("callvirt", 0x6F, InlineMethod),
    op("cpobj", 0x70, InlineType),
    op("ldobj", 0x71, InlineType),
    op("ldstr", 0x72, InlineString),
    op("newobj", 0x73, InlineMethod),
    op("castclass", 0x74, InlineType),
    op("isinst", 0x75, InlineType),
    op("conv.r.un", 0x76, InlineNone),
    op("unbox", 0x79, InlineType),
    op("throw", 0x7A, InlineNone),
    op("ldfld", 0x7B, InlineField),
    op("ldflda", 0x7C, InlineField),
    op("stfld", 0x7D, InlineField),
    op("ldsfld", 0x7E, InlineField),
    op("ldsflda", 0x7F, InlineField),
    op("stsfld", 0x80, InlineField),
    op("stobj", 0x81, InlineType),
    op("conv.ovf.i1.un", 0x82, InlineNone),
    op("conv.ovf.i2.un", 0x83, InlineNone),
    op("conv.ovf.i4.un", 0x84, InlineNone),
    op("conv.ovf.i8.un", 0x85, InlineNone),
    op("conv.ovf.u1.un", 0x86, InlineNone),
    op("conv.ovf.u2.un", 0x87, InlineNone),
    op("conv.ovf.u4.un", 0x88, InlineNone),
    op("conv.ovf.u8.un", 0x89, InlineNone),
    op("conv.ovf.i.un", 0x8A, InlineNone),
    op("conv.ovf.u.un", 0x8B, InlineNone),
    op("box", 0x8C, InlineType),
    op("newarr", 0x8D, InlineType),
    op("ldlen", 0x8E, InlineNone),
    op("ldelema", 0x8F, InlineType),
    op("ldelem.i1", 0x90, InlineNone),
    op("ldelem.u1", 0x91, InlineNone),
    op("ldelem.i2", 0x92, InlineNone),
    op("ldelem.u2", 0x93, InlineNone),
    op("ldelem.i4", 0x94, InlineNone),
    op("ldelem.u4", 0x95, InlineNone),
    op("ldelem.i8", 0x96, InlineNone),
    op("ldelem.i", 0x97, InlineNone),
    op("ldelem.r4", 0x98, InlineNone),
    op("ldelem.r8", 0x99, InlineNone),
    op("ldelem.ref", 0x9A, InlineNone),
    op("stelem.i", 0x9B, InlineNone),
    op("stelem.i1", 0x9C, InlineNone),
    op("stelem.i2", 0x9D, InlineNone),
    op("stelem.i4", 0x9E, InlineNone),
    op("stelem.i8", 0x9F, InlineNone),
    op("stelem.r4", 0xA0, InlineNone),
    op("stelem.r8", 0xA1, InlineNone),
    op("stelem.ref", 0xA2, InlineNone),
    op("ldelem", 0xA3, InlineType),
    op("stelem", 0xA4, InlineType),
    op("unbox.any", 0xA5, InlineType),
    op("conv.ovf.i1", 0xB3, InlineNone),
    op("conv.ovf.u1", 0xB4, InlineNone),
    op("conv.ovf.i2", 0xB5, InlineNone),
    op("conv.ovf.u2", 0xB6, InlineNone),
    op("conv.ovf.i4", 0xB7, InlineNone),
    op("conv.ovf.u4", 0xB8, InlineNone),
    op("conv.ovf.i8", 0xB9, InlineNone),
    op("conv.ovf.u8", 0xBA, InlineNone),
    op("refanyval", 0xC2, InlineType),
    op("ckfinite", 0xC3, InlineNone),
    op("mkrefany", 0xC6, InlineType),
    op("ldtoken", 0xD0, InlineTok),
    op("conv.u2", 0xD1, InlineNone),
    op("conv.u1", 0xD2, InlineNone),
    op("conv.i", 0xD3, InlineNone),
    op("conv.ovf.i", 0xD4, InlineNone),
    op("conv.ovf.u", 0xD5, InlineNone),
    op("add.ovf", 0xD6, InlineNone),
    op("add.ovf.un", 0xD7, InlineNone),
    op("mul.ovf", 0xD8, InlineNone),
    op("mul.ovf.un", 0xD9, InlineNone),
    op("sub.ovf", 0xDA, InlineNone),
    op("sub.ovf.un", 0xDB, InlineNone),
    op("endfinally", 0xDC, InlineNone),
    op("leave", 0xDD, InlineBrTarget),
    op("leave.s", 0xDE, ShortInlineBrTarget),
    op("stind.i", 0xDF, InlineNone),
    op("conv.u", 0xE0, InlineNone),
    op("prefix7", 0xF8, InlineNone),
    op("prefix6", 0xF9, InlineNone),
    op("prefix5", 0xFA, InlineNone),
    op("prefix4", 0xFB, InlineNone),
    op("prefix3", 0xFC, InlineNone),
    op("prefix2", 0xFD, InlineNone),
    op("prefix1", 0xFE, InlineNone),
    op("prefixref", 0xFF, InlineNone),
];

const TWO_BYTE: [OpcodeDescriptor; 28] = [
    op("arglist", 0xFE00, InlineNone),
    op("ceq", 0xFE01, InlineNone),
    op("cgt", 0xFE02, InlineNone),
    op("cgt.un", 0xFE03, InlineNone),
    op("clt", 0xFE04, InlineNone),
    op("clt.un", 0xFE05, InlineNone),
    op("ldftn", 0xFE06, InlineMethod),
    op("ldvirtftn", 0xFE07, InlineMethod),
    op("ldarg", 0xFE09, InlineVar),
    op("ldarga", 0xFE0A, InlineVar),
    op("starg", 0xFE0B, InlineVar),
    op("ldloc", 0xFE0C, InlineVar),
    op("ldloca", 0xFE0D, InlineVar),
    op("stloc", 0xFE0E, InlineVar),
    op("localloc", 0xFE0F, InlineNone),
    op("endfilter", 0xFE11, InlineNone),
    op("unaligned.", 0xFE12, ShortInlineI),
    op("volatile.", 0xFE13, InlineNone),
    op("tail.", 0xFE14, InlineNone),
    op("initobj", 0xFE15, InlineType),
    op("constrained.", 0xFE16, InlineType),
    op("cpblk", 0xFE17, InlineNone),
    op("initblk", 0xFE18, InlineNone),
    op("no.", 0xFE19, ShortInlineI),
    op("rethrow", 0xFE1A, InlineNone),
    op("sizeof", 0xFE1C, InlineType),
    op("refanytype", 0xFE1D, InlineNone),
    op("readonly.", 0xFE1E, InlineNone),
];

/// All one-byte opcodes, in value order.
pub static ONE_BYTE_OPCODES: [OpcodeDescriptor; 199] = ONE_BYTE;

/// All two-byte opcodes (prefix `0xFE`), in value order.
pub static TWO_BYTE_OPCODES: [OpcodeDescriptor; 28] = TWO_BYTE;

/// Const None for array initialization (stable Rust compatibility)
const NONE_ENTRY: Option<OpcodeDescriptor> = None;

/// One-byte opcode table, indexed by opcode byte.
pub static OPCODE_TABLE: [Option<OpcodeDescriptor>; 256] = {
    let mut table = [NONE_ENTRY; 256];
    let mut i = 0;
    while i < ONE_BYTE.len() {
        let entry = ONE_BYTE[i];
        table[entry.value as usize] = Some(entry);
        i += 1;
    }
    table
};

/// Two-byte opcode table, indexed by the byte following the `0xFE` prefix.
pub static OPCODE_TABLE_FE: [Option<OpcodeDescriptor>; 256] = {
    let mut table = [NONE_ENTRY; 256];
    let mut i = 0;
    while i < TWO_BYTE.len() {
        let entry = TWO_BYTE[i];
        table[(entry.value & 0xFF) as usize] = Some(entry);
        i += 1;
    }
    table
};

/// Returns true if `byte` is a reserved two-byte opcode prefix.
#[inline]
pub fn is_prefix(byte: u8) -> bool {
    (PREFIX_FIRST..=PREFIX_LAST).contains(&byte)
}

/// Looks up an opcode by its 16-bit key.
///
/// One-byte opcodes are keyed by their zero-extended value, two-byte
/// opcodes by `(prefix << 8) | second_byte`. Only the `0xFE` prefix has
/// assigned opcodes; other prefixes always miss.
pub fn lookup(key: u16) -> Option<&'static OpcodeDescriptor> {
    let [high, low] = key.to_be_bytes();
    match high {
        0x00 => OPCODE_TABLE[low as usize].as_ref(),
        PREFIX_LAST => OPCODE_TABLE_FE[low as usize].as_ref(),
        _ => None,
    }
}

/// Finds an opcode by mnemonic.
pub fn by_name(name: &str) -> Result<&'static OpcodeDescriptor, Error> {
    iter()
        .find(|entry| entry.name == name)
        .ok_or_else(|| Error::UnknownMnemonic(name.to_string()))
}

/// Iterates over every defined opcode, one-byte forms first.
pub fn iter() -> impl Iterator<Item = &'static OpcodeDescriptor> {
    ONE_BYTE_OPCODES.iter().chain(TWO_BYTE_OPCODES.iter())
}
