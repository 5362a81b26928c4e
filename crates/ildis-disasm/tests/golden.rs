//! Golden-text tests for full method disassembly.
//!
//! The method bodies are release-build CIL for a handful of small C#
//! methods. Expected output is compared byte for byte.

use ildis_disasm::{
    disassemble, disassemble_method, disassemble_to_string, DisassembleError,
    DisassemblerOptions, MetadataMap, MethodImplFlags, OwnedMethod,
};

const SLEEP: u32 = 0x0A00_0001;
const GET_NOW: u32 = 0x0A00_0002;
const GET_TICKS: u32 = 0x0A00_0003;
const TRY_PARSE: u32 = 0x0A00_0004;
const OP_EQUALITY: u32 = 0x0A00_0005;
const WRITE_LINE: u32 = 0x0A00_0006;
const DATE_TIME: u32 = 0x0100_0001;
const DATE_STRING: u32 = 0x7000_0001;

/// Metadata shared by all fixtures.
fn metadata() -> MetadataMap {
    MetadataMap::new()
        .with_method(SLEEP, "System.Threading.Thread", "Sleep")
        .with_method(GET_NOW, "System.DateTime", "get_Now")
        .with_method(GET_TICKS, "System.DateTime", "get_Ticks")
        .with_method(TRY_PARSE, "System.DateTime", "TryParse")
        .with_method(OP_EQUALITY, "System.DateTime", "op_Equality")
        .with_method(WRITE_LINE, "System.Console", "WriteLine")
        .with_type(DATE_TIME, "System.DateTime")
        .with_string(DATE_STRING, "1/1/2017")
}

/// Builds an instruction with a 4-byte token operand.
fn with_token(opcode: u8, token: u32) -> Vec<u8> {
    let mut bytes = vec![opcode];
    bytes.extend_from_slice(&token.to_le_bytes());
    bytes
}

fn body(parts: &[&[u8]]) -> Vec<u8> {
    parts.concat()
}

fn run(body: &[u8]) -> String {
    let method = OwnedMethod::il(body, metadata());
    let mut out = String::new();
    disassemble_method(&method, DisassemblerOptions::ALIGN_OPERAND, &mut out)
        .expect("disassembly failed");
    out
}

#[test]
fn empty() {
    assert_eq!(run(&[0x2A]), "ret\n");
}

#[test]
fn goto() {
    let call = |token| with_token(0x28, token);
    let code = body(&[
        &[0x16],
        &call(SLEEP),
        &call(GET_NOW),
        &[0x0B, 0x12, 0x01],
        &call(GET_TICKS),
        &[0x17, 0x6A, 0x2E, 0x06, 0x17],
        &call(SLEEP),
        &[0x16, 0x0A, 0x18],
        &call(SLEEP),
        &[0x06, 0x25, 0x17, 0x58, 0x0A, 0x1B, 0x32, 0xF2, 0x19],
        &call(SLEEP),
        &[0x2B, 0xCB],
    ]);

    let expected = "\
IL_0000:
ldc.i4.0
call         System.Threading.Thread.Sleep
call         System.DateTime.get_Now
stloc.1
ldloca.s     1
call         System.DateTime.get_Ticks
ldc.i4.1
conv.i8
beq.s        IL_001d
ldc.i4.1
call         System.Threading.Thread.Sleep
IL_001d:
ldc.i4.0
stloc.0
IL_001f:
ldc.i4.2
call         System.Threading.Thread.Sleep
ldloc.0
dup
ldc.i4.1
add
stloc.0
ldc.i4.5
blt.s        IL_001f
ldc.i4.3
call         System.Threading.Thread.Sleep
br.s         IL_0000
";
    assert_eq!(run(&code), expected);
}

#[test]
fn loop_with_short_branch() {
    let code = [0x16, 0x0A, 0x06, 0x25, 0x17, 0x58, 0x0A, 0x1C, 0x31, 0xF8, 0x2A];
    let expected = "\
ldc.i4.0
stloc.0
IL_0002:
ldloc.0
dup
ldc.i4.1
add
stloc.0
ldc.i4.6
ble.s        IL_0002
ret
";
    assert_eq!(run(&code), expected);
}

#[test]
fn two_byte_instruction() {
    // Debug build of the same loop: the comparison is `cgt` (0xFE 0x02).
    let code = [
        0x00, 0x16, 0x0A, 0x2B, 0x00, 0x06, 0x25, 0x17, 0x58, 0x0A, 0x1C, 0xFE, 0x02, 0x0B, 0x07,
        0x2C, 0xF4, 0x2A,
    ];
    let expected = "\
nop
ldc.i4.0
stloc.0
br.s         IL_0005
IL_0005:
ldloc.0
dup
ldc.i4.1
add
stloc.0
ldc.i4.6
cgt
stloc.1
ldloc.1
brfalse.s    IL_0005
ret
";
    assert_eq!(run(&code), expected);
}

#[test]
fn addition() {
    let code = [0x20, 0x00, 0xC7, 0xC7, 0x00, 0x1B, 0x62, 0x2A];
    assert_eq!(run(&code), "ldc.i4       13092608\nldc.i4.5\nshl\nret\n");
}

#[test]
fn call() {
    let code = body(&[
        &with_token(0x28, GET_NOW),
        &[0x0A],
        &with_token(0x72, DATE_STRING),
        &[0x12, 0x01],
        &with_token(0x28, TRY_PARSE),
        &[0x2C, 0x14, 0x06, 0x07],
        &with_token(0x28, OP_EQUALITY),
        &[0x2C, 0x0B, 0x07],
        &with_token(0x8C, DATE_TIME),
        &with_token(0x28, WRITE_LINE),
        &[0x2A],
    ]);

    let expected = "\
call         System.DateTime.get_Now
stloc.0
ldstr        \"1/1/2017\"
ldloca.s     1
call         System.DateTime.TryParse
brfalse.s    IL_0028
ldloc.0
ldloc.1
call         System.DateTime.op_Equality
brfalse.s    IL_0028
ldloc.1
box          System.DateTime
call         System.Console.WriteLine
IL_0028:
ret
";
    assert_eq!(run(&code), expected);
}

#[test]
fn inline_type() {
    let code = body(&[
        &with_token(0x28, GET_NOW),
        &with_token(0x8C, DATE_TIME),
        &with_token(0x28, WRITE_LINE),
        &[0x2A],
    ]);
    let expected = "\
call         System.DateTime.get_Now
box          System.DateTime
call         System.Console.WriteLine
ret
";
    assert_eq!(run(&code), expected);
}

#[test]
fn resharper_like_with_bytes_comment() {
    let code = [0x20, 0x00, 0xC7, 0xC7, 0x00, 0x1B, 0x62, 0x2B, 0xF7];
    let options = DisassemblerOptions::RESHARPER_LIKE | DisassemblerOptions::BYTES_COMMENT;
    let text = disassemble_to_string(&code, &MetadataMap::new(), options).unwrap();
    let expected = "\
IL_0000:
ADDR_0000:  ldc.i4       13092608\t// 0x20 0x00c7c700
ADDR_0005:  ldc.i4.5\t// 0x1b
ADDR_0006:  shl\t// 0x62
ADDR_0007:  br.s         IL_0000\t// 0x2b 0xf7
";
    assert_eq!(text, expected);
}

#[test]
fn shared_target_gets_one_label() {
    // Three branches to the same `ret`.
    let code = [0x2B, 0x04, 0x2B, 0x02, 0x2B, 0x00, 0x2A];
    let text =
        disassemble_to_string(&code, &MetadataMap::new(), DisassemblerOptions::NONE).unwrap();
    assert_eq!(text.matches("IL_0006:").count(), 1);
    assert_eq!(text.matches("IL_0006").count(), 4);
}

#[test]
fn escaped_string_operand() {
    let metadata = MetadataMap::new().with_string(DATE_STRING, "line\r\n\t\"q\"\\\u{7}");
    let code = body(&[&with_token(0x72, DATE_STRING), &[0x2A]]);
    let text = disassemble_to_string(&code, &metadata, DisassemblerOptions::NONE).unwrap();
    assert_eq!(text, "ldstr \"line\\r\\n\\t\\\"q\\\"\\\\\\x07\"\nret\n");
}

#[test]
fn rendering_is_idempotent() {
    let code = [0x16, 0x0A, 0x06, 0x25, 0x17, 0x58, 0x0A, 0x1C, 0x31, 0xF8, 0x2A];
    let first = run(&code);
    let second = run(&code);
    assert_eq!(first, second);
}

#[test]
fn unresolved_token_fails_the_call() {
    let code = with_token(0x28, 0x0A00_00FF);
    let result = disassemble_to_string(&code, &metadata(), DisassemblerOptions::DEFAULT);
    assert!(matches!(result, Err(DisassembleError::UnresolvedToken { .. })));
}

#[test]
fn extern_method_is_not_decodable() {
    let method = OwnedMethod::external(MethodImplFlags(MethodImplFlags::PRESERVE_SIG));
    let mut out = String::new();
    let result = disassemble_method(&method, DisassemblerOptions::DEFAULT, &mut out);
    assert!(matches!(result, Err(DisassembleError::NotDecodable { .. })));
}

#[test]
fn count_matches_rendered_instructions() {
    let code = [0x00, 0xFE, 0x01, 0x2A];
    let mut out = String::new();
    let count = disassemble(
        &code,
        0,
        code.len(),
        &MetadataMap::new(),
        DisassemblerOptions::NONE,
        &mut out,
    )
    .unwrap();
    assert_eq!(count, 3);
    assert_eq!(out, "nop\nceq\nret\n");
}
