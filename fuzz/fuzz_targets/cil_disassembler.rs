#![no_main]

use libfuzzer_sys::fuzz_target;
use ildis_disasm::{
    disassemble, DisassemblerOptions, MemberRef, MetadataToken, SymbolResolver,
};

/// Resolves every token so rendering runs past the first operand.
struct AnyResolver;

impl SymbolResolver for AnyResolver {
    fn resolve_method(&self, token: MetadataToken) -> Option<MemberRef> {
        Some(MemberRef::new("T", format!("m{:x}", token.value())))
    }

    fn resolve_field(&self, token: MetadataToken) -> Option<MemberRef> {
        Some(MemberRef::new("T", format!("f{:x}", token.value())))
    }

    fn resolve_type(&self, token: MetadataToken) -> Option<String> {
        Some(format!("T{:x}", token.value()))
    }

    fn resolve_string(&self, token: MetadataToken) -> Option<String> {
        Some(format!("s{:x}\r\n\0", token.value()))
    }
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the options, the rest is the method body.
    let options = DisassemblerOptions::from_bits(u32::from(data[0] & 0x07));
    let body = &data[1..];

    let mut out = String::new();
    if let Ok(count) = disassemble(body, 0, body.len(), &AnyResolver, options, &mut out) {
        assert!(count <= body.len());
        assert!(!out.contains("\r\n"));
        if count > 0 {
            assert!(out.ends_with('\n'));
        }
    }
});
