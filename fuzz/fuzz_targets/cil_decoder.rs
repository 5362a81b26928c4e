#![no_main]

use libfuzzer_sys::fuzz_target;
use ildis_disasm::{decode, resolve_labels};

fuzz_target!(|data: &[u8]| {
    let Ok(decoder) = decode(data, 0, data.len()) else {
        return;
    };

    let mut instructions = Vec::new();
    for result in decoder {
        match result {
            Ok(instruction) => instructions.push(instruction),
            Err(_) => return,
        }
    }

    let mut expected = 0u32;
    for instruction in &instructions {
        assert_eq!(instruction.offset, expected);
        // CIL opcodes are 1 or 2 bytes, operands at most 8
        let size = instruction.byte_size();
        assert!(size >= 1 && size <= 10);
        expected += size;
    }

    let labels = resolve_labels(&instructions);
    assert!(labels.len() <= instructions.len());
});
