//! Branch target label resolution.

use std::collections::BTreeSet;

use ildis_core::Instruction;

/// Offsets that get an `IL_xxxx:` line before the instruction there.
pub type LabelSet = BTreeSet<u32>;

/// Collects the absolute target of every branch instruction.
///
/// Targets may lie before or after the branch, or just past the final
/// instruction, so this has to run over the complete sequence before any
/// rendering happens.
pub fn resolve_labels(instructions: &[Instruction]) -> LabelSet {
    let labels: LabelSet = instructions
        .iter()
        .filter_map(Instruction::branch_target)
        .collect();
    log::debug!(
        "{} branch targets across {} instructions",
        labels.len(),
        instructions.len()
    );
    labels
}
