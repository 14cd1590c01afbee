//! Structural checks over a finished instruction list.

use super::instruction::Instruction;
use super::list::InstructionList;
use super::pool::ConstantPool;
use crate::error::{Error, ErrorCode};
use crate::types::MethodSignature;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifySummary {
    pub max_stack: usize,
    /// Depth left on the stack after the last instruction.
    pub final_depth: usize,
}

/// Simulate the operand stack from an empty start.
///
/// Fails when an instruction pops more than is available, when a pool index
/// does not name the expected entry, or when an `invokeinterface` count
/// disagrees with its descriptor (receiver + argument slots).
pub fn verify(il: &InstructionList, pool: &ConstantPool) -> Result<VerifySummary, Error> {
    let mut depth = 0usize;
    let mut max_stack = 0usize;
    for (pc, ins) in il.iter().enumerate() {
        if let Instruction::InvokeInterface { index, count } = *ins {
            let info = pool.expect_method_ref(index)?;
            let sig = MethodSignature::parse(info.descriptor)?;
            let expected = 1 + sig.argument_slots();
            if count as usize != expected {
                return Err(Error::internal(
                    ErrorCode::XSLTC0005,
                    format!("{pc}: invokeinterface {info} declares {count} slots, descriptor needs {expected}"),
                ));
            }
        }
        let effect = ins.stack_effect(pool)?;
        depth = depth.checked_sub(effect.consumed).ok_or_else(|| {
            Error::internal(
                ErrorCode::XSLTC0004,
                format!("{pc}: '{}' pops {} with depth {depth}", ins.display_with(pool), effect.consumed),
            )
        })?;
        depth += effect.produced;
        max_stack = max_stack.max(depth);
    }
    debug!(instructions = il.len(), max_stack, final_depth = depth, "verified instruction list");
    Ok(VerifySummary {
        max_stack,
        final_depth: depth,
    })
}
