use super::instruction::Instruction;
use super::pool::ConstantPool;
use crate::error::Error;
use core::fmt;
use itertools::Itertools;
use smallvec::SmallVec;

/// Ordered, append-only instruction sequence of one method body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionList(SmallVec<[Instruction; 8]>);

impl InstructionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, instr: Instruction) {
        self.0.push(instr);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Instruction> {
        self.0.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Instruction] {
        &self.0
    }

    /// Net change of the operand stack depth over the whole sequence.
    pub fn stack_delta(&self, pool: &ConstantPool) -> Result<isize, Error> {
        self.0
            .iter()
            .map(|i| i.stack_effect(pool).map(|e| e.delta()))
            .sum()
    }

    /// Disassembly with resolved pool references, one instruction per line.
    pub fn disassemble(&self, pool: &ConstantPool) -> String {
        self.0
            .iter()
            .enumerate()
            .map(|(i, ins)| format!("{i:>4}: {}", ins.display_with(pool)))
            .join("\n")
    }
}

impl fmt::Display for InstructionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("; "))
    }
}

impl<'a> IntoIterator for &'a InstructionList {
    type Item = &'a Instruction;
    type IntoIter = core::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<Instruction>> for InstructionList {
    fn from(v: Vec<Instruction>) -> Self {
        Self(SmallVec::from_vec(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order() {
        let mut il = InstructionList::new();
        il.append(Instruction::ALoad(1));
        il.append(Instruction::ILoad(4));
        assert_eq!(il.as_slice(), &[Instruction::ALoad(1), Instruction::ILoad(4)]);
        assert_eq!(il.to_string(), "aload 1; iload 4");
    }

    #[test]
    fn stack_delta_sums_effects() {
        let pool = ConstantPool::new();
        let il = InstructionList::from(vec![
            Instruction::ALoad(1),
            Instruction::IConst(3),
            Instruction::DLoad(5),
        ]);
        assert_eq!(il.stack_delta(&pool).unwrap(), 4);
    }
}
