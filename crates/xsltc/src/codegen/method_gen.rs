use super::class_gen::ClassGenerator;
use super::runtime::{NEXT, SET_START_NODE};
use crate::bytecode::{Instruction, InstructionList};
use crate::config::CompilerConfig;
use crate::error::{Error, ErrorCode};
use crate::model::QName;
use crate::types::Type;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalVariable {
    pub slot: u16,
    pub ty: Type,
}

/// Per-method generation state: the instruction list being built and the
/// local variable layout.
#[derive(Debug, Clone)]
pub struct MethodGenerator {
    name: String,
    il: InstructionList,
    dom_slot: u16,
    current_node_slot: u16,
    next_slot: u16,
    locals: HashMap<QName, LocalVariable>,
}

impl MethodGenerator {
    pub fn new(name: impl Into<String>, config: &CompilerConfig) -> Self {
        Self {
            name: name.into(),
            il: InstructionList::new(),
            dom_slot: config.dom_slot,
            current_node_slot: config.current_node_slot,
            next_slot: config.first_free_slot,
            locals: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instruction_list(&self) -> &InstructionList {
        &self.il
    }

    pub fn into_instruction_list(self) -> InstructionList {
        self.il
    }

    pub fn append(&mut self, instr: Instruction) {
        self.il.append(instr);
    }

    /// Allocate a local slot for `name`. Re-declaring a name returns the
    /// existing slot when the type agrees and shadows it otherwise.
    pub fn add_local(&mut self, name: QName, ty: Type) -> Result<u16, Error> {
        if let Some(existing) = self.locals.get(&name)
            && existing.ty == ty
        {
            return Ok(existing.slot);
        }
        let slot = self.next_slot;
        self.next_slot = u16::try_from(ty.slots().max(1))
            .ok()
            .and_then(|width| slot.checked_add(width))
            .ok_or_else(|| {
                Error::internal(
                    ErrorCode::XSLTC0007,
                    format!("no local slot left for ${name} in {}", self.name),
                )
            })?;
        self.locals.insert(name, LocalVariable { slot, ty });
        Ok(slot)
    }

    pub fn local(&self, name: &QName) -> Option<LocalVariable> {
        self.locals.get(name).copied()
    }

    pub fn load_dom(&self) -> Instruction {
        Instruction::ALoad(self.dom_slot)
    }

    pub fn load_context_node(&self) -> Instruction {
        Instruction::ILoad(self.current_node_slot)
    }

    /// `iterator.next()`: replaces the iterator on the stack by its next node.
    pub fn next_node(&self, class_gen: &mut ClassGenerator) -> Result<Instruction, Error> {
        let idx = NEXT.intern(class_gen)?;
        Ok(NEXT.invoke(idx))
    }

    /// `iterator.setStartNode(node)`.
    pub fn set_start_node(&self, class_gen: &mut ClassGenerator) -> Result<Instruction, Error> {
        let idx = SET_START_NODE.intern(class_gen)?;
        Ok(SET_START_NODE.invoke(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locals_start_at_first_free_slot() {
        let cfg = CompilerConfig::default();
        let mut mg = MethodGenerator::new("m", &cfg);
        let a = mg.add_local(QName::local("a"), Type::Real).unwrap();
        let b = mg.add_local(QName::local("b"), Type::NodeSet).unwrap();
        assert_eq!(a, cfg.first_free_slot);
        assert_eq!(b, cfg.first_free_slot + 2);
        assert_eq!(mg.add_local(QName::local("b"), Type::NodeSet).unwrap(), b);
        assert_eq!(mg.local(&QName::local("b")).unwrap().ty, Type::NodeSet);
    }

    #[test]
    fn loads_use_configured_slots() {
        let cfg = crate::config::CompilerConfigBuilder::new()
            .with_dom_slot(7)
            .with_current_node_slot(9)
            .build();
        let mg = MethodGenerator::new("m", &cfg);
        assert_eq!(mg.load_dom(), Instruction::ALoad(7));
        assert_eq!(mg.load_context_node(), Instruction::ILoad(9));
    }

    #[test]
    fn slot_overflow_is_internal_error() {
        let cfg = crate::config::CompilerConfigBuilder::new()
            .with_first_free_slot(u16::MAX - 1)
            .build();
        let mut mg = MethodGenerator::new("m", &cfg);
        assert_eq!(mg.add_local(QName::local("a"), Type::Node).unwrap(), u16::MAX - 1);
        let err = mg.add_local(QName::local("b"), Type::Node).unwrap_err();
        assert_eq!(err.code, ErrorCode::XSLTC0007);
        assert!(mg.local(&QName::local("b")).is_none());

        let mut wide = MethodGenerator::new("w", &cfg);
        let err = wide.add_local(QName::local("d"), Type::Real).unwrap_err();
        assert_eq!(err.code, ErrorCode::XSLTC0007);
    }
}
