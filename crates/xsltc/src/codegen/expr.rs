//! Type checking and translation of operand expressions.

use super::Translate;
use super::class_gen::ClassGenerator;
use super::method_gen::MethodGenerator;
use super::runtime::{CLONE_ITERATOR, GET_AXIS_ITERATOR, GET_TYPED_AXIS_ITERATOR};
use crate::ast::{Expression, NodeTest, Step};
use crate::bytecode::Instruction;
use crate::error::{Error, ErrorCode};
use crate::model::{Axis, QName};
use crate::symbols::SymbolTable;
use crate::types::Type;

fn undeclared(name: &QName) -> Error {
    Error::static_err(ErrorCode::XPST0008, format!("variable ${name} is not declared"))
}

impl Expression {
    pub fn type_check(&self, symbols: &SymbolTable) -> Result<Type, Error> {
        match self {
            Expression::ContextNode => Ok(Type::Node),
            Expression::VariableRef(name) => symbols.lookup(name).ok_or_else(|| undeclared(name)),
            Expression::Step(_) => Ok(Type::NodeSet),
            Expression::Literal(_) => Ok(Type::String),
        }
    }

    /// Bind a node-set on the stack to the context node.
    ///
    /// Variable references already hold a positioned iterator and are left
    /// alone; non node-set types are ignored.
    pub fn start_iterator(
        &self,
        ty: Type,
        class_gen: &mut ClassGenerator,
        method_gen: &mut MethodGenerator,
    ) -> Result<(), Error> {
        if ty != Type::NodeSet || matches!(self, Expression::VariableRef(_)) {
            return Ok(());
        }
        method_gen.append(method_gen.load_context_node());
        let set_start = method_gen.set_start_node(class_gen)?;
        method_gen.append(set_start);
        Ok(())
    }
}

impl Translate for Expression {
    fn translate(
        &self,
        class_gen: &mut ClassGenerator,
        method_gen: &mut MethodGenerator,
    ) -> Result<(), Error> {
        match self {
            Expression::ContextNode => {
                method_gen.append(method_gen.load_context_node());
                Ok(())
            }
            Expression::VariableRef(name) => translate_variable(name, class_gen, method_gen),
            Expression::Step(step) => translate_step(step, class_gen, method_gen),
            Expression::Literal(s) => {
                let idx = class_gen.constant_pool_mut().add_string(s)?;
                method_gen.append(Instruction::ldc(idx));
                Ok(())
            }
        }
    }
}

fn translate_variable(
    name: &QName,
    class_gen: &mut ClassGenerator,
    method_gen: &mut MethodGenerator,
) -> Result<(), Error> {
    let local = method_gen.local(name).ok_or_else(|| undeclared(name))?;
    match local.ty {
        Type::Node | Type::Int | Type::Boolean => method_gen.append(Instruction::ILoad(local.slot)),
        Type::Real => method_gen.append(Instruction::DLoad(local.slot)),
        Type::NodeSet => {
            // every reference gets its own iterator
            method_gen.append(Instruction::ALoad(local.slot));
            let idx = CLONE_ITERATOR.intern(class_gen)?;
            method_gen.append(CLONE_ITERATOR.invoke(idx));
        }
        Type::Reference | Type::String | Type::Void => {
            method_gen.append(Instruction::ALoad(local.slot))
        }
    }
    Ok(())
}

fn translate_step(
    step: &Step,
    class_gen: &mut ClassGenerator,
    method_gen: &mut MethodGenerator,
) -> Result<(), Error> {
    let type_id = match &step.test {
        NodeTest::AnyNode => None,
        NodeTest::Kind(kind) => Some(kind.type_id()),
        NodeTest::Wildcard => Some(step.axis.principal_kind().type_id()),
        NodeTest::Name(q) if step.axis == Axis::Attribute => {
            Some(class_gen.types_mut().register_attribute(q))
        }
        NodeTest::Name(q) => Some(class_gen.types_mut().register_element(q)),
    };

    method_gen.append(method_gen.load_dom());
    let axis = Instruction::push_int(class_gen.constant_pool_mut(), step.axis.id())?;
    method_gen.append(axis);
    let op = match type_id {
        Some(id) => {
            let ty = Instruction::push_int(class_gen.constant_pool_mut(), id)?;
            method_gen.append(ty);
            GET_TYPED_AXIS_ITERATOR
        }
        None => GET_AXIS_ITERATOR,
    };
    let idx = op.intern(class_gen)?;
    method_gen.append(op.invoke(idx));
    Ok(())
}
