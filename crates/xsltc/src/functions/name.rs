use super::name_base::{check_operand, emit_operand};
use crate::ast::Expression;
use crate::bytecode::PoolIndex;
use crate::codegen::runtime::{GET_LOCAL_NAME, GET_NAMESPACE_NAME, GET_NODE_NAME, RuntimeOperation};
use crate::codegen::{ClassGenerator, MethodGenerator, Translate};
use crate::error::{Error, ErrorCode};
use crate::model::QName;
use crate::symbols::SymbolTable;
use crate::types::Type;
use core::fmt;
use smallvec::SmallVec;
use tracing::debug;

/// The members of the node-name function family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameFunction {
    /// `name()`: the node's QName as written, `prefix:local`.
    Name,
    /// `local-name()`
    LocalName,
    /// `namespace-uri()`
    NamespaceUri,
}

impl NameFunction {
    pub const ALL: [NameFunction; 3] = [
        NameFunction::Name,
        NameFunction::LocalName,
        NameFunction::NamespaceUri,
    ];

    pub fn local_name(self) -> &'static str {
        match self {
            NameFunction::Name => "name",
            NameFunction::LocalName => "local-name",
            NameFunction::NamespaceUri => "namespace-uri",
        }
    }

    pub fn from_local_name(local: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.local_name() == local)
    }

    /// Operations appended after the operand, in call order. The first one
    /// consumes the DOM receiver and the node.
    pub fn final_operations(self) -> &'static [RuntimeOperation] {
        match self {
            NameFunction::Name => &[GET_NODE_NAME],
            NameFunction::LocalName => &[GET_NODE_NAME, GET_LOCAL_NAME],
            NameFunction::NamespaceUri => &[GET_NAMESPACE_NAME],
        }
    }
}

impl fmt::Display for NameFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.local_name())
    }
}

/// A call to one of the node-name functions, with zero or one argument.
#[derive(Debug, Clone, PartialEq)]
pub struct NameCall {
    function: NameFunction,
    name: QName,
    param: Option<Expression>,
    // set at construction for the zero-argument form, by type_check otherwise
    param_type: Option<Type>,
}

impl NameCall {
    /// Call with no argument; the current node is the implicit argument.
    pub fn new(function: NameFunction, name: QName) -> Self {
        Self {
            function,
            name,
            param: None,
            param_type: Some(Type::Node),
        }
    }

    /// Call with one node or node-set argument.
    pub fn with_argument(function: NameFunction, name: QName, arg: Expression) -> Self {
        Self {
            function,
            name,
            param: Some(arg),
            param_type: None,
        }
    }

    pub fn function(&self) -> NameFunction {
        self.function
    }

    pub fn name(&self) -> &QName {
        &self.name
    }

    pub fn argument(&self) -> Option<&Expression> {
        self.param.as_ref()
    }

    pub fn argument_count(&self) -> usize {
        usize::from(self.param.is_some())
    }

    pub fn type_check(&mut self, symbols: &SymbolTable) -> Result<Type, Error> {
        let args = self.param.as_slice();
        let ty = check_operand(self.function.local_name(), args, symbols)?;
        self.param_type = Some(ty);
        Ok(Type::String)
    }

    fn intern_final_operations(
        &self,
        class_gen: &mut ClassGenerator,
    ) -> Result<SmallVec<[(RuntimeOperation, PoolIndex); 2]>, Error> {
        self.function
            .final_operations()
            .iter()
            .map(|op| op.intern(class_gen).map(|idx| (*op, idx)))
            .collect()
    }
}

impl Translate for NameCall {
    /// Leaves the node's name (as a string) on the stack.
    fn translate(
        &self,
        class_gen: &mut ClassGenerator,
        method_gen: &mut MethodGenerator,
    ) -> Result<(), Error> {
        let param_type = self.param_type.ok_or_else(|| {
            Error::internal(
                ErrorCode::XSLTC0006,
                format!("{}() translated before type check", self.function),
            )
        })?;
        debug!(function = %self.function, argc = self.argument_count(), param = %param_type, "translating name call");

        let ops = self.intern_final_operations(class_gen)?;
        emit_operand(self.param.as_ref(), param_type, class_gen, method_gen)?;
        for (op, idx) in ops {
            method_gen.append(op.invoke(idx));
        }
        Ok(())
    }
}

impl fmt::Display for NameCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(p) => write!(f, "{}({p})", self.name),
            None => write!(f, "{}()", self.name),
        }
    }
}
